//! Randomized auto-assignment passes.
//!
//! Both passes write through [`CellStore`] and report every cell they
//! touched with its previous state, so the caller can record history and
//! arm the autosave exactly as for manual edits. The random source is
//! injected; tests pass a seeded `StdRng`.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use shift_roster_sdk::{CellKey, CellStylePatch, Holiday, Member, MonthKey, Subgroup};

use super::calendar;
use super::cells::CellStore;
use super::metrics;
use crate::config::ShiftRosterConfig;

/// Why the coverage pass left a day alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// An assistant cell on the day already holds a value.
    AlreadyFilled,
    /// The previous day has a night-top + evening-bottom assistant.
    Fatigue,
    /// Both preceding days have a morning-top + evening-bottom assistant.
    ConsecutiveCap,
}

/// One cell value written by the coverage pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellWrite {
    pub key: CellKey,
    pub old: String,
    pub new: String,
}

/// Outcome of a coverage run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageReport {
    pub writes: Vec<CellWrite>,
    pub skipped: Vec<(u32, SkipReason)>,
}

impl CoverageReport {
    /// Days that received writes, ascending.
    #[must_use]
    pub fn filled_days(&self) -> Vec<u32> {
        let mut days: Vec<u32> = self.writes.iter().map(|w| w.key.day_index).collect();
        days.dedup();
        days
    }
}

/// One cell recoloured by the OT-marking pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recolor {
    pub key: CellKey,
    pub old_color: String,
    pub new_color: String,
}

fn has_pattern(cells: &CellStore, assistants: &[&Member], day: u32, top: &str, bottom: &str) -> bool {
    assistants
        .iter()
        .any(|m| cells.day_values(&m.id, day) == (top, bottom))
}

fn skip_reason(
    cells: &CellStore,
    assistants: &[&Member],
    day: u32,
    cfg: &ShiftRosterConfig,
) -> Option<SkipReason> {
    let codes = &cfg.codes;
    if cells.any_filled(assistants.iter().copied(), day) {
        return Some(SkipReason::AlreadyFilled);
    }
    if day >= 1 && has_pattern(cells, assistants, day - 1, &codes.night, &codes.evening) {
        return Some(SkipReason::Fatigue);
    }
    if day >= 2
        && (1..=2).all(|back| has_pattern(cells, assistants, day - back, &codes.morning, &codes.evening))
    {
        return Some(SkipReason::ConsecutiveCap);
    }
    None
}

fn draw<'a, R: Rng + ?Sized>(pool: &[&'a Member], count: usize, rng: &mut R) -> Vec<&'a Member> {
    let mut shuffled = pool.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(count);
    shuffled
}

fn write(cells: &mut CellStore, report: &mut CoverageReport, key: CellKey, value: &str) {
    let old = cells.set(key.clone(), value);
    report.writes.push(CellWrite {
        key,
        old,
        new: value.to_owned(),
    });
}

/// Fills empty assistant days of `month`, day by day.
///
/// Adjacency rules are evaluated against the store as it is being filled,
/// so a day written by this run constrains the following days. A roster
/// without assistants yields an empty report.
pub fn assign_coverage<R: Rng + ?Sized>(
    cells: &mut CellStore,
    members: &[Member],
    month: MonthKey,
    cfg: &ShiftRosterConfig,
    rng: &mut R,
) -> CoverageReport {
    let assistants: Vec<&Member> = members
        .iter()
        .filter(|m| m.subgroup() == Subgroup::Assistant)
        .collect();
    let mut report = CoverageReport::default();
    if assistants.is_empty() {
        return report;
    }

    let codes = &cfg.codes;
    let slots = &cfg.coverage;
    for day in 0..u32::from(month.days_in_month()) {
        if let Some(reason) = skip_reason(cells, &assistants, day, cfg) {
            report.skipped.push((day, reason));
            continue;
        }

        for member in draw(&assistants, slots.top_slots, rng) {
            let code = if rng.random_bool(0.5) {
                &codes.morning
            } else {
                &codes.night
            };
            write(cells, &mut report, CellKey::top(member.id.as_str(), day), code);
        }

        let evening = draw(&assistants, slots.evening_slots, rng);
        let night_pool: Vec<&Member> = if slots.allow_bottom_double_booking {
            assistants.clone()
        } else {
            let taken: HashSet<&str> = evening.iter().map(|m| m.id.as_str()).collect();
            assistants
                .iter()
                .copied()
                .filter(|m| !taken.contains(m.id.as_str()))
                .collect()
        };
        for member in evening {
            write(cells, &mut report, CellKey::bottom(member.id.as_str(), day), &codes.evening);
        }
        for member in draw(&night_pool, slots.night_slots, rng) {
            write(cells, &mut report, CellKey::bottom(member.id.as_str(), day), &codes.night);
        }
    }
    report
}

/// Picks at most `required` of `candidates`, spread over week buckets.
///
/// Each bucket contributes up to `ceil(required / buckets)` cells, top row
/// first; shortfalls are topped up at random from the rest.
pub fn select_spread<R: Rng + ?Sized>(
    candidates: &[CellKey],
    required: usize,
    month: MonthKey,
    rng: &mut R,
) -> Vec<CellKey> {
    let buckets = calendar::week_buckets(month);
    if required == 0 || candidates.is_empty() || buckets.is_empty() {
        return Vec::new();
    }
    let share = required.div_ceil(buckets.len());
    let mut selected: Vec<CellKey> = Vec::with_capacity(required);

    for bucket in &buckets {
        let remaining = required - selected.len();
        if remaining == 0 {
            break;
        }
        let mut in_bucket: Vec<&CellKey> = candidates
            .iter()
            .filter(|k| bucket.contains(&k.day_index))
            .collect();
        in_bucket.shuffle(rng);
        in_bucket.sort_by_key(|k| k.row);
        selected.extend(in_bucket.into_iter().take(share.min(remaining)).cloned());
    }

    if selected.len() < required {
        let chosen: HashSet<&CellKey> = selected.iter().collect();
        let mut rest: Vec<CellKey> = candidates
            .iter()
            .filter(|k| !chosen.contains(k))
            .cloned()
            .collect();
        rest.shuffle(rng);
        rest.truncate(required - selected.len());
        selected.extend(rest);
    }
    selected
}

/// Recolours eligible cells so each member's marked count covers their OT.
///
/// The outstanding amount is `ot_count - red_shift_count`, so cells marked
/// by an earlier run are not counted twice.
pub fn mark_overtime<R: Rng + ?Sized>(
    cells: &mut CellStore,
    members: &[Member],
    month: MonthKey,
    holidays: &[Holiday],
    cfg: &ShiftRosterConfig,
    rng: &mut R,
) -> Vec<Recolor> {
    let days = u32::from(month.days_in_month());
    let mut recolored = Vec::new();

    for member in members {
        let summary = metrics::member_summary(cells, &member.id, month, holidays, cfg);
        let required = summary.ot_count.saturating_sub(summary.red_shift_count);
        if required == 0 {
            continue;
        }
        let candidates: Vec<CellKey> = metrics::member_cells(&member.id, days)
            .filter(|key| {
                cfg.is_ot_eligible(cells.get(key)) && !cfg.is_ot_marker(&cells.style(key).text_color)
            })
            .collect();
        let required = usize::try_from(required).unwrap_or(usize::MAX);

        for key in select_spread(&candidates, required, month, rng) {
            let previous = cells.set_style(key.clone(), CellStylePatch::color(cfg.ot_marker_color.clone()));
            recolored.push(Recolor {
                key,
                old_color: previous.text_color,
                new_color: cfg.ot_marker_color.clone(),
            });
        }
    }
    recolored
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use shift_roster_sdk::{MemberRole, RowType};

    fn march() -> MonthKey {
        "2026-03".parse().unwrap()
    }

    fn assistants(n: usize) -> Vec<Member> {
        (0..n)
            .map(|i| Member::new(format!("a{i}"), MemberRole::NursingAssistant))
            .collect()
    }

    #[test]
    fn test_coverage_fills_empty_days() {
        let cfg = ShiftRosterConfig::default();
        let members = assistants(6);
        let mut cells = CellStore::new();
        let mut rng = StdRng::seed_from_u64(7);

        let report = assign_coverage(&mut cells, &members, march(), &cfg, &mut rng);

        assert!(!report.writes.is_empty());
        let day0_top = members
            .iter()
            .filter(|m| !cells.get(&CellKey::top(m.id.as_str(), 0)).is_empty())
            .count();
        assert_eq!(day0_top, 2);
        for write in &report.writes {
            assert!(write.old.is_empty() || write.key.row == RowType::Bottom);
        }
    }

    #[test]
    fn test_coverage_day_writes_follow_slots_and_codes() {
        let cfg = ShiftRosterConfig::default();
        let codes = &cfg.codes;
        let slots = &cfg.coverage;
        let mut members = assistants(6);
        members.push(Member::new("n0", MemberRole::RegisteredNurse));
        let mut cells = CellStore::new();
        let mut rng = StdRng::seed_from_u64(13);

        let report = assign_coverage(&mut cells, &members, march(), &cfg, &mut rng);

        let filled = report.filled_days();
        assert!(!filled.is_empty());
        assert!(report.writes.iter().all(|w| w.key.member_id != "n0"));

        let per_day = slots.top_slots + slots.evening_slots + slots.night_slots;
        for day in filled {
            let writes: Vec<&CellWrite> = report.writes.iter().filter(|w| w.key.day_index == day).collect();
            assert_eq!(writes.len(), per_day, "day {day}");

            let (top, bottom) = writes.split_at(slots.top_slots);
            for w in top {
                assert_eq!(w.key.row, RowType::Top);
                assert!(w.new == codes.morning || w.new == codes.night, "day {day}: {}", w.new);
            }
            let (evening, night) = bottom.split_at(slots.evening_slots);
            for w in evening {
                assert_eq!(w.key.row, RowType::Bottom);
                assert_eq!(w.new, codes.evening);
            }
            for w in night {
                assert_eq!(w.key.row, RowType::Bottom);
                assert_eq!(w.new, codes.night);
            }
        }
    }

    #[test]
    fn test_coverage_never_touches_partially_filled_day() {
        let cfg = ShiftRosterConfig::default();
        let members = assistants(4);
        let mut cells = CellStore::new();
        cells.set(CellKey::bottom("a3", 0), "meeting");
        let mut rng = StdRng::seed_from_u64(1);

        let report = assign_coverage(&mut cells, &members, march(), &cfg, &mut rng);

        assert!(report.skipped.contains(&(0, SkipReason::AlreadyFilled)));
        assert!(report.writes.iter().all(|w| w.key.day_index != 0));
        assert_eq!(cells.get(&CellKey::bottom("a3", 0)), "meeting");
        assert_eq!(cells.get(&CellKey::top("a0", 0)), "");
    }

    #[test]
    fn test_coverage_rerun_is_noop() {
        let cfg = ShiftRosterConfig::default();
        let members = assistants(5);
        let mut cells = CellStore::new();
        let mut rng = StdRng::seed_from_u64(3);

        assign_coverage(&mut cells, &members, march(), &cfg, &mut rng);
        let snapshot = cells.clone();
        let second = assign_coverage(&mut cells, &members, march(), &cfg, &mut rng);

        assert!(second.writes.is_empty());
        assert_eq!(cells, snapshot);
    }

    #[test]
    fn test_coverage_fatigue_rule_skips_next_day() {
        let cfg = ShiftRosterConfig::default();
        let members = assistants(3);
        let mut cells = CellStore::new();
        // day 0 filled with night-top + evening-bottom, day 1 must be skipped
        cells.set(CellKey::top("a0", 0), cfg.codes.night.clone());
        cells.set(CellKey::bottom("a0", 0), cfg.codes.evening.clone());
        let mut rng = StdRng::seed_from_u64(11);

        let report = assign_coverage(&mut cells, &members, march(), &cfg, &mut rng);

        assert!(report.skipped.contains(&(1, SkipReason::Fatigue)));
        assert!(!cells.any_filled(&members, 1));
    }

    #[test]
    fn test_coverage_consecutive_cap() {
        let cfg = ShiftRosterConfig::default();
        let mut members = assistants(2);
        members.push(Member::new("n0", MemberRole::RegisteredNurse));
        let mut cells = CellStore::new();
        for day in [3, 4] {
            cells.set(CellKey::top("a0", day), cfg.codes.morning.clone());
            cells.set(CellKey::bottom("a0", day), cfg.codes.evening.clone());
        }
        let mut rng = StdRng::seed_from_u64(5);

        let report = assign_coverage(&mut cells, &members, march(), &cfg, &mut rng);

        assert!(report.skipped.contains(&(5, SkipReason::ConsecutiveCap)));
        assert!(!cells.any_filled(&members, 5));
        assert!(report.writes.iter().all(|w| w.key.member_id != "n0"));
    }

    #[test]
    fn test_coverage_without_assistants_is_noop() {
        let cfg = ShiftRosterConfig::default();
        let members = vec![Member::new("n0", MemberRole::RegisteredNurse)];
        let mut cells = CellStore::new();
        let mut rng = StdRng::seed_from_u64(0);

        let report = assign_coverage(&mut cells, &members, march(), &cfg, &mut rng);
        assert_eq!(report, CoverageReport::default());
        assert!(cells.is_empty());
    }

    #[test]
    fn test_coverage_without_double_booking_keeps_evening() {
        let mut cfg = ShiftRosterConfig::default();
        cfg.coverage.allow_bottom_double_booking = false;
        let members = assistants(4);
        let mut cells = CellStore::new();
        let mut rng = StdRng::seed_from_u64(21);

        let report = assign_coverage(&mut cells, &members, march(), &cfg, &mut rng);

        // every written bottom cell keeps its first value
        let bottom_writes: Vec<&CellWrite> = report
            .writes
            .iter()
            .filter(|w| w.key.row == RowType::Bottom)
            .collect();
        assert!(bottom_writes.iter().all(|w| w.old.is_empty()));
    }

    fn month_of_mornings(cells: &mut CellStore, cfg: &ShiftRosterConfig, member: &str, days: u32) {
        for day in 0..days {
            cells.set(CellKey::top(member, day), cfg.codes.morning.clone());
        }
    }

    #[test]
    fn test_mark_overtime_example_scenario() {
        let cfg = ShiftRosterConfig::default();
        let members = vec![Member::new("m1", MemberRole::RegisteredNurse)];
        let mut cells = CellStore::new();
        month_of_mornings(&mut cells, &cfg, "m1", 24);
        let mut rng = StdRng::seed_from_u64(42);

        let recolored = mark_overtime(&mut cells, &members, march(), &[], &cfg, &mut rng);

        assert_eq!(recolored.len(), 2);
        assert!(recolored.iter().all(|r| r.old_color == "black"));
        assert_ne!(recolored[0].key, recolored[1].key);
        assert_eq!(metrics::red_shift_count(&cells, "m1", 31, &cfg), 2);
    }

    #[test]
    fn test_mark_overtime_rerun_does_not_double_count() {
        let cfg = ShiftRosterConfig::default();
        let members = vec![Member::new("m1", MemberRole::RegisteredNurse)];
        let mut cells = CellStore::new();
        month_of_mornings(&mut cells, &cfg, "m1", 25);
        let mut rng = StdRng::seed_from_u64(9);

        assert_eq!(mark_overtime(&mut cells, &members, march(), &[], &cfg, &mut rng).len(), 3);
        assert!(mark_overtime(&mut cells, &members, march(), &[], &cfg, &mut rng).is_empty());
        assert_eq!(metrics::red_shift_count(&cells, "m1", 31, &cfg), 3);
    }

    #[test]
    fn test_mark_overtime_ignores_members_without_ot_and_ineligible_codes() {
        let cfg = ShiftRosterConfig::default();
        let members = vec![
            Member::new("m1", MemberRole::RegisteredNurse),
            Member::new("m2", MemberRole::RegisteredNurse),
        ];
        let mut cells = CellStore::new();
        month_of_mornings(&mut cells, &cfg, "m1", 10);
        // 24 shifts, none eligible for marking
        for day in 0..24 {
            cells.set(CellKey::top("m2", day), "training");
        }
        let mut rng = StdRng::seed_from_u64(2);

        let recolored = mark_overtime(&mut cells, &members, march(), &[], &cfg, &mut rng);
        assert!(recolored.is_empty());
    }

    #[test]
    fn test_select_spread_caps_and_spreads() {
        let month = march();
        let candidates: Vec<CellKey> = (0..31)
            .flat_map(|d| [CellKey::top("m1", d), CellKey::bottom("m1", d)])
            .collect();
        let mut rng = StdRng::seed_from_u64(4);

        let picked = select_spread(&candidates, 5, month, &mut rng);
        assert_eq!(picked.len(), 5);
        // one per week bucket, top row preferred
        let mut weeks: Vec<u32> = picked.iter().map(|k| k.day_index / 7).collect();
        weeks.sort_unstable();
        assert_eq!(weeks, vec![0, 1, 2, 3, 4]);
        assert!(picked.iter().all(|k| k.row == RowType::Top));

        let few = &candidates[..3];
        assert_eq!(select_spread(few, 10, month, &mut rng).len(), 3);
        assert!(select_spread(&candidates, 0, month, &mut rng).is_empty());
    }
}
