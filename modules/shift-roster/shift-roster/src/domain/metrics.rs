//! Derived attendance, overtime and pay figures.
//!
//! Everything here is a pure function of the cell store and configuration
//! and is safe to recompute on every read.

use std::collections::{BTreeMap, HashSet};

use shift_roster_sdk::models::DEFAULT_TEXT_COLOR;
use shift_roster_sdk::{
    CellKey, DaySummary, Holiday, Member, MemberSummary, MonthKey, RowType, ShiftOption, Subgroup,
};

use super::calendar;
use super::cells::CellStore;
use crate::config::ShiftRosterConfig;

/// Every cell key a member owns in a month of `days` days.
pub fn member_cells(member_id: &str, days: u32) -> impl Iterator<Item = CellKey> + '_ {
    (0..days).flat_map(move |day| RowType::ALL.map(|row| CellKey::new(member_id, day, row)))
}

fn count(iter: impl Iterator<Item = bool>) -> u32 {
    u32::try_from(iter.filter(|hit| *hit).count()).unwrap_or(u32::MAX)
}

/// Non-empty, non-off cells in both rows.
#[must_use]
pub fn total_shifts(cells: &CellStore, member_id: &str, days: u32, cfg: &ShiftRosterConfig) -> u32 {
    count(member_cells(member_id, days).map(|key| {
        let value = cells.get(&key);
        !value.is_empty() && !cfg.is_off(value)
    }))
}

/// Excess of shifts over the working-day baseline; never negative.
#[must_use]
pub const fn ot_count(total_shifts: u32, working_days: u32) -> u32 {
    total_shifts.saturating_sub(working_days)
}

/// Worked cells carrying the overtime marker colour.
#[must_use]
pub fn red_shift_count(
    cells: &CellStore,
    member_id: &str,
    days: u32,
    cfg: &ShiftRosterConfig,
) -> u32 {
    count(member_cells(member_id, days).map(|key| {
        let value = cells.get(&key);
        !value.is_empty()
            && !cfg.is_off(value)
            && !cfg.is_leave(value)
            && cfg.is_ot_marker(&cells.style(&key).text_color)
    }))
}

/// Whether a colour counts as the default (black or unset).
#[must_use]
pub fn is_default_color(color: &str) -> bool {
    color.is_empty() || color == DEFAULT_TEXT_COLOR
}

/// Default-coloured evening and night cells.
#[must_use]
pub fn black_bd_count(
    cells: &CellStore,
    member_id: &str,
    days: u32,
    cfg: &ShiftRosterConfig,
) -> u32 {
    count(member_cells(member_id, days).map(|key| {
        let value = cells.get(&key);
        (value == cfg.codes.evening || value == cfg.codes.night)
            && is_default_color(&cells.style(&key).text_color)
    }))
}

/// All per-member figures for `month`.
#[must_use]
pub fn member_summary(
    cells: &CellStore,
    member_id: &str,
    month: MonthKey,
    holidays: &[Holiday],
    cfg: &ShiftRosterConfig,
) -> MemberSummary {
    let days = u32::from(month.days_in_month());
    let total_shifts = total_shifts(cells, member_id, days, cfg);
    let working_days = calendar::working_days(month, holidays);
    MemberSummary {
        member_id: member_id.to_owned(),
        total_shifts,
        working_days,
        ot_count: ot_count(total_shifts, working_days),
        red_shift_count: red_shift_count(cells, member_id, days, cfg),
        black_bd_count: black_bd_count(cells, member_id, days, cfg),
    }
}

/// Per-day tallies of summary-tracked option names over one subgroup.
///
/// Names of options without `include_in_team` are not counted; every
/// tracked name appears in each day's map, zero when absent.
#[must_use]
pub fn day_summaries(
    cells: &CellStore,
    members: &[Member],
    subgroup: Subgroup,
    options: &[ShiftOption],
    month: MonthKey,
) -> Vec<DaySummary> {
    let tracked: HashSet<&str> = options
        .iter()
        .filter(|o| o.include_in_team)
        .map(|o| o.name.as_str())
        .collect();
    let population: Vec<&Member> = members.iter().filter(|m| m.subgroup() == subgroup).collect();

    (0..u32::from(month.days_in_month()))
        .map(|day_index| {
            let mut counts: BTreeMap<String, u32> =
                tracked.iter().map(|name| ((*name).to_owned(), 0)).collect();
            for member in &population {
                for row in RowType::ALL {
                    let value = cells.get(&CellKey::new(member.id.as_str(), day_index, row));
                    if let Some(slot) = counts.get_mut(value) {
                        *slot += 1;
                    }
                }
            }
            DaySummary { day_index, counts }
        })
        .collect()
}
