//! Configuration for the Shift Roster module.

use std::path::Path;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// Prefix of environment overrides, e.g. `SHIFT_ROSTER_HISTORY_LIMIT=8`.
pub const ENV_PREFIX: &str = "SHIFT_ROSTER_";

/// Configuration for the Shift Roster module.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct ShiftRosterConfig {
    /// Quiet interval before a debounced autosave fires.
    pub autosave_debounce_ms: u64,

    /// Maximum number of undoable edits.
    pub history_limit: usize,

    /// Text colour that marks a shift as overtime for pay purposes.
    pub ot_marker_color: String,

    /// The three shift codes the rules reason about.
    pub codes: ShiftCodes,

    /// Codes that do not count as a worked shift.
    pub off_codes: Vec<String>,

    /// Leave codes; never counted as overtime even when coloured.
    pub leave_codes: Vec<String>,

    /// Codes the OT-marking pass may recolour.
    pub ot_eligible_codes: Vec<String>,

    pub coverage: CoverageConfig,

    pub collections: CollectionNames,
}

/// Morning / evening / night shift codes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct ShiftCodes {
    pub morning: String,
    pub evening: String,
    pub night: String,
}

impl Default for ShiftCodes {
    fn default() -> Self {
        Self {
            morning: "\u{0e0a}".to_owned(),
            evening: "\u{0e1a}".to_owned(),
            night: "\u{0e14}".to_owned(),
        }
    }
}

/// Staffing numbers of the coverage auto-assignment pass.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct CoverageConfig {
    /// Assistants placed on the top row (morning or night, 50/50).
    pub top_slots: usize,
    /// Assistants placed on the bottom row with the evening code.
    pub evening_slots: usize,
    /// Assistants placed on the bottom row with the night code.
    pub night_slots: usize,
    /// Whether the night draw may pick an assistant already drawn for evening.
    /// The later night write then wins the bottom cell.
    pub allow_bottom_double_booking: bool,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            top_slots: 2,
            evening_slots: 2,
            night_slots: 2,
            allow_bottom_double_booking: true,
        }
    }
}

/// Document store collection names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct CollectionNames {
    pub schedules: String,
    pub teams: String,
    pub shift_options: String,
    pub permissions: String,
    pub holidays: String,
}

impl Default for CollectionNames {
    fn default() -> Self {
        Self {
            schedules: "schedules".to_owned(),
            teams: "teams".to_owned(),
            shift_options: "shiftOptions".to_owned(),
            permissions: "permissions".to_owned(),
            holidays: "holidays".to_owned(),
        }
    }
}

impl Default for ShiftRosterConfig {
    fn default() -> Self {
        let codes = ShiftCodes::default();
        Self {
            autosave_debounce_ms: 1000,
            history_limit: 5,
            ot_marker_color: "red".to_owned(),
            off_codes: vec!["OFF".to_owned(), "\u{0e2b}\u{0e22}\u{0e38}\u{0e14}".to_owned()],
            leave_codes: vec!["\u{0e25}\u{0e32}".to_owned(), "VAC".to_owned()],
            ot_eligible_codes: vec![
                codes.morning.clone(),
                codes.evening.clone(),
                codes.night.clone(),
            ],
            codes,
            coverage: CoverageConfig::default(),
            collections: CollectionNames::default(),
        }
    }
}

impl ShiftRosterConfig {
    /// Layers defaults, an optional YAML file and `SHIFT_ROSTER_*` env vars.
    ///
    /// Nested keys use `__` in env vars, e.g. `SHIFT_ROSTER_CODES__NIGHT=N`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or env values do not match the schema.
    pub fn load(path: Option<&Path>) -> Result<Self, Box<figment::Error>> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)
    }

    #[must_use]
    pub const fn autosave_debounce(&self) -> Duration {
        Duration::from_millis(self.autosave_debounce_ms)
    }

    #[must_use]
    pub fn is_off(&self, value: &str) -> bool {
        self.off_codes.iter().any(|c| c == value)
    }

    #[must_use]
    pub fn is_leave(&self, value: &str) -> bool {
        self.leave_codes.iter().any(|c| c == value)
    }

    #[must_use]
    pub fn is_ot_eligible(&self, value: &str) -> bool {
        self.ot_eligible_codes.iter().any(|c| c == value)
    }

    #[must_use]
    pub fn is_ot_marker(&self, color: &str) -> bool {
        color == self.ot_marker_color
    }
}
