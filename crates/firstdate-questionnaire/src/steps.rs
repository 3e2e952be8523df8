use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::ITEMS_PER_STEP;
use crate::fields::{self, FieldSpec, BASIC_FIELD_COUNT};

/// A wizard step number, always within `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Step(u8);

impl Step {
    pub const FIRST: Step = Step(1);
    pub const LAST: Step = Step(6);
    pub const COUNT: u8 = 6;

    /// First of the four personality steps.
    const FIRST_LIKERT: u8 = 3;

    pub fn new(number: u8) -> Option<Step> {
        (Self::FIRST.0..=Self::LAST.0)
            .contains(&number)
            .then_some(Step(number))
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn next(self) -> Option<Step> {
        Step::new(self.0 + 1)
    }

    pub fn previous(self) -> Option<Step> {
        self.0.checked_sub(1).and_then(Step::new)
    }

    pub fn is_last(self) -> bool {
        self == Self::LAST
    }

    pub fn all() -> impl Iterator<Item = Step> {
        (Self::FIRST.0..=Self::LAST.0).map(Step)
    }

    pub fn title(self) -> String {
        match self.0 {
            1 => "Basic Information".to_string(),
            2 => "Your Preferences".to_string(),
            n => format!(
                "Personality Questions ({}/{})",
                n - Self::FIRST_LIKERT + 1,
                Self::LAST.0 - Self::FIRST_LIKERT + 1
            ),
        }
    }

    pub fn progress_percent(self) -> u8 {
        // Whole percent, rounded down.
        (u16::from(self.0) * 100 / u16::from(Self::COUNT)) as u8
    }

    /// The fields this step gates, as a contiguous slice of the registry.
    pub fn fields(self) -> &'static [FieldSpec] {
        let all = fields::all_fields();
        let profile = fields::profile_field_count();
        match self.0 {
            1 => &all[..BASIC_FIELD_COUNT],
            2 => &all[BASIC_FIELD_COUNT..profile],
            n => {
                let start = profile + usize::from(n - Self::FIRST_LIKERT) * ITEMS_PER_STEP;
                &all[start..start + ITEMS_PER_STEP]
            }
        }
    }

    /// The step whose fields include `key`.
    pub fn containing(key: &str) -> Option<Step> {
        Step::all().find(|s| s.fields().iter().any(|f| f.key == key))
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
