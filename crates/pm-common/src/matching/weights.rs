use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use crate::criteria::CriteriaError;

/// Split used by the volunteer matching screen.
pub const STANDARD_SPLIT: ScoreSplit = ScoreSplit {
    demographic: 0.7,
    habits: 0.3,
};

/// Split used by the study matching screen, which leans harder on
/// demographics.
pub const STUDY_SPLIT: ScoreSplit = ScoreSplit {
    demographic: 0.8,
    habits: 0.2,
};

/// Share of the total score given to each sub-score when both are active.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSplit {
    pub demographic: f64,
    pub habits: f64,
}

impl Default for ScoreSplit {
    fn default() -> Self {
        STANDARD_SPLIT
    }
}

impl ScoreSplit {
    /// Builds a split from the demographic share; habits get the rest.
    pub fn from_demographic_share(demographic: f64) -> Result<Self, CriteriaError> {
        let split = Self {
            demographic,
            habits: 1.0 - demographic,
        };
        split.validate()?;
        Ok(split)
    }

    pub fn sum(&self) -> f64 {
        self.demographic + self.habits
    }

    pub fn validate(&self) -> Result<(), CriteriaError> {
        let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if in_unit(self.demographic) && in_unit(self.habits) && (self.sum() - 1.0).abs() < 1e-6 {
            Ok(())
        } else {
            Err(CriteriaError::InvalidSplit(self.demographic))
        }
    }
}

/// How the total is formed when no demographic facet is active but habit
/// facets are.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, AsRefStr, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DemographicsInactive {
    /// The habits score becomes 100% of the total.
    #[default]
    Renormalize,
    /// The split still applies, capping the total at the habits share.
    FixedSplit,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalWeighting {
    #[serde(default)]
    pub split: ScoreSplit,
    #[serde(default)]
    pub demographics_inactive: DemographicsInactive,
}

impl TotalWeighting {
    pub fn new(split: ScoreSplit, demographics_inactive: DemographicsInactive) -> Self {
        Self {
            split,
            demographics_inactive,
        }
    }

    /// Combines the two normalized sub-scores. `None` marks a side with no
    /// active facet.
    pub fn combine(&self, demographic: Option<f64>, habits: Option<f64>) -> f64 {
        let total = match (demographic, habits) {
            (Some(d), Some(h)) => self.split.demographic * d + self.split.habits * h,
            (Some(d), None) => d,
            (None, Some(h)) => match self.demographics_inactive {
                DemographicsInactive::Renormalize => h,
                DemographicsInactive::FixedSplit => self.split.habits * h,
            },
            (None, None) => 0.0,
        };
        total.clamp(0.0, 1.0)
    }
}

/// `standard`, `study`, or a bare demographic share.
pub fn parse_split(raw: &str) -> Option<ScoreSplit> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "standard" => Some(STANDARD_SPLIT),
        "study" | "etude" => Some(STUDY_SPLIT),
        other => other
            .parse::<f64>()
            .ok()
            .and_then(|share| ScoreSplit::from_demographic_share(share).ok()),
    }
}
