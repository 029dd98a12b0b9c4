use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter};

/// Rounded 0–100 percentage of a 0.0–1.0 fraction.
pub fn to_percent(fraction: f64) -> u8 {
    if !fraction.is_finite() {
        return 0;
    }
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Coarse classification of a total score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumIter,
)]
pub enum MatchBucket {
    #[serde(rename = "strong")]
    #[strum(serialize = "strong")]
    Strong,
    #[serde(rename = "medium")]
    #[strum(serialize = "medium")]
    Medium,
    #[serde(rename = "weak")]
    #[strum(serialize = "weak")]
    Weak,
    #[serde(rename = "non-match")]
    #[strum(serialize = "non-match")]
    NonMatch,
}

impl MatchBucket {
    /// `>= 80` strong, `60..80` medium, `40..60` weak, below 40 non-match.
    pub fn from_percent(percent: u8) -> Self {
        match percent {
            80..=u8::MAX => MatchBucket::Strong,
            60..=79 => MatchBucket::Medium,
            40..=59 => MatchBucket::Weak,
            _ => MatchBucket::NonMatch,
        }
    }

    /// Classification of the displayed (rounded) percentage, so the label
    /// always agrees with the number shown next to it.
    pub fn from_fraction(fraction: f64) -> Self {
        Self::from_percent(to_percent(fraction))
    }
}
