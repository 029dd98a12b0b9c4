use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, IntoStaticStr};

use super::text::fold_label;
use crate::criteria::CriteriaError;

/// Canonical sex values used on both sides of the comparison.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, IntoStaticStr,
)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Sex {
    #[strum(serialize = "FEMME")]
    Female,
    #[strum(serialize = "HOMME")]
    Male,
}

lazy_static! {
    /// Spellings seen in volunteer records and study forms, keyed by folded label.
    static ref SEX_SYNONYMS: HashMap<&'static str, Sex> = {
        let mut m = HashMap::new();
        for label in ["femme", "f", "feminin", "feminine", "female", "woman", "mme", "madame"] {
            m.insert(label, Sex::Female);
        }
        for label in ["homme", "h", "m", "masculin", "male", "man", "mr", "monsieur"] {
            m.insert(label, Sex::Male);
        }
        m
    };
}

/// `"FEMME"`, `"Femme"`, `"F"`, `"féminin"`, `"female"` → `Sex::Female`, and
/// the same family for `Sex::Male`. Anything else is unknown.
pub fn normalize_sex(raw: &str) -> Option<Sex> {
    let folded = fold_label(raw);
    let folded = folded.trim_end_matches('.');
    SEX_SYNONYMS.get(folded).copied()
}

impl TryFrom<String> for Sex {
    type Error = CriteriaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        normalize_sex(&value).ok_or(CriteriaError::UnknownSex(value))
    }
}
