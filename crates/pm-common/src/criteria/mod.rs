//! Study selection criteria.
//!
//! A [`CriteriaSet`] is a snapshot read by the scorer. Every facet is replaced
//! as a whole (values or weight), never edited in place, so callers can detect
//! changes by comparing snapshots.

pub mod facets;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use thiserror::Error;

use crate::corrections::Sex;
use crate::matching::weights::TotalWeighting;

pub use facets::HabitFacet;

/// Weight given to every facet of a freshly created criteria set.
pub const DEFAULT_FACET_WEIGHT: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CriteriaError {
    #[error("invalid weight for {facet}: {weight} (must be a finite number >= 0)")]
    InvalidWeight { facet: String, weight: f64 },
    #[error("age bound is not a whole number of years: {0:?}")]
    InvalidAgeBound(String),
    #[error("age range is inverted: min {min} > max {max}")]
    InvertedAgeRange { min: u32, max: u32 },
    #[error("unknown option {label:?} for habit facet {facet}")]
    UnknownHabitLabel { facet: &'static str, label: String },
    #[error("unknown sex value: {0:?}")]
    UnknownSex(String),
    #[error("invalid score split: demographic share {0} must be within 0..=1")]
    InvalidSplit(f64),
}

fn check_weight(facet: &str, weight: f64) -> Result<f64, CriteriaError> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(weight)
    } else {
        Err(CriteriaError::InvalidWeight {
            facet: facet.to_string(),
            weight,
        })
    }
}

/// Parses an age bound typed into the study form. Blank input clears the
/// bound.
pub fn parse_age_bound(raw: &str) -> Result<Option<u32>, CriteriaError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed
        .parse::<u32>()
        .map(Some)
        .map_err(|_| CriteriaError::InvalidAgeBound(raw.to_string()))
}

/// One configurable facet: the option labels a study asks for and the weight
/// of the facet. No selected value means the facet is inactive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredCriterionGroup")]
pub struct CriterionGroup {
    selected_values: BTreeSet<String>,
    weight: f64,
}

/// Group as persisted by the studies store. Labels are cleaned on load like
/// in [`CriterionGroup::new`]; the weight is left to [`CriteriaSet::validate`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCriterionGroup {
    #[serde(default)]
    selected_values: Vec<String>,
    #[serde(default = "default_weight")]
    weight: f64,
}

impl From<StoredCriterionGroup> for CriterionGroup {
    fn from(stored: StoredCriterionGroup) -> Self {
        Self {
            selected_values: clean_values(stored.selected_values),
            weight: stored.weight,
        }
    }
}

fn default_weight() -> f64 {
    DEFAULT_FACET_WEIGHT
}

impl Default for CriterionGroup {
    fn default() -> Self {
        Self {
            selected_values: BTreeSet::new(),
            weight: DEFAULT_FACET_WEIGHT,
        }
    }
}

impl CriterionGroup {
    /// Blank labels are dropped; surrounding whitespace is trimmed.
    pub fn new<I, S>(values: I, weight: f64) -> Result<Self, CriteriaError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            selected_values: clean_values(values),
            weight: check_weight("criterion group", weight)?,
        })
    }

    pub fn selected_values(&self) -> &BTreeSet<String> {
        &self.selected_values
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn is_active(&self) -> bool {
        !self.selected_values.is_empty()
    }
}

fn clean_values<I, S>(values: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| v.as_ref().trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Optional whole-year bound with its own weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeBound {
    #[serde(default)]
    pub years: Option<u32>,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl Default for AgeBound {
    fn default() -> Self {
        Self {
            years: None,
            weight: DEFAULT_FACET_WEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaSet {
    #[serde(default)]
    sex: Option<Sex>,
    #[serde(default = "default_weight")]
    sex_weight: f64,
    #[serde(default)]
    age_min: AgeBound,
    #[serde(default)]
    age_max: AgeBound,
    #[serde(default)]
    phototypes: CriterionGroup,
    #[serde(default)]
    skin_types: CriterionGroup,
    #[serde(default)]
    habits: BTreeMap<HabitFacet, CriterionGroup>,
    /// Snapshots stored without a weighting load with the standard split,
    /// same as [`CriteriaSet::new`].
    #[serde(default)]
    weighting: TotalWeighting,
}

impl Default for CriteriaSet {
    fn default() -> Self {
        Self::new()
    }
}

impl CriteriaSet {
    /// Every facet inactive, every weight at [`DEFAULT_FACET_WEIGHT`], standard
    /// weighting.
    pub fn new() -> Self {
        Self {
            sex: None,
            sex_weight: DEFAULT_FACET_WEIGHT,
            age_min: AgeBound::default(),
            age_max: AgeBound::default(),
            phototypes: CriterionGroup::default(),
            skin_types: CriterionGroup::default(),
            habits: HabitFacet::iter()
                .map(|facet| (facet, CriterionGroup::default()))
                .collect(),
            weighting: TotalWeighting::default(),
        }
    }

    pub fn sex(&self) -> Option<Sex> {
        self.sex
    }

    pub fn sex_weight(&self) -> f64 {
        self.sex_weight
    }

    pub fn age_min(&self) -> AgeBound {
        self.age_min
    }

    pub fn age_max(&self) -> AgeBound {
        self.age_max
    }

    pub fn phototypes(&self) -> &CriterionGroup {
        &self.phototypes
    }

    pub fn skin_types(&self) -> &CriterionGroup {
        &self.skin_types
    }

    pub fn habit_facet(&self, facet: HabitFacet) -> Option<&CriterionGroup> {
        self.habits.get(&facet)
    }

    /// Habit facets in declaration order, including inactive ones.
    pub fn habit_facets(&self) -> impl Iterator<Item = (HabitFacet, &CriterionGroup)> {
        self.habits.iter().map(|(facet, group)| (*facet, group))
    }

    pub fn weighting(&self) -> TotalWeighting {
        self.weighting
    }

    pub fn set_sex(&mut self, sex: Option<Sex>, weight: f64) -> Result<(), CriteriaError> {
        self.sex_weight = check_weight("sex", weight)?;
        self.sex = sex;
        Ok(())
    }

    pub fn set_age_min(&mut self, years: Option<u32>, weight: f64) -> Result<(), CriteriaError> {
        let bound = AgeBound {
            years,
            weight: check_weight("ageMin", weight)?,
        };
        check_age_range(bound, self.age_max)?;
        self.age_min = bound;
        Ok(())
    }

    pub fn set_age_max(&mut self, years: Option<u32>, weight: f64) -> Result<(), CriteriaError> {
        let bound = AgeBound {
            years,
            weight: check_weight("ageMax", weight)?,
        };
        check_age_range(self.age_min, bound)?;
        self.age_max = bound;
        Ok(())
    }

    pub fn set_phototypes(&mut self, group: CriterionGroup) {
        self.phototypes = group;
    }

    pub fn set_skin_types(&mut self, group: CriterionGroup) {
        self.skin_types = group;
    }

    /// Replaces a habit facet. Every selected label must exist in the facet's
    /// option table.
    pub fn set_habit_facet(
        &mut self,
        facet: HabitFacet,
        group: CriterionGroup,
    ) -> Result<(), CriteriaError> {
        check_habit_labels(facet, &group)?;
        self.habits.insert(facet, group);
        Ok(())
    }

    pub fn set_sex_weight(&mut self, weight: f64) -> Result<(), CriteriaError> {
        self.sex_weight = check_weight("sex", weight)?;
        Ok(())
    }

    pub fn set_age_min_weight(&mut self, weight: f64) -> Result<(), CriteriaError> {
        self.age_min.weight = check_weight("ageMin", weight)?;
        Ok(())
    }

    pub fn set_age_max_weight(&mut self, weight: f64) -> Result<(), CriteriaError> {
        self.age_max.weight = check_weight("ageMax", weight)?;
        Ok(())
    }

    pub fn set_phototypes_weight(&mut self, weight: f64) -> Result<(), CriteriaError> {
        self.phototypes.weight = check_weight("phototypes", weight)?;
        Ok(())
    }

    pub fn set_skin_types_weight(&mut self, weight: f64) -> Result<(), CriteriaError> {
        self.skin_types.weight = check_weight("skinTypes", weight)?;
        Ok(())
    }

    /// Keeps the facet's selected labels.
    pub fn set_habit_facet_weight(&mut self, facet: HabitFacet, weight: f64) -> Result<(), CriteriaError> {
        let weight = check_weight(facet.key(), weight)?;
        self.habits.entry(facet).or_default().weight = weight;
        Ok(())
    }

    pub fn set_weighting(&mut self, weighting: TotalWeighting) {
        self.weighting = weighting;
    }

    pub fn with_sex(mut self, sex: Sex, weight: f64) -> Result<Self, CriteriaError> {
        self.set_sex(Some(sex), weight)?;
        Ok(self)
    }

    pub fn with_age_range(
        mut self,
        min: Option<(u32, f64)>,
        max: Option<(u32, f64)>,
    ) -> Result<Self, CriteriaError> {
        let (min_years, min_weight) = split_bound(min);
        let (max_years, max_weight) = split_bound(max);
        // Clear both first so the range check only sees the new pair.
        self.age_min = AgeBound::default();
        self.age_max = AgeBound::default();
        self.set_age_min(min_years, min_weight)?;
        self.set_age_max(max_years, max_weight)?;
        Ok(self)
    }

    pub fn with_phototypes<I, S>(mut self, values: I, weight: f64) -> Result<Self, CriteriaError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set_phototypes(CriterionGroup::new(values, weight)?);
        Ok(self)
    }

    pub fn with_skin_types<I, S>(mut self, values: I, weight: f64) -> Result<Self, CriteriaError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set_skin_types(CriterionGroup::new(values, weight)?);
        Ok(self)
    }

    pub fn with_habit_facet<I, S>(
        mut self,
        facet: HabitFacet,
        values: I,
        weight: f64,
    ) -> Result<Self, CriteriaError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set_habit_facet(facet, CriterionGroup::new(values, weight)?)?;
        Ok(self)
    }

    pub fn with_weighting(mut self, weighting: TotalWeighting) -> Self {
        self.set_weighting(weighting);
        self
    }

    /// Re-checks a snapshot that did not go through the setters, e.g. one
    /// loaded from the studies store.
    pub fn validate(&self) -> Result<(), CriteriaError> {
        check_weight("sex", self.sex_weight)?;
        check_weight("ageMin", self.age_min.weight)?;
        check_weight("ageMax", self.age_max.weight)?;
        check_age_range(self.age_min, self.age_max)?;
        check_weight("phototypes", self.phototypes.weight)?;
        check_weight("skinTypes", self.skin_types.weight)?;
        for (facet, group) in &self.habits {
            check_weight(facet.key(), group.weight)?;
            check_habit_labels(*facet, group)?;
        }
        self.weighting.split.validate()?;
        Ok(())
    }

    /// True when no facet at all is active.
    pub fn is_empty(&self) -> bool {
        self.sex.is_none()
            && self.age_min.years.is_none()
            && self.age_max.years.is_none()
            && !self.phototypes.is_active()
            && !self.skin_types.is_active()
            && self.habits.values().all(|group| !group.is_active())
    }
}

fn split_bound(bound: Option<(u32, f64)>) -> (Option<u32>, f64) {
    match bound {
        Some((years, weight)) => (Some(years), weight),
        None => (None, DEFAULT_FACET_WEIGHT),
    }
}

fn check_age_range(min: AgeBound, max: AgeBound) -> Result<(), CriteriaError> {
    match (min.years, max.years) {
        (Some(min), Some(max)) if min > max => Err(CriteriaError::InvertedAgeRange { min, max }),
        _ => Ok(()),
    }
}

fn check_habit_labels(facet: HabitFacet, group: &CriterionGroup) -> Result<(), CriteriaError> {
    match group
        .selected_values
        .iter()
        .find(|label| facet.field_for(label).is_none())
    {
        Some(label) => Err(CriteriaError::UnknownHabitLabel {
            facet: facet.key(),
            label: label.clone(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::weights::{DemographicsInactive, STUDY_SPLIT, ScoreSplit};

    #[test]
    fn new_sets_defaults_and_inactive_facets() {
        let criteria = CriteriaSet::new();

        assert!(criteria.is_empty());
        assert_eq!(criteria.sex(), None);
        assert_eq!(criteria.sex_weight(), DEFAULT_FACET_WEIGHT);
        assert_eq!(criteria.age_min(), AgeBound::default());
        assert_eq!(criteria.habit_facets().count(), HabitFacet::iter().count());
        assert!(criteria
            .habit_facets()
            .all(|(_, g)| !g.is_active() && g.weight() == DEFAULT_FACET_WEIGHT));
        assert_eq!(criteria.weighting(), TotalWeighting::default());
    }

    #[test]
    fn rejects_negative_and_non_finite_weights() {
        assert!(matches!(
            CriterionGroup::new(["I"], -1.0),
            Err(CriteriaError::InvalidWeight { .. })
        ));
        assert!(CriterionGroup::new(["I"], f64::NAN).is_err());
        assert!(CriteriaSet::new().with_sex(Sex::Female, f64::INFINITY).is_err());
        assert!(CriterionGroup::new(["I"], 0.0).is_ok());
    }

    #[test]
    fn parses_age_bounds_from_form_input() {
        assert_eq!(parse_age_bound(" 18 "), Ok(Some(18)));
        assert_eq!(parse_age_bound(""), Ok(None));
        assert_eq!(
            parse_age_bound("dix-huit"),
            Err(CriteriaError::InvalidAgeBound("dix-huit".into()))
        );
        assert!(parse_age_bound("-3").is_err());
        assert!(parse_age_bound("18.5").is_err());
    }

    #[test]
    fn rejects_inverted_age_range() {
        let err = CriteriaSet::new()
            .with_age_range(Some((65, 1.0)), Some((18, 1.0)))
            .unwrap_err();
        assert_eq!(err, CriteriaError::InvertedAgeRange { min: 65, max: 18 });

        let mut criteria = CriteriaSet::new();
        criteria.set_age_max(Some(30), 1.0).unwrap();
        assert!(criteria.set_age_min(Some(31), 1.0).is_err());
        assert_eq!(criteria.age_min().years, None);
    }

    #[test]
    fn habit_facets_only_accept_known_labels() {
        let ok = CriteriaSet::new().with_habit_facet(
            HabitFacet::FaceCare,
            ["Soin hydratant", "Soin anti-âge"],
            3.0,
        );
        assert!(ok.is_ok());

        let err = CriteriaSet::new()
            .with_habit_facet(HabitFacet::FaceCare, ["Mascara"], 3.0)
            .unwrap_err();
        assert_eq!(
            err,
            CriteriaError::UnknownHabitLabel {
                facet: "soinsVisage",
                label: "Mascara".into()
            }
        );
    }

    #[test]
    fn replacing_a_facet_swaps_the_whole_group() {
        let mut criteria = CriteriaSet::new()
            .with_habit_facet(HabitFacet::Perfumes, ["Parfum", "Eau de toilette"], 2.0)
            .unwrap();
        let before = criteria.clone();

        criteria
            .set_habit_facet(
                HabitFacet::Perfumes,
                CriterionGroup::new(["Eau de parfum"], 4.0).unwrap(),
            )
            .unwrap();

        let group = criteria.habit_facet(HabitFacet::Perfumes).unwrap();
        assert_eq!(group.selected_values().len(), 1);
        assert_eq!(group.weight(), 4.0);
        assert_ne!(before, criteria);
    }

    #[test]
    fn blank_values_are_dropped() {
        let group = CriterionGroup::new([" II ", "", "  "], 1.0).unwrap();
        assert_eq!(group.selected_values().iter().collect::<Vec<_>>(), vec!["II"]);
    }

    #[test]
    fn deserializes_stored_study_and_validates() {
        let criteria: CriteriaSet = serde_json::from_value(serde_json::json!({
            "sex": "Femme",
            "sexWeight": 5.0,
            "ageMin": { "years": 18, "weight": 3.0 },
            "ageMax": { "years": 65, "weight": 3.0 },
            "habits": {
                "soinsVisage": { "selectedValues": ["Soin hydratant"], "weight": 3.0 }
            },
            "weighting": {
                "split": { "demographic": 0.8, "habits": 0.2 },
                "demographicsInactive": "fixed_split"
            }
        }))
        .unwrap();

        assert_eq!(criteria.sex(), Some(Sex::Female));
        assert_eq!(criteria.age_max().years, Some(65));
        assert!(criteria.habit_facet(HabitFacet::FaceCare).unwrap().is_active());
        assert!(criteria.habit_facet(HabitFacet::Perfumes).is_none());
        assert_eq!(criteria.weighting().split, STUDY_SPLIT);
        assert_eq!(
            criteria.weighting().demographics_inactive,
            DemographicsInactive::FixedSplit
        );
        assert!(criteria.validate().is_ok());
    }

    #[test]
    fn validate_catches_bad_stored_values() {
        let criteria: CriteriaSet = serde_json::from_value(serde_json::json!({
            "habits": { "parfums": { "selectedValues": ["Eau de Cologne"], "weight": 1.0 } },
            "weighting": { "split": { "demographic": 0.7, "habits": 0.3 } }
        }))
        .unwrap();
        assert!(matches!(
            criteria.validate(),
            Err(CriteriaError::UnknownHabitLabel { .. })
        ));

        let negative: CriteriaSet = serde_json::from_value(serde_json::json!({
            "phototypes": { "selectedValues": ["II"], "weight": -2.0 },
            "weighting": { "split": { "demographic": 0.7, "habits": 0.3 } }
        }))
        .unwrap();
        assert!(matches!(
            negative.validate(),
            Err(CriteriaError::InvalidWeight { .. })
        ));

        let bad_split = CriteriaSet::new().with_weighting(TotalWeighting {
            split: ScoreSplit {
                demographic: 1.5,
                habits: -0.5,
            },
            ..TotalWeighting::default()
        });
        assert!(matches!(
            bad_split.validate(),
            Err(CriteriaError::InvalidSplit(_))
        ));
    }

    #[test]
    fn unknown_sex_is_rejected_on_load() {
        let result = serde_json::from_value::<CriteriaSet>(serde_json::json!({ "sex": "X" }));
        assert!(result.is_err());
    }

    #[test]
    fn weight_only_edits_keep_selections() {
        let mut criteria = CriteriaSet::new()
            .with_phototypes(["II", "III"], 1.0)
            .unwrap()
            .with_habit_facet(HabitFacet::Perfumes, ["Parfum"], 1.0)
            .unwrap();

        criteria.set_phototypes_weight(4.0).unwrap();
        criteria.set_habit_facet_weight(HabitFacet::Perfumes, 2.5).unwrap();
        criteria.set_sex_weight(0.0).unwrap();

        assert_eq!(criteria.phototypes().weight(), 4.0);
        assert_eq!(criteria.phototypes().selected_values().len(), 2);
        let perfumes = criteria.habit_facet(HabitFacet::Perfumes).unwrap();
        assert_eq!(perfumes.weight(), 2.5);
        assert!(perfumes.is_active());
        assert_eq!(criteria.sex_weight(), 0.0);

        assert!(matches!(
            criteria.set_age_max_weight(f64::NAN),
            Err(CriteriaError::InvalidWeight { .. })
        ));
        assert!(criteria.set_skin_types_weight(-1.0).is_err());
        assert!(criteria.set_age_min_weight(2.0).is_ok());
    }

    #[test]
    fn stored_groups_drop_blank_labels() {
        let criteria: CriteriaSet = serde_json::from_value(serde_json::json!({
            "phototypes": { "selectedValues": [""], "weight": 2.0 },
            "skinTypes": { "selectedValues": ["  Mixte ", "   "] }
        }))
        .unwrap();

        assert!(!criteria.phototypes().is_active());
        assert_eq!(criteria.phototypes().weight(), 2.0);
        let skin: Vec<_> = criteria.skin_types().selected_values().iter().collect();
        assert_eq!(skin, vec!["Mixte"]);
        assert_eq!(criteria.skin_types().weight(), DEFAULT_FACET_WEIGHT);
        assert!(criteria.validate().is_ok());
    }

    #[test]
    fn missing_weighting_loads_as_standard() {
        let criteria: CriteriaSet = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(criteria.weighting(), TotalWeighting::default());
        assert!(criteria.is_empty());
    }
}
