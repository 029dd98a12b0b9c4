use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::fields::HabitField;
use crate::corrections::TriState;
use crate::ingest::first_id;

/// Keys that have been used over time to point a habits record at its
/// volunteer, tried in order. The habits API never settled on one name, so
/// older exports still carry `volontaireId`/`idVolontaire`.
pub const VOLUNTEER_REF_KEYS: &[&str] = &["idVol", "volontaireId", "idVolontaire", "volunteerId"];

/// One volunteer's questionnaire answers.
///
/// Fields that are absent from the payload read as [`TriState::Unset`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct HabitsRecord {
    volunteer_id: Option<i64>,
    answers: HashMap<HabitField, TriState>,
}

impl HabitsRecord {
    pub fn new(volunteer_id: Option<i64>) -> Self {
        Self {
            volunteer_id,
            answers: HashMap::new(),
        }
    }

    pub fn with_answer(mut self, field: HabitField, answer: TriState) -> Self {
        self.set_answer(field, answer);
        self
    }

    pub fn set_answer(&mut self, field: HabitField, answer: TriState) {
        self.answers.insert(field, answer);
    }

    pub fn volunteer_id(&self) -> Option<i64> {
        self.volunteer_id
    }

    pub fn answer(&self, field: HabitField) -> TriState {
        self.answers.get(&field).copied().unwrap_or_default()
    }

    pub fn is_yes(&self, field: HabitField) -> bool {
        self.answer(field).is_true()
    }

    /// Builds a record from a raw habits payload object. Unknown keys are
    /// ignored; the volunteer reference comes from the first key of
    /// [`VOLUNTEER_REF_KEYS`] that holds a usable id.
    pub fn from_json_map(map: &Map<String, Value>) -> Self {
        let volunteer_id = first_id(map, VOLUNTEER_REF_KEYS);

        let answers = map
            .iter()
            .filter_map(|(key, value)| {
                HabitField::from_field_name(key).map(|field| (field, TriState::from_value(value)))
            })
            .collect();

        Self {
            volunteer_id,
            answers,
        }
    }
}

impl From<Map<String, Value>> for HabitsRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self::from_json_map(&map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_answers_and_primary_reference_key() {
        let record: HabitsRecord = serde_json::from_value(json!({
            "idHabitudeCosmetique": 7,
            "idVol": 42,
            "soinHydratantVisage": "oui",
            "soinAntiAgeVisage": "Non",
            "mascara": "",
            "commentaire": "RAS"
        }))
        .unwrap();

        assert_eq!(record.volunteer_id(), Some(42));
        assert_eq!(record.answer(HabitField::SoinHydratantVisage), TriState::Yes);
        assert_eq!(record.answer(HabitField::SoinAntiAgeVisage), TriState::No);
        assert_eq!(record.answer(HabitField::Mascara), TriState::Unset);
        assert_eq!(record.answer(HabitField::Parfum), TriState::Unset);
    }

    #[test]
    fn falls_back_to_legacy_reference_keys() {
        let legacy: HabitsRecord =
            serde_json::from_value(json!({ "volontaireId": "17", "parfum": "oui" })).unwrap();
        assert_eq!(legacy.volunteer_id(), Some(17));
        assert!(legacy.is_yes(HabitField::Parfum));

        let older: HabitsRecord = serde_json::from_value(json!({ "idVolontaire": 18 })).unwrap();
        assert_eq!(older.volunteer_id(), Some(18));
    }

    #[test]
    fn first_usable_reference_key_wins() {
        let record: HabitsRecord =
            serde_json::from_value(json!({ "idVol": null, "volontaireId": 5, "volunteerId": 6 }))
                .unwrap();
        assert_eq!(record.volunteer_id(), Some(5));
    }

    #[test]
    fn missing_reference_is_tolerated() {
        let record: HabitsRecord = serde_json::from_value(json!({ "gelDouche": "oui" })).unwrap();
        assert_eq!(record.volunteer_id(), None);
        assert!(record.is_yes(HabitField::GelDouche));
    }
}
