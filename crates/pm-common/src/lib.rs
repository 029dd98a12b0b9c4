pub mod api;
pub mod corrections;
pub mod criteria;
pub mod date;
pub mod habits;
pub mod ingest;
pub mod logging;
pub mod matching;
pub mod run_id;
pub mod source;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use ingest::{first_id, first_string};

const ID_KEYS: &[&str] = &["idVol", "id", "volontaireId"];
const FIRST_NAME_KEYS: &[&str] = &["prenom", "prenomVol", "firstName"];
const LAST_NAME_KEYS: &[&str] = &["nom", "nomVol", "lastName"];
const SEX_KEYS: &[&str] = &["sexe", "sex"];
const BIRTH_DATE_KEYS: &[&str] = &["dateNaissance", "birthDate"];
const PHOTOTYPE_KEYS: &[&str] = &["phototype"];
const SKIN_TYPE_KEYS: &[&str] = &["typePeau", "typePeauVisage"];

// Volunteer record as served by the panel API. The engine only reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct Volunteer {
    #[serde(rename = "idVol")]
    pub id: Option<i64>,
    #[serde(rename = "prenom")]
    pub first_name: Option<String>,
    #[serde(rename = "nom")]
    pub last_name: Option<String>,
    #[serde(rename = "sexe")]
    pub sex: Option<String>,
    #[serde(rename = "dateNaissance")]
    pub birth_date: Option<String>,
    pub phototype: Option<String>,
    #[serde(rename = "typePeau")]
    pub skin_type: Option<String>,
}

impl From<Map<String, Value>> for Volunteer {
    fn from(map: Map<String, Value>) -> Self {
        Self::from_json_map(&map)
    }
}

impl Volunteer {
    /// Reads a panel API object. Each attribute has had more than one key
    /// name over time; the first key holding a usable value wins.
    pub fn from_json_map(map: &Map<String, Value>) -> Self {
        Self {
            id: first_id(map, ID_KEYS),
            first_name: first_string(map, FIRST_NAME_KEYS),
            last_name: first_string(map, LAST_NAME_KEYS),
            sex: first_string(map, SEX_KEYS),
            birth_date: first_string(map, BIRTH_DATE_KEYS),
            phototype: first_string(map, PHOTOTYPE_KEYS),
            skin_type: first_string(map, SKIN_TYPE_KEYS),
        }
    }

    /// "Prénom Nom", or a placeholder built from whatever identifies the
    /// record.
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect();

        if !parts.is_empty() {
            return parts.join(" ");
        }

        match self.id {
            Some(id) => format!("Volontaire #{id}"),
            None => "Volontaire sans identifiant".to_string(),
        }
    }
}
