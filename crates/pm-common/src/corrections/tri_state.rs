use serde_json::Value;

/// Questionnaire answer as stored by the habits API: `"oui"`, `"non"` or
/// nothing at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TriState {
    Yes,
    No,
    #[default]
    Unset,
}

impl TriState {
    /// Case-insensitive; `yes`/`true`/`1` are accepted as synonyms of `oui`.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return TriState::Unset;
        }

        match trimmed.to_lowercase().as_str() {
            "oui" | "yes" | "true" | "1" => TriState::Yes,
            "non" | "no" | "false" | "0" => TriState::No,
            _ => TriState::Unset,
        }
    }

    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::from_raw(s),
            Value::Bool(true) => TriState::Yes,
            Value::Bool(false) => TriState::No,
            Value::Number(n) => match n.as_i64() {
                Some(1) => TriState::Yes,
                Some(0) => TriState::No,
                _ => TriState::Unset,
            },
            _ => TriState::Unset,
        }
    }

    /// Unset counts as false.
    pub fn is_true(self) -> bool {
        matches!(self, TriState::Yes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_french_answers_case_insensitively() {
        assert_eq!(TriState::from_raw("oui"), TriState::Yes);
        assert_eq!(TriState::from_raw(" OUI "), TriState::Yes);
        assert_eq!(TriState::from_raw("Non"), TriState::No);
        assert_eq!(TriState::from_raw(""), TriState::Unset);
    }

    #[test]
    fn accepts_truthy_synonyms() {
        for raw in ["yes", "TRUE", "1"] {
            assert!(TriState::from_raw(raw).is_true(), "{raw}");
        }
        assert!(!TriState::from_raw("peut-être").is_true());
    }

    #[test]
    fn reads_json_scalars() {
        assert_eq!(TriState::from_value(&json!(true)), TriState::Yes);
        assert_eq!(TriState::from_value(&json!(0)), TriState::No);
        assert_eq!(TriState::from_value(&json!(null)), TriState::Unset);
        assert_eq!(TriState::from_value(&json!("oui")), TriState::Yes);
        assert_eq!(TriState::from_value(&json!(["oui"])), TriState::Unset);
    }
}
