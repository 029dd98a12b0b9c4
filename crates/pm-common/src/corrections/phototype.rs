use strum::AsRefStr;

use super::text::fold_label;

/// Fitzpatrick phototype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AsRefStr)]
pub enum Phototype {
    #[strum(serialize = "I")]
    I,
    #[strum(serialize = "II")]
    II,
    #[strum(serialize = "III")]
    III,
    #[strum(serialize = "IV")]
    IV,
    #[strum(serialize = "V")]
    V,
    #[strum(serialize = "VI")]
    VI,
}

/// Accepts roman or arabic numerals, optionally prefixed.
///
/// `"III"`, `"3"`, `"Phototype 3"`, `"type iii (peau claire)"` → `Phototype::III`.
pub fn normalize_phototype(raw: &str) -> Option<Phototype> {
    let folded = fold_label(raw);
    let rest = folded
        .strip_prefix("phototype")
        .or_else(|| folded.strip_prefix("type"))
        .or_else(|| folded.strip_prefix("pt"))
        .unwrap_or(&folded);

    let token = rest
        .trim_start_matches([' ', ':', '-', '.'])
        .split(|c: char| !c.is_ascii_alphanumeric())
        .next()
        .unwrap_or_default();

    match token {
        "1" | "i" => Some(Phototype::I),
        "2" | "ii" => Some(Phototype::II),
        "3" | "iii" => Some(Phototype::III),
        "4" | "iv" => Some(Phototype::IV),
        "5" | "v" => Some(Phototype::V),
        "6" | "vi" => Some(Phototype::VI),
        _ => None,
    }
}

/// Phototype equality with a folded-text fallback for values that do not
/// parse as a numeral.
pub fn same_phototype(left: &str, right: &str) -> bool {
    match (normalize_phototype(left), normalize_phototype(right)) {
        (Some(l), Some(r)) => l == r,
        (None, None) => {
            let l = fold_label(left);
            !l.is_empty() && l == fold_label(right)
        }
        _ => false,
    }
}
