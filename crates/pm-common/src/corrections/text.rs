use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Case- and accent-insensitive form of a free-text label.
///
/// `"  Sèche "` and `"SECHE"` both fold to `"seche"`. Inner whitespace runs
/// collapse to a single space.
pub fn fold_label(raw: &str) -> String {
    let stripped: String = raw
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents_and_case() {
        assert_eq!(fold_label("Sèche"), "seche");
        assert_eq!(fold_label("SOIN ANTI-ÂGE"), "soin anti-age");
        assert_eq!(fold_label("Féminin"), "feminin");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(fold_label("  Peau   grasse \t"), "peau grasse");
        assert_eq!(fold_label(""), "");
    }
}
