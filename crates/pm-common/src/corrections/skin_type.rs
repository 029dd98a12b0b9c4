use super::text::fold_label;

/// Folded skin-type label without the `"peau "` prefix forms use
/// inconsistently (`"Peau grasse"` vs `"Grasse"`).
pub fn normalize_skin_type(raw: &str) -> String {
    let folded = fold_label(raw);
    match folded.strip_prefix("peau ") {
        Some(rest) => rest.trim().to_string(),
        None => folded,
    }
}

pub fn same_skin_type(left: &str, right: &str) -> bool {
    let left = normalize_skin_type(left);
    !left.is_empty() && left == normalize_skin_type(right)
}
