use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// Birth dates arrive as `YYYY-MM-DD`, as a full ISO timestamp, or in the
/// French `DD/MM/YYYY` form typed into the volunteer screens.
pub fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }

    // Offsets and `Z` suffixes: the calendar date is the leading 10 characters.
    if trimmed.len() > 10 && trimmed.as_bytes().get(10) == Some(&b'T') {
        if let Some(prefix) = trimmed.get(..10) {
            if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
                return Some(date);
            }
        }
    }

    NaiveDate::parse_from_str(trimmed, "%d/%m/%Y").ok()
}

/// Age in whole years on `today`. The year count only goes up once the
/// birthday's month/day has been reached. Birth dates in the future yield
/// `None`.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> Option<u32> {
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }

    u32::try_from(years).ok()
}
