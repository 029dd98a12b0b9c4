//! Run IDs for ranking runs.
//!
//! Every ranking ([`crate::matching::rank_on`]) and every service run
//! ([`crate::source::MatchingService`]) gets a fresh ULID, so runs sort by
//! start time.
//!
//! ```
//! use pm_common::run_id;
//!
//! let first = run_id::generate();
//! let second = run_id::generate();
//! assert_ne!(first, second);
//! assert_eq!(first.len(), 26);
//! ```

use ulid::Ulid;

/// Generates a fresh ULID.
#[inline]
pub fn generate() -> String {
    Ulid::new().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_returns_unique_values() {
        let a = generate();
        let b = generate();
        assert_ne!(a, b);
        assert_eq!(a.len(), 26);
        assert_eq!(b.len(), 26);
    }

    #[test]
    fn ulid_is_lexicographically_sortable() {
        let older = generate();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let newer = generate();
        assert!(older < newer, "ULIDs should be time-ordered");
    }
}
