pub mod birth_date;

pub use birth_date::{age_on, parse_birth_date};
