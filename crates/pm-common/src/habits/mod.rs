pub mod fields;
pub mod record;

pub use fields::HabitField;
pub use record::{HabitsRecord, VOLUNTEER_REF_KEYS};
