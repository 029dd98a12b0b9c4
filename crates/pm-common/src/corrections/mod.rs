pub mod phototype;
pub mod sex;
pub mod skin_type;
pub mod text;
pub mod tri_state;

pub use phototype::{Phototype, normalize_phototype, same_phototype};
pub use sex::{Sex, normalize_sex};
pub use skin_type::{normalize_skin_type, same_skin_type};
pub use text::fold_label;
pub use tri_state::TriState;
