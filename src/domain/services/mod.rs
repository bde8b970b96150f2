//! Domain services
pub mod combinations;
pub mod input;

pub use combinations::{combination_count, generate, generate_bounded};
pub use input::{definition_from_value, definitions_from_value};
