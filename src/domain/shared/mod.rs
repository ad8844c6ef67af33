pub mod errors;
pub mod names;
