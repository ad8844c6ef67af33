pub mod matrix;
pub mod paste;
