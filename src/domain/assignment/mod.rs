pub mod auto_fill;
pub mod engine;
