pub mod index;
pub mod snapshot;
