pub mod entity;
pub mod value_objects;
