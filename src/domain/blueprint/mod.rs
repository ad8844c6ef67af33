pub mod lookup;
pub mod resolver;
pub mod schema;
