pub mod assignment;
pub mod blueprint;
pub mod draft;
pub mod pincode;
pub mod pricing;
pub mod reference;
pub mod selection;
pub mod shared;
pub mod zone;

#[cfg(test)]
pub(crate) mod fixtures;
