pub mod detection;
pub mod dto;
pub mod errors;
pub mod predicates;
pub mod rows;
pub mod sniff;
pub mod summary;
pub mod template;
pub mod use_case;
