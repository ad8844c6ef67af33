pub mod dto;
pub mod errors;
pub mod use_case;
