pub mod entity;
pub mod repository;
pub mod workspace;
