pub mod description;
pub mod repository;
