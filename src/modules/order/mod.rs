pub mod job;
pub mod repository;
pub mod service;
