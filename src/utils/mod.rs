pub mod database;
pub mod money;
pub mod validation;
