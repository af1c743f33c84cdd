pub mod command;
pub mod query;
pub mod staging;
