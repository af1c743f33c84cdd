//! Amazon Redshift over the PostgreSQL wire protocol.

pub mod catalog;
pub mod connection;
pub mod probe;

mod utils;
