pub mod error;
pub mod redshift;
pub mod warehouse;
