pub mod common;
pub mod copy;
pub mod truncate;
pub mod unload;
