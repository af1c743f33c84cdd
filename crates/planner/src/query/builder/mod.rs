pub mod copy;
pub mod unload;
