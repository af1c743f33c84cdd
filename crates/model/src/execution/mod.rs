pub mod config;
pub mod connection;
pub mod params;
pub mod state;
