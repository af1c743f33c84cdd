pub mod identifiers;
pub mod secret;
