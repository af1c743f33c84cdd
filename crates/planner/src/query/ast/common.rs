//! AST pieces shared by the staging statements.

pub use model::core::identifiers::TableRef;

/// Object-store access keys embedded in UNLOAD and COPY.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// A bare keyword option such as `ESCAPE`, or a keyword followed by a value.
#[derive(Debug, Clone)]
pub struct DataOption {
    pub key: String,
    pub value: Option<String>,
}
