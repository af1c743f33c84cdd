use thiserror::Error;

/// Errors raised by a warehouse connection or catalog query.
#[derive(Debug, Error)]
pub enum WarehouseError {
    /// The cluster could not be reached or refused the login.
    #[error("Failed to connect to {target}: {message}")]
    Connect { target: String, message: String },

    /// Building the TLS connector failed.
    #[error("TLS setup failed: {0}")]
    Tls(#[from] native_tls::Error),

    /// The TLS handshake failed before any login was attempted.
    #[error("TLS handshake with {target} failed: {message}")]
    TlsHandshake { target: String, message: String },

    /// The warehouse refused a submitted command.
    #[error("Command rejected: {message}")]
    Rejected {
        /// SQLSTATE reported by the server, when there is one.
        code: Option<String>,
        message: String,
    },

    /// The connection was used after it was closed.
    #[error("Connection is closed")]
    Closed,
}

impl WarehouseError {
    pub fn connect(target: impl Into<String>, message: impl Into<String>) -> Self {
        WarehouseError::Connect {
            target: target.into(),
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        WarehouseError::Rejected {
            code: None,
            message: message.into(),
        }
    }

    /// Failed in the TLS layer, so the server never saw credentials.
    pub fn is_tls(&self) -> bool {
        matches!(
            self,
            WarehouseError::Tls(_) | WarehouseError::TlsHandshake { .. }
        )
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            WarehouseError::Rejected { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

impl From<tokio_postgres::Error> for WarehouseError {
    fn from(err: tokio_postgres::Error) -> Self {
        match err.as_db_error() {
            Some(db) => WarehouseError::Rejected {
                code: Some(db.code().code().to_string()),
                message: db.message().to_string(),
            },
            None if err.is_closed() => WarehouseError::Closed,
            None => WarehouseError::rejected(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_display_and_code() {
        let err = WarehouseError::Rejected {
            code: Some("42P01".to_string()),
            message: "relation \"s.t\" does not exist".to_string(),
        };

        assert_eq!(err.to_string(), "Command rejected: relation \"s.t\" does not exist");
        assert_eq!(err.code(), Some("42P01"));
        assert_eq!(WarehouseError::rejected("nope").code(), None);
    }

    #[test]
    fn test_only_tls_layer_failures_are_tls() {
        let handshake = WarehouseError::TlsHandshake {
            target: "etl@src:5439".into(),
            message: "certificate verify failed".into(),
        };
        assert!(handshake.is_tls());
        assert!(!WarehouseError::connect("etl@src:5439", "password authentication failed").is_tls());
        assert!(!WarehouseError::rejected("nope").is_tls());
    }

    #[test]
    fn test_connect_display() {
        let err = WarehouseError::connect("etl@src:5439", "timed out");
        assert_eq!(err.to_string(), "Failed to connect to etl@src:5439: timed out");
    }
}
