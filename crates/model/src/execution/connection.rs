use crate::core::secret::Secret;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Port Redshift clusters listen on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 5439;

/// TLS negotiation mode for a warehouse connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SslMode {
    Disable,
    #[default]
    Prefer,
    Require,
}

impl SslMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SslMode::Disable => "disable",
            SslMode::Prefer => "prefer",
            SslMode::Require => "require",
        }
    }
}

impl FromStr for SslMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "disable" => Ok(SslMode::Disable),
            "prefer" => Ok(SslMode::Prefer),
            "require" => Ok(SslMode::Require),
            other => Err(format!("Unknown ssl mode: {other}")),
        }
    }
}

impl fmt::Display for SslMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where and as whom to connect to one warehouse cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarehouseEndpoint {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Secret,
    pub ssl_mode: SslMode,
}

impl WarehouseEndpoint {
    pub fn new(host: impl Into<String>, user: impl Into<String>, password: impl Into<Secret>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            user: user.into(),
            password: password.into(),
            ssl_mode: SslMode::default(),
        }
    }

    /// libpq-style description safe for logs; the password is masked.
    pub fn describe(&self, database: &str) -> String {
        format!(
            "host={} port={} dbname={} user={} password={} sslmode={}",
            self.host, self.port, database, self.user, self.password, self.ssl_mode
        )
    }
}

impl fmt::Display for WarehouseEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}", self.user, self.host, self.port)
    }
}
