use crate::error::ConfigError;
use std::{collections::HashMap, fs, path::Path};

/// Prefix of every environment variable that overrides a configuration field.
pub const ENV_PREFIX: &str = "REDSHIFT_MIGRATE_";

/// Environment variables from the process plus optional `.env`-style files.
#[derive(Debug, Clone)]
pub struct EnvManager {
    vars: HashMap<String, String>,
    sensitive_patterns: Vec<String>,
}

impl EnvManager {
    /// Snapshot of the process environment.
    pub fn new() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// No variables at all; only what is loaded or given explicitly.
    pub fn empty() -> Self {
        Self {
            vars: HashMap::new(),
            sensitive_patterns: Self::default_sensitive_patterns(),
        }
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            ..Self::empty()
        }
    }

    /// Merges a `.env`-style file. Entries in the file win over the process
    /// environment.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::EnvFile(format!("Failed to read env file {}: {}", path.display(), e))
        })?;

        let entries = dotenv_entries(&content)
            .map_err(|e| ConfigError::EnvFile(format!("{}: {e}", path.display())))?;
        self.vars.extend(entries);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Value of the override variable for `field`, e.g. `source_password`
    /// reads `REDSHIFT_MIGRATE_SOURCE_PASSWORD`.
    pub fn override_for(&self, field: &str) -> Option<&str> {
        self.get(&Self::override_key(field))
    }

    pub fn override_key(field: &str) -> String {
        format!("{ENV_PREFIX}{}", field.to_uppercase())
    }

    /// Whether a variable or field name looks like it holds a credential.
    pub fn is_sensitive(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        self.sensitive_patterns.iter().any(|p| key.contains(p.as_str()))
    }

    fn default_sensitive_patterns() -> Vec<String> {
        ["password", "passwd", "secret", "token", "key", "credential"]
            .iter()
            .map(|p| p.to_string())
            .collect()
    }
}

/// `KEY=VALUE` pairs of a dotenv file. Blank lines and `#` comments are
/// skipped, an `export ` prefix is accepted and one pair of matching quotes
/// around the value is dropped.
fn dotenv_entries(content: &str) -> Result<Vec<(String, String)>, String> {
    content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_no, line)| {
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| format!("line {line_no}: expected KEY=VALUE"))?;

            let key = key.trim();
            if key.is_empty() {
                return Err(format!("line {line_no}: empty key"));
            }
            Ok((key.to_string(), strip_quotes(value.trim()).to_string()))
        })
        .collect()
}

fn strip_quotes(value: &str) -> &str {
    ['"', '\'']
        .into_iter()
        .find_map(|q| value.strip_prefix(q)?.strip_suffix(q))
        .unwrap_or(value)
}

impl Default for EnvManager {
    fn default() -> Self {
        Self::new()
    }
}
