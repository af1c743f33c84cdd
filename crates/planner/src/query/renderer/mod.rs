//! Defines the core rendering trait and context for converting AST to SQL.

use crate::query::{
    ast::common::{Credentials, DataOption, TableRef},
    dialect::Dialect,
};
use model::core::secret::Secret;

pub mod copy;
pub mod truncate;
pub mod unload;

/// A trait for any AST node that can be rendered into a SQL string.
pub trait Render {
    fn render(&self, renderer: &mut Renderer);
}

/// A context that holds the state during the rendering process.
///
/// A redacting renderer writes `***` in place of credentials, for output that
/// ends up in logs or on a terminal.
pub struct Renderer<'a> {
    pub sql: String,
    pub dialect: &'a dyn Dialect,
    redact: bool,
}

impl<'a> Renderer<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self {
            sql: String::new(),
            dialect,
            redact: false,
        }
    }

    pub fn redacting(dialect: &'a dyn Dialect) -> Self {
        Self {
            redact: true,
            ..Self::new(dialect)
        }
    }

    /// Consumes the renderer and returns the final SQL string.
    pub fn finish(self) -> String {
        self.sql
    }

    pub fn render_table_ref(&mut self, table: &TableRef) {
        let name = self.dialect.table_name(table);
        self.sql.push_str(&name);
    }

    pub fn render_literal(&mut self, value: &str) {
        let literal = self.dialect.string_literal(value);
        self.sql.push_str(&literal);
    }

    pub fn render_credentials(&mut self, credentials: &Credentials) {
        let (access, secret) = if self.redact {
            (Secret::mask(), Secret::mask())
        } else {
            (
                credentials.access_key_id.as_str(),
                credentials.secret_access_key.as_str(),
            )
        };

        self.sql.push_str(" CREDENTIALS ");
        self.render_literal(&format!(
            "aws_access_key_id={access};aws_secret_access_key={secret}"
        ));
    }

    pub fn render_options(&mut self, options: &[DataOption]) {
        for option in options {
            self.sql.push(' ');
            self.sql.push_str(&option.key);
            if let Some(value) = &option.value {
                self.sql.push(' ');
                self.sql.push_str(value);
            }
        }
    }
}
