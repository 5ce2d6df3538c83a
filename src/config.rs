//! Configuration for the compiler and the `lq` tool.
//!
//! All configuration is driven by environment variables; command-line flags
//! take precedence over them.

use serde::{Deserialize, Serialize};

use crate::{
    ast::Predicate,
    error::{Error, Result},
    parser::parse,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Bind parameters already present in the surrounding SQL statement.
    pub param_offset: usize,
    /// Longest predicate text accepted by [`Config::parse`], in bytes.
    pub max_predicate_bytes: usize,
    /// Table used when none is named.
    pub default_table: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            param_offset: 0,
            max_predicate_bytes: 4096,
            default_table: "outputs".to_owned(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables. Unparsable numbers
    /// keep their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(v) = env_usize("LQ_PARAM_OFFSET") {
            config.param_offset = v;
        }
        if let Some(v) = env_usize("LQ_MAX_PREDICATE_BYTES") {
            config.max_predicate_bytes = v;
        }
        if let Ok(v) = std::env::var("LQ_DEFAULT_TABLE") {
            config.default_table = v;
        }

        config
    }

    /// Parse `text`, rejecting it first if it is longer than
    /// `max_predicate_bytes`.
    pub fn parse(&self, text: &str) -> Result<Predicate> {
        if text.len() > self.max_predicate_bytes {
            return Err(Error::lex(
                self.max_predicate_bytes,
                format!(
                    "predicate exceeds the {} byte limit",
                    self.max_predicate_bytes
                ),
            ));
        }
        parse(text)
    }
}

fn env_usize(name: &str) -> Option<usize> {
    std::env::var(name).ok()?.trim().parse().ok()
}
