// ============================================================
// IMPORT CONFIGURATION
// ============================================================
// Policy values for the bulk import pipeline

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::error::{AppError, Result};

/// Which row tokenizer the pipeline uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenizerMode {
    /// Quote-aware delimited parsing
    Quoted,

    /// Plain split on newline and delimiter, no quote awareness
    Split,
}

/// Configuration for bulk requisition import
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ImportConfig {
    /// Maximum number of data rows processed per upload (default: 100)
    /// Rows past the limit are skipped for both preview and validation
    #[validate(range(min = 1, max = 10000))]
    pub row_limit: usize,

    /// Rows rendered in the preview table (default: 5)
    #[validate(range(min = 1))]
    pub display_rows: usize,

    /// Issues listed in a session view (default: 10)
    #[validate(range(min = 1))]
    pub listed_issues: usize,

    /// Upload size limit in bytes (default: 10 MiB)
    #[validate(range(min = 1))]
    pub max_file_bytes: u64,

    /// Field delimiter (default: comma)
    pub delimiter: char,

    /// Sniff the delimiter from the first lines instead of using `delimiter`
    pub detect_delimiter: bool,

    pub tokenizer: TokenizerMode,

    /// Upload sessions older than this are evicted (default: 1 hour)
    #[validate(range(min = 1, max = 604800))]
    pub session_ttl_secs: u64,

    /// Upload sessions kept in memory at once; the oldest go first (default: 1000)
    #[validate(range(min = 1))]
    pub max_sessions: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            row_limit: 100,
            display_rows: 5,
            listed_issues: 10,
            max_file_bytes: 10 * 1024 * 1024,
            delimiter: ',',
            detect_delimiter: false,
            tokenizer: TokenizerMode::Quoted,
            session_ttl_secs: 3600,
            max_sessions: 1000,
        }
    }
}

impl ImportConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Config reproducing the legacy splitter behavior
    pub fn legacy() -> Self {
        Self {
            tokenizer: TokenizerMode::Split,
            ..Default::default()
        }
    }

    /// Delimiter as a single byte; must be ASCII and not a quote or line break
    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter {
            '"' | '\n' | '\r' => Err(AppError::ConfigError(format!(
                "delimiter {:?} is not allowed",
                self.delimiter
            ))),
            c if c.is_ascii() => Ok(c as u8),
            c => Err(AppError::ConfigError(format!(
                "delimiter {:?} must be a single ASCII character",
                c
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ImportConfig::default();
        assert_eq!(config.row_limit, 100);
        assert_eq!(config.display_rows, 5);
        assert_eq!(config.max_file_bytes, 10_485_760);
        assert_eq!(config.tokenizer, TokenizerMode::Quoted);
        assert_eq!(config.session_ttl_secs, 3600);
        assert_eq!(config.max_sessions, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_row_limit_rejected() {
        let config = ImportConfig {
            row_limit: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_session_limits_validated() {
        let config = ImportConfig {
            max_sessions: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ImportConfig {
            session_ttl_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_delimiter_byte() {
        let mut config = ImportConfig::default();
        assert_eq!(config.delimiter_byte().unwrap(), b',');

        config.delimiter = '\t';
        assert_eq!(config.delimiter_byte().unwrap(), b'\t');

        config.delimiter = '"';
        assert!(config.delimiter_byte().is_err());

        config.delimiter = '§';
        assert!(config.delimiter_byte().is_err());
    }
}
