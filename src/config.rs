//! Query evaluation settings.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DocwalkError, Result};
use crate::location::DEFAULT_POOL_CAPACITY;
use crate::query::anchor::ANCHOR_SELECTIVITY;
use crate::query::word::{EXACT_WORD_SELECTIVITY, SIMPLE_WORD_SELECTIVITY};
use crate::scoring::{ScoreCalculator, create_calculator};

/// Static divisors applied to child estimates.
///
/// These are heuristics, not measurements. They only influence which
/// child drives an intersection, never which documents match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectivityConfig {
    /// Divisor for exact word matches.
    pub exact_word: u32,
    /// Divisor for simple word matches.
    pub simple_word: u32,
    /// Divisor for head/tail anchored matches.
    pub anchored: u32,
}

impl Default for SelectivityConfig {
    fn default() -> Self {
        Self {
            exact_word: EXACT_WORD_SELECTIVITY,
            simple_word: SIMPLE_WORD_SELECTIVITY,
            anchored: ANCHOR_SELECTIVITY,
        }
    }
}

/// Settings for building and running a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Idle location cursors kept per node.
    pub pool_capacity: usize,
    /// Estimate divisors.
    pub selectivity: SelectivityConfig,
    /// Calculator specification, `Name[:k:x:y:q:a:s]`.
    pub calculator: String,
    /// Keep at most this many hits; later matches still count toward the
    /// document frequency.
    pub max_hits: Option<usize>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            pool_capacity: DEFAULT_POOL_CAPACITY,
            selectivity: SelectivityConfig::default(),
            calculator: "OkapiTfIdf".to_string(),
            max_hits: None,
        }
    }
}

impl QueryConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: QueryConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Check that every divisor is non-zero and the calculator parses.
    pub fn validate(&self) -> Result<()> {
        let SelectivityConfig {
            exact_word,
            simple_word,
            anchored,
        } = self.selectivity;
        for (name, value) in [
            ("exact_word", exact_word),
            ("simple_word", simple_word),
            ("anchored", anchored),
        ] {
            if value == 0 {
                return Err(DocwalkError::configuration(format!(
                    "selectivity.{name} must be greater than zero"
                )));
            }
        }
        self.calculator()?;
        Ok(())
    }

    /// Build the configured calculator.
    pub fn calculator(&self) -> Result<Box<dyn ScoreCalculator>> {
        create_calculator(&self.calculator)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = QueryConfig::default();
        assert_eq!(config.pool_capacity, 8);
        assert_eq!(config.selectivity.exact_word, 4);
        assert_eq!(config.selectivity.simple_word, 2);
        assert_eq!(config.selectivity.anchored, 30);
        assert_eq!(config.calculator, "OkapiTfIdf");
        assert_eq!(config.max_hits, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = QueryConfig::from_json_str(
            r#"{ "selectivity": { "anchored": 10 }, "calculator": "TfIdf:1:0.2:6", "max_hits": 5 }"#,
        )
        .unwrap();
        assert_eq!(config.selectivity.anchored, 10);
        assert_eq!(config.selectivity.exact_word, 4);
        assert_eq!(config.pool_capacity, 8);
        assert_eq!(config.max_hits, Some(5));
        assert_eq!(config.calculator().unwrap().name(), "TfIdf");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let err = QueryConfig::from_json_str(r#"{ "selectivity": { "simple_word": 0 } }"#).unwrap_err();
        assert!(err.is_configuration());

        let err = QueryConfig::from_json_str(r#"{ "calculator": "OkapiTfIdf:1:0.2:42" }"#).unwrap_err();
        assert!(err.is_configuration());

        let err = QueryConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, DocwalkError::Json(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "pool_capacity": 2, "calculator": "OkapiTf" }}"#).unwrap();

        let config = QueryConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.pool_capacity, 2);
        assert_eq!(config.calculator, "OkapiTf");

        let missing = QueryConfig::from_json_file(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(DocwalkError::Io(_))));
    }
}
