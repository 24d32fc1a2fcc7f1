//! Compiler configuration, persisted as TOML.
//!
//! ```toml
//! [parser]
//! max_depth = 32
//! allow_legacy = false
//!
//! [assembler]
//! complete_origin = true
//!
//! [inference]
//! skip_existing = true
//!
//! [namespaces]
//! open = ["CHEBI", "GO"]
//! ```
//!
//! Every section and every key is optional.

use std::path::Path;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assembler::AssemblerConfig;
use crate::grammar::parser::ParserConfig;
use crate::infer::InferenceConfig;
use crate::namespace::NamespaceConfig;

/// Errors from loading or saving configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file: {path}")]
    #[diagnostic(
        code(bel::config::read),
        help("Check that the file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {message}")]
    #[diagnostic(
        code(bel::config::parse),
        help("Check the TOML syntax and the key names in each section.")
    )]
    Parse {
        path: Option<String>,
        message: String,
    },

    #[error("failed to serialize config: {message}")]
    #[diagnostic(
        code(bel::config::serialize),
        help("Every value must be representable in TOML.")
    )]
    Serialize { message: String },

    #[error("failed to write config file: {path}")]
    #[diagnostic(
        code(bel::config::write),
        help("Ensure the parent directory exists and you have write permissions.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// All tunables of a compilation, one field per TOML section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub parser: ParserConfig,
    pub assembler: AssemblerConfig,
    pub inference: InferenceConfig,
    pub namespaces: NamespaceConfig,
}

impl CompilerConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: None,
            message: e.to_string(),
        })
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: Some(path.display().to_string()),
            message: e.to_string(),
        })
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(serialize_error)?;
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }
}

fn serialize_error(e: toml::ser::Error) -> ConfigError {
    ConfigError::Serialize {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = CompilerConfig::from_toml_str("").unwrap();
        assert_eq!(config, CompilerConfig::default());
        assert_eq!(config.parser.max_depth, 64);
        assert!(config.parser.allow_legacy);
    }

    #[test]
    fn sections_are_read() {
        let config = CompilerConfig::from_toml_str(
            r#"
            [parser]
            allow_legacy = false

            [assembler]
            complete_origin = true

            [inference]
            skip_existing = true

            [namespaces]
            open = ["CHEBI"]

            [namespaces.enumerated]
            HGNC = ["AKT1"]
            "#,
        )
        .unwrap();
        assert!(!config.parser.allow_legacy);
        assert_eq!(config.parser.max_depth, 64);
        assert!(config.assembler.complete_origin);
        assert!(config.inference.skip_existing);
        assert_eq!(config.namespaces.open, vec!["CHEBI".to_string()]);
        assert_eq!(config.namespaces.enumerated["HGNC"], vec!["AKT1".to_string()]);
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = CompilerConfig::from_toml_str("[parser\nmax_depth = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { path: None, .. }));
    }

    #[test]
    fn wrong_type_is_parse_error() {
        assert!(CompilerConfig::from_toml_str("[parser]\nmax_depth = \"deep\"").is_err());
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bel.toml");
        let mut config = CompilerConfig::default();
        config.assembler.merge_identical_reactions = true;
        config.namespaces.patterns.insert("EGID".into(), "[0-9]+".into());
        config.save(&path).unwrap();

        let loaded = CompilerConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn serialization_failure_is_not_a_parse_error() {
        let err = serialize_error(<toml::ser::Error as serde::ser::Error>::custom("unsupported value"));
        assert!(matches!(err, ConfigError::Serialize { .. }));
        assert_eq!(err.to_string(), "failed to serialize config: unsupported value");
        assert_eq!(
            err.code().map(|c| c.to_string()).as_deref(),
            Some("bel::config::serialize")
        );
    }

    #[test]
    fn unwritable_path_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CompilerConfig::default()
            .save(&dir.path().join("missing").join("bel.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Write { .. }));
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CompilerConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
