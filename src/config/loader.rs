//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::GateConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from a TOML file without validating it.
///
/// Validation runs after command-line overrides are applied, so a file
/// alone is allowed to be incomplete.
pub fn load_config(path: &Path) -> Result<GateConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GateConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Validate a merged configuration, wrapping failures as a `ConfigError`.
pub fn ensure_valid(config: &GateConfig) -> Result<(), ConfigError> {
    validate_config(config).map_err(ConfigError::Validation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            sync_type = "postsync"
            payloads = ['{{"jetId":"J1"}}']

            [auth]
            token = "abc"

            [endpoints]
            submit_deployment_url = "http://report.local/submit"
            "#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.payloads.len(), 1);
        assert_eq!(config.auth.token, "abc");
        assert!(ensure_valid(&config).is_ok());
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/deploy-gate.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sync_type = [").unwrap();
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error_display() {
        let err = ensure_valid(&GateConfig::default()).unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.starts_with("Validation failed: "));
        assert!(rendered.contains("service token has not been set"));
    }
}
