//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde and clap handle syntactic)
//! - Required inputs: sync type, service token, at least one payload
//! - Endpoint URLs must be absolute http(s) URLs
//! - Change-window checks need an identity and a change id to compare against
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateConfig → Result<(), Vec<ValidationError>>
//! - Runs before any check is spawned

use thiserror::Error;
use url::Url;

use crate::config::schema::{GateConfig, SyncType};

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("sync type has not been set (expected presync or postsync)")]
    MissingSyncType,

    #[error("service token has not been set")]
    MissingToken,

    #[error("no deployment payloads were supplied")]
    MissingPayloads,

    #[error("{field} is not a valid http(s) URL: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("change check needs {0}, either configured or resolved from the cluster")]
    MissingIdentity(&'static str),

    #[error("change check needs a change id or a last commit message")]
    MissingChangeId,

    #[error("execution timeout must be greater than zero")]
    ZeroTimeout,

    #[error("max concurrency must be greater than zero when set")]
    ZeroConcurrency,
}

/// Validate a fully merged configuration.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.sync_type.is_none() {
        errors.push(ValidationError::MissingSyncType);
    }

    if config.auth.token.trim().is_empty() {
        errors.push(ValidationError::MissingToken);
    }

    if config.payloads.iter().all(|p| p.trim().is_empty()) {
        errors.push(ValidationError::MissingPayloads);
    }

    let endpoints = [
        ("release check url", config.endpoints.release_check()),
        ("change check url", config.endpoints.change_check()),
        ("submit deployment url", config.endpoints.submit_deployment()),
    ];
    for (field, value) in endpoints {
        if let Some(value) = value {
            if !is_http_url(value) {
                errors.push(ValidationError::InvalidUrl {
                    field,
                    value: value.to_string(),
                });
            }
        }
    }

    if config.sync_type == Some(SyncType::Presync) && config.endpoints.change_check().is_some() {
        // Identity may still arrive from the cluster lookup.
        if config.cluster.app_name.is_none() {
            errors.extend(identity_errors(config));
        }
        if config.git.change_id().is_empty() {
            errors.push(ValidationError::MissingChangeId);
        }
    }

    if config.execution.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.execution.max_concurrency == Some(0) {
        errors.push(ValidationError::ZeroConcurrency);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Identity problems, checked again once cluster labels are applied.
pub fn identity_errors(config: &GateConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
    if blank(&config.identity.seal_id) {
        errors.push(ValidationError::MissingIdentity("a seal id"));
    }
    if blank(&config.identity.deployment_id) {
        errors.push(ValidationError::MissingIdentity("a deployment id"));
    }
    errors
}

fn is_http_url(value: &str) -> bool {
    Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn presync_config() -> GateConfig {
        let mut config = GateConfig::default();
        config.sync_type = Some(SyncType::Presync);
        config.auth.token = "token".into();
        config.payloads = vec![r#"{"jetId":"J1"}"#.into()];
        config
    }

    #[test]
    fn test_minimal_config_is_valid() {
        assert_eq!(validate_config(&presync_config()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let config = GateConfig::default();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::MissingSyncType));
        assert!(errors.contains(&ValidationError::MissingToken));
        assert!(errors.contains(&ValidationError::MissingPayloads));
    }

    #[test]
    fn test_blank_token_rejected() {
        let mut config = presync_config();
        config.auth.token = "   ".into();
        assert_eq!(validate_config(&config), Err(vec![ValidationError::MissingToken]));
    }

    #[test]
    fn test_invalid_endpoint_url() {
        let mut config = presync_config();
        config.endpoints.release_check_url = Some("not a url".into());
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            errors.as_slice(),
            [ValidationError::InvalidUrl { field: "release check url", .. }]
        ));
    }

    #[test]
    fn test_change_check_requires_identity_and_change_id() {
        let mut config = presync_config();
        config.endpoints.change_check_url = Some("http://snow.local/check".into());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::MissingChangeId));

        config.identity.seal_id = Some("09959".into());
        config.identity.deployment_id = Some("114041".into());
        config.git.last_commit_message = "CHG0001".into();
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_cluster_lookup_defers_identity() {
        let mut config = presync_config();
        config.endpoints.change_check_url = Some("http://snow.local/check".into());
        config.git.change_id = Some("CHG0001".into());
        config.cluster.app_name = Some("payments".into());
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_zero_limits_rejected() {
        let mut config = presync_config();
        config.execution.timeout_secs = 0;
        config.execution.max_concurrency = Some(0);
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::ZeroTimeout, ValidationError::ZeroConcurrency]
        );
    }
}
