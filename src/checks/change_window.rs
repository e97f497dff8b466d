//! Change-window policy.
//!
//! # State Machine
//! ```text
//! state == "Implement"  → allowed, nothing else is inspected
//! state == "Scheduled"  → allowed iff
//!                           startTime <= now <= endTime   (second precision)
//!                           and "<seal>:<deployment>" (split on the last ':')
//!                           equals the configured identity exactly
//! any other state       → denied
//! ```
//!
//! Unparsable timestamps or identifiers deny; they never allow. The policy
//! state is derived from the record on every call and never cached.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::remote::ChangeRecord;

const STATE_IMPLEMENT: &str = "Implement";
const STATE_SCHEDULED: &str = "Scheduled";

/// Seal/deployment pair a change record must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedIdentity {
    pub seal_id: String,
    pub deployment_id: String,
}

/// Why a change record does not authorize the deployment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowViolation {
    #[error("change is in state '{0}', expected Implement or Scheduled")]
    State(String),

    #[error("{field} '{value}' is not RFC3339")]
    Timestamp { field: &'static str, value: String },

    #[error("now ({now}) is outside the change window {start} .. {end}")]
    OutsideWindow {
        now: DateTime<Utc>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("configuration item identifier '{0}' is not '<seal>:<deployment>'")]
    Identifier(String),

    #[error("change belongs to {actual_seal}:{actual_deployment}, expected {expected_seal}:{expected_deployment}")]
    IdentityMismatch {
        actual_seal: String,
        actual_deployment: String,
        expected_seal: String,
        expected_deployment: String,
    },
}

/// Decide whether `record` authorizes a deployment by `expected` at `now`.
pub fn evaluate(
    record: &ChangeRecord,
    expected: &ExpectedIdentity,
    now: DateTime<Utc>,
) -> Result<(), WindowViolation> {
    match record.state.as_str() {
        STATE_IMPLEMENT => return Ok(()),
        STATE_SCHEDULED => {}
        other => return Err(WindowViolation::State(other.to_string())),
    }

    let start = parse_time("startTime", &record.start_time)?;
    let end = parse_time("endTime", &record.end_time)?;

    let now_secs = now.timestamp();
    if now_secs < start.timestamp() || now_secs > end.timestamp() {
        return Err(WindowViolation::OutsideWindow { now, start, end });
    }

    let identifier = &record.main_configuration_item.number.identifier;
    let (seal, deployment) = split_identifier(identifier)
        .ok_or_else(|| WindowViolation::Identifier(identifier.clone()))?;

    if seal != expected.seal_id || deployment != expected.deployment_id {
        return Err(WindowViolation::IdentityMismatch {
            actual_seal: seal.to_string(),
            actual_deployment: deployment.to_string(),
            expected_seal: expected.seal_id.clone(),
            expected_deployment: expected.deployment_id.clone(),
        });
    }

    Ok(())
}

fn parse_time(field: &'static str, value: &str) -> Result<DateTime<Utc>, WindowViolation> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| WindowViolation::Timestamp {
            field,
            value: value.to_string(),
        })
}

/// Split `"<seal>:<deployment>"` on the last `:`.
pub fn split_identifier(identifier: &str) -> Option<(&str, &str)> {
    identifier.rsplit_once(':')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::types::{ConfigurationItem, ConfigurationItemNumber};
    use chrono::Duration;

    fn expected() -> ExpectedIdentity {
        ExpectedIdentity {
            seal_id: "09959".into(),
            deployment_id: "114041".into(),
        }
    }

    fn record(state: &str, start: &str, end: &str, identifier: &str) -> ChangeRecord {
        ChangeRecord {
            state: state.into(),
            start_time: start.into(),
            end_time: end.into(),
            main_configuration_item: ConfigurationItem {
                name: "payments".into(),
                number: ConfigurationItemNumber {
                    identifier: identifier.into(),
                },
            },
        }
    }

    fn bracketing(now: DateTime<Utc>, identifier: &str) -> ChangeRecord {
        record(
            "Scheduled",
            &(now - Duration::hours(1)).to_rfc3339(),
            &(now + Duration::hours(1)).to_rfc3339(),
            identifier,
        )
    }

    #[test]
    fn test_implement_always_allowed() {
        let now = Utc::now();
        let garbage = record("Implement", "not-a-time", "", "no-delimiter");
        assert_eq!(evaluate(&garbage, &expected(), now), Ok(()));
    }

    #[test]
    fn test_scheduled_in_window_with_matching_identity() {
        let now = Utc::now();
        assert_eq!(evaluate(&bracketing(now, "09959:114041"), &expected(), now), Ok(()));
    }

    #[test]
    fn test_scheduled_identity_mismatch() {
        let now = Utc::now();
        let result = evaluate(&bracketing(now, "00000:00000"), &expected(), now);
        assert!(matches!(result, Err(WindowViolation::IdentityMismatch { .. })));

        let seal_only = evaluate(&bracketing(now, "09959:000000"), &expected(), now);
        assert!(matches!(seal_only, Err(WindowViolation::IdentityMismatch { .. })));
    }

    #[test]
    fn test_identifier_split_on_last_delimiter() {
        assert_eq!(split_identifier("a:b:114041"), Some(("a:b", "114041")));
        assert_eq!(split_identifier("nodelimiter"), None);

        let now = Utc::now();
        let nested = ExpectedIdentity {
            seal_id: "org:09959".into(),
            deployment_id: "114041".into(),
        };
        assert_eq!(evaluate(&bracketing(now, "org:09959:114041"), &nested, now), Ok(()));
    }

    #[test]
    fn test_malformed_identifier_denied() {
        let now = Utc::now();
        let result = evaluate(&bracketing(now, "09959114041"), &expected(), now);
        assert_eq!(result, Err(WindowViolation::Identifier("09959114041".into())));
    }

    #[test]
    fn test_outside_window_denied() {
        let now = Utc::now();
        let past = record(
            "Scheduled",
            &(now - Duration::hours(3)).to_rfc3339(),
            &(now - Duration::hours(2)).to_rfc3339(),
            "09959:114041",
        );
        assert!(matches!(
            evaluate(&past, &expected(), now),
            Err(WindowViolation::OutsideWindow { .. })
        ));

        let future = record(
            "Scheduled",
            &(now + Duration::hours(2)).to_rfc3339(),
            &(now + Duration::hours(3)).to_rfc3339(),
            "09959:114041",
        );
        assert!(matches!(
            evaluate(&future, &expected(), now),
            Err(WindowViolation::OutsideWindow { .. })
        ));
    }

    #[test]
    fn test_window_bounds_inclusive() {
        let now = DateTime::parse_from_rfc3339("2024-03-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let at_start = record("Scheduled", "2024-03-01T10:00:00Z", "2024-03-01T11:00:00Z", "09959:114041");
        let at_end = record("Scheduled", "2024-03-01T09:00:00Z", "2024-03-01T10:00:00Z", "09959:114041");
        assert_eq!(evaluate(&at_start, &expected(), now), Ok(()));
        assert_eq!(evaluate(&at_end, &expected(), now), Ok(()));
    }

    #[test]
    fn test_malformed_timestamps_denied() {
        let now = Utc::now();
        let bad_start = record("Scheduled", "tomorrow", &now.to_rfc3339(), "09959:114041");
        assert_eq!(
            evaluate(&bad_start, &expected(), now),
            Err(WindowViolation::Timestamp {
                field: "startTime",
                value: "tomorrow".into()
            })
        );

        let bad_end = record("Scheduled", &now.to_rfc3339(), "", "09959:114041");
        assert!(matches!(
            evaluate(&bad_end, &expected(), now),
            Err(WindowViolation::Timestamp { field: "endTime", .. })
        ));
    }

    #[test]
    fn test_other_states_denied() {
        let now = Utc::now();
        for state in ["New", "Assess", "Closed", "implement", ""] {
            let mut r = bracketing(now, "09959:114041");
            r.state = state.into();
            assert_eq!(
                evaluate(&r, &expected(), now),
                Err(WindowViolation::State(state.into()))
            );
        }
    }
}
