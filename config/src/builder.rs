//! # Properties Builder
//!
//! Turns a [`RawConfig`] into an immutable [`Properties`] snapshot by walking
//! the declarative [`SCHEMA`](crate::schema::SCHEMA) once.
//!
//! # Pipeline
//! 1. Start from `Properties::default()`, which carries every documented default
//! 2. For each schema row, coerce the raw value (if present) and store it
//! 3. Run post-processors (ARN derivation) with the full draft in hand
//! 4. Check that string fields required to be present are non-blank

use crate::properties::Properties;
use crate::raw::RawConfig;
use crate::schema::{Fallback, FieldSpec, SCHEMA, Setter};
use crate::validator;
use errors::ConfigError;
use tracing::{debug, trace};

/// Build a properties snapshot from a raw source.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Resolves every recognized key: absent keys keep their documented default,
/// required keys must be present and non-blank, present keys are coerced to
/// their declared type. Derived values are computed afterwards.
///
/// ## Usage
/// ```rust,no_run
/// use config::{RawConfig, build};
///
/// let raw = RawConfig::external([
///     ("aws.accountId", "123456789012"),
///     ("iam.managed.permission.boundary.policy", "iam-manager-permission-boundary"),
/// ]);
/// let props = build(&raw).unwrap();
/// assert_eq!(props.aws_region(), "us-west-2");
/// ```
///
/// ## Error Handling
/// - `RequiredKeyMissing`: a required key is absent or blank
/// - `TypeCoercion`: a present value does not parse as its declared type
pub fn build(raw: &RawConfig) -> Result<Properties, ConfigError> {
    let mut draft = Properties::default();

    for spec in SCHEMA {
        apply_field(&mut draft, spec, raw)?;
    }

    for spec in SCHEMA {
        if let Some(post) = spec.post {
            trace!("Deriving value for {}", spec.key);
            post(&mut draft);
        }
    }

    validator::validate(&draft)?;

    Ok(draft)
}

fn apply_field(
    draft: &mut Properties,
    spec: &FieldSpec,
    raw: &RawConfig,
) -> Result<(), ConfigError> {
    let value = match raw.get(spec.key) {
        Some(value) if !(spec.fallback == Fallback::Required && value.trim().is_empty()) => value,
        _ => {
            return match spec.fallback {
                Fallback::Required => Err(ConfigError::RequiredKeyMissing {
                    key: spec.key.to_string()
                }),
                Fallback::Default => {
                    debug!("{} not set, using default", spec.key);
                    Ok(())
                }
            };
        }
    };

    match spec.setter {
        Setter::Str(set) => set(draft, value.to_string()),
        Setter::Int(set) => set(draft, parse_int(spec.key, value)?),
        Setter::Bool(set) => set(draft, parse_bool(spec.key, value)?),
        Setter::List(set) => set(draft, parse_list(value))
    }

    Ok(())
}

/// Parses a signed base-10 integer. Surrounding whitespace is ignored.
pub fn parse_int(key: &str, value: &str) -> Result<i64, ConfigError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| coercion_error(key, value, "integer"))
}

/// Accepts `true`/`false`, `t`/`f` and `1`/`0`, case-insensitively.
pub fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" => Ok(true),
        "false" | "f" | "0" => Ok(false),
        _ => Err(coercion_error(key, value, "boolean"))
    }
}

/// Splits a comma-separated list, trimming entries and dropping blanks.
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn coercion_error(key: &str, value: &str, expected: &'static str) -> ConfigError {
    ConfigError::TypeCoercion {
        key: key.to_string(),
        value: value.to_string(),
        expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::keys;

    fn minimal() -> RawConfig {
        RawConfig::external([
            (keys::MANAGED_PERMISSION_BOUNDARY_POLICY, "iam-manager-permission-boundary"),
            (keys::AWS_ACCOUNT_ID, "123456789012"),
        ])
    }

    #[test]
    fn test_build_with_defaults() {
        let props = build(&minimal()).unwrap();
        assert_eq!(props.aws_region(), "us-west-2");
        assert_eq!(props.max_roles_allowed(), 1);
        assert_eq!(props.controller_desired_frequency(), 300);
        assert!(!props.is_webhook_enabled());
        assert!(!props.derive_name_from_namespace());
        assert_eq!(props.aws_account_id(), "123456789012");
        assert_eq!(
            props.managed_permission_boundary_policy(),
            "arn:aws:iam::123456789012:policy/iam-manager-permission-boundary"
        );
        assert!(props.allowed_policy_action().is_empty());
        assert!(props.trust_policy_arns().is_empty());
    }

    #[test]
    fn test_build_with_supplied_values() {
        let raw = minimal()
            .with(keys::AWS_REGION, "us-east-2")
            .with(keys::MAX_ROLES_PER_NAMESPACE, "5")
            .with(keys::WEBHOOK_ENABLED, "true")
            .with(keys::CONTROLLER_DESIRED_FREQUENCY, "30")
            .with(keys::DERIVE_NAME_FROM_NAMESPACE, "TRUE")
            .with(keys::CLUSTER_NAME, "prod-usw2")
            .with(keys::ALLOWED_POLICY_ACTION, "s3:, sts:AssumeRole ,,ec2:Describe");
        let props = build(&raw).unwrap();
        assert_eq!(props.aws_region(), "us-east-2");
        assert_eq!(props.max_roles_allowed(), 5);
        assert!(props.is_webhook_enabled());
        assert_eq!(props.controller_desired_frequency(), 30);
        assert!(props.derive_name_from_namespace());
        assert_eq!(props.cluster_name(), "prod-usw2");
        assert_eq!(
            props.allowed_policy_action(),
            ["s3:", "sts:AssumeRole", "ec2:Describe"].map(String::from)
        );
    }

    #[test]
    fn test_missing_account_id() {
        let raw = RawConfig::external([(
            keys::MANAGED_PERMISSION_BOUNDARY_POLICY,
            "iam-manager-permission-boundary",
        )]);
        assert_eq!(
            build(&raw).unwrap_err(),
            ConfigError::RequiredKeyMissing {
                key: keys::AWS_ACCOUNT_ID.to_string()
            }
        );
    }

    #[test]
    fn test_blank_boundary_policy_is_missing() {
        let raw = minimal().with(keys::MANAGED_PERMISSION_BOUNDARY_POLICY, "   ");
        assert_eq!(
            build(&raw).unwrap_err(),
            ConfigError::RequiredKeyMissing {
                key: keys::MANAGED_PERMISSION_BOUNDARY_POLICY.to_string()
            }
        );
    }

    #[test]
    fn test_invalid_integer_names_key() {
        let raw = minimal().with(keys::MAX_ROLES_PER_NAMESPACE, "five");
        match build(&raw).unwrap_err() {
            ConfigError::TypeCoercion {
                key,
                value,
                expected
            } => {
                assert_eq!(key, keys::MAX_ROLES_PER_NAMESPACE);
                assert_eq!(value, "five");
                assert_eq!(expected, "integer");
            }
            other => panic!("Expected TypeCoercion, got {:?}", other)
        }
    }

    #[test]
    fn test_invalid_boolean() {
        let raw = minimal().with(keys::WEBHOOK_ENABLED, "yes");
        let err = build(&raw).unwrap_err();
        assert_eq!(err.key(), Some(keys::WEBHOOK_ENABLED));
        assert_eq!(err.kind(), errors::ConfigErrorKind::TypeCoercion);
    }

    #[test]
    fn test_zero_and_negative_integers_are_kept() {
        let raw = minimal()
            .with(keys::MAX_ROLES_PER_NAMESPACE, "0")
            .with(keys::CONTROLLER_DESIRED_FREQUENCY, "-30");
        let props = build(&raw).unwrap();
        assert_eq!(props.max_roles_allowed(), 0);
        assert_eq!(props.controller_desired_frequency(), -30);

        let props = build(&minimal().with(keys::MAX_ROLES_PER_NAMESPACE, "-1")).unwrap();
        assert_eq!(props.max_roles_allowed(), -1);
    }

    #[test]
    fn test_blank_region_is_missing() {
        let raw = minimal().with(keys::AWS_REGION, "");
        assert_eq!(
            build(&raw).unwrap_err(),
            ConfigError::RequiredKeyMissing {
                key: keys::AWS_REGION.to_string()
            }
        );
    }

    #[test]
    fn test_managed_policies_become_arns() {
        let raw = minimal().with(
            keys::MANAGED_POLICIES,
            "ReadOnly,arn:aws:iam::aws:policy/CloudWatchAgentServerPolicy",
        );
        let props = build(&raw).unwrap();
        assert_eq!(
            props.managed_policies(),
            [
                "arn:aws:iam::123456789012:policy/ReadOnly",
                "arn:aws:iam::aws:policy/CloudWatchAgentServerPolicy",
            ]
            .map(String::from)
        );
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let raw = minimal().with("some.future.key", "value");
        assert!(build(&raw).is_ok());
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("k", "42").unwrap(), 42);
        assert_eq!(parse_int("k", " 7 ").unwrap(), 7);
        assert_eq!(parse_int("k", "0").unwrap(), 0);
        assert_eq!(parse_int("k", "-1").unwrap(), -1);
        assert!(parse_int("k", "1e3").is_err());
        assert!(parse_int("k", "1.5").is_err());
        assert!(parse_int("k", "").is_err());
    }

    #[test]
    fn test_parse_bool() {
        for value in ["true", "True", "TRUE", "t", "1"] {
            assert!(parse_bool("k", value).unwrap());
        }
        for value in ["false", "False", "FALSE", "f", "0"] {
            assert!(!parse_bool("k", value).unwrap());
        }
        assert!(parse_bool("k", "on").is_err());
        assert!(parse_bool("k", "").is_err());
    }

    #[test]
    fn test_parse_list() {
        assert!(parse_list("").is_empty());
        assert!(parse_list(" , ,").is_empty());
        assert_eq!(parse_list("a"), vec!["a".to_string()]);
        assert_eq!(parse_list("a, b"), vec!["a".to_string(), "b".to_string()]);
    }
}
