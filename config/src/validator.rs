//! # Properties Validation
//!
//! Checks a built snapshot using the `validator` crate.

use crate::properties::Properties;
use crate::schema::keys;
use errors::ConfigError;
use validator::Validate;

/// Configuration key a validated `Properties` field is read from.
fn key_for_field(field: &str) -> &str {
    match field {
        "aws_account_id" => keys::AWS_ACCOUNT_ID,
        "aws_region" => keys::AWS_REGION,
        "managed_permission_boundary_policy_name" => keys::MANAGED_PERMISSION_BOUNDARY_POLICY,
        other => other
    }
}

/// Validate a properties snapshot.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Runs the `validator` rules declared on [`Properties`]. Every rule is a
/// presence check, so a failure is reported as `ConfigError::RequiredKeyMissing`
/// naming the configuration key (the first one, in key order, when several
/// fail).
///
/// ## Validation Rules
/// - `aws_account_id`: non-empty
/// - `aws_region`: non-empty
/// - `managed_permission_boundary_policy_name`: non-empty
///
/// Numeric values, policy actions and ARNs are not checked.
pub fn validate(props: &Properties) -> Result<(), ConfigError> {
    props.validate().map_err(|errors| {
        let key = errors
            .field_errors()
            .keys()
            .map(|field| key_for_field(field).to_string())
            .min()
            .unwrap_or_default();
        ConfigError::RequiredKeyMissing { key }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Properties {
        let mut props = Properties::default();
        props.aws_account_id = "123456789012".to_string();
        props.managed_permission_boundary_policy_name = "boundary".to_string();
        props
    }

    #[test]
    fn test_validate_valid_properties() {
        assert!(validate(&valid()).is_ok());
    }

    #[test]
    fn test_validate_empty_region() {
        let mut props = valid();
        props.aws_region = String::new();
        assert_eq!(
            validate(&props).unwrap_err(),
            ConfigError::RequiredKeyMissing {
                key: keys::AWS_REGION.to_string()
            }
        );
    }

    #[test]
    fn test_validate_reports_first_missing_key() {
        let props = Properties::default();
        assert_eq!(
            validate(&props).unwrap_err(),
            ConfigError::RequiredKeyMissing {
                key: keys::AWS_ACCOUNT_ID.to_string()
            }
        );
    }

    #[test]
    fn test_validate_does_not_inspect_numbers_or_policies() {
        let mut props = valid();
        props.max_roles_allowed = 0;
        props.controller_desired_frequency = -1;
        props.allowed_policy_action = vec!["not an action".to_string()];
        props.managed_policies = vec![String::new()];
        assert!(validate(&props).is_ok());
    }
}
