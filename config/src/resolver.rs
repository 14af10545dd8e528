//! # Config Source Resolver
//!
//! Picks the raw key/value source for a load: the fixed local development
//! profile, or the map supplied by the caller.

use crate::raw::{Provenance, RawConfig};
use crate::schema::keys;
use errors::ConfigError;
use tracing::debug;

/// Environment discriminator selecting the local profile (case-insensitive).
pub const LOCAL_ENV: &str = "LOCAL";

pub const LOCAL_AWS_ACCOUNT_ID: &str = "123456789012";

const LOCAL_ALLOWED_POLICY_ACTION: &str = "s3:,sts:,ec2:Describe,acm:Describe,acm:List,acm:Get,\
route53:Get,route53:List,route53:Create,route53:Delete,route53:Change,kms:Decrypt,kms:Encrypt,\
kms:ReEncrypt,kms:GenerateDataKey,kms:DescribeKey,dynamodb:,secretsmanager:GetSecretValue,es:,\
sqs:SendMessage,sqs:ReceiveMessage,sqs:DeleteMessage,SNS:Publish,sqs:GetQueueAttributes,\
sqs:GetQueueUrl";

/// The fixed development profile.
pub fn local_profile() -> RawConfig {
    RawConfig::with_provenance(
        [
            (keys::AWS_ACCOUNT_ID, LOCAL_AWS_ACCOUNT_ID),
            (keys::AWS_REGION, "us-west-2"),
            (
                keys::MANAGED_PERMISSION_BOUNDARY_POLICY,
                "iam-manager-permission-boundary",
            ),
            (keys::MAX_ROLES_PER_NAMESPACE, "10"),
            (keys::WEBHOOK_ENABLED, "false"),
            (keys::ALLOWED_POLICY_ACTION, LOCAL_ALLOWED_POLICY_ACTION),
            (keys::RESTRICTED_POLICY_RESOURCES, "policy-resource"),
            (keys::RESTRICTED_S3_RESOURCES, "s3-resource"),
            (keys::MANAGED_POLICIES, "SOMETHING"),
            (keys::CLUSTER_NAME, "k8s_test_keiko"),
            (keys::CLUSTER_OIDC_ISSUER_URL, "https://google.com/OIDC"),
        ],
        Provenance::Local,
    )
}

pub fn is_local(env: &str) -> bool {
    env.eq_ignore_ascii_case(LOCAL_ENV)
}

/// Resolve the raw configuration source for a load.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// - `env` equal to `LOCAL` (any case): the local profile, even when an
///   external map was supplied
/// - otherwise: the external map, which must be present and non-empty
///
/// ## Error Handling
/// Returns `ConfigError::MissingConfigSource` ("config map cannot be nil")
/// when `env` is not local and no usable external map was supplied.
pub fn resolve(env: &str, external: Option<RawConfig>) -> Result<RawConfig, ConfigError> {
    if is_local(env) {
        debug!("Using local configuration profile");
        return Ok(local_profile());
    }

    match external {
        Some(raw) if !raw.is_empty() => {
            debug!("Using external configuration with {} keys", raw.len());
            Ok(raw)
        }
        _ => Err(ConfigError::MissingConfigSource)
    }
}
