//! # Controller Properties
//!
//! The immutable, fully typed configuration snapshot read by every controller
//! component.
//!
//! A `Properties` value is only ever produced by the builder (or
//! [`Properties::default`]) and never mutated after publication. Readers get
//! pure projections through the accessors below; none of them can fail.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

pub const DEFAULT_AWS_REGION: &str = "us-west-2";
pub const DEFAULT_MAX_ROLES_ALLOWED: i64 = 1;
pub const DEFAULT_CONTROLLER_DESIRED_FREQUENCY: i64 = 300;
pub const DEFAULT_IAM_ROLE_PATTERN: &str = "k8s-{{ .ObjectMeta.Namespace }}";

/// Typed configuration snapshot.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Holds the resolved value of every recognized configuration key, plus the
/// values derived from them (the permission-boundary ARN and the managed
/// policy ARNs).
///
/// ## Defaults
/// `Properties::default()` carries the documented default of every field, so
/// a snapshot is safe to read before any configuration was loaded:
/// - `aws_region`: "us-west-2"
/// - `max_roles_allowed`: 1
/// - `controller_desired_frequency`: 300 seconds
/// - `is_webhook_enabled`, `derive_name_from_namespace`: false
/// - every list: empty
///
/// ## Validation
/// - `aws_account_id`, `aws_region`, `managed_permission_boundary_policy_name`:
///   non-empty
///
/// Numeric fields are taken as given; their meaning is up to the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Properties {
    #[validate(length(min = 1))]
    pub(crate) aws_account_id: String,

    #[validate(length(min = 1))]
    pub(crate) aws_region: String,

    pub(crate) aws_master_role: String,

    #[validate(length(min = 1))]
    pub(crate) managed_permission_boundary_policy_name: String,

    /// Derived from the account id and the policy name.
    pub(crate) managed_permission_boundary_policy: String,

    pub(crate) max_roles_allowed: i64,

    /// Seconds between desired-state reconciliations.
    pub(crate) controller_desired_frequency: i64,

    pub(crate) is_webhook_enabled: bool,
    pub(crate) derive_name_from_namespace: bool,
    pub(crate) is_irsa_regional_endpoint_disabled: bool,

    pub(crate) cluster_name: String,
    pub(crate) cluster_oidc_issuer_url: String,
    pub(crate) default_trust_policy: String,
    pub(crate) iam_role_pattern: String,

    pub(crate) allowed_policy_action: Vec<String>,
    pub(crate) restricted_policy_resources: Vec<String>,
    pub(crate) restricted_s3_resources: Vec<String>,
    pub(crate) managed_policies: Vec<String>,
    pub(crate) trust_policy_arns: Vec<String>
}

impl Default for Properties {
    fn default() -> Self {
        Self {
            aws_account_id: String::new(),
            aws_region: DEFAULT_AWS_REGION.to_string(),
            aws_master_role: String::new(),
            managed_permission_boundary_policy_name: String::new(),
            managed_permission_boundary_policy: String::new(),
            max_roles_allowed: DEFAULT_MAX_ROLES_ALLOWED,
            controller_desired_frequency: DEFAULT_CONTROLLER_DESIRED_FREQUENCY,
            is_webhook_enabled: false,
            derive_name_from_namespace: false,
            is_irsa_regional_endpoint_disabled: false,
            cluster_name: String::new(),
            cluster_oidc_issuer_url: String::new(),
            default_trust_policy: String::new(),
            iam_role_pattern: DEFAULT_IAM_ROLE_PATTERN.to_string(),
            allowed_policy_action: Vec::new(),
            restricted_policy_resources: Vec::new(),
            restricted_s3_resources: Vec::new(),
            managed_policies: Vec::new(),
            trust_policy_arns: Vec::new()
        }
    }
}

impl Properties {
    pub fn aws_account_id(&self) -> &str {
        &self.aws_account_id
    }

    pub fn aws_region(&self) -> &str {
        &self.aws_region
    }

    /// Role assumed for cross-account calls; empty when the controller runs
    /// with its own credentials.
    pub fn aws_master_role(&self) -> &str {
        &self.aws_master_role
    }

    pub fn managed_permission_boundary_policy_name(&self) -> &str {
        &self.managed_permission_boundary_policy_name
    }

    /// Permission boundary attached to every managed role, as a full IAM ARN.
    ///
    /// Always starts with `arn:aws:iam:` on a built snapshot; empty on an
    /// unconfigured default.
    pub fn managed_permission_boundary_policy(&self) -> &str {
        &self.managed_permission_boundary_policy
    }

    pub fn max_roles_allowed(&self) -> i64 {
        self.max_roles_allowed
    }

    pub fn controller_desired_frequency(&self) -> i64 {
        self.controller_desired_frequency
    }

    /// The reconciliation frequency as a `Duration`; negative values clamp to zero.
    pub fn controller_desired_interval(&self) -> Duration {
        Duration::from_secs(u64::try_from(self.controller_desired_frequency).unwrap_or(0))
    }

    pub fn is_webhook_enabled(&self) -> bool {
        self.is_webhook_enabled
    }

    pub fn derive_name_from_namespace(&self) -> bool {
        self.derive_name_from_namespace
    }

    pub fn is_irsa_regional_endpoint_disabled(&self) -> bool {
        self.is_irsa_regional_endpoint_disabled
    }

    pub fn cluster_name(&self) -> &str {
        &self.cluster_name
    }

    pub fn cluster_oidc_issuer_url(&self) -> &str {
        &self.cluster_oidc_issuer_url
    }

    pub fn default_trust_policy(&self) -> &str {
        &self.default_trust_policy
    }

    /// Template used to name IAM roles created for a namespace.
    pub fn iam_role_pattern(&self) -> &str {
        &self.iam_role_pattern
    }

    /// IAM action prefixes a role policy may use.
    pub fn allowed_policy_action(&self) -> &[String] {
        &self.allowed_policy_action
    }

    pub fn restricted_policy_resources(&self) -> &[String] {
        &self.restricted_policy_resources
    }

    pub fn restricted_s3_resources(&self) -> &[String] {
        &self.restricted_s3_resources
    }

    /// Policies attached to every managed role, as full IAM ARNs.
    pub fn managed_policies(&self) -> &[String] {
        &self.managed_policies
    }

    pub fn trust_policy_arns(&self) -> &[String] {
        &self.trust_policy_arns
    }
}
