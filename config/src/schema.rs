//! # Properties Schema
//!
//! Declarative table of every recognized configuration key.
//!
//! Each [`FieldSpec`] names a key, what happens when it is absent, how the raw
//! string is coerced and stored, and an optional post-processor run once all
//! raw fields have resolved. Adding a property means adding a row here.

use crate::arn;
use crate::properties::Properties;

/// Recognized configuration keys. The spellings are a compatibility surface
/// shared with existing ConfigMaps.
pub mod keys {
    pub const AWS_ACCOUNT_ID: &str = "aws.accountId";
    pub const AWS_REGION: &str = "aws.region";
    pub const AWS_MASTER_ROLE: &str = "aws.MasterRole";
    pub const MANAGED_PERMISSION_BOUNDARY_POLICY: &str = "iam.managed.permission.boundary.policy";
    pub const MAX_ROLES_PER_NAMESPACE: &str = "iam.role.max.limit.per.namespace";
    pub const CONTROLLER_DESIRED_FREQUENCY: &str = "controller.desired.frequency";
    pub const WEBHOOK_ENABLED: &str = "webhook.enabled";
    pub const DERIVE_NAME_FROM_NAMESPACE: &str = "iam.role.derive.from.namespace";
    pub const IRSA_REGIONAL_ENDPOINT_DISABLED: &str = "iam.irsa.regional.endpoint.disabled";
    pub const CLUSTER_NAME: &str = "k8s.cluster.name";
    pub const CLUSTER_OIDC_ISSUER_URL: &str = "k8s.cluster.oidc.issuer.url";
    pub const DEFAULT_TRUST_POLICY: &str = "iam.default.trust.policy";
    pub const IAM_ROLE_PATTERN: &str = "iam.role.pattern";
    pub const ALLOWED_POLICY_ACTION: &str = "iam.policy.action.prefix.whitelist";
    pub const RESTRICTED_POLICY_RESOURCES: &str = "iam.policy.resource.blacklist";
    pub const RESTRICTED_S3_RESOURCES: &str = "iam.policy.s3.restricted.resource";
    pub const MANAGED_POLICIES: &str = "iam.managed.policies";
    pub const TRUST_POLICY_ARNS: &str = "iam.trust.policy.arns";
}

/// Behaviour when a key is absent from the raw source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Keep the value carried by `Properties::default()`.
    Default,

    /// Absence (or a blank value) fails the build.
    Required
}

/// Coercion target and the slot the coerced value is stored in.
#[derive(Clone, Copy)]
pub enum Setter {
    Str(fn(&mut Properties, String)),
    Int(fn(&mut Properties, i64)),
    Bool(fn(&mut Properties, bool)),
    List(fn(&mut Properties, Vec<String>))
}

impl Setter {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Int(_) => "integer",
            Self::Bool(_) => "boolean",
            Self::List(_) => "list"
        }
    }
}

#[derive(Clone, Copy)]
pub struct FieldSpec {
    pub key: &'static str,
    pub fallback: Fallback,
    pub setter: Setter,

    /// Runs after every raw field has resolved, with the full draft in hand.
    pub post: Option<fn(&mut Properties)>
}

impl std::fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSpec")
            .field("key", &self.key)
            .field("fallback", &self.fallback)
            .field("type", &self.setter.type_name())
            .field("post", &self.post.is_some())
            .finish()
    }
}

fn derive_permission_boundary_arn(props: &mut Properties) {
    props.managed_permission_boundary_policy = arn::policy_arn(
        &props.aws_account_id,
        &props.managed_permission_boundary_policy_name,
    );
}

fn expand_managed_policy_arns(props: &mut Properties) {
    let names = std::mem::take(&mut props.managed_policies);
    props.managed_policies = arn::policy_arns(&props.aws_account_id, names);
}

pub static SCHEMA: &[FieldSpec] = &[
    FieldSpec {
        key: keys::AWS_ACCOUNT_ID,
        fallback: Fallback::Required,
        setter: Setter::Str(|p, v| p.aws_account_id = v),
        post: None
    },
    FieldSpec {
        key: keys::AWS_REGION,
        fallback: Fallback::Default,
        setter: Setter::Str(|p, v| p.aws_region = v),
        post: None
    },
    FieldSpec {
        key: keys::AWS_MASTER_ROLE,
        fallback: Fallback::Default,
        setter: Setter::Str(|p, v| p.aws_master_role = v),
        post: None
    },
    FieldSpec {
        key: keys::MANAGED_PERMISSION_BOUNDARY_POLICY,
        fallback: Fallback::Required,
        setter: Setter::Str(|p, v| p.managed_permission_boundary_policy_name = v),
        post: Some(derive_permission_boundary_arn)
    },
    FieldSpec {
        key: keys::MAX_ROLES_PER_NAMESPACE,
        fallback: Fallback::Default,
        setter: Setter::Int(|p, v| p.max_roles_allowed = v),
        post: None
    },
    FieldSpec {
        key: keys::CONTROLLER_DESIRED_FREQUENCY,
        fallback: Fallback::Default,
        setter: Setter::Int(|p, v| p.controller_desired_frequency = v),
        post: None
    },
    FieldSpec {
        key: keys::WEBHOOK_ENABLED,
        fallback: Fallback::Default,
        setter: Setter::Bool(|p, v| p.is_webhook_enabled = v),
        post: None
    },
    FieldSpec {
        key: keys::DERIVE_NAME_FROM_NAMESPACE,
        fallback: Fallback::Default,
        setter: Setter::Bool(|p, v| p.derive_name_from_namespace = v),
        post: None
    },
    FieldSpec {
        key: keys::IRSA_REGIONAL_ENDPOINT_DISABLED,
        fallback: Fallback::Default,
        setter: Setter::Bool(|p, v| p.is_irsa_regional_endpoint_disabled = v),
        post: None
    },
    FieldSpec {
        key: keys::CLUSTER_NAME,
        fallback: Fallback::Default,
        setter: Setter::Str(|p, v| p.cluster_name = v),
        post: None
    },
    FieldSpec {
        key: keys::CLUSTER_OIDC_ISSUER_URL,
        fallback: Fallback::Default,
        setter: Setter::Str(|p, v| p.cluster_oidc_issuer_url = v),
        post: None
    },
    FieldSpec {
        key: keys::DEFAULT_TRUST_POLICY,
        fallback: Fallback::Default,
        setter: Setter::Str(|p, v| p.default_trust_policy = v),
        post: None
    },
    FieldSpec {
        key: keys::IAM_ROLE_PATTERN,
        fallback: Fallback::Default,
        setter: Setter::Str(|p, v| p.iam_role_pattern = v),
        post: None
    },
    FieldSpec {
        key: keys::ALLOWED_POLICY_ACTION,
        fallback: Fallback::Default,
        setter: Setter::List(|p, v| p.allowed_policy_action = v),
        post: None
    },
    FieldSpec {
        key: keys::RESTRICTED_POLICY_RESOURCES,
        fallback: Fallback::Default,
        setter: Setter::List(|p, v| p.restricted_policy_resources = v),
        post: None
    },
    FieldSpec {
        key: keys::RESTRICTED_S3_RESOURCES,
        fallback: Fallback::Default,
        setter: Setter::List(|p, v| p.restricted_s3_resources = v),
        post: None
    },
    FieldSpec {
        key: keys::MANAGED_POLICIES,
        fallback: Fallback::Default,
        setter: Setter::List(|p, v| p.managed_policies = v),
        post: Some(expand_managed_policy_arns)
    },
    FieldSpec {
        key: keys::TRUST_POLICY_ARNS,
        fallback: Fallback::Default,
        setter: Setter::List(|p, v| p.trust_policy_arns = v),
        post: None
    },
];

/// Looks up the schema row for `key`.
pub fn field(key: &str) -> Option<&'static FieldSpec> {
    SCHEMA.iter().find(|spec| spec.key == key)
}
