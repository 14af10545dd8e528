//! IAM policy ARN synthesis.

/// Partition used for every synthesized ARN.
pub const AWS_PARTITION: &str = "aws";

/// Prefix every IAM ARN produced here starts with.
pub const IAM_ARN_PREFIX: &str = "arn:aws:iam:";

/// Builds `arn:aws:iam::<account_id>:policy/<name>`.
///
/// A value that is already an IAM ARN in the `aws` partition is returned
/// unchanged so operators may configure either a bare name or a full ARN.
pub fn policy_arn(account_id: &str, name: &str) -> String {
    if name.starts_with(IAM_ARN_PREFIX) {
        return name.to_string();
    }
    format!("arn:{AWS_PARTITION}:iam::{account_id}:policy/{name}")
}

/// Applies [`policy_arn`] to every entry of a list.
pub fn policy_arns(account_id: &str, names: Vec<String>) -> Vec<String> {
    names
        .into_iter()
        .map(|name| policy_arn(account_id, &name))
        .collect()
}
