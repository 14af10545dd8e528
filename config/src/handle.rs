//! # Published Properties
//!
//! Owns the currently published [`Properties`] snapshot.
//!
//! A [`PropertiesHandle`] is cheap to clone and meant to be handed to every
//! collaborator that reads configuration. Publishing is a single atomic pointer
//! swap, so readers see either the previous snapshot or the new one and never
//! a partially updated value. Load calls are expected to be serialized by the
//! caller; reads are lock-free and may happen from any thread at any time.

use crate::builder::build;
use crate::properties::Properties;
use crate::raw::RawConfig;
use crate::resolver::resolve;
use arc_swap::ArcSwapOption;
use errors::ConfigError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};
use tracing::{info, warn};

static DEFAULTS: LazyLock<Arc<Properties>> = LazyLock::new(|| Arc::new(Properties::default()));

static GLOBAL: LazyLock<PropertiesHandle> = LazyLock::new(PropertiesHandle::new);

/// Lifecycle of a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing published yet, or explicitly reset.
    Unset,

    /// A load call is resolving and building.
    Loading,

    /// A snapshot is visible to readers.
    Published
}

#[derive(Debug, Clone, Default)]
pub struct PropertiesHandle {
    current: Arc<ArcSwapOption<Properties>>,
    loading: Arc<AtomicBool>
}

impl PropertiesHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle with `props` already published.
    pub fn with_properties(props: Properties) -> Self {
        let handle = Self::new();
        handle.current.store(Some(Arc::new(props)));
        handle
    }

    /// Resolve, build and publish a new snapshot.
    ///
    /// # M-CANONICAL-DOCS
    ///
    /// ## Purpose
    /// Runs the resolver and builder for `env`/`external`. On success the new
    /// snapshot replaces the published one and is returned.
    ///
    /// ## Usage
    /// ```rust,no_run
    /// use config::PropertiesHandle;
    ///
    /// let handle = PropertiesHandle::new();
    /// let props = handle.load("LOCAL", None).unwrap();
    /// assert_eq!(props.aws_account_id(), "123456789012");
    /// ```
    ///
    /// ## Error Handling
    /// Any `ConfigError` leaves the handle exactly as it was: a previously
    /// published snapshot stays published, an unset handle stays unset.
    pub fn load(
        &self,
        env: &str,
        external: Option<RawConfig>,
    ) -> Result<Arc<Properties>, ConfigError> {
        self.loading.store(true, Ordering::SeqCst);
        let result = resolve(env, external).and_then(|raw| build(&raw));

        let outcome = match result {
            Ok(props) => {
                let props = Arc::new(props);
                self.current.store(Some(Arc::clone(&props)));
                info!(
                    "Published controller properties for account {} in {}",
                    props.aws_account_id(),
                    props.aws_region()
                );
                Ok(props)
            }
            Err(e) => {
                warn!("Failed to load controller properties: {}", e);
                Err(e)
            }
        };

        self.loading.store(false, Ordering::SeqCst);
        outcome
    }

    /// The published snapshot, or `None` when nothing was loaded yet.
    pub fn get(&self) -> Option<Arc<Properties>> {
        self.current.load_full()
    }

    /// The published snapshot, falling back to documented defaults.
    pub fn current(&self) -> Arc<Properties> {
        self.get().unwrap_or_else(|| Arc::clone(&DEFAULTS))
    }

    pub fn is_configured(&self) -> bool {
        self.current.load().is_some()
    }

    pub fn state(&self) -> LoadState {
        if self.loading.load(Ordering::SeqCst) {
            LoadState::Loading
        } else if self.is_configured() {
            LoadState::Published
        } else {
            LoadState::Unset
        }
    }

    /// Drops the published snapshot, returning the handle to `Unset`.
    pub fn reset(&self) {
        self.current.store(None);
    }
}

/// The process-wide handle, for collaborators that are not handed one.
pub fn global() -> &'static PropertiesHandle {
    &GLOBAL
}

/// Load and publish properties on the process-wide handle.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Entry point for controller start-up and reconfiguration.
///
/// ## Usage
/// ```rust,no_run
/// use config::{RawConfig, global, load_properties};
///
/// let data = RawConfig::external([
///     ("aws.accountId", "123456789012"),
///     ("iam.managed.permission.boundary.policy", "iam-manager-permission-boundary"),
/// ]);
/// load_properties("", Some(data)).unwrap();
/// assert!(global().is_configured());
/// ```
pub fn load_properties(env: &str, external: Option<RawConfig>) -> Result<(), ConfigError> {
    GLOBAL.load(env, external).map(|_| ())
}

/// The process-wide snapshot, falling back to documented defaults.
pub fn properties() -> Arc<Properties> {
    GLOBAL.current()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::keys;
    use serial_test::serial;

    fn cluster_data() -> RawConfig {
        RawConfig::external([
            (keys::MANAGED_PERMISSION_BOUNDARY_POLICY, "iam-manager-permission-boundary"),
            (keys::AWS_ACCOUNT_ID, "123456789012"),
            (keys::MAX_ROLES_PER_NAMESPACE, "5"),
            (keys::AWS_REGION, "us-east-2"),
            (keys::WEBHOOK_ENABLED, "true"),
        ])
    }

    #[test]
    fn test_new_handle_is_unset() {
        let handle = PropertiesHandle::new();
        assert_eq!(handle.state(), LoadState::Unset);
        assert!(handle.get().is_none());
        assert_eq!(handle.current().aws_region(), "us-west-2");
        assert!(handle.current().trust_policy_arns().is_empty());
    }

    #[test]
    fn test_load_publishes() {
        let handle = PropertiesHandle::new();
        let props = handle.load("", Some(cluster_data())).unwrap();
        assert_eq!(handle.state(), LoadState::Published);
        assert_eq!(handle.get().unwrap(), props);
        assert_eq!(props.max_roles_allowed(), 5);
    }

    #[test]
    fn test_failed_load_leaves_unset() {
        let handle = PropertiesHandle::new();
        let err = handle.load("", None).unwrap_err();
        assert_eq!(err.to_string(), "config map cannot be nil");
        assert_eq!(handle.state(), LoadState::Unset);
        assert!(handle.get().is_none());
    }

    #[test]
    fn test_failed_reload_keeps_previous_snapshot() {
        let handle = PropertiesHandle::new();
        let first = handle.load("", Some(cluster_data())).unwrap();

        let bad = cluster_data().with(keys::MAX_ROLES_PER_NAMESPACE, "many");
        assert!(handle.load("", Some(bad)).is_err());

        let current = handle.get().unwrap();
        assert!(Arc::ptr_eq(&first, &current));
        assert_eq!(handle.state(), LoadState::Published);
    }

    #[test]
    fn test_reload_replaces_snapshot_without_mutating_old() {
        let handle = PropertiesHandle::new();
        let first = handle.load("", Some(cluster_data())).unwrap();
        let second = handle
            .load("", Some(cluster_data().with(keys::AWS_REGION, "eu-west-1")))
            .unwrap();

        assert_eq!(first.aws_region(), "us-east-2");
        assert_eq!(second.aws_region(), "eu-west-1");
        assert_eq!(handle.current().aws_region(), "eu-west-1");
    }

    #[test]
    fn test_reset_returns_to_unset() {
        let handle = PropertiesHandle::with_properties(Properties::default());
        assert!(handle.is_configured());
        handle.reset();
        assert_eq!(handle.state(), LoadState::Unset);
    }

    #[test]
    fn test_clones_share_published_state() {
        let handle = PropertiesHandle::new();
        let reader = handle.clone();
        handle.load("LOCAL", None).unwrap();
        assert_eq!(reader.current().aws_account_id(), "123456789012");
    }

    #[test]
    #[serial]
    fn test_global_load_properties_local() {
        global().reset();
        load_properties("LOCAL", None).unwrap();
        assert!(global().is_configured());
        assert_eq!(properties().aws_account_id(), "123456789012");
        global().reset();
    }

    #[test]
    #[serial]
    fn test_global_load_properties_missing_source() {
        global().reset();
        let err = load_properties("", None).unwrap_err();
        assert_eq!(err.to_string(), "config map cannot be nil");
        assert!(global().get().is_none());
    }
}
