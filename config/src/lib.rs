//! # Controller Properties
//!
//! Typed configuration store for the IAM role controller.
//!
//! This crate provides:
//! - Source resolution between the local development profile and the
//!   cluster-supplied ConfigMap data
//! - A declarative schema of every recognized key, with types and defaults
//! - A builder producing an immutable, validated `Properties` snapshot
//! - An injectable handle publishing the snapshot with an atomic swap
//! - Loading raw key/value data from ConfigMap manifests or mounted volumes
//!
//! Failures surface only at the load boundary; accessors on a snapshot never
//! fail.

pub mod arn;
pub mod builder;
pub mod file_loader;
pub mod handle;
pub mod properties;
pub mod raw;
pub mod resolver;
pub mod schema;
pub mod validator;

pub use builder::build;
pub use errors::{ConfigError, ConfigErrorKind};
pub use file_loader::{
    ConfigFileError, load_raw_from_dir, load_raw_from_file, load_raw_from_toml,
    load_raw_from_yaml,
};
pub use handle::{LoadState, PropertiesHandle, global, load_properties, properties};
pub use properties::Properties;
pub use raw::{Provenance, RawConfig};
pub use resolver::{LOCAL_ENV, local_profile, resolve};
pub use schema::keys;
