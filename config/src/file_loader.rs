//! # Raw Configuration File Loading
//!
//! Reads a [`RawConfig`] from local disk: a ConfigMap manifest or flat key
//! table (YAML or TOML), or a mounted ConfigMap volume directory.
//!
//! Format is detected from the file extension.

use crate::raw::RawConfig;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Configuration file loading error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(String),

    #[error("Failed to parse YAML: {0}")]
    YamlParse(String),

    #[error("Config file has no extension")]
    NoExtension,

    #[error("Unsupported config file format: {0}")]
    UnsupportedFormat(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Value for '{0}' must be a string, number or boolean")]
    NestedValue(String),
}

/// Top-level keys that mark a document as a ConfigMap manifest rather than a
/// flat key table.
const MANIFEST_MARKERS: [&str; 3] = ["data", "apiVersion", "kind"];

fn is_manifest<'a>(mut keys: impl Iterator<Item = &'a str>) -> bool {
    keys.any(|key| MANIFEST_MARKERS.contains(&key))
}

fn read(path: &Path) -> Result<String, ConfigFileError> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ConfigFileError::FileNotFound(path.display().to_string()),
        _ => ConfigFileError::Io(e),
    })
}

fn yaml_scalar(key: &str, value: serde_yaml::Value) -> Result<String, ConfigFileError> {
    use serde_yaml::Value;

    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        Value::Tagged(tagged) => yaml_scalar(key, tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => {
            Err(ConfigFileError::NestedValue(key.to_string()))
        }
    }
}

fn yaml_table(value: serde_yaml::Value) -> Result<BTreeMap<String, String>, ConfigFileError> {
    let mapping = match value {
        serde_yaml::Value::Mapping(mapping) => mapping,
        serde_yaml::Value::Null => return Ok(BTreeMap::new()),
        _ => {
            return Err(ConfigFileError::YamlParse(
                "expected a mapping of keys to values".to_string(),
            ));
        }
    };

    let mut entries = BTreeMap::new();
    for (key, value) in mapping {
        let key = yaml_scalar("<key>", key)?;
        let value = yaml_scalar(&key, value)?;
        entries.insert(key, value);
    }
    Ok(entries)
}

fn yaml_entries(contents: &str) -> Result<BTreeMap<String, String>, ConfigFileError> {
    let document: serde_yaml::Value =
        serde_yaml::from_str(contents).map_err(|e| ConfigFileError::YamlParse(e.to_string()))?;

    match document {
        serde_yaml::Value::Mapping(mut top)
            if is_manifest(top.keys().filter_map(serde_yaml::Value::as_str)) =>
        {
            top.remove("data").map_or_else(|| Ok(BTreeMap::new()), yaml_table)
        }
        other => yaml_table(other),
    }
}

fn toml_scalar(key: &str, value: toml::Value) -> Result<String, ConfigFileError> {
    use toml::Value;

    match value {
        Value::String(s) => Ok(s),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Boolean(b) => Ok(b.to_string()),
        Value::Datetime(dt) => Ok(dt.to_string()),
        Value::Array(_) | Value::Table(_) => Err(ConfigFileError::NestedValue(key.to_string())),
    }
}

fn toml_table(table: toml::Table) -> Result<BTreeMap<String, String>, ConfigFileError> {
    table
        .into_iter()
        .map(|(key, value)| {
            let value = toml_scalar(&key, value)?;
            Ok((key, value))
        })
        .collect()
}

fn toml_entries(contents: &str) -> Result<BTreeMap<String, String>, ConfigFileError> {
    let mut top: toml::Table =
        toml::from_str(contents).map_err(|e| ConfigFileError::TomlParse(e.to_string()))?;

    if !is_manifest(top.keys().map(String::as_str)) {
        return toml_table(top);
    }
    match top.remove("data") {
        Some(toml::Value::Table(data)) => toml_table(data),
        Some(_) => Err(ConfigFileError::TomlParse("`data` must be a table".to_string())),
        None => Ok(BTreeMap::new()),
    }
}

/// Load raw configuration from a YAML file.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Accepts either a full ConfigMap manifest, of which only `data` is used,
/// or a flat mapping of keys to values. A document with a top-level `data`,
/// `apiVersion` or `kind` key is a manifest; a manifest without `data`
/// yields an empty config.
///
/// Unquoted numbers and booleans are kept as their textual form. Note that
/// YAML reads `012` as the number 12, so account ids with a leading zero
/// must be quoted. Nested sequences or mappings are rejected with
/// `NestedValue` naming the key.
///
/// ## Usage
/// ```rust,no_run
/// use config::load_raw_from_yaml;
/// use std::path::Path;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let raw = load_raw_from_yaml(Path::new("iam-manager-configmap.yaml"))?;
///     println!("{} keys", raw.len());
///     Ok(())
/// }
/// ```
pub fn load_raw_from_yaml(path: &Path) -> Result<RawConfig, ConfigFileError> {
    let entries = yaml_entries(&read(path)?)?;
    debug!("Read {} keys from {:?}", entries.len(), path);
    Ok(RawConfig::from(entries))
}

/// Load raw configuration from a TOML file, either a flat table of quoted keys
/// or a `[data]` table. Scalars of any type are kept as their textual form.
pub fn load_raw_from_toml(path: &Path) -> Result<RawConfig, ConfigFileError> {
    let entries = toml_entries(&read(path)?)?;
    debug!("Read {} keys from {:?}", entries.len(), path);
    Ok(RawConfig::from(entries))
}

/// Load raw configuration from file with auto-detection.
///
/// ## Supported Formats
/// - `.toml`: TOML format
/// - `.yaml`: YAML format
/// - `.yml`: YAML format
pub fn load_raw_from_file(path: &Path) -> Result<RawConfig, ConfigFileError> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or(ConfigFileError::NoExtension)?;

    match extension.to_lowercase().as_str() {
        "toml" => load_raw_from_toml(path),
        "yaml" | "yml" => load_raw_from_yaml(path),
        other => Err(ConfigFileError::UnsupportedFormat(other.to_string())),
    }
}

/// Load raw configuration from a mounted ConfigMap volume.
///
/// Every regular file whose name does not start with `.` is a key; its
/// contents, minus trailing line breaks, are the value. Kubelet's `..data`
/// symlink farm is skipped by the same rule.
pub fn load_raw_from_dir(path: &Path) -> Result<RawConfig, ConfigFileError> {
    if !path.is_dir() {
        return Err(ConfigFileError::NotADirectory(path.display().to_string()));
    }

    let mut entries = BTreeMap::new();
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || !entry.path().is_file() {
            continue;
        }
        let value = std::fs::read_to_string(entry.path())?;
        entries.insert(name, value.trim_end_matches(['\n', '\r']).to_string());
    }

    debug!("Read {} keys from {:?}", entries.len(), path);
    Ok(RawConfig::from(entries))
}
