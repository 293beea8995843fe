//! Container specs embedded in runtime container labels.
//!
//! Every container we create carries its full spec, serialized as YAML, in
//! the `a3s.box.compose.config` label. Reading it back gives the "actual"
//! side of a desired-vs-actual diff.
//!
//! # Label Schema
//!
//! - `a3s.box.compose.config` - YAML payload of the container spec
//! - `a3s.box.compose.*` - reserved for internal bookkeeping; never part of
//!   a user-authored spec and stripped on recovery

use std::collections::HashMap;

use crate::error::{ComposeError, Result};
use crate::spec::ContainerSpec;

/// Prefix reserved for internal labels.
pub const RESERVED_PREFIX: &str = "a3s.box.compose.";

/// Label holding the serialized spec.
pub const CONFIG_LABEL: &str = "a3s.box.compose.config";

/// The parts of a runtime container record recovery needs.
#[derive(Debug, Clone, Default)]
pub struct ContainerRecord {
    /// Full container ID
    pub id: String,

    /// Container name as reported by the runtime (e.g. `/shop.web`)
    pub name: String,

    /// Labels attached to the container
    pub labels: HashMap<String, String>,
}

impl ContainerRecord {
    pub fn new(id: &str, name: &str, labels: HashMap<String, String>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            labels,
        }
    }

    /// Short form of the container ID (first 12 characters).
    pub fn short_id(&self) -> String {
        self.id.chars().take(12).collect()
    }
}

/// Recover the spec embedded in a container's labels.
///
/// Fails with `NotManaged` when the config label is missing, and with
/// `MalformedConfig` when its payload does not parse. Reserved labels are
/// stripped from the result.
pub fn recover(container: &ContainerRecord) -> Result<ContainerSpec> {
    let payload = container
        .labels
        .get(CONFIG_LABEL)
        .ok_or_else(|| ComposeError::NotManaged {
            container_id: container.short_id(),
        })?;

    let spec: ContainerSpec =
        serde_yaml::from_str(payload).map_err(|e| ComposeError::MalformedConfig {
            container_name: container.name.clone(),
            message: e.to_string(),
        })?;

    let before = spec.labels.len();
    let spec = scrub(spec);
    tracing::debug!(
        container = %container.name,
        scrubbed = before - spec.labels.len(),
        "Recovered container spec"
    );

    Ok(spec)
}

/// Drop every reserved label from a spec.
pub fn scrub(mut spec: ContainerSpec) -> ContainerSpec {
    spec.labels.retain(|key, _| !is_reserved(key));
    spec
}

/// Whether a label key belongs to internal bookkeeping.
pub fn is_reserved(key: &str) -> bool {
    key.starts_with(RESERVED_PREFIX)
}

/// Build the label set for a new container: the spec's user labels plus
/// the config label carrying the serialized spec.
pub fn embed(spec: &ContainerSpec) -> Result<HashMap<String, String>> {
    let mut labels: HashMap<String, String> = spec
        .labels
        .iter()
        .filter(|(key, _)| !is_reserved(key))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    labels.insert(CONFIG_LABEL.to_string(), spec.to_yaml()?);
    Ok(labels)
}
