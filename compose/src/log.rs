//! Logging driver defaults and resolution.

use std::collections::{BTreeMap, HashMap};

use crate::api;

/// Docker-compatible JSON lines driver, used when nothing else is chosen.
pub const DEFAULT_LOG_DRIVER: &str = "json-file";

/// Rotation applied to the default driver: 5 files of 100 MB each.
pub const DEFAULT_MAX_FILE: &str = "5";
pub const DEFAULT_MAX_SIZE: &str = "100m";

/// Default rotation options for the default driver.
pub fn default_options() -> HashMap<String, String> {
    HashMap::from([
        ("max-file".to_string(), DEFAULT_MAX_FILE.to_string()),
        ("max-size".to_string(), DEFAULT_MAX_SIZE.to_string()),
    ])
}

/// Resolve the effective log configuration.
///
/// An explicit driver and explicit options are always used as given.
/// Defaults only fill what was omitted:
/// - neither set: `default_driver` with `default_options`
/// - only options set: `default_driver` with those options
/// - only driver set: that driver, no options
pub fn resolve(
    driver: Option<&str>,
    options: Option<&HashMap<String, String>>,
    default_driver: &str,
    default_options: &HashMap<String, String>,
) -> api::LogConfig {
    let log_type = driver.unwrap_or(default_driver).to_string();
    let config = match (driver, options) {
        (_, Some(options)) => Some(sorted(options)),
        (None, None) => Some(sorted(default_options)),
        (Some(_), None) => None,
    };
    api::LogConfig { log_type, config }
}

fn sorted(options: &HashMap<String, String>) -> BTreeMap<String, String> {
    options
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_default(
        driver: Option<&str>,
        options: Option<&HashMap<String, String>>,
    ) -> api::LogConfig {
        resolve(driver, options, DEFAULT_LOG_DRIVER, &default_options())
    }

    #[test]
    fn test_nothing_set_uses_rotating_json_file() {
        let config = resolve_default(None, None);
        assert_eq!(config.log_type, "json-file");
        let options = config.config.unwrap();
        assert_eq!(options.get("max-file").unwrap(), "5");
        assert_eq!(options.get("max-size").unwrap(), "100m");
        assert_eq!(options.len(), 2);
    }

    #[test]
    fn test_driver_only() {
        let config = resolve_default(Some("syslog"), None);
        assert_eq!(config.log_type, "syslog");
        assert!(config.config.is_none());
    }

    #[test]
    fn test_options_only_targets_default_driver() {
        let options = HashMap::from([("max-size".to_string(), "10m".to_string())]);
        let config = resolve_default(None, Some(&options));
        assert_eq!(config.log_type, "json-file");
        let resolved = config.config.unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved.get("max-size").unwrap(), "10m");
    }

    #[test]
    fn test_driver_and_options() {
        let options = HashMap::from([("tag".to_string(), "web".to_string())]);
        let config = resolve_default(Some("journald"), Some(&options));
        assert_eq!(config.log_type, "journald");
        assert_eq!(config.config.unwrap().get("tag").unwrap(), "web");
    }

    #[test]
    fn test_explicit_empty_options_override_defaults() {
        let options = HashMap::new();
        let config = resolve_default(None, Some(&options));
        assert_eq!(config.log_type, "json-file");
        assert!(config.config.unwrap().is_empty());
    }
}
