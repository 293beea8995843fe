//! Declarative container specification.
//!
//! This is the operator-facing description of a container, written in YAML:
//!
//! ```yaml
//! image: nginx:1.25
//! state: running
//! memory: 512m
//! env:
//!   TZ: UTC
//! ports:
//!   - "8080:80"
//! volumes:
//!   - /var/cache/nginx
//!   - /srv/www:/usr/share/nginx/html:ro
//! ```
//!
//! Scalars are `Option`s so that "not specified" stays distinct from an
//! explicit zero, `false` or empty value. Lists are plain `Vec`s; an empty
//! list means the same as an absent one.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Result;
use crate::labels::{self, ContainerRecord};
use crate::memory::ConfigMemory;
use crate::network::NetworkMode;
use crate::port::PortBinding;
use crate::reference::{ContainerName, Link};
use crate::restart::RestartPolicy;
use crate::ulimit::Ulimit;

/// Declarative container specification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Accepts a list or a whitespace-separated string
    #[serde(
        default,
        deserialize_with = "string_or_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub entrypoint: Option<Vec<String>>,

    #[serde(
        default,
        alias = "command",
        deserialize_with = "string_or_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub cmd: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domainname: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workdir: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Accepts a mapping or a list of `KEY=VALUE`
    #[serde(
        default,
        deserialize_with = "env_map_or_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub env: Option<HashMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<ConfigMemory>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_swap: Option<ConfigMemory>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpuset_cpus: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_shares: Option<i64>,

    /// Ports exposed but not published
    #[serde(
        default,
        deserialize_with = "port_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub expose: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<PortBinding>,

    /// `PATH` or `SOURCE:TARGET[:MODE]`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes_from: Vec<ContainerName>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net: Option<NetworkMode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_disabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,

    /// Extra `host:ip` entries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub add_host: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dns: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uts: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ContainerState>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart: Option<RestartPolicy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privileged: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_all_ports: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_driver: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_opt: Option<HashMap<String, String>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ulimits: Vec<Ulimit>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
}

impl ContainerSpec {
    /// Parse a single container spec from YAML.
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Serialize to YAML (the form embedded in container labels).
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Recover the spec embedded on a running container.
    pub fn from_container(container: &ContainerRecord) -> Result<Self> {
        labels::recover(container)
    }

    /// Whether the container is meant to keep running.
    pub fn is_running(&self) -> bool {
        self.state.map(|s| s.is_running()).unwrap_or(false)
    }
}

/// Desired state of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContainerState {
    /// Started and kept running.
    #[default]
    Running,
    /// Created but never started.
    Created,
    /// Started once, expected to exit (jobs, data containers).
    Ran,
}

impl ContainerState {
    pub fn is_running(&self) -> bool {
        matches!(self, ContainerState::Running)
    }
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerState::Running => write!(f, "running"),
            ContainerState::Created => write!(f, "created"),
            ContainerState::Ran => write!(f, "ran"),
        }
    }
}

impl FromStr for ContainerState {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "running" | "true" => Ok(ContainerState::Running),
            "created" | "false" => Ok(ContainerState::Created),
            "ran" => Ok(ContainerState::Ran),
            other => Err(format!(
                "unknown container state: '{}' (supported: running, created, ran)",
                other
            )),
        }
    }
}

impl Serialize for ContainerState {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ContainerState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct StateVisitor;

        impl<'de> de::Visitor<'de> for StateVisitor {
            type Value = ContainerState;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a container state (running, created, ran) or a bool")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Self::Value, E> {
                Ok(if v {
                    ContainerState::Running
                } else {
                    ContainerState::Created
                })
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(StateVisitor)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrList {
    String(String),
    List(Vec<String>),
}

fn string_or_list<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<StringOrList>::deserialize(deserializer)?.map(|value| match value {
            StringOrList::String(s) => s.split_whitespace().map(String::from).collect(),
            StringOrList::List(list) => list,
        }),
    )
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PortValue {
    String(String),
    Number(u16),
}

fn port_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Vec::<PortValue>::deserialize(deserializer)?
        .into_iter()
        .map(|port| match port {
            PortValue::String(s) => s,
            PortValue::Number(n) => n.to_string(),
        })
        .collect())
}

/// Env maps keep each value's scalar text as written; a null value is `""`.
fn env_map_or_list<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<HashMap<String, String>>, D::Error>
where
    D: Deserializer<'de>,
{
    struct EnvVisitor;

    impl<'de> de::Visitor<'de> for EnvVisitor {
        type Value = Option<HashMap<String, String>>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a mapping of variables or a list of KEY=VALUE")
        }

        fn visit_none<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2: Deserializer<'de>>(
            self,
            deserializer: D2,
        ) -> std::result::Result<Self::Value, D2::Error> {
            deserializer.deserialize_any(self)
        }

        fn visit_map<A: de::MapAccess<'de>>(
            self,
            mut map: A,
        ) -> std::result::Result<Self::Value, A::Error> {
            let mut env = HashMap::new();
            while let Some(key) = map.next_key::<String>()? {
                let value = map.next_value::<Option<String>>()?;
                env.insert(key, value.unwrap_or_default());
            }
            Ok(Some(env))
        }

        fn visit_seq<A: de::SeqAccess<'de>>(
            self,
            mut seq: A,
        ) -> std::result::Result<Self::Value, A::Error> {
            let mut env = HashMap::new();
            while let Some(var) = seq.next_element::<String>()? {
                let (key, value) = var.split_once('=').ok_or_else(|| {
                    <A::Error as de::Error>::custom(format!(
                        "Invalid environment variable (expected KEY=VALUE): {var}"
                    ))
                })?;
                env.insert(key.to_string(), value.to_string());
            }
            Ok(Some(env))
        }
    }

    deserializer.deserialize_option(EnvVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_spec() {
        let spec = ContainerSpec::from_yaml("{}").unwrap();
        assert_eq!(spec, ContainerSpec::default());
        assert!(!spec.is_running());
    }

    #[test]
    fn test_explicit_zero_is_not_absent() {
        let spec = ContainerSpec::from_yaml("cpu_shares: 0\nprivileged: false\n").unwrap();
        assert_eq!(spec.cpu_shares, Some(0));
        assert_eq!(spec.privileged, Some(false));
        assert_eq!(spec.publish_all_ports, None);
    }

    #[test]
    fn test_cmd_string_or_list() {
        let spec = ContainerSpec::from_yaml("cmd: nginx -g 'daemon off;'").unwrap();
        assert_eq!(
            spec.cmd.unwrap(),
            vec!["nginx", "-g", "'daemon", "off;'"]
        );

        let spec = ContainerSpec::from_yaml("command: [\"sleep\", \"10\"]").unwrap();
        assert_eq!(spec.cmd.unwrap(), vec!["sleep", "10"]);

        let spec = ContainerSpec::from_yaml("entrypoint: []").unwrap();
        assert_eq!(spec.entrypoint, Some(vec![]));
    }

    #[test]
    fn test_env_map_with_scalars() {
        let spec = ContainerSpec::from_yaml("env:\n  PORT: 8080\n  DEBUG: true\n  NAME: web\n").unwrap();
        let env = spec.env.unwrap();
        assert_eq!(env.get("PORT").unwrap(), "8080");
        assert_eq!(env.get("DEBUG").unwrap(), "true");
        assert_eq!(env.get("NAME").unwrap(), "web");
    }

    #[test]
    fn test_env_map_keeps_scalar_text() {
        let spec =
            ContainerSpec::from_yaml("env:\n  VERSION: 1.10\n  HEX: 0x10\n  EMPTY:\n").unwrap();
        let env = spec.env.as_ref().unwrap();
        assert_eq!(env.get("VERSION").unwrap(), "1.10");
        assert_eq!(env.get("HEX").unwrap(), "0x10");
        assert_eq!(env.get("EMPTY").unwrap(), "");

        let reparsed = ContainerSpec::from_yaml(&spec.to_yaml().unwrap()).unwrap();
        assert_eq!(reparsed, spec);
    }

    #[test]
    fn test_env_null_is_absent() {
        let spec = ContainerSpec::from_yaml("env: ~\nimage: x\n").unwrap();
        assert_eq!(spec.env, None);
    }

    #[test]
    fn test_expose_numbers_and_strings() {
        let spec = ContainerSpec::from_yaml("expose: [80, \"53/udp\"]").unwrap();
        assert_eq!(spec.expose, vec!["80", "53/udp"]);
    }

    #[test]
    fn test_env_list() {
        let spec = ContainerSpec::from_yaml("env:\n  - A=1\n  - B=x=y\n").unwrap();
        let env = spec.env.unwrap();
        assert_eq!(env.get("A").unwrap(), "1");
        assert_eq!(env.get("B").unwrap(), "x=y");
    }

    #[test]
    fn test_env_list_requires_equals() {
        assert!(ContainerSpec::from_yaml("env:\n  - NOVALUE\n").is_err());
    }

    #[test]
    fn test_state_forms() {
        let spec = ContainerSpec::from_yaml("state: running").unwrap();
        assert!(spec.is_running());

        let spec = ContainerSpec::from_yaml("state: true").unwrap();
        assert_eq!(spec.state, Some(ContainerState::Running));

        let spec = ContainerSpec::from_yaml("state: false").unwrap();
        assert_eq!(spec.state, Some(ContainerState::Created));
        assert!(!spec.is_running());

        let spec = ContainerSpec::from_yaml("state: ran").unwrap();
        assert!(!spec.is_running());

        assert!(ContainerSpec::from_yaml("state: paused").is_err());
    }

    #[test]
    fn test_typed_fields() {
        let yaml = r#"
image: redis:7
memory: 256m
memory_swap: -1
restart: on-failure,3
net: container:cache.proxy
links: ["cache.db:db"]
volumes_from: [cache.data]
ports: ["6379", "127.0.0.1:16379:6379"]
ulimits:
  - name: nofile
    soft: 1024
    hard: 4096
"#;
        let spec = ContainerSpec::from_yaml(yaml).unwrap();
        assert_eq!(spec.memory.unwrap().bytes(), 256 * 1024 * 1024);
        assert_eq!(spec.memory_swap.unwrap().bytes(), -1);
        assert_eq!(spec.restart, Some(RestartPolicy::on_failure(3)));
        assert_eq!(spec.net.unwrap().to_string(), "container:cache.proxy");
        assert_eq!(spec.links[0].to_string(), "cache.db:db");
        assert_eq!(spec.volumes_from[0].to_string(), "cache.data");
        assert_eq!(spec.ports.len(), 2);
        assert_eq!(spec.ulimits[0], Ulimit::new("nofile", 1024, 4096));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let yaml = r#"
image: app:1.0
cmd: [serve, --port, "80"]
env: {MODE: prod}
memory: 1g
state: running
log_opt: {max-size: 10m}
labels: {team: web}
"#;
        let spec = ContainerSpec::from_yaml(yaml).unwrap();
        let reparsed = ContainerSpec::from_yaml(&spec.to_yaml().unwrap()).unwrap();
        assert_eq!(spec, reparsed);
    }

    #[test]
    fn test_absent_fields_not_serialized() {
        let spec = ContainerSpec {
            image: Some("busybox".to_string()),
            ..Default::default()
        };
        assert_eq!(spec.to_yaml().unwrap().trim(), "image: busybox");
    }
}
