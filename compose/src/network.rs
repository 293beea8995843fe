//! Network mode of a container.

use std::fmt;
use std::str::FromStr;

use crate::reference::ContainerName;

/// Network mode for a container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum NetworkMode {
    /// Default bridge network.
    #[default]
    Bridge,

    /// Share the host's network stack.
    Host,

    /// No networking at all.
    None,

    /// Join the network namespace of another container.
    Container(ContainerName),

    /// User-defined network, by name. Build it with [`NetworkMode::network`]
    /// so the name cannot collide with a built-in mode.
    Network(String),
}

impl NetworkMode {
    /// A user-defined network mode, rejecting names the string form would
    /// read back as something else.
    pub fn network(name: &str) -> std::result::Result<Self, String> {
        match name {
            "" => Err("empty network name".to_string()),
            "bridge" | "host" | "none" => Err(format!(
                "network name '{}' is reserved for the built-in mode",
                name
            )),
            _ if name.starts_with("container:") || name.trim() != name => {
                Err(format!("invalid network name: '{}'", name))
            }
            _ => Ok(NetworkMode::Network(name.to_string())),
        }
    }
}

impl fmt::Display for NetworkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkMode::Bridge => write!(f, "bridge"),
            NetworkMode::Host => write!(f, "host"),
            NetworkMode::None => write!(f, "none"),
            NetworkMode::Container(name) => write!(f, "container:{}", name),
            NetworkMode::Network(network) => write!(f, "{}", network),
        }
    }
}

impl FromStr for NetworkMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "" => Err("empty network mode".to_string()),
            "bridge" => Ok(NetworkMode::Bridge),
            "host" => Ok(NetworkMode::Host),
            "none" => Ok(NetworkMode::None),
            other => match other.strip_prefix("container:") {
                Some(name) => name
                    .parse()
                    .map(NetworkMode::Container)
                    .map_err(|e| format!("invalid network mode '{}': {}", other, e)),
                None => NetworkMode::network(other),
            },
        }
    }
}

string_serde!(NetworkMode);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_builtin_modes() {
        assert_eq!("bridge".parse::<NetworkMode>().unwrap(), NetworkMode::Bridge);
        assert_eq!("host".parse::<NetworkMode>().unwrap(), NetworkMode::Host);
        assert_eq!("none".parse::<NetworkMode>().unwrap(), NetworkMode::None);
    }

    #[test]
    fn test_parse_container_mode() {
        let mode: NetworkMode = "container:shop.proxy".parse().unwrap();
        assert_eq!(
            mode,
            NetworkMode::Container(ContainerName::new("shop", "proxy").unwrap())
        );
        assert_eq!(mode.to_string(), "container:shop.proxy");
    }

    #[test]
    fn test_parse_custom_network() {
        let mode: NetworkMode = "backend".parse().unwrap();
        assert_eq!(mode, NetworkMode::Network("backend".to_string()));
        assert_eq!(mode.to_string(), "backend");
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<NetworkMode>().is_err());
        assert!("container:".parse::<NetworkMode>().is_err());
    }

    #[test]
    fn test_network_constructor_rejects_builtin_names() {
        assert!(NetworkMode::network("host").is_err());
        assert!(NetworkMode::network("bridge").is_err());
        assert!(NetworkMode::network("none").is_err());
        assert!(NetworkMode::network("container:web").is_err());
        assert!(NetworkMode::network("").is_err());
    }

    #[test]
    fn test_network_constructor_roundtrips() {
        let mode = NetworkMode::network("backend").unwrap();
        assert_eq!(mode.to_string().parse::<NetworkMode>().unwrap(), mode);
    }

    #[test]
    fn test_default_is_bridge() {
        assert_eq!(NetworkMode::default().to_string(), "bridge");
    }
}
