//! Published port records and port key normalization.
//!
//! A publish record is written as `[[HOST_IP:]HOST_PORT:]PORT[/PROTO]`:
//! - `80` publishes container port 80/tcp on a random host port
//! - `8080:80` publishes it on host port 8080, all interfaces
//! - `127.0.0.1:8080:80/udp` binds a single host address
//! - `[::1]:8080:80` binds an IPv6 host address

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const DEFAULT_PROTO: &str = "tcp";
const PROTOCOLS: &[&str] = &["tcp", "udp", "sctp"];

/// Normalize a container port into the runtime's `PORT/PROTO` key form.
///
/// Ports without a protocol are assumed to be TCP.
pub fn port_key(port: &str) -> String {
    let port = port.trim();
    if port.contains('/') {
        port.to_string()
    } else {
        format!("{port}/{DEFAULT_PROTO}")
    }
}

/// A single port publish record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PortBinding {
    /// Container port in `PORT/PROTO` form
    pub port: String,
    /// Host address to bind (empty = all interfaces)
    pub host_ip: String,
    /// Host port (empty = runtime picks one)
    pub host_port: String,
}

impl PortBinding {
    pub fn new(port: &str, host_ip: &str, host_port: &str) -> Self {
        Self {
            port: port_key(port),
            host_ip: host_ip.to_string(),
            host_port: host_port.to_string(),
        }
    }
}

impl fmt::Display for PortBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host_ip.contains(':') {
            write!(f, "[{}]:{}:{}", self.host_ip, self.host_port, self.port)
        } else if !self.host_ip.is_empty() {
            write!(f, "{}:{}:{}", self.host_ip, self.host_port, self.port)
        } else if !self.host_port.is_empty() {
            write!(f, "{}:{}", self.host_port, self.port)
        } else {
            write!(f, "{}", self.port)
        }
    }
}

impl FromStr for PortBinding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        // Split from the right: an IPv6 host address carries its own colons.
        let parts: Vec<&str> = s.trim().rsplitn(3, ':').collect();
        let (host_ip, host_port, port) = match parts.as_slice() {
            [port] => ("", "", *port),
            [port, host_port] => ("", *host_port, *port),
            [port, host_port, host_ip] => (*host_ip, *host_port, *port),
            _ => return Err(format!("invalid port binding: '{}'", s)),
        };
        let host_ip = host_ip
            .strip_prefix('[')
            .and_then(|ip| ip.strip_suffix(']'))
            .unwrap_or(host_ip);
        if host_ip.contains(['[', ']']) {
            return Err(format!("invalid port binding '{}': bad host address", s));
        }

        validate_container_port(port).map_err(|e| format!("invalid port binding '{}': {}", s, e))?;
        if !host_port.is_empty() && host_port.parse::<u16>().is_err() {
            return Err(format!(
                "invalid port binding '{}': host port '{}' is not a number",
                s, host_port
            ));
        }

        Ok(Self::new(port, host_ip, host_port))
    }
}

fn validate_container_port(port: &str) -> std::result::Result<(), String> {
    let (number, proto) = port.split_once('/').unwrap_or((port, DEFAULT_PROTO));
    if number.parse::<u16>().is_err() {
        return Err(format!("container port '{}' is not a number", number));
    }
    if !PROTOCOLS.contains(&proto) {
        return Err(format!(
            "unknown protocol '{}' (supported: tcp, udp, sctp)",
            proto
        ));
    }
    Ok(())
}

impl Serialize for PortBinding {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PortBinding {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct PortVisitor;

        impl<'de> de::Visitor<'de> for PortVisitor {
            type Value = PortBinding;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a port binding such as \"8080:80/tcp\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
                v.to_string().parse().map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
                v.to_string().parse().map_err(E::custom)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(PortVisitor)
    }
}
