//! A3S Box Compose - Declarative Container Specs
//!
//! Translates declarative container specs into container engine API
//! configuration (`Config` + `HostConfig`), and recovers specs from the
//! labels of containers that were created from them.

/// Implement serde for a type through its `Display`/`FromStr` string form.
macro_rules! string_serde {
    ($ty:ty) => {
        impl serde::Serialize for $ty {
            fn serialize<S: serde::Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(
                deserializer: D,
            ) -> std::result::Result<Self, D::Error> {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

pub mod api;
pub mod config;
mod convert;
pub mod error;
pub mod labels;
pub mod log;
pub mod memory;
pub mod network;
pub mod port;
pub mod reference;
pub mod restart;
pub mod spec;
pub mod ulimit;
pub mod volume;

// Re-export commonly used types
pub use api::{HostConfig, RunConfig};
pub use config::ConvertConfig;
pub use error::{ComposeError, Result};
pub use labels::{ContainerRecord, CONFIG_LABEL, RESERVED_PREFIX};
pub use spec::{ContainerSpec, ContainerState};

/// A3S Box Compose version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
