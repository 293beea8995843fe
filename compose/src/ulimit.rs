//! Resource limits (`ulimit`) applied to the container process.

use serde::{Deserialize, Serialize};

use crate::api;

/// A single ulimit entry, e.g. `{name: nofile, soft: 1024, hard: 2048}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ulimit {
    pub name: String,
    pub soft: i64,
    pub hard: i64,
}

impl Ulimit {
    pub fn new(name: &str, soft: i64, hard: i64) -> Self {
        Self {
            name: name.to_string(),
            soft,
            hard,
        }
    }

    /// Engine API representation.
    pub fn to_api(&self) -> api::Ulimit {
        api::Ulimit {
            name: self.name.clone(),
            soft: self.soft,
            hard: self.hard,
        }
    }
}
