//! Restart policy parsing and default resolution.

use std::fmt;
use std::str::FromStr;

use crate::api;

/// Restart policy of a container.
///
/// Written as `no`, `always`, `unless-stopped`, `on-failure` or
/// `on-failure,N` (`on-failure:N` is accepted too). A retry count of 0
/// means unlimited.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RestartPolicy {
    pub name: RestartPolicyName,
    pub maximum_retry_count: i64,
}

/// Restart policy kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RestartPolicyName {
    No,
    Always,
    UnlessStopped,
    OnFailure,
}

impl RestartPolicyName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::No => "no",
            Self::Always => "always",
            Self::UnlessStopped => "unless-stopped",
            Self::OnFailure => "on-failure",
        }
    }
}

impl fmt::Display for RestartPolicyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RestartPolicy {
    pub fn always() -> Self {
        Self {
            name: RestartPolicyName::Always,
            maximum_retry_count: 0,
        }
    }

    pub fn on_failure(maximum_retry_count: i64) -> Self {
        Self {
            name: RestartPolicyName::OnFailure,
            maximum_retry_count,
        }
    }

    /// Engine API representation.
    pub fn to_api(&self) -> api::RestartPolicy {
        api::RestartPolicy {
            name: self.name.as_str().to_string(),
            maximum_retry_count: self.maximum_retry_count,
        }
    }
}

impl Default for RestartPolicy {
    fn default() -> Self {
        Self {
            name: RestartPolicyName::No,
            maximum_retry_count: 0,
        }
    }
}

impl fmt::Display for RestartPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name == RestartPolicyName::OnFailure && self.maximum_retry_count > 0 {
            write!(f, "{},{}", self.name, self.maximum_retry_count)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

impl FromStr for RestartPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let (name, retries) = match s.split_once([',', ':']) {
            Some((name, retries)) => (name, Some(retries)),
            None => (s, None),
        };

        let name = match name {
            "no" => RestartPolicyName::No,
            "always" => RestartPolicyName::Always,
            "unless-stopped" => RestartPolicyName::UnlessStopped,
            "on-failure" => RestartPolicyName::OnFailure,
            other => {
                return Err(format!(
                    "unknown restart policy: '{}' (supported: no, always, unless-stopped, on-failure[,N])",
                    other
                ))
            }
        };

        let maximum_retry_count = match retries {
            None => 0,
            Some(_) if name != RestartPolicyName::OnFailure => {
                return Err(format!(
                    "restart policy '{}' does not take a retry count",
                    name
                ))
            }
            Some(n) => n
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|n| *n >= 0)
                .ok_or_else(|| format!("invalid restart retry count: '{}'", n))?,
        };

        Ok(Self {
            name,
            maximum_retry_count,
        })
    }
}

string_serde!(RestartPolicy);

/// Resolve the effective restart policy.
///
/// An explicit policy always wins. Without one, a container that is meant to
/// keep running gets `running_default`; anything else gets no policy.
pub fn resolve(
    explicit: Option<&RestartPolicy>,
    running: bool,
    running_default: &RestartPolicy,
) -> Option<RestartPolicy> {
    match explicit {
        Some(policy) => Some(policy.clone()),
        None if running => Some(running_default.clone()),
        None => None,
    }
}
