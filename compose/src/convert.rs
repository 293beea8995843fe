//! Project a container spec onto the engine's `Config` and `HostConfig`.
//!
//! Both projections are total: every spec produces a config, and anything
//! the spec leaves unset stays unset in the output.

use std::collections::BTreeMap;

use crate::api::{self, Empty, HostConfig, RunConfig};
use crate::config::ConvertConfig;
use crate::port::port_key;
use crate::spec::ContainerSpec;
use crate::{log, restart, volume};

impl ContainerSpec {
    /// Build the process/launch configuration.
    pub fn run_config(&self) -> RunConfig {
        let config = RunConfig {
            image: self.image.clone(),
            cmd: self.cmd.clone(),
            entrypoint: self.entrypoint.clone(),
            working_dir: self.workdir.clone(),
            user: self.user.clone(),
            hostname: self.hostname.clone(),
            domainname: self.domainname.clone(),
            memory: self.memory.map(|m| m.bytes()),
            memory_swap: self.memory_swap.map(|m| m.bytes()),
            cpuset: self.cpuset_cpus.clone(),
            cpu_shares: self.cpu_shares,
            network_disabled: self.network_disabled,
            exposed_ports: self.exposed_ports(),
            env: self.env_list(),
            volumes: non_empty(
                volume::anonymous(&self.volumes)
                    .map(|v| (v.clone(), Empty {}))
                    .collect::<BTreeMap<_, _>>(),
            ),
            labels: non_empty(
                self.labels
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect::<BTreeMap<_, _>>(),
            ),
        };
        tracing::trace!(image = ?config.image, "Projected run config");
        config
    }

    /// Build the host-resource configuration with the default
    /// log and restart settings.
    pub fn host_config(&self) -> HostConfig {
        self.host_config_with(&ConvertConfig::default())
    }

    /// Build the host-resource configuration, taking defaults from `defaults`.
    pub fn host_config_with(&self, defaults: &ConvertConfig) -> HostConfig {
        let config = HostConfig {
            binds: non_empty(volume::binds(&self.volumes).cloned().collect::<Vec<_>>()),
            port_bindings: self.port_bindings(),
            links: non_empty(self.links.iter().map(|l| l.to_string()).collect::<Vec<_>>()),
            volumes_from: non_empty(
                self.volumes_from
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>(),
            ),
            publish_all_ports: self.publish_all_ports,
            privileged: self.privileged,
            dns: non_empty(self.dns.clone()),
            extra_hosts: non_empty(self.add_host.clone()),
            network_mode: self.net.as_ref().map(|n| n.to_string()),
            pid_mode: self.pid.clone(),
            uts_mode: self.uts.clone(),
            restart_policy: restart::resolve(
                self.restart.as_ref(),
                self.is_running(),
                &defaults.restart_when_running,
            )
            .map(|policy| policy.to_api()),
            memory: self.memory.map(|m| m.bytes()),
            memory_swap: self.memory_swap.map(|m| m.bytes()),
            cpuset_cpus: self.cpuset_cpus.clone(),
            log_config: Some(log::resolve(
                self.log_driver.as_deref(),
                self.log_opt.as_ref(),
                &defaults.log_driver,
                &defaults.log_options,
            )),
            ulimits: non_empty(self.ulimits.iter().map(|u| u.to_api()).collect::<Vec<_>>()),
        };
        tracing::trace!(
            binds = config.binds.as_ref().map_or(0, Vec::len),
            ports = config.port_bindings.as_ref().map_or(0, BTreeMap::len),
            "Projected host config"
        );
        config
    }

    /// Declared-exposed ports plus every published container port.
    fn exposed_ports(&self) -> Option<BTreeMap<String, Empty>> {
        let ports = self
            .expose
            .iter()
            .map(|p| port_key(p))
            .chain(self.ports.iter().map(|p| port_key(&p.port)))
            .map(|p| (p, Empty {}))
            .collect::<BTreeMap<_, _>>();
        non_empty(ports)
    }

    fn env_list(&self) -> Option<Vec<String>> {
        self.env.as_ref().map(|env| {
            let mut vars: Vec<(&String, &String)> = env.iter().collect();
            vars.sort();
            vars.into_iter().map(|(k, v)| format!("{k}={v}")).collect()
        })
    }

    /// Publish records grouped by container port, in declaration order.
    fn port_bindings(&self) -> Option<BTreeMap<String, Vec<api::PortBinding>>> {
        let mut bindings: BTreeMap<String, Vec<api::PortBinding>> = BTreeMap::new();
        for port in &self.ports {
            bindings
                .entry(port_key(&port.port))
                .or_default()
                .push(api::PortBinding {
                    host_ip: port.host_ip.clone(),
                    host_port: port.host_port.clone(),
                });
        }
        non_empty(bindings)
    }
}

trait IsEmpty {
    fn is_empty(&self) -> bool;
}

impl<T> IsEmpty for Vec<T> {
    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }
}

impl<K, V> IsEmpty for BTreeMap<K, V> {
    fn is_empty(&self) -> bool {
        BTreeMap::is_empty(self)
    }
}

fn non_empty<T: IsEmpty>(value: T) -> Option<T> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
