//! Docker gateway implementation using bollard

use crate::interrupt::AttachGuard;
use crate::{
    format_port_mappings, ContainerDetails, LogOptions, NetworkInfo, PortInfo, ProviderError,
    Result, RuntimeGateway, StatsSample,
};
use async_trait::async_trait;
use bollard::container::{
    InspectContainerOptions, ListContainersOptions, LogOutput, LogsOptions,
    RestartContainerOptions, Stats, StatsOptions,
};
use bollard::exec::{CreateExecOptions, StartExecOptions, StartExecResults};
use bollard::Docker;
use dockpick_config::RuntimeConfig;
use futures::StreamExt;
use std::collections::BTreeMap;
use std::io::Write;

/// Docker gateway using the bollard crate
pub struct DockerGateway {
    client: Docker,
    /// CLI binary used for attached shells
    cli: String,
}

impl DockerGateway {
    /// Connect to the Docker daemon and verify it responds
    pub async fn new(config: &RuntimeConfig) -> Result<Self> {
        let socket_path = config.socket.as_str();
        let timeout = config.timeout_secs;
        let client = if socket_path.starts_with("http://") || socket_path.starts_with("https://")
        {
            Docker::connect_with_http(socket_path, timeout, bollard::API_DEFAULT_VERSION)
                .map_err(|e| ProviderError::ConnectionError(e.to_string()))?
        } else {
            let path = socket_path.trim_start_matches("unix://");
            Docker::connect_with_socket(path, timeout, bollard::API_DEFAULT_VERSION)
                .map_err(|e| ProviderError::ConnectionError(e.to_string()))?
        };

        // Test connection
        client
            .ping()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            cli: config.cli.clone(),
        })
    }
}

#[async_trait]
impl RuntimeGateway for DockerGateway {
    async fn ping(&self) -> Result<()> {
        self.client
            .ping()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;
        Ok(())
    }

    async fn list_running(&self) -> Result<Vec<String>> {
        let options = ListContainersOptions::<String> {
            all: false,
            ..Default::default()
        };

        let containers = self
            .client
            .list_containers(Some(options))
            .await?;

        Ok(containers
            .into_iter()
            .filter_map(|c| c.names.and_then(|n| n.first().cloned()))
            .map(|name| name.trim_start_matches('/').to_string())
            .collect())
    }

    async fn inspect(&self, name: &str) -> Result<ContainerDetails> {
        tracing::debug!("Inspecting container {}", name);
        let info = self
            .client
            .inspect_container(name, None::<InspectContainerOptions>)
            .await?;

        let state = info.state.as_ref();
        let config = info.config.as_ref();
        let host_config = info.host_config.as_ref();
        let network = info.network_settings.as_ref();

        // Parse ports
        let mut ports = Vec::new();
        if let Some(port_map) = network.and_then(|n| n.ports.as_ref()) {
            for (key, bindings) in port_map {
                let Some((container_port, protocol)) = PortInfo::parse_key(key) else {
                    continue;
                };
                match bindings {
                    Some(bindings) if !bindings.is_empty() => {
                        for binding in bindings {
                            ports.push(PortInfo {
                                container_port,
                                host_port: binding.host_port.as_ref().and_then(|p| p.parse().ok()),
                                protocol: protocol.clone(),
                                host_ip: binding.host_ip.clone(),
                            });
                        }
                    }
                    _ => ports.push(PortInfo {
                        container_port,
                        host_port: None,
                        protocol,
                        host_ip: None,
                    }),
                }
            }
        }
        ports.sort_by(|a, b| {
            (a.container_port, &a.protocol, &a.host_ip).cmp(&(b.container_port, &b.protocol, &b.host_ip))
        });

        let mut exposed_ports: Vec<String> = config
            .and_then(|c| c.exposed_ports.as_ref())
            .map(|p| p.keys().cloned().collect())
            .unwrap_or_default();
        exposed_ports.sort();

        let networks: BTreeMap<String, NetworkInfo> = network
            .and_then(|n| n.networks.as_ref())
            .map(|nets| {
                nets.iter()
                    .map(|(name, net)| {
                        (
                            name.clone(),
                            NetworkInfo {
                                ip_address: net.ip_address.clone().filter(|ip| !ip.is_empty()),
                                gateway: net.gateway.clone().filter(|gw| !gw.is_empty()),
                            },
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();

        // The top-level address is empty on user-defined networks
        let ip_address = network
            .and_then(|n| n.ip_address.clone())
            .filter(|ip| !ip.is_empty())
            .or_else(|| networks.values().find_map(|n| n.ip_address.clone()));

        let started_at = state
            .and_then(|s| s.started_at.as_ref())
            .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.timestamp())
            .filter(|ts| *ts > 0);

        Ok(ContainerDetails {
            name: info
                .name
                .clone()
                .unwrap_or_else(|| name.to_string())
                .trim_start_matches('/')
                .to_string(),
            image: config.and_then(|c| c.image.clone()),
            status: state
                .and_then(|s| s.status)
                .map(|s| format!("{:?}", s).to_lowercase()),
            ip_address,
            started_at,
            ports,
            exposed_ports,
            memory_limit: host_config.and_then(|h| h.memory).filter(|m| *m > 0),
            cpu_limit: host_config.and_then(|h| h.nano_cpus).filter(|c| *c > 0),
            env: config.and_then(|c| c.env.clone()).unwrap_or_default(),
            networks,
        })
    }

    async fn port_mappings(&self, name: &str) -> Result<String> {
        let details = self.inspect(name).await?;
        Ok(format_port_mappings(&details.ports))
    }

    async fn probe_shell(&self, name: &str, shell: &str) -> Result<bool> {
        let options = CreateExecOptions {
            cmd: Some(vec![shell.to_string(), "-c".to_string(), "exit 0".to_string()]),
            attach_stdout: Some(true),
            attach_stderr: Some(true),
            ..Default::default()
        };

        let exec = self
            .client
            .create_exec(name, options)
            .await
            .map_err(|e| ProviderError::ExecError(e.to_string()))?;

        let start_options = StartExecOptions {
            detach: false,
            ..Default::default()
        };

        let result = self
            .client
            .start_exec(&exec.id, Some(start_options))
            .await
            .map_err(|e| ProviderError::ExecError(e.to_string()))?;

        // Drain output so the exec finishes before asking for its exit code
        if let StartExecResults::Attached { mut output, .. } = result {
            while output.next().await.is_some() {}
        }

        let inspect = self
            .client
            .inspect_exec(&exec.id)
            .await
            .map_err(|e| ProviderError::ExecError(e.to_string()))?;
        let exit_code = inspect.exit_code.unwrap_or(-1);
        tracing::debug!("Probe for {} in {} exited with {}", shell, name, exit_code);

        Ok(exit_code == 0)
    }

    async fn exec_interactive(&self, name: &str, shell: &str) -> Result<i64> {
        let _guard = AttachGuard::new();
        let status = tokio::process::Command::new(&self.cli)
            .args(["exec", "-it", name, shell])
            .status()
            .await
            .map_err(|e| {
                ProviderError::ExecError(format!("Failed to spawn {}: {}", self.cli, e))
            })?;

        Ok(status.code().map(i64::from).unwrap_or(-1))
    }

    async fn stream_logs(
        &self,
        name: &str,
        options: &LogOptions,
        out: &mut (dyn Write + Send),
    ) -> Result<()> {
        let guard = AttachGuard::new();
        let logs_options = LogsOptions::<String> {
            follow: options.follow,
            stdout: true,
            stderr: true,
            tail: options.tail.to_string(),
            timestamps: options.timestamps,
            ..Default::default()
        };

        let mut stream = self.client.logs(name, Some(logs_options));
        let interrupted = guard.interrupted();
        tokio::pin!(interrupted);

        loop {
            tokio::select! {
                chunk = stream.next() => match chunk {
                    Some(Ok(output)) => {
                        out.write_all(log_output_bytes(&output))?;
                        out.flush()?;
                    }
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                },
                _ = &mut interrupted => {
                    tracing::debug!("Log stream for {} interrupted", name);
                    break;
                }
            }
        }

        Ok(())
    }

    async fn stream_stats(&self, name: &str, out: &mut (dyn Write + Send)) -> Result<()> {
        let guard = AttachGuard::new();
        let options = StatsOptions {
            stream: true,
            one_shot: false,
        };

        let mut stream = self.client.stats(name, Some(options));
        let interrupted = guard.interrupted();
        tokio::pin!(interrupted);

        loop {
            tokio::select! {
                sample = stream.next() => match sample {
                    Some(Ok(stats)) => {
                        writeln!(out, "{}", stats_sample(&stats).render_line(name))?;
                        out.flush()?;
                    }
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                },
                _ = &mut interrupted => {
                    tracing::debug!("Stats stream for {} interrupted", name);
                    break;
                }
            }
        }

        Ok(())
    }

    async fn restart(&self, name: &str) -> Result<()> {
        tracing::debug!("Restarting container {}", name);
        self.client
            .restart_container(name, None::<RestartContainerOptions>)
            .await?;
        Ok(())
    }
}

fn log_output_bytes(output: &LogOutput) -> &[u8] {
    match output {
        LogOutput::StdOut { message }
        | LogOutput::StdErr { message }
        | LogOutput::StdIn { message }
        | LogOutput::Console { message } => message.as_ref(),
    }
}

/// Reduce a raw stats frame to the figures shown in the live view
fn stats_sample(stats: &Stats) -> StatsSample {
    let cpu_delta = stats
        .cpu_stats
        .cpu_usage
        .total_usage
        .saturating_sub(stats.precpu_stats.cpu_usage.total_usage);
    let system_delta = stats
        .cpu_stats
        .system_cpu_usage
        .unwrap_or(0)
        .saturating_sub(stats.precpu_stats.system_cpu_usage.unwrap_or(0));

    let cpu_percent = if system_delta > 0 && cpu_delta > 0 {
        let num_cpus = stats.cpu_stats.online_cpus.unwrap_or_else(|| {
            stats
                .cpu_stats
                .cpu_usage
                .percpu_usage
                .as_ref()
                .map(|p| p.len() as u64)
                .unwrap_or(1)
        });
        (cpu_delta as f64 / system_delta as f64) * num_cpus as f64 * 100.0
    } else {
        0.0
    };

    let (net_rx, net_tx) = stats
        .networks
        .as_ref()
        .map(|nets| {
            nets.values()
                .fold((0, 0), |(rx, tx), n| (rx + n.rx_bytes, tx + n.tx_bytes))
        })
        .unwrap_or((0, 0));

    StatsSample {
        cpu_percent,
        memory_usage: stats.memory_stats.usage.unwrap_or(0),
        memory_limit: stats.memory_stats.limit.unwrap_or(0),
        net_rx,
        net_tx,
    }
}
