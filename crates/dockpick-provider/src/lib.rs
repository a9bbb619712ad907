//! Container runtime gateway for dockpick
//!
//! This crate provides a thin abstraction over the local container runtime:
//! listing running containers, inspecting them, and the attached actions
//! (shell, log and stats streams, restart).

mod docker;
mod error;
pub mod interrupt;
mod types;

pub use docker::DockerGateway;
pub use error::*;
pub use types::*;

use async_trait::async_trait;
use std::io::Write;

/// Trait for container runtime gateways
#[async_trait]
pub trait RuntimeGateway: Send + Sync {
    /// Check that the runtime is reachable
    async fn ping(&self) -> Result<()>;

    /// Names of the running containers, in runtime order
    async fn list_running(&self) -> Result<Vec<String>>;

    /// Get detailed information about a container
    async fn inspect(&self, name: &str) -> Result<ContainerDetails>;

    /// Published port mappings, one `docker port` style line per binding
    async fn port_mappings(&self, name: &str) -> Result<String>;

    /// Whether `shell` exists inside the container
    async fn probe_shell(&self, name: &str, shell: &str) -> Result<bool>;

    /// Attach an interactive shell; returns its exit status
    async fn exec_interactive(&self, name: &str, shell: &str) -> Result<i64>;

    /// Write container logs to `out`. With `follow` this blocks until interrupted.
    async fn stream_logs(
        &self,
        name: &str,
        options: &LogOptions,
        out: &mut (dyn Write + Send),
    ) -> Result<()>;

    /// Write live resource usage to `out` until interrupted
    async fn stream_stats(&self, name: &str, out: &mut (dyn Write + Send)) -> Result<()>;

    /// Restart a container
    async fn restart(&self, name: &str) -> Result<()>;
}

/// Create the gateway described by the runtime section of the config
pub async fn create_gateway(config: &dockpick_config::Config) -> Result<Box<dyn RuntimeGateway>> {
    let socket = &config.runtime.socket;
    match DockerGateway::new(&config.runtime).await {
        Ok(gateway) => Ok(Box::new(gateway)),
        Err(e) => {
            let socket_exists = std::path::Path::new(socket.trim_start_matches("unix://")).exists();
            Err(ProviderError::ConnectionError(format_connection_error(
                socket,
                socket_exists,
                &e,
            )))
        }
    }
}

/// Format a helpful connection error message with actionable instructions
fn format_connection_error(socket_path: &str, socket_exists: bool, underlying: &ProviderError) -> String {
    let mut msg = String::from("Cannot connect to Docker\n\n");

    if !socket_exists && !socket_path.starts_with("http") {
        msg.push_str(&format!(
            "The Docker API socket was not found at:\n  {}\n\n",
            socket_path
        ));
        msg.push_str("To start Docker, run:\n");
        msg.push_str("  sudo systemctl enable --now docker\n");
    } else {
        msg.push_str(&format!(
            "The daemon at {} is not responding.\n\n",
            socket_path
        ));
        msg.push_str(&format!("Underlying error: {}\n", underlying));
    }

    msg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_error_missing_socket() {
        let err = ProviderError::ConnectionError("no such file".into());
        let msg = format_connection_error("/nonexistent/docker.sock", false, &err);
        assert!(msg.contains("was not found at"));
        assert!(msg.contains("/nonexistent/docker.sock"));
    }

    #[test]
    fn test_connection_error_unresponsive_daemon() {
        let err = ProviderError::ConnectionError("connection refused".into());
        let msg = format_connection_error("/var/run/docker.sock", true, &err);
        assert!(msg.contains("not responding"));
        assert!(msg.contains("connection refused"));
    }
}
