//! Test support utilities for dockpick-core
//!
//! Provides MockGateway for driving the session state machine without a
//! running container runtime.

use async_trait::async_trait;
use dockpick_provider::*;
use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Records which gateway methods were called
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Ping,
    ListRunning,
    Inspect { name: String },
    PortMappings { name: String },
    ProbeShell { name: String, shell: String },
    ExecInteractive { name: String, shell: String },
    StreamLogs { name: String, tail: u32, follow: bool, timestamps: bool },
    StreamStats { name: String },
    Restart { name: String },
}

/// Configurable mock runtime gateway for testing
pub struct MockGateway {
    pub calls: Arc<Mutex<Vec<MockCall>>>,
    /// Result for list_running calls
    pub list_result: Arc<Mutex<Result<Vec<String>>>>,
    /// Details returned by inspect, keyed by name; unknown names are not found
    pub details: Arc<Mutex<HashMap<String, ContainerDetails>>>,
    /// Output for port_mappings calls
    pub port_mappings_output: Arc<Mutex<String>>,
    /// Shells reported as present by probe_shell
    pub available_shells: Arc<Mutex<Vec<String>>>,
    /// Error for probe_shell calls (if Some, every probe fails with it)
    pub probe_error: Arc<Mutex<Option<ProviderError>>>,
    /// Exit status for exec_interactive calls
    pub exec_exit_code: Arc<Mutex<i64>>,
    /// Text written by stream_logs
    pub log_output: Arc<Mutex<String>>,
    /// Text written by stream_stats
    pub stats_output: Arc<Mutex<String>>,
    /// Result for restart calls
    pub restart_result: Arc<Mutex<Result<()>>>,
}

impl MockGateway {
    /// Create a mock with no containers and default success results
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            list_result: Arc::new(Mutex::new(Ok(Vec::new()))),
            details: Arc::new(Mutex::new(HashMap::new())),
            port_mappings_output: Arc::new(Mutex::new(String::new())),
            available_shells: Arc::new(Mutex::new(vec!["sh".to_string()])),
            probe_error: Arc::new(Mutex::new(None)),
            exec_exit_code: Arc::new(Mutex::new(0)),
            log_output: Arc::new(Mutex::new(String::new())),
            stats_output: Arc::new(Mutex::new(String::new())),
            restart_result: Arc::new(Mutex::new(Ok(()))),
        }
    }

    /// Mock reporting the given running containers, each with minimal details
    pub fn with_containers(names: &[&str]) -> Self {
        let mock = Self::new();
        *mock.list_result.lock().unwrap() = Ok(names.iter().map(|n| n.to_string()).collect());
        {
            let mut details = mock.details.lock().unwrap();
            for name in names {
                details.insert(name.to_string(), mock_container_details(name));
            }
        }
        mock
    }

    /// Replace the details returned for one container
    pub fn set_details(&self, details: ContainerDetails) {
        self.details
            .lock()
            .unwrap()
            .insert(details.name.clone(), details);
    }

    /// Make inspect fail for one container
    pub fn remove_details(&self, name: &str) {
        self.details.lock().unwrap().remove(name);
    }

    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }

    /// Get all recorded calls
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Check if a specific call was made
    pub fn was_called(&self, call: &MockCall) -> bool {
        self.calls.lock().unwrap().contains(call)
    }

    /// Calls other than inspect, which the detailed table issues on every render
    pub fn action_calls(&self) -> Vec<MockCall> {
        self.get_calls()
            .into_iter()
            .filter(|c| !matches!(c, MockCall::Inspect { .. } | MockCall::ListRunning))
            .collect()
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

/// Clone a ProviderError (thiserror types don't implement Clone)
pub fn clone_provider_error(e: &ProviderError) -> ProviderError {
    match e {
        ProviderError::ConnectionError(s) => ProviderError::ConnectionError(s.clone()),
        ProviderError::ContainerNotFound(s) => ProviderError::ContainerNotFound(s.clone()),
        ProviderError::ExecError(s) => ProviderError::ExecError(s.clone()),
        ProviderError::RuntimeError(s) => ProviderError::RuntimeError(s.clone()),
        ProviderError::IoError(_) => ProviderError::RuntimeError("IO error (cloned)".into()),
    }
}

fn clone_result<T: Clone>(r: &Arc<Mutex<Result<T>>>) -> Result<T> {
    let guard = r.lock().unwrap();
    match &*guard {
        Ok(v) => Ok(v.clone()),
        Err(e) => Err(clone_provider_error(e)),
    }
}

/// Create minimal ContainerDetails for a running container
pub fn mock_container_details(name: &str) -> ContainerDetails {
    ContainerDetails {
        name: name.to_string(),
        image: Some("mock_image:latest".to_string()),
        status: Some("running".to_string()),
        ..Default::default()
    }
}

#[async_trait]
impl RuntimeGateway for MockGateway {
    async fn ping(&self) -> Result<()> {
        self.record(MockCall::Ping);
        clone_result(&self.list_result).map(|_| ())
    }

    async fn list_running(&self) -> Result<Vec<String>> {
        self.record(MockCall::ListRunning);
        clone_result(&self.list_result)
    }

    async fn inspect(&self, name: &str) -> Result<ContainerDetails> {
        self.record(MockCall::Inspect {
            name: name.to_string(),
        });
        self.details
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| ProviderError::ContainerNotFound(name.to_string()))
    }

    async fn port_mappings(&self, name: &str) -> Result<String> {
        self.record(MockCall::PortMappings {
            name: name.to_string(),
        });
        Ok(self.port_mappings_output.lock().unwrap().clone())
    }

    async fn probe_shell(&self, name: &str, shell: &str) -> Result<bool> {
        self.record(MockCall::ProbeShell {
            name: name.to_string(),
            shell: shell.to_string(),
        });
        if let Some(e) = self.probe_error.lock().unwrap().as_ref() {
            return Err(clone_provider_error(e));
        }
        Ok(self
            .available_shells
            .lock()
            .unwrap()
            .iter()
            .any(|s| s == shell))
    }

    async fn exec_interactive(&self, name: &str, shell: &str) -> Result<i64> {
        self.record(MockCall::ExecInteractive {
            name: name.to_string(),
            shell: shell.to_string(),
        });
        Ok(*self.exec_exit_code.lock().unwrap())
    }

    async fn stream_logs(
        &self,
        name: &str,
        options: &LogOptions,
        out: &mut (dyn Write + Send),
    ) -> Result<()> {
        self.record(MockCall::StreamLogs {
            name: name.to_string(),
            tail: options.tail,
            follow: options.follow,
            timestamps: options.timestamps,
        });
        let text = self.log_output.lock().unwrap().clone();
        out.write_all(text.as_bytes())?;
        Ok(())
    }

    async fn stream_stats(&self, name: &str, out: &mut (dyn Write + Send)) -> Result<()> {
        self.record(MockCall::StreamStats {
            name: name.to_string(),
        });
        let text = self.stats_output.lock().unwrap().clone();
        out.write_all(text.as_bytes())?;
        Ok(())
    }

    async fn restart(&self, name: &str) -> Result<()> {
        self.record(MockCall::Restart {
            name: name.to_string(),
        });
        clone_result(&self.restart_result)
    }
}
