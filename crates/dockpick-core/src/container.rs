//! Containers as seen by one interactive session

use dockpick_provider::ContainerDetails;

/// A running container captured in the session snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub name: String,
}

impl Container {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl std::fmt::Display for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Build a snapshot from the names reported by the runtime
pub fn snapshot_from_names(names: Vec<String>) -> Vec<Container> {
    names.into_iter().map(Container::new).collect()
}

/// Live attributes of a container, recomputed on every detailed render
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerAttrs {
    pub ip_address: Option<String>,
    /// Start time as a unix timestamp
    pub started_at: Option<i64>,
    /// `docker ps` style port summary
    pub port_summary: Option<String>,
}

impl From<&ContainerDetails> for ContainerAttrs {
    fn from(details: &ContainerDetails) -> Self {
        Self {
            ip_address: details.ip_address.clone(),
            started_at: details.started_at,
            port_summary: Some(details.port_summary()),
        }
    }
}

/// One row handed to the table renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRow {
    pub name: String,
    /// `None` in simple mode or when inspection failed
    pub attrs: Option<ContainerAttrs>,
}

impl ContainerRow {
    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: None,
        }
    }

    pub fn detailed(name: impl Into<String>, attrs: ContainerAttrs) -> Self {
        Self {
            name: name.into(),
            attrs: Some(attrs),
        }
    }
}
