//! Common types for the runtime gateway

use std::collections::BTreeMap;

/// Detailed container information, as reported by `inspect`
#[derive(Debug, Clone, Default)]
pub struct ContainerDetails {
    pub name: String,
    pub image: Option<String>,
    pub status: Option<String>,
    pub ip_address: Option<String>,
    /// Start time as a unix timestamp
    pub started_at: Option<i64>,
    pub ports: Vec<PortInfo>,
    /// Ports declared by the image (`80/tcp`)
    pub exposed_ports: Vec<String>,
    /// Memory limit in bytes, `None` when unlimited
    pub memory_limit: Option<i64>,
    /// CPU limit in nano-CPUs, `None` when unlimited
    pub cpu_limit: Option<i64>,
    pub env: Vec<String>,
    pub networks: BTreeMap<String, NetworkInfo>,
}

impl ContainerDetails {
    /// Port summary in `docker ps` style (`N/A` when nothing is exposed)
    pub fn port_summary(&self) -> String {
        format_port_summary(&self.ports)
    }
}

/// Port information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    pub container_port: u16,
    pub host_port: Option<u16>,
    pub protocol: String,
    pub host_ip: Option<String>,
}

impl PortInfo {
    /// Parse a `"<port>/<proto>"` key as used by the Engine API
    pub fn parse_key(key: &str) -> Option<(u16, String)> {
        let mut parts = key.splitn(2, '/');
        let port = parts.next()?.parse().ok()?;
        let protocol = parts.next().unwrap_or("tcp").to_string();
        Some((port, protocol))
    }
}

impl std::fmt::Display for PortInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.host_port {
            Some(host_port) => {
                // IPv6 wildcard bindings render as `:::8080`, as in docker ps
                let ip = self.host_ip.as_deref().unwrap_or("");
                write!(
                    f,
                    "{}:{}->{}/{}",
                    ip, host_port, self.container_port, self.protocol
                )
            }
            None => write!(f, "{}/{}", self.container_port, self.protocol),
        }
    }
}

/// Network attachment
#[derive(Debug, Clone, Default)]
pub struct NetworkInfo {
    pub ip_address: Option<String>,
    pub gateway: Option<String>,
}

/// Render ports the way `docker ps` does: `0.0.0.0:8080->80/tcp, 443/tcp`
pub fn format_port_summary(ports: &[PortInfo]) -> String {
    if ports.is_empty() {
        return "N/A".to_string();
    }
    ports
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render published ports the way `docker port` does, one binding per line
pub fn format_port_mappings(ports: &[PortInfo]) -> String {
    ports
        .iter()
        .filter_map(|p| {
            p.host_port.map(|host_port| {
                let ip = p.host_ip.as_deref().filter(|ip| !ip.is_empty()).unwrap_or("0.0.0.0");
                let ip = if ip.contains(':') && !ip.starts_with('[') {
                    format!("[{}]", ip)
                } else {
                    ip.to_string()
                };
                format!("{}/{} -> {}:{}", p.container_port, p.protocol, ip, host_port)
            })
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Options for streaming container logs
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Number of lines from the end to show
    pub tail: u32,
    /// Keep streaming new output
    pub follow: bool,
    /// Prefix lines with timestamps
    pub timestamps: bool,
}

/// One resource usage sample of a running container
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsSample {
    pub cpu_percent: f64,
    pub memory_usage: u64,
    pub memory_limit: u64,
    pub net_rx: u64,
    pub net_tx: u64,
}

impl StatsSample {
    /// Memory usage as a percentage of the limit
    pub fn memory_percent(&self) -> f64 {
        if self.memory_limit == 0 {
            0.0
        } else {
            self.memory_usage as f64 / self.memory_limit as f64 * 100.0
        }
    }

    /// Single-line rendering used by the live stats view
    pub fn render_line(&self, name: &str) -> String {
        format!(
            "{}  CPU {:>6.2}%  MEM {} / {} ({:.1}%)  NET {} / {}",
            name,
            self.cpu_percent,
            format_bytes(self.memory_usage),
            format_bytes(self.memory_limit),
            self.memory_percent(),
            format_bytes(self.net_rx),
            format_bytes(self.net_tx),
        )
    }
}

/// Format a byte count with binary units (`12.3MiB`)
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{}B", bytes)
    } else {
        format!("{:.1}{}", value, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port(container: u16, host: Option<u16>, proto: &str, ip: Option<&str>) -> PortInfo {
        PortInfo {
            container_port: container,
            host_port: host,
            protocol: proto.to_string(),
            host_ip: ip.map(str::to_string),
        }
    }

    #[test]
    fn test_port_summary_docker_ps_style() {
        let ports = vec![
            port(80, Some(8080), "tcp", Some("0.0.0.0")),
            port(80, Some(8080), "tcp", Some("::")),
            port(443, None, "tcp", None),
        ];
        assert_eq!(
            format_port_summary(&ports),
            "0.0.0.0:8080->80/tcp, :::8080->80/tcp, 443/tcp"
        );
    }

    #[test]
    fn test_port_summary_empty_is_na() {
        assert_eq!(format_port_summary(&[]), "N/A");
    }

    #[test]
    fn test_port_mappings_skip_unpublished() {
        let ports = vec![
            port(5432, Some(15432), "tcp", Some("127.0.0.1")),
            port(53, Some(53), "udp", Some("::")),
            port(9000, None, "tcp", None),
        ];
        assert_eq!(
            format_port_mappings(&ports),
            "5432/tcp -> 127.0.0.1:15432\n53/udp -> [::]:53"
        );
    }

    #[test]
    fn test_parse_port_key() {
        assert_eq!(PortInfo::parse_key("80/tcp"), Some((80, "tcp".to_string())));
        assert_eq!(PortInfo::parse_key("53/udp"), Some((53, "udp".to_string())));
        assert_eq!(PortInfo::parse_key("8080"), Some((8080, "tcp".to_string())));
        assert_eq!(PortInfo::parse_key("http/tcp"), None);
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512B");
        assert_eq!(format_bytes(2048), "2.0KiB");
        assert_eq!(format_bytes(3 * 1024 * 1024 + 512 * 1024), "3.5MiB");
    }

    #[test]
    fn test_stats_line() {
        let sample = StatsSample {
            cpu_percent: 12.5,
            memory_usage: 1024 * 1024,
            memory_limit: 4 * 1024 * 1024,
            net_rx: 100,
            net_tx: 2048,
        };
        assert_eq!(sample.memory_percent(), 25.0);
        assert_eq!(
            sample.render_line("web"),
            "web  CPU  12.50%  MEM 1.0MiB / 4.0MiB (25.0%)  NET 100B / 2.0KiB"
        );
    }
}
