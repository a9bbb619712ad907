//! Compact port notation for the detailed table
//!
//! `0.0.0.0:8080->8080/tcp` becomes `8080→*`, `0.0.0.0:8080->80/tcp`
//! becomes `8080→80`, UDP mappings get a `/u` suffix, and IPv6 duplicates
//! of an IPv4 binding collapse into one entry.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";

fn is_wildcard(ip: &str) -> bool {
    matches!(ip, "" | "0.0.0.0" | "::" | "[::]")
}

fn protocol_suffix(protocol: &str) -> String {
    match protocol {
        "tcp" => String::new(),
        "udp" => "/u".to_string(),
        other => format!("/{}", other),
    }
}

fn abbreviate_entry(entry: &str) -> String {
    match entry.split_once("->") {
        Some((host, container)) => {
            let Some((ip, host_port)) = host.rsplit_once(':') else {
                return entry.to_string();
            };
            let (container_port, protocol) =
                container.split_once('/').unwrap_or((container, "tcp"));
            let target = if host_port == container_port {
                "*"
            } else {
                container_port
            };
            let prefix = if is_wildcard(ip) {
                String::new()
            } else {
                format!("{}:", ip)
            };
            format!(
                "{}{}→{}{}",
                prefix,
                host_port,
                target,
                protocol_suffix(protocol)
            )
        }
        None => match entry.split_once('/') {
            Some((port, protocol)) => format!("{}{}", port, protocol_suffix(protocol)),
            None => entry.to_string(),
        },
    }
}

/// Rewrite a `docker ps` style port summary into the compact notation
pub fn abbreviate_ports(summary: &str) -> String {
    let summary = summary.trim();
    if summary.is_empty() || summary == "N/A" {
        return "N/A".to_string();
    }

    let mut seen: Vec<String> = Vec::new();
    for entry in summary.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let short = abbreviate_entry(entry);
        if !seen.contains(&short) {
            seen.push(short);
        }
    }
    seen.join(", ")
}

/// Cut `text` to at most `max` columns, ending in an ellipsis when shortened
pub fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let budget = max.saturating_sub(ELLIPSIS.len());
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push_str(ELLIPSIS);
    out
}

/// Fit a port list into `max` columns, keeping the first port whole when possible
pub fn truncate_ports(ports: &str, max: usize) -> String {
    if ports.width() <= max {
        return ports.to_string();
    }
    let first = ports.split(',').next().unwrap_or(ports).trim();
    if first.width() + ELLIPSIS.len() <= max {
        format!("{}{}", first, ELLIPSIS)
    } else {
        truncate_to_width(first, max)
    }
}
