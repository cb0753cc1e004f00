use crate::utils::error::{OrbitError, Result};
use std::net::{IpAddr, SocketAddr};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<Url> {
    if url_str.is_empty() {
        return Err(OrbitError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(OrbitError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(OrbitError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(OrbitError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(OrbitError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_socket_addr(field_name: &str, addr: &str) -> Result<SocketAddr> {
    addr.parse()
        .map_err(|e| OrbitError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: addr.to_string(),
            reason: format!("Invalid socket address: {}", e),
        })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(OrbitError::validation(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

/// Checks a container port binding in the runtime's `-p` syntax:
/// `[ip:][hostPort:]containerPort[/protocol]`, where either port may be a
/// `low-high` range. An empty host port (`127.0.0.1::80`) lets the runtime pick.
pub fn validate_port_spec(field_name: &str, spec: &str) -> Result<()> {
    let invalid = |reason: String| OrbitError::validation(field_name, spec, reason);

    if spec.trim().is_empty() {
        return Err(invalid("Port spec cannot be empty".to_string()));
    }
    if spec.chars().any(char::is_whitespace) {
        return Err(invalid("Port spec cannot contain whitespace".to_string()));
    }

    let (binding, protocol) = match spec.rsplit_once('/') {
        Some((binding, protocol)) => (binding, Some(protocol)),
        None => (spec, None),
    };
    if let Some(protocol) = protocol {
        if !matches!(protocol, "tcp" | "udp" | "sctp") {
            return Err(invalid(format!("Unsupported protocol: {}", protocol)));
        }
    }

    // IPv6 hosts are bracketed: [::1]:8080:80
    let (host_ip, rest) = if let Some(stripped) = binding.strip_prefix('[') {
        let (ip, rest) = stripped
            .split_once("]:")
            .ok_or_else(|| invalid("Unterminated IPv6 address".to_string()))?;
        (Some(ip), rest)
    } else {
        let parts: Vec<&str> = binding.split(':').collect();
        match parts.len() {
            1 | 2 => (None, binding),
            3 => (Some(parts[0]), &binding[parts[0].len() + 1..]),
            _ => return Err(invalid("Too many ':' separated fields".to_string())),
        }
    };

    if let Some(ip) = host_ip {
        ip.parse::<IpAddr>()
            .map_err(|_| invalid(format!("Invalid host IP: {}", ip)))?;
    }

    let (host_port, container_port) = match rest.split_once(':') {
        Some((host, container)) => (Some(host), container),
        None => (None, rest),
    };

    let container_span = parse_port_range(container_port)
        .ok_or_else(|| invalid(format!("Invalid container port: {:?}", container_port)))?;

    match host_port {
        // Empty host port is only meaningful after an explicit IP.
        Some("") if host_ip.is_some() => {}
        Some(host) => {
            let host_span = parse_port_range(host)
                .ok_or_else(|| invalid(format!("Invalid host port: {:?}", host)))?;
            if host_span > 1 && container_span > 1 && host_span != container_span {
                return Err(invalid(
                    "Host and container port ranges must be the same size".to_string(),
                ));
            }
        }
        None => {}
    }

    Ok(())
}

/// Returns the number of ports in `value` (`80` or `8000-8010`).
fn parse_port_range(value: &str) -> Option<u32> {
    let parse_port = |p: &str| -> Option<u16> {
        if p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        p.parse::<u16>().ok().filter(|port| *port > 0)
    };

    match value.split_once('-') {
        Some((low, high)) => {
            let (low, high) = (parse_port(low)?, parse_port(high)?);
            (low <= high).then(|| u32::from(high - low) + 1)
        }
        None => parse_port(value).map(|_| 1),
    }
}
