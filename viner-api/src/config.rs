//! Host-side configuration for serving the API.
//!
//! Read from the environment:
//!
//! | variable | meaning | default |
//! |----------|---------|---------|
//! | `VINER_API_HTTP` | HTTP listen address, or `off` | `127.0.0.1:3333` |
//! | `VINER_API_TCP` | line-protocol TCP listen address, or `off` | disabled |
//! | `VINER_API_READONLY` | refuse control methods | `true` |
//! | `VINER_API_PROTOCOL` | `v1`, `v2` or `v1v2` | `v2` |

use std::env;
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;

use thiserror::Error;

use crate::rpc::ProtocolVersion;

pub const DEFAULT_PORT: u16 = 3333;

const HTTP_VAR: &str = "VINER_API_HTTP";
const TCP_VAR: &str = "VINER_API_TCP";
const READONLY_VAR: &str = "VINER_API_READONLY";
const PROTOCOL_VAR: &str = "VINER_API_PROTOCOL";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: invalid listen address {value:?}")]
    InvalidAddress { var: &'static str, value: String },

    #[error("{var}: expected a boolean, got {value:?}")]
    InvalidBool { var: &'static str, value: String },

    #[error("{var}: unknown protocol {value:?} (expected v1, v2 or v1v2)")]
    InvalidProtocol { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub http_addr: Option<SocketAddr>,
    pub tcp_addr: Option<SocketAddr>,
    pub readonly: bool,
    pub protocol: ProtocolVersion,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            http_addr: Some(SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT))),
            tcp_addr: None,
            readonly: true,
            protocol: ProtocolVersion::V2,
        }
    }
}

impl ApiConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Read the configuration through `lookup`, which returns a variable's
    /// value or `None` when unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(HTTP_VAR) {
            config.http_addr = parse_addr(HTTP_VAR, &value)?;
        }
        if let Some(value) = lookup(TCP_VAR) {
            config.tcp_addr = parse_addr(TCP_VAR, &value)?;
        }
        if let Some(value) = lookup(READONLY_VAR) {
            config.readonly = parse_bool(READONLY_VAR, &value)?;
        }
        if let Some(value) = lookup(PROTOCOL_VAR) {
            config.protocol = parse_protocol(PROTOCOL_VAR, &value)?;
        }

        Ok(config)
    }
}

fn parse_addr(var: &'static str, value: &str) -> Result<Option<SocketAddr>, ConfigError> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("off") || value.is_empty() {
        return Ok(None);
    }
    SocketAddr::from_str(value)
        .map(Some)
        .map_err(|_| ConfigError::InvalidAddress {
            var,
            value: value.to_string(),
        })
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: value.to_string(),
        }),
    }
}

fn parse_protocol(var: &'static str, value: &str) -> Result<ProtocolVersion, ConfigError> {
    ProtocolVersion::from_str(value.trim()).map_err(|_| ConfigError::InvalidProtocol {
        var,
        value: value.to_string(),
    })
}
