//! Application settings from env (`GOTA_*`, `.env` honoured) and per-service overrides.

use crate::error::BootError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_APP_NAME: &str = "gota-app";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_host", rename = "hostName")]
    pub host_name: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default, rename = "devMode")]
    pub dev_mode: bool,
}

fn default_name() -> String {
    DEFAULT_APP_NAME.into()
}

fn default_host() -> String {
    DEFAULT_HOST.into()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            name: default_name(),
            host_name: default_host(),
            port: default_port(),
            dev_mode: false,
        }
    }
}

impl AppConfig {
    /// Load `.env` if present, then read `GOTA_APP_NAME`, `GOTA_HOST`, `GOTA_PORT`, `GOTA_DEV_MODE`.
    pub fn from_env() -> Result<Self, BootError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BootError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();
        if let Some(name) = lookup("GOTA_APP_NAME") {
            config.name = name;
        }
        if let Some(host) = lookup("GOTA_HOST") {
            config.host_name = host;
        }
        if let Some(port) = lookup("GOTA_PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| BootError::InvalidSetting(format!("GOTA_PORT: {}", port)))?;
        }
        if let Some(dev) = lookup("GOTA_DEV_MODE") {
            config.dev_mode = parse_bool(&dev)
                .ok_or_else(|| BootError::InvalidSetting(format!("GOTA_DEV_MODE: {}", dev)))?;
        }
        Ok(config)
    }

    /// Service values win where present.
    pub fn merged(&self, service: Option<&ServiceConfig>) -> AppConfig {
        let Some(service) = service else {
            return self.clone();
        };
        AppConfig {
            name: self.name.clone(),
            host_name: service.host_name.clone().unwrap_or_else(|| self.host_name.clone()),
            port: service.port.unwrap_or(self.port),
            dev_mode: service.dev_mode.unwrap_or(self.dev_mode),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host_name, self.port)
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Service-level override carried in class metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default, rename = "devMode")]
    pub dev_mode: Option<bool>,
    #[serde(default, rename = "hostName")]
    pub host_name: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}
