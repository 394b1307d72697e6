// SPDX-FileCopyrightText: 2026 Smsgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the smsgate bridge.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Top-level smsgate configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values,
/// except that at least one `[[gateways]]` entry is needed to do anything.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SmsGateConfig {
    /// Process-level settings (logging).
    #[serde(default)]
    pub service: ServiceConfig,

    /// Configured gateway devices. Each entry gets its own client and poller.
    #[serde(default)]
    pub gateways: Vec<GatewayConfig>,

    /// Poller settings shared by all gateways.
    #[serde(default)]
    pub poll: PollConfig,

    /// Friendly recipient name -> phone number.
    #[serde(default)]
    pub recipients: HashMap<String, String>,

    /// Template name -> template body with `{{identifier}}` placeholders.
    #[serde(default)]
    pub templates: HashMap<String, String>,
}

/// Process-level settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Connection settings for one gateway device (local server, Basic Auth).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Registry key for this device. A single-device setup can omit it.
    #[serde(default = "default_gateway_name")]
    pub name: String,

    /// Host or IP of the device on the local network.
    pub host: String,

    /// Local server port.
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Basic Auth username.
    pub username: String,

    /// Basic Auth password.
    pub password: String,
}

impl GatewayConfig {
    /// Base URL for the device's local REST server.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

fn default_gateway_name() -> String {
    "default".to_string()
}

/// Default local server port from the device documentation.
fn default_gateway_port() -> u16 {
    8080
}

/// Poller settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PollConfig {
    /// Seconds between poll cycles.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Page size for the recent-messages listing.
    #[serde(default = "default_messages_limit")]
    pub messages_limit: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            messages_limit: default_messages_limit(),
        }
    }
}

fn default_interval_secs() -> u64 {
    60
}

fn default_messages_limit() -> u32 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = SmsGateConfig::default();
        assert_eq!(config.service.log_level, "info");
        assert!(config.gateways.is_empty());
        assert_eq!(config.poll.interval_secs, 60);
        assert_eq!(config.poll.messages_limit, 20);
        assert!(config.recipients.is_empty());
        assert!(config.templates.is_empty());
    }

    #[test]
    fn gateway_base_url_uses_host_and_port() {
        let gateway = GatewayConfig {
            name: "home".into(),
            host: "192.168.1.50".into(),
            port: 8080,
            username: "sms".into(),
            password: "secret".into(),
        };
        assert_eq!(gateway.base_url(), "http://192.168.1.50:8080");
    }
}
