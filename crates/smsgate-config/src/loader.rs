// SPDX-FileCopyrightText: 2026 Smsgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./smsgate.toml` > `~/.config/smsgate/smsgate.toml`
//! > `/etc/smsgate/smsgate.toml` with environment variable overrides via the
//! `SMSGATE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::SmsGateConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/smsgate/smsgate.toml` (system-wide)
/// 3. `~/.config/smsgate/smsgate.toml` (user XDG config)
/// 4. `./smsgate.toml` (local directory)
/// 5. `SMSGATE_*` environment variables
pub fn load_config() -> Result<SmsGateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SmsGateConfig::default()))
        .merge(Toml::file("/etc/smsgate/smsgate.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("smsgate/smsgate.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("smsgate.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<SmsGateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SmsGateConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SmsGateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SmsGateConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `SMSGATE_POLL_INTERVAL_SECS` must map to
/// `poll.interval_secs`, not `poll.interval.secs`. The `[[gateways]]` array
/// and the `[recipients]`/`[templates]` tables are file-only.
fn env_provider() -> Env {
    Env::prefixed("SMSGATE_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("poll_", "poll.", 1);
        mapped.into()
    })
}
