// SPDX-FileCopyrightText: 2026 Smsgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as unique gateway names and non-zero poll intervals.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::SmsGateConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &SmsGateConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Gateway entries must have unique, non-empty names and a usable address.
    let mut seen_names = HashSet::new();
    for (i, gateway) in config.gateways.iter().enumerate() {
        if gateway.name.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("gateways[{i}].name must not be empty"),
            });
        } else if !seen_names.insert(&gateway.name) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "duplicate gateway name `{}` in [[gateways]] array",
                    gateway.name
                ),
            });
        }

        if gateway.host.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("gateways[{i}].host must not be empty"),
            });
        }

        if gateway.username.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("gateways[{i}].username must not be empty"),
            });
        }
    }

    if config.poll.interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "poll.interval_secs must be at least 1".to_string(),
        });
    }

    if config.poll.messages_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "poll.messages_limit must be at least 1".to_string(),
        });
    }

    // Directory values must be usable after trimming.
    for (name, number) in &config.recipients {
        if number.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("recipients.{name} must map to a non-empty phone number"),
            });
        }
    }

    for (name, body) in &config.templates {
        if body.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("templates.{name} must map to a non-empty template body"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
