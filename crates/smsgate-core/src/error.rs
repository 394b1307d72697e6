// SPDX-FileCopyrightText: 2026 Smsgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the smsgate workspace.

use thiserror::Error;

/// The primary error type used across all smsgate crates.
#[derive(Debug, Error)]
pub enum SmsGateError {
    /// Configuration errors (invalid TOML, missing required fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Gateway device errors (rejected send, unexpected status, transport failure).
    #[error("gateway error: {message}")]
    Gateway {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A send request resolved to zero phone numbers.
    #[error("no recipients resolved for send request")]
    EmptyRecipients,

    /// Requested gateway was not found in the registry.
    #[error("gateway not found: {name}")]
    GatewayNotFound { name: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
