// SPDX-FileCopyrightText: 2026 Smsgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the SMS gateway device's local REST server.
//!
//! Provides [`GatewayClient`] which wraps the device's Basic-Auth endpoints:
//! health check, message send, recent-message listing, and fetch-by-id.
//! Newer firmware serves `/messages` and `/health`; older firmware serves
//! `/message` and `/health/ready`, so every operation carries a one-shot
//! 404 fallback to the legacy path name.

pub mod client;
pub mod types;

pub use client::GatewayClient;
pub use types::{ListQuery, SendOptions};
