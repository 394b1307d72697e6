// SPDX-FileCopyrightText: 2026 Smsgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the smsgate workspace.
//!
//! This crate provides the shared error type and the domain types the
//! gateway client, poller, and notifier exchange: message identifiers,
//! message delivery states, and the point-in-time gateway snapshot.

pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::SmsGateError;
pub use types::{GatewayMessage, GatewaySnapshot, MessageId, MessageState};
