// SPDX-FileCopyrightText: 2026 Smsgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types exchanged between the gateway client, poller, and notifier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a message, as assigned by the gateway device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Delivery state of a message as reported by the device.
///
/// Device firmware may report states this build does not know about;
/// those decode as [`MessageState::Unknown`] rather than failing the
/// whole listing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum MessageState {
    Pending,
    Processed,
    Sent,
    Delivered,
    Failed,
    #[serde(other)]
    Unknown,
}

/// A message as reported by the gateway device.
///
/// Immutable once received; owned solely by the snapshot that contains it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayMessage {
    /// Device-assigned message identifier.
    pub id: String,
    /// Current delivery state.
    pub state: MessageState,
    /// Recipient phone numbers.
    pub recipients: Vec<String>,
    /// Identifier of the device that handled the message, when reported.
    pub device_id: Option<String>,
}

/// Point-in-time view of gateway availability and recent messages.
///
/// Replaced wholesale on each poll cycle; never partially mutated.
/// Consumers always read a fully formed snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewaySnapshot {
    /// Whether the device answered its health endpoint this cycle.
    pub available: bool,
    /// Most recent messages, in the order the device returned them.
    pub messages: Vec<GatewayMessage>,
    /// When this snapshot was published. `None` only for the startup
    /// placeholder published before the first poll completes.
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl GatewaySnapshot {
    /// The snapshot published at startup, before the first poll.
    pub fn empty() -> Self {
        Self {
            available: false,
            messages: Vec::new(),
            refreshed_at: None,
        }
    }

    /// Number of messages still queued on the device.
    pub fn pending_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.state == MessageState::Pending)
            .count()
    }
}

impl Default for GatewaySnapshot {
    fn default() -> Self {
        Self::empty()
    }
}
