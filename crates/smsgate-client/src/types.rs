// SPDX-FileCopyrightText: 2026 Smsgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire request/response types for the device's local REST server.

use serde::{Deserialize, Serialize};
use smsgate_core::{GatewayMessage, MessageState};

/// Options for a send request, with the device's documented defaults.
#[derive(Debug, Clone)]
pub struct SendOptions {
    /// Queue priority.
    pub priority: i32,
    /// Seconds the message may wait in the queue before expiring.
    pub ttl: u64,
    /// SIM slot to send from. `None` lets the device choose.
    pub sim_number: Option<u8>,
    /// Ask the device to skip its phone-number format validation.
    pub skip_validation: bool,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            priority: 100,
            ttl: 3600,
            sim_number: None,
            skip_validation: true,
        }
    }
}

/// Paging and filter parameters for the messages listing.
#[derive(Debug, Clone)]
pub struct ListQuery {
    /// Only return messages in this state.
    pub state: Option<MessageState>,
    /// Page size.
    pub limit: u32,
    /// Page offset.
    pub offset: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            state: None,
            limit: 20,
            offset: 0,
        }
    }
}

impl ListQuery {
    /// A first-page query with the given page size.
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }
}

/// JSON body for `POST /messages`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub phone_numbers: Vec<String>,
    pub text_message: TextMessage,
    pub priority: i32,
    pub ttl: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sim_number: Option<u8>,
}

/// Text payload wrapper the device expects.
#[derive(Debug, Clone, Serialize)]
pub struct TextMessage {
    pub text: String,
}

/// One message entry as returned by `GET /messages`.
///
/// Tolerant of sparse objects: firmware versions differ in which fields
/// they include, and a message with an unknown state must not fail the
/// whole listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMessage {
    #[serde(default)]
    pub id: String,
    #[serde(default = "unknown_state")]
    pub state: MessageState,
    #[serde(default)]
    pub recipients: Vec<WireRecipient>,
    #[serde(default)]
    pub device_id: Option<String>,
}

fn unknown_state() -> MessageState {
    MessageState::Unknown
}

/// A recipient entry in a device message.
///
/// Older firmware returns plain phone-number strings; newer firmware
/// returns objects with a `phoneNumber` field (and per-recipient state).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireRecipient {
    Number(String),
    Entry {
        #[serde(rename = "phoneNumber")]
        phone_number: String,
    },
}

impl WireRecipient {
    fn into_phone_number(self) -> String {
        match self {
            WireRecipient::Number(number) => number,
            WireRecipient::Entry { phone_number } => phone_number,
        }
    }
}

impl From<WireMessage> for GatewayMessage {
    fn from(wire: WireMessage) -> Self {
        Self {
            id: wire.id,
            state: wire.state,
            recipients: wire
                .recipients
                .into_iter()
                .map(WireRecipient::into_phone_number)
                .collect(),
            device_id: wire.device_id,
        }
    }
}
