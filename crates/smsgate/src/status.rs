// SPDX-FileCopyrightText: 2026 Smsgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `smsgate status` command implementation.
//!
//! Queries one gateway for availability and its recent messages (or a
//! single message by id) and prints a human or JSON report. A status query
//! never fails: an unreachable device renders as `unavailable` with
//! whatever messages were last known.

use serde::Serialize;
use smsgate_config::model::SmsGateConfig;
use smsgate_core::{GatewayMessage, SmsGateError};

use crate::registry::GatewayRegistry;

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub gateway: String,
    pub url: String,
    pub available: bool,
    pub pending: usize,
    pub refreshed_at: Option<String>,
    pub messages: Vec<GatewayMessage>,
}

/// Runs the `smsgate status` command.
pub async fn run_status(
    config: &SmsGateConfig,
    gateway: Option<&str>,
    json: bool,
    message_id: Option<&str>,
) -> Result<(), SmsGateError> {
    let registry = GatewayRegistry::from_config(config)?;
    let entry = registry.get_or_first(gateway)?;

    if let Some(id) = message_id {
        return print_message(entry.client.get_message(id).await.as_ref(), id, json);
    }

    // One poll cycle fills the snapshot the same way the daemon would.
    entry.poller.refresh().await;
    let snapshot = entry.poller.snapshot();

    let report = StatusReport {
        gateway: entry.config.name.clone(),
        url: entry.config.base_url(),
        available: snapshot.available,
        pending: snapshot.pending_count(),
        refreshed_at: snapshot.refreshed_at.map(|t| t.to_rfc3339()),
        messages: snapshot.messages.clone(),
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        print_report(&report);
    }

    Ok(())
}

/// Print a single message lookup result.
fn print_message(
    message: Option<&GatewayMessage>,
    id: &str,
    json: bool,
) -> Result<(), SmsGateError> {
    match message {
        Some(message) if json => {
            println!(
                "{}",
                serde_json::to_string_pretty(message).unwrap_or_else(|_| "{}".to_string())
            );
        }
        Some(message) => {
            println!();
            println!("  message {}", message.id);
            println!("  {}", "-".repeat(35));
            println!("    State:      {}", message.state);
            println!("    Recipients: {}", message.recipients.join(", "));
            if let Some(device_id) = &message.device_id {
                println!("    Device:     {device_id}");
            }
            println!();
        }
        None if json => println!("null"),
        None => println!("message `{id}` not found"),
    }
    Ok(())
}

/// Print the human-readable status report.
fn print_report(report: &StatusReport) {
    println!();
    println!("  smsgate status - {} ({})", report.gateway, report.url);
    println!("  {}", "-".repeat(50));
    println!(
        "    State:    {}",
        if report.available {
            "available"
        } else {
            "unavailable"
        }
    );
    println!("    Pending:  {}", report.pending);

    if report.messages.is_empty() {
        println!("    Messages: none");
    } else {
        println!("    Messages:");
        for message in &report.messages {
            println!(
                "      {:<12} {:<10} {}",
                message.id,
                message.state,
                message.recipients.join(", ")
            );
        }
    }
    println!();
}
