// SPDX-FileCopyrightText: 2026 Smsgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `smsgate doctor` command implementation.
//!
//! Runs diagnostic checks against the configuration and the configured
//! gateway devices: directory lint, template syntax, and per-gateway
//! health reachability.

use std::collections::HashMap;
use std::io::IsTerminal;
use std::time::{Duration, Instant};

use smsgate_client::GatewayClient;
use smsgate_config::model::SmsGateConfig;
use smsgate_core::SmsGateError;
use smsgate_notify::{render_template, TemplateError};

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed successfully.
    Pass,
    /// Check passed with a warning.
    Warn,
    /// Check failed.
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check.
    pub name: String,
    /// Check status.
    pub status: CheckStatus,
    /// Human-readable message.
    pub message: String,
    /// Duration the check took.
    pub duration: Duration,
}

/// Run the `smsgate doctor` command.
///
/// With `--plain`, disables colored output.
pub async fn run_doctor(config: &SmsGateConfig, plain: bool) -> Result<(), SmsGateError> {
    let use_color = !plain && std::io::stdout().is_terminal();
    let mut results = Vec::new();

    results.push(check_config(config));
    results.push(check_templates(config));
    for gateway in &config.gateways {
        results.push(check_gateway_health(&gateway.name, &gateway.base_url(), &gateway.username, &gateway.password).await);
    }

    print_results(&results, use_color);
    Ok(())
}

/// Check the configuration shape: something to talk to, something to say.
fn check_config(config: &SmsGateConfig) -> CheckResult {
    let start = Instant::now();
    let (status, message) = if config.gateways.is_empty() {
        (
            CheckStatus::Warn,
            "no [[gateways]] configured".to_string(),
        )
    } else {
        (
            CheckStatus::Pass,
            format!(
                "{} gateway(s), {} recipient(s), {} template(s)",
                config.gateways.len(),
                config.recipients.len(),
                config.templates.len()
            ),
        )
    };
    CheckResult {
        name: "config".to_string(),
        status,
        message,
        duration: start.elapsed(),
    }
}

/// Lint template bodies for syntax errors.
///
/// Unknown variables are expected here (their values arrive with each send
/// request); only malformed placeholder syntax is reported, since it means
/// every send with that template silently falls back to the raw message.
fn check_templates(config: &SmsGateConfig) -> CheckResult {
    let start = Instant::now();
    let mut broken = Vec::new();

    for (name, body) in &config.templates {
        match render_template(body, &HashMap::new()) {
            Ok(_) | Err(TemplateError::UnknownVariable { .. }) => {}
            Err(e) => broken.push(format!("{name} ({e})")),
        }
    }

    let (status, message) = if broken.is_empty() {
        (
            CheckStatus::Pass,
            format!("{} template(s) parse", config.templates.len()),
        )
    } else {
        broken.sort();
        (
            CheckStatus::Warn,
            format!("malformed template(s): {}", broken.join(", ")),
        )
    };
    CheckResult {
        name: "templates".to_string(),
        status,
        message,
        duration: start.elapsed(),
    }
}

/// Check one gateway's health endpoint.
async fn check_gateway_health(
    name: &str,
    base_url: &str,
    username: &str,
    password: &str,
) -> CheckResult {
    let start = Instant::now();
    let check_name = format!("gateway:{name}");

    let client = match GatewayClient::new(base_url, username, password) {
        Ok(client) => client,
        Err(e) => {
            return CheckResult {
                name: check_name,
                status: CheckStatus::Fail,
                message: format!("cannot build client: {e}"),
                duration: start.elapsed(),
            };
        }
    };

    let (status, message) = match client.check_health().await {
        Some(_) => (CheckStatus::Pass, format!("available at {base_url}")),
        None => (
            CheckStatus::Fail,
            format!("unreachable or unhealthy at {base_url}"),
        ),
    };
    CheckResult {
        name: check_name,
        status,
        message,
        duration: start.elapsed(),
    }
}

/// Print check results as a table with a summary line.
fn print_results(results: &[CheckResult], use_color: bool) {
    println!();
    println!("  smsgate doctor");
    println!("  {}", "-".repeat(50));

    let mut fail_count = 0;
    let mut warn_count = 0;

    for result in results {
        let duration_ms = result.duration.as_millis();
        let line = match result.status {
            CheckStatus::Pass => {
                if use_color {
                    use colored::Colorize;
                    format!(
                        "    {} {:<20} {} ({duration_ms}ms)",
                        "✓".green(),
                        result.name,
                        result.message
                    )
                } else {
                    format!(
                        "    [OK]   {:<20} {} ({duration_ms}ms)",
                        result.name, result.message
                    )
                }
            }
            CheckStatus::Warn => {
                warn_count += 1;
                if use_color {
                    use colored::Colorize;
                    format!(
                        "    {} {:<20} {} ({duration_ms}ms)",
                        "!".yellow(),
                        result.name,
                        result.message.yellow()
                    )
                } else {
                    format!(
                        "    [WARN] {:<20} {} ({duration_ms}ms)",
                        result.name, result.message
                    )
                }
            }
            CheckStatus::Fail => {
                fail_count += 1;
                if use_color {
                    use colored::Colorize;
                    format!(
                        "    {} {:<20} {} ({duration_ms}ms)",
                        "✗".red(),
                        result.name,
                        result.message.red()
                    )
                } else {
                    format!(
                        "    [FAIL] {:<20} {} ({duration_ms}ms)",
                        result.name, result.message
                    )
                }
            }
        };
        println!("{line}");
    }

    println!();

    if fail_count > 0 || warn_count > 0 {
        let issues = fail_count + warn_count;
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }

    println!();
}
