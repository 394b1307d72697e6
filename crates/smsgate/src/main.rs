// SPDX-FileCopyrightText: 2026 Smsgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! smsgate - bridge a local SMS gateway device into scriptable tooling.
//!
//! This is the binary entry point. Configuration is loaded and validated
//! before any command runs; config errors render as miette diagnostics.

mod doctor;
mod registry;
mod send;
mod serve;
mod status;

use std::collections::HashMap;

use clap::{Parser, Subcommand};

/// Bridge a local SMS gateway device into scriptable send/track tooling.
#[derive(Parser, Debug)]
#[command(name = "smsgate", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Poll all configured gateways until stopped.
    Serve,
    /// Send one message through a configured gateway.
    Send {
        /// Message text (or template input when --template is given).
        message: String,
        /// Recipient: a friendly name from [recipients] or a literal phone
        /// number. Repeatable.
        #[arg(short = 't', long = "to", required = true)]
        to: Vec<String>,
        /// Gateway name from [[gateways]]; defaults to the first entry.
        #[arg(long)]
        gateway: Option<String>,
        /// Template name from [templates].
        #[arg(long)]
        template: Option<String>,
        /// Template variable as key=value. Repeatable.
        #[arg(long = "var", value_parser = parse_key_val)]
        vars: Vec<(String, String)>,
    },
    /// Show gateway availability and recent messages.
    Status {
        /// Gateway name from [[gateways]]; defaults to the first entry.
        #[arg(long)]
        gateway: Option<String>,
        /// Output structured JSON for scripting.
        #[arg(long)]
        json: bool,
        /// Look up one message by id instead of the recent listing.
        #[arg(long)]
        message_id: Option<String>,
    },
    /// Run diagnostic checks against the configuration and gateways.
    Doctor {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

/// Parse a `key=value` CLI argument.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got `{s}`")),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match smsgate_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            smsgate_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Send {
            message,
            to,
            gateway,
            template,
            vars,
        } => {
            let vars: HashMap<String, String> = vars.into_iter().collect();
            send::run_send(
                &config,
                gateway.as_deref(),
                &message,
                &to,
                template.as_deref(),
                &vars,
            )
            .await
        }
        Commands::Status {
            gateway,
            json,
            message_id,
        } => status::run_status(&config, gateway.as_deref(), json, message_id.as_deref()).await,
        Commands::Doctor { plain } => doctor::run_doctor(&config, plain).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_key_val_splits_on_first_equals() {
        assert_eq!(
            parse_key_val("source=kitchen").unwrap(),
            ("source".to_string(), "kitchen".to_string())
        );
        assert_eq!(
            parse_key_val("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
    }

    #[test]
    fn parse_key_val_rejects_missing_equals() {
        assert!(parse_key_val("justakey").is_err());
        assert!(parse_key_val("=value").is_err());
    }
}
