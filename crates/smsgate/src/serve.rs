// SPDX-FileCopyrightText: 2026 Smsgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `smsgate serve` command implementation.
//!
//! The composition root: builds the gateway registry from configuration,
//! starts every poller (each performs one awaited initial refresh before
//! its periodic schedule begins), and runs until SIGINT/SIGTERM. Shutdown
//! cancels every poller; in-flight HTTP calls are abandoned.

use smsgate_config::model::SmsGateConfig;
use smsgate_core::SmsGateError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::registry::GatewayRegistry;

/// Runs the `smsgate serve` command.
pub async fn run_serve(config: SmsGateConfig) -> Result<(), SmsGateError> {
    init_tracing(&config.service.log_level);

    if config.gateways.is_empty() {
        return Err(SmsGateError::Config(
            "no [[gateways]] configured; add one to smsgate.toml".into(),
        ));
    }

    let registry = GatewayRegistry::from_config(&config)?;
    info!(
        gateways = registry.len(),
        interval_secs = config.poll.interval_secs,
        "starting smsgate serve"
    );

    registry.start_all().await;

    for entry in registry.iter() {
        let snapshot = entry.poller.snapshot();
        if snapshot.available {
            info!(
                gateway = %entry.config.name,
                messages = snapshot.messages.len(),
                pending = snapshot.pending_count(),
                "gateway online"
            );
        } else {
            warn!(gateway = %entry.config.name, "gateway unreachable at startup");
        }
    }

    let token = install_signal_handler();
    token.cancelled().await;

    info!("shutting down");
    registry.shutdown_all();
    Ok(())
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the configured level applies to
/// the smsgate crates and `warn` to everything else.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    const CRATES: [&str; 6] = [
        "smsgate",
        "smsgate_client",
        "smsgate_config",
        "smsgate_core",
        "smsgate_notify",
        "smsgate_poller",
    ];

    let default_filter = CRATES
        .iter()
        .map(|krate| format!("{krate}={log_level}"))
        .chain(std::iter::once("warn".to_string()))
        .collect::<Vec<_>>()
        .join(",");

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

/// Installs signal handlers for SIGTERM and SIGINT.
///
/// Returns a [`CancellationToken`] that is cancelled when either signal is
/// received.
fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm =
                signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

            tokio::select! {
                _ = ctrl_c => {
                    info!("received SIGINT (Ctrl+C), initiating shutdown");
                }
                _ = sigterm.recv() => {
                    info!("received SIGTERM, initiating shutdown");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("received Ctrl+C, initiating shutdown");
        }

        token_clone.cancel();
        debug!("shutdown signal handler completed");
    });

    token
}
