// SPDX-FileCopyrightText: 2026 Smsgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Periodic gateway status poller.
//!
//! The [`StatusPoller`] re-queries the gateway client on a fixed interval
//! and publishes the merged result as an immutable [`GatewaySnapshot`]
//! through an [`ArcSwap`]: consumers read the latest snapshot lock-free and
//! never observe a half-updated one. A poll cycle is never fatal; the loop
//! runs until shutdown regardless of prior outcomes.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use arc_swap::ArcSwap;
use chrono::Utc;
use smsgate_client::{GatewayClient, ListQuery};
use smsgate_core::GatewaySnapshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Maintains an always-available snapshot of one gateway device.
///
/// Cloning is cheap; clones share the same snapshot slot and loop state.
#[derive(Debug, Clone)]
pub struct StatusPoller {
    client: Arc<GatewayClient>,
    interval: Duration,
    messages_limit: u32,
    snapshot: Arc<ArcSwap<GatewaySnapshot>>,
    cancel: CancellationToken,
    handle: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl StatusPoller {
    /// Creates a poller for `client`, seeded with the empty startup
    /// snapshot (`available=false`, no messages).
    pub fn new(client: Arc<GatewayClient>, interval: Duration, messages_limit: u32) -> Self {
        Self {
            client,
            interval,
            messages_limit,
            snapshot: Arc::new(ArcSwap::from_pointee(GatewaySnapshot::empty())),
            cancel: CancellationToken::new(),
            handle: Arc::new(Mutex::new(None)),
        }
    }

    /// The latest published snapshot. Never fails; before the first
    /// completed poll this is the startup placeholder.
    pub fn snapshot(&self) -> Arc<GatewaySnapshot> {
        self.snapshot.load_full()
    }

    /// Runs one poll cycle and publishes a new snapshot.
    ///
    /// A health failure only downgrades `available`; a listing failure
    /// retains the previous cycle's messages so a transient read error does
    /// not flash an empty mailbox at consumers.
    pub async fn refresh(&self) {
        let available = self.client.check_health().await.is_some();

        let previous = self.snapshot.load();
        let messages = match self
            .client
            .try_list_messages(&ListQuery::with_limit(self.messages_limit))
            .await
        {
            Ok(messages) => messages,
            Err(e) => {
                debug!(error = %e, "listing failed, keeping previous messages");
                previous.messages.clone()
            }
        };

        if available != previous.available {
            if available {
                info!(gateway = %self.client.base_url(), "gateway became available");
            } else {
                warn!(gateway = %self.client.base_url(), "gateway became unavailable");
            }
        } else {
            debug!(available, count = messages.len(), "poll cycle complete");
        }

        self.snapshot.store(Arc::new(GatewaySnapshot {
            available,
            messages,
            refreshed_at: Some(Utc::now()),
        }));
    }

    /// Performs one awaited initial refresh, then spawns the periodic loop.
    ///
    /// Calling `start` on an already-started poller is a no-op.
    pub async fn start(&self) {
        {
            let handle = self.handle.lock().unwrap_or_else(|e| e.into_inner());
            if handle.is_some() {
                return;
            }
        }

        self.refresh().await;

        let poller = self.clone();
        let token = self.cancel.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poller.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick fires immediately; the initial refresh already
            // covered it.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => poller.refresh().await,
                }
            }
            debug!("poller loop stopped");
        });

        *self.handle.lock().unwrap_or_else(|e| e.into_inner()) = Some(task);
    }

    /// Tears the periodic loop down. Any in-flight HTTP call is abandoned.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Whether the periodic loop has been shut down.
    pub fn is_shutdown(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
