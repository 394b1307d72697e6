// SPDX-FileCopyrightText: 2026 Smsgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry of configured gateway devices.
//!
//! The composition root owns one [`GatewayRegistry`] keyed by gateway name;
//! there is no process-wide shared state. Each entry bundles the shared
//! HTTP client, its poller, and a notifier. Removing an entry shuts its
//! poller down and drops the client, releasing the pooled connections.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use smsgate_client::GatewayClient;
use smsgate_config::model::{GatewayConfig, SmsGateConfig};
use smsgate_core::SmsGateError;
use smsgate_notify::Notifier;
use smsgate_poller::StatusPoller;
use tracing::{debug, info};

/// One configured gateway device and its runtime components.
#[derive(Debug)]
pub struct GatewayEntry {
    pub config: GatewayConfig,
    pub client: Arc<GatewayClient>,
    pub poller: StatusPoller,
    pub notifier: Notifier,
}

/// Name-keyed registry of gateway entries.
///
/// Iteration order is the sorted name order, so "the first gateway" is
/// deterministic when a command does not name one.
pub struct GatewayRegistry {
    entries: BTreeMap<String, GatewayEntry>,
}

impl GatewayRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Build a registry with one entry per configured `[[gateways]]` block.
    pub fn from_config(config: &SmsGateConfig) -> Result<Self, SmsGateError> {
        let mut registry = Self::new();
        for gateway in &config.gateways {
            registry.insert(gateway.clone(), config)?;
        }
        Ok(registry)
    }

    /// Create and register the runtime components for one gateway.
    pub fn insert(
        &mut self,
        gateway: GatewayConfig,
        config: &SmsGateConfig,
    ) -> Result<(), SmsGateError> {
        let client = Arc::new(GatewayClient::new(
            gateway.base_url(),
            &gateway.username,
            &gateway.password,
        )?);
        let poller = StatusPoller::new(
            Arc::clone(&client),
            Duration::from_secs(config.poll.interval_secs),
            config.poll.messages_limit,
        );
        let notifier = Notifier::new(
            Arc::clone(&client),
            config.recipients.clone(),
            config.templates.clone(),
        );

        debug!(gateway = %gateway.name, url = %gateway.base_url(), "gateway registered");
        self.entries.insert(
            gateway.name.clone(),
            GatewayEntry {
                config: gateway,
                client,
                poller,
                notifier,
            },
        );
        Ok(())
    }

    /// Get a gateway entry by name.
    pub fn get(&self, name: &str) -> Option<&GatewayEntry> {
        self.entries.get(name)
    }

    /// Resolve a gateway selection: by name when given, otherwise the first
    /// configured entry.
    pub fn get_or_first(&self, name: Option<&str>) -> Result<&GatewayEntry, SmsGateError> {
        match name {
            Some(name) => self.get(name).ok_or_else(|| SmsGateError::GatewayNotFound {
                name: name.to_string(),
            }),
            None => self
                .entries
                .values()
                .next()
                .ok_or_else(|| SmsGateError::Config("no [[gateways]] configured".into())),
        }
    }

    /// Remove one gateway, shutting its poller down.
    ///
    /// Returns `false` when no entry had that name. The dropped entry
    /// releases the HTTP connection pool while other gateways keep running.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.entries.remove(name) {
            Some(entry) => {
                entry.poller.shutdown();
                info!(gateway = name, "gateway removed");
                true
            }
            None => false,
        }
    }

    /// Start every poller, awaiting each one's initial refresh.
    pub async fn start_all(&self) {
        for entry in self.entries.values() {
            entry.poller.start().await;
        }
    }

    /// Shut every poller down.
    pub fn shutdown_all(&self) {
        for entry in self.entries.values() {
            entry.poller.shutdown();
        }
    }

    /// Iterate entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = &GatewayEntry> {
        self.entries.values()
    }

    /// Number of registered gateways.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no gateways are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for GatewayRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(name: &str) -> GatewayConfig {
        GatewayConfig {
            name: name.into(),
            host: "10.0.0.2".into(),
            port: 8080,
            username: "sms".into(),
            password: "secret".into(),
        }
    }

    fn config_with(names: &[&str]) -> SmsGateConfig {
        SmsGateConfig {
            gateways: names.iter().map(|n| gateway(n)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn from_config_registers_all_gateways() {
        let registry = GatewayRegistry::from_config(&config_with(&["home", "garage"])).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.get("home").is_some());
        assert!(registry.get("garage").is_some());
    }

    #[test]
    fn get_or_first_picks_first_in_name_order() {
        let registry = GatewayRegistry::from_config(&config_with(&["zulu", "alpha"])).unwrap();
        let entry = registry.get_or_first(None).unwrap();
        assert_eq!(entry.config.name, "alpha");
    }

    #[test]
    fn get_or_first_honors_explicit_name() {
        let registry = GatewayRegistry::from_config(&config_with(&["home", "garage"])).unwrap();
        let entry = registry.get_or_first(Some("garage")).unwrap();
        assert_eq!(entry.config.name, "garage");
    }

    #[test]
    fn get_or_first_fails_for_unknown_name() {
        let registry = GatewayRegistry::from_config(&config_with(&["home"])).unwrap();
        let err = registry.get_or_first(Some("nope")).unwrap_err();
        assert!(matches!(err, SmsGateError::GatewayNotFound { .. }));
    }

    #[test]
    fn get_or_first_fails_on_empty_registry() {
        let registry = GatewayRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get_or_first(None).is_err());
    }

    #[test]
    fn remove_shuts_poller_down_and_forgets_entry() {
        let mut registry = GatewayRegistry::from_config(&config_with(&["home", "garage"])).unwrap();
        let poller = registry.get("home").unwrap().poller.clone();

        assert!(registry.remove("home"));
        assert!(poller.is_shutdown());
        assert!(registry.get("home").is_none());
        // The other gateway is untouched.
        assert!(!registry.get("garage").unwrap().poller.is_shutdown());

        assert!(!registry.remove("home"));
    }

    #[test]
    fn shutdown_all_cancels_every_poller() {
        let registry = GatewayRegistry::from_config(&config_with(&["home", "garage"])).unwrap();
        registry.shutdown_all();
        for entry in registry.iter() {
            assert!(entry.poller.is_shutdown());
        }
    }
}
