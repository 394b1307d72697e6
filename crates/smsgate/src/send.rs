// SPDX-FileCopyrightText: 2026 Smsgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `smsgate send` command implementation.
//!
//! One-shot send through a configured gateway: resolve recipients and
//! template, transmit, print the device-assigned message id.

use std::collections::HashMap;

use smsgate_config::model::SmsGateConfig;
use smsgate_core::SmsGateError;
use tracing::info;

use crate::registry::GatewayRegistry;

/// Runs the `smsgate send` command.
///
/// Prints the device-assigned message id on success, or `accepted` when the
/// device omitted one. Failures propagate to the caller for a nonzero exit.
pub async fn run_send(
    config: &SmsGateConfig,
    gateway: Option<&str>,
    message: &str,
    to: &[String],
    template: Option<&str>,
    vars: &HashMap<String, String>,
) -> Result<(), SmsGateError> {
    let registry = GatewayRegistry::from_config(config)?;
    let entry = registry.get_or_first(gateway)?;

    let id = entry.notifier.send(message, to, template, vars).await?;
    match id {
        Some(id) => {
            info!(gateway = %entry.config.name, id = %id.0, "message accepted");
            println!("{}", id.0);
        }
        None => {
            info!(gateway = %entry.config.name, "message accepted without id");
            println!("accepted");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use smsgate_config::model::GatewayConfig;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> SmsGateConfig {
        // The mock server URI is http://host:port, which maps onto the
        // host/port split the config model uses.
        let uri = server.uri();
        let without_scheme = uri.trim_start_matches("http://");
        let (host, port) = without_scheme.split_once(':').expect("host:port");
        SmsGateConfig {
            gateways: vec![GatewayConfig {
                name: "test".into(),
                host: host.to_string(),
                port: port.parse().expect("port"),
                username: "sms".into(),
                password: "secret".into(),
            }],
            recipients: HashMap::from([("alice".to_string(), "+15550001111".to_string())]),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn send_command_resolves_and_transmits() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .and(body_json(serde_json::json!({
                "phoneNumbers": ["+15550001111"],
                "textMessage": {"text": "hello"},
                "priority": 100,
                "ttl": 3600,
            })))
            .respond_with(
                ResponseTemplate::new(202).insert_header("Location", "/messages/cli-1"),
            )
            .mount(&server)
            .await;

        let config = config_for(&server);
        let result = run_send(
            &config,
            None,
            "hello",
            &["alice".into()],
            None,
            &HashMap::new(),
        )
        .await;
        assert!(result.is_ok(), "got: {result:?}");
    }

    #[tokio::test]
    async fn send_command_fails_for_unknown_gateway() {
        let server = MockServer::start().await;
        let config = config_for(&server);
        let err = run_send(
            &config,
            Some("nope"),
            "hello",
            &["alice".into()],
            None,
            &HashMap::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SmsGateError::GatewayNotFound { .. }));
    }
}
