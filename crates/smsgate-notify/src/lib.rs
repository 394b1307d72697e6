// SPDX-FileCopyrightText: 2026 Smsgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification entry point for the smsgate bridge.
//!
//! [`Notifier`] composes the pure resolver with the gateway client: a send
//! request names friendly recipients and an optional template, and comes
//! out the other side as phone numbers plus final text handed to the
//! device.

pub mod resolver;

use std::collections::HashMap;
use std::sync::Arc;

use smsgate_client::{GatewayClient, SendOptions};
use smsgate_core::{MessageId, SmsGateError};
use tracing::warn;

pub use resolver::{
    render_template, resolve, resolve_recipients, RecipientDirectory, TemplateDirectory,
    TemplateError,
};

/// Sends resolved messages through one gateway device.
#[derive(Debug, Clone)]
pub struct Notifier {
    client: Arc<GatewayClient>,
    recipients: RecipientDirectory,
    templates: TemplateDirectory,
}

impl Notifier {
    /// Creates a notifier over `client` with the configured directories.
    pub fn new(
        client: Arc<GatewayClient>,
        recipients: RecipientDirectory,
        templates: TemplateDirectory,
    ) -> Self {
        Self {
            client,
            recipients,
            templates,
        }
    }

    /// Resolves recipients and template, then transmits.
    ///
    /// Refuses to send when resolution yields zero phone numbers; otherwise
    /// the result is the device's opaque message id (absent when the device
    /// omitted it) or the client's send failure.
    pub async fn send(
        &self,
        message: &str,
        recipients: &[String],
        template_name: Option<&str>,
        template_data: &HashMap<String, String>,
    ) -> Result<Option<MessageId>, SmsGateError> {
        self.send_with_options(
            message,
            recipients,
            template_name,
            template_data,
            &SendOptions::default(),
        )
        .await
    }

    /// [`send`](Self::send) with explicit device send options.
    pub async fn send_with_options(
        &self,
        message: &str,
        recipients: &[String],
        template_name: Option<&str>,
        template_data: &HashMap<String, String>,
        options: &SendOptions,
    ) -> Result<Option<MessageId>, SmsGateError> {
        let (phone_numbers, final_text) = resolver::resolve(
            message,
            recipients,
            template_name,
            template_data,
            &self.recipients,
            &self.templates,
        );

        if phone_numbers.is_empty() {
            warn!("send request resolved to no recipients");
            return Err(SmsGateError::EmptyRecipients);
        }

        self.client
            .send_message(&phone_numbers, &final_text, options)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn notifier_for(server_uri: &str) -> Notifier {
        let client = Arc::new(GatewayClient::new(server_uri, "sms", "secret").unwrap());
        Notifier::new(
            client,
            HashMap::from([("alice".to_string(), "+15550001111".to_string())]),
            HashMap::from([("alarm".to_string(), "ALARM: {{message}}".to_string())]),
        )
    }

    #[tokio::test]
    async fn send_resolves_names_and_renders_template() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .and(body_json(serde_json::json!({
                "phoneNumbers": ["+15550001111"],
                "textMessage": {"text": "ALARM: smoke detected"},
                "priority": 100,
                "ttl": 3600,
            })))
            .respond_with(
                ResponseTemplate::new(202).insert_header("Location", "/messages/abc123"),
            )
            .mount(&server)
            .await;

        let notifier = notifier_for(&server.uri());
        let id = notifier
            .send(
                "smoke detected",
                &["alice".into()],
                Some("alarm"),
                &HashMap::new(),
            )
            .await
            .unwrap();
        assert_eq!(id, Some(MessageId("abc123".into())));
    }

    #[tokio::test]
    async fn send_passes_literal_numbers_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .and(body_json(serde_json::json!({
                "phoneNumbers": ["+15559998888"],
                "textMessage": {"text": "hi"},
                "priority": 100,
                "ttl": 3600,
            })))
            .respond_with(ResponseTemplate::new(202))
            .mount(&server)
            .await;

        let notifier = notifier_for(&server.uri());
        let id = notifier
            .send("hi", &["+15559998888".into()], None, &HashMap::new())
            .await
            .unwrap();
        assert_eq!(id, None);
    }

    #[tokio::test]
    async fn send_refuses_empty_resolution_before_any_network_call() {
        // Unreachable address: a network attempt would fail loudly.
        let notifier = notifier_for("http://127.0.0.1:9");
        let err = notifier
            .send("hi", &["   ".into()], None, &HashMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SmsGateError::EmptyRecipients));
    }

    #[tokio::test]
    async fn send_surfaces_gateway_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad number"))
            .mount(&server)
            .await;

        let notifier = notifier_for(&server.uri());
        let err = notifier
            .send("hi", &["alice".into()], None, &HashMap::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("HTTP 400"));
    }
}
