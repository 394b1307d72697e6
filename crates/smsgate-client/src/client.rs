// SPDX-FileCopyrightText: 2026 Smsgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the device's local REST server (Basic Auth only).
//!
//! Every operation is stateless per call and shares one pooled
//! [`reqwest::Client`] for the lifetime of the configured device. Health,
//! listing, and fetch-by-id degrade to absent/empty results on any failure;
//! only sends surface a typed error, because a sending caller needs the
//! rejection diagnostic.

use std::time::Duration;

use reqwest::StatusCode;
use smsgate_core::{GatewayMessage, MessageId, SmsGateError};
use tracing::{debug, warn};

use crate::types::{ListQuery, SendMessageRequest, SendOptions, TextMessage, WireMessage};

const PATH_MESSAGES: &str = "/messages";
const PATH_MESSAGE_LEGACY: &str = "/message";
const PATH_HEALTH: &str = "/health";
const PATH_HEALTH_READY: &str = "/health/ready";

const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);
const SEND_TIMEOUT: Duration = Duration::from_secs(30);
const LIST_TIMEOUT: Duration = Duration::from_secs(15);
const GET_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum length of the response-body excerpt carried in send failures.
const BODY_EXCERPT_MAX: usize = 100;

/// HTTP client for one gateway device.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
}

impl GatewayClient {
    /// Creates a client for the device at `base_url` with Basic Auth
    /// credentials. The underlying connection pool is reused across all
    /// calls and released when the client is dropped.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, SmsGateError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| SmsGateError::Gateway {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
        })
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Checks device availability via `GET /health`, falling back to
    /// `GET /health/ready` on 404.
    ///
    /// Returns the parsed health body (`{}` when the device sends an empty
    /// or non-JSON body) on 200, or `None` on any other status or transport
    /// error. Never returns an error to the caller.
    pub async fn check_health(&self) -> Option<serde_json::Value> {
        for path in [PATH_HEALTH, PATH_HEALTH_READY] {
            let response = match self
                .client
                .get(self.url(path))
                .basic_auth(&self.username, Some(&self.password))
                .timeout(HEALTH_TIMEOUT)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    debug!(path, error = %e, "health request failed");
                    return None;
                }
            };

            let status = response.status();
            if status == StatusCode::NOT_FOUND {
                debug!(path, "health path not found, trying fallback");
                continue;
            }
            if status != StatusCode::OK {
                warn!(path, status = %status, "health check returned unexpected status");
                return None;
            }

            return match response.text().await {
                Ok(body) if body.trim().is_empty() => Some(serde_json::json!({})),
                Ok(body) => match serde_json::from_str(&body) {
                    Ok(value) => Some(value),
                    Err(e) => {
                        debug!(path, error = %e, "health body is not JSON, treating as available");
                        Some(serde_json::json!({}))
                    }
                },
                Err(e) => {
                    debug!(path, error = %e, "failed to read health body");
                    None
                }
            };
        }
        None
    }

    /// Sends a message via `POST /messages`, falling back once to the
    /// legacy `POST /message` path on 404.
    ///
    /// Success is HTTP 202; the message id is the last path segment of the
    /// `Location` header, absent when the device omits the header. Any other
    /// status fails with a truncated body excerpt. Transport errors fail
    /// immediately without trying the legacy path.
    pub async fn send_message(
        &self,
        phone_numbers: &[String],
        text: &str,
        options: &SendOptions,
    ) -> Result<Option<MessageId>, SmsGateError> {
        if phone_numbers.is_empty() {
            return Err(SmsGateError::EmptyRecipients);
        }

        let body = SendMessageRequest {
            phone_numbers: phone_numbers.to_vec(),
            text_message: TextMessage {
                text: text.to_string(),
            },
            priority: options.priority,
            ttl: options.ttl,
            sim_number: options.sim_number,
        };

        let mut query: Vec<(&str, &str)> = Vec::new();
        if options.skip_validation {
            query.push(("skipPhoneValidation", "true"));
        }

        for path in [PATH_MESSAGES, PATH_MESSAGE_LEGACY] {
            let response = self
                .client
                .post(self.url(path))
                .basic_auth(&self.username, Some(&self.password))
                .query(&query)
                .json(&body)
                .timeout(SEND_TIMEOUT)
                .send()
                .await
                .map_err(|e| SmsGateError::Gateway {
                    message: format!("send request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            if status == StatusCode::ACCEPTED {
                let id = response
                    .headers()
                    .get(reqwest::header::LOCATION)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|location| location.rsplit('/').next())
                    .filter(|segment| !segment.is_empty())
                    .map(|segment| MessageId(segment.to_string()));
                debug!(path, id = ?id, "message accepted by gateway");
                return Ok(id);
            }
            if status == StatusCode::NOT_FOUND {
                debug!(path, "send path not found, trying legacy path");
                continue;
            }

            let body_text = response.text().await.unwrap_or_default();
            let excerpt = body_excerpt(&body_text);
            warn!(path, status = %status, body = %excerpt, "gateway rejected send");
            return Err(SmsGateError::Gateway {
                message: format!("HTTP {}: {excerpt}", status.as_u16()),
                source: None,
            });
        }

        Err(SmsGateError::Gateway {
            message: format!("not found (404) for {PATH_MESSAGES} and {PATH_MESSAGE_LEGACY}"),
            source: None,
        })
    }

    /// Fetches the messages listing via `GET /messages`, surfacing failures.
    ///
    /// The poller uses this form to tell a transport failure apart from a
    /// genuinely empty mailbox; everything else should prefer
    /// [`list_messages`](Self::list_messages).
    pub async fn try_list_messages(
        &self,
        query: &ListQuery,
    ) -> Result<Vec<GatewayMessage>, SmsGateError> {
        let mut params: Vec<(&str, String)> = vec![
            ("limit", query.limit.to_string()),
            ("offset", query.offset.to_string()),
        ];
        if let Some(state) = query.state {
            params.push(("state", state.to_string()));
        }

        let response = self
            .client
            .get(self.url(PATH_MESSAGES))
            .basic_auth(&self.username, Some(&self.password))
            .query(&params)
            .timeout(LIST_TIMEOUT)
            .send()
            .await
            .map_err(|e| SmsGateError::Gateway {
                message: format!("list request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(SmsGateError::Gateway {
                message: format!("list returned HTTP {}", status.as_u16()),
                source: None,
            });
        }

        let wire: Vec<WireMessage> = response.json().await.map_err(|e| SmsGateError::Gateway {
            message: format!("failed to parse messages listing: {e}"),
            source: Some(Box::new(e)),
        })?;
        Ok(wire.into_iter().map(GatewayMessage::from).collect())
    }

    /// Fetches the messages listing, degrading to an empty list on any
    /// failure. No error ever escapes this call.
    pub async fn list_messages(&self, query: &ListQuery) -> Vec<GatewayMessage> {
        match self.try_list_messages(query).await {
            Ok(messages) => messages,
            Err(e) => {
                warn!(error = %e, "message listing failed");
                Vec::new()
            }
        }
    }

    /// Fetches one message by id via `GET /messages/{id}`.
    ///
    /// Returns `None` on any non-200 status or parse failure.
    pub async fn get_message(&self, id: &str) -> Option<GatewayMessage> {
        let response = match self
            .client
            .get(self.url(&format!("{PATH_MESSAGES}/{id}")))
            .basic_auth(&self.username, Some(&self.password))
            .timeout(GET_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                debug!(id, error = %e, "message fetch failed");
                return None;
            }
        };

        if response.status() != StatusCode::OK {
            debug!(id, status = %response.status(), "message not found");
            return None;
        }

        match response.json::<WireMessage>().await {
            Ok(wire) => Some(GatewayMessage::from(wire)),
            Err(e) => {
                debug!(id, error = %e, "failed to parse message");
                None
            }
        }
    }
}

/// Truncate a response body for diagnostics, respecting char boundaries.
fn body_excerpt(body: &str) -> &str {
    match body.char_indices().nth(BODY_EXCERPT_MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smsgate_core::MessageState;
    use wiremock::matchers::{
        basic_auth, body_json, method, path, query_param, query_param_is_missing,
    };
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> GatewayClient {
        GatewayClient::new(server.uri(), "sms", "secret").unwrap()
    }

    #[tokio::test]
    async fn check_health_returns_body_on_200() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .and(basic_auth("sms", "secret"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "ok"})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server);
        let health = client.check_health().await.expect("should be available");
        assert_eq!(health["status"], "ok");
    }

    #[tokio::test]
    async fn check_health_falls_back_to_ready_path_on_404() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        // Fallback path answers 200 with an empty body.
        Mock::given(method("GET"))
            .and(path("/health/ready"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let health = client.check_health().await.expect("fallback should succeed");
        assert_eq!(health, serde_json::json!({}));
    }

    #[tokio::test]
    async fn check_health_unavailable_on_500() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = test_client(&server);
        assert!(client.check_health().await.is_none());
    }

    #[tokio::test]
    async fn check_health_unavailable_when_both_paths_missing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = test_client(&server);
        assert!(client.check_health().await.is_none());
    }

    #[tokio::test]
    async fn check_health_unavailable_when_unreachable() {
        // Nothing listens on this port.
        let client = GatewayClient::new("http://127.0.0.1:9", "sms", "secret").unwrap();
        assert!(client.check_health().await.is_none());
    }

    #[tokio::test]
    async fn send_message_extracts_id_from_location() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .and(basic_auth("sms", "secret"))
            .and(query_param("skipPhoneValidation", "true"))
            .and(body_json(serde_json::json!({
                "phoneNumbers": ["+15551234567"],
                "textMessage": {"text": "Test"},
                "priority": 100,
                "ttl": 3600,
            })))
            .respond_with(
                ResponseTemplate::new(202).insert_header("Location", "/messages/abc123"),
            )
            .mount(&server)
            .await;

        let client = test_client(&server);
        let id = client
            .send_message(&["+15551234567".into()], "Test", &SendOptions::default())
            .await
            .unwrap();
        assert_eq!(id, Some(MessageId("abc123".into())));
    }

    #[tokio::test]
    async fn send_message_falls_back_to_legacy_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        // Legacy path accepts but omits the Location header.
        Mock::given(method("POST"))
            .and(path("/message"))
            .respond_with(ResponseTemplate::new(202))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let id = client
            .send_message(&["+15551234567".into()], "Test", &SendOptions::default())
            .await
            .unwrap();
        assert_eq!(id, None);
    }

    #[tokio::test]
    async fn send_message_fails_when_both_paths_missing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client
            .send_message(&["+15551234567".into()], "Test", &SendOptions::default())
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("/messages") && message.contains("/message"), "got: {message}");
    }

    #[tokio::test]
    async fn send_message_truncates_rejection_body() {
        let server = MockServer::start().await;
        let long_body = "x".repeat(500);
        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(400).set_body_string(long_body))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client
            .send_message(&["+15551234567".into()], "Test", &SendOptions::default())
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("HTTP 400"), "got: {message}");
        // "gateway error: HTTP 400: " prefix plus at most 100 chars of body.
        assert!(message.len() < 150, "diagnostic not truncated: {} chars", message.len());
    }

    #[tokio::test]
    async fn send_message_omits_validation_param_when_disabled() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .and(query_param_is_missing("skipPhoneValidation"))
            .respond_with(
                ResponseTemplate::new(202).insert_header("Location", "/messages/m9"),
            )
            .mount(&server)
            .await;

        let client = test_client(&server);
        let options = SendOptions {
            skip_validation: false,
            ..SendOptions::default()
        };
        let id = client
            .send_message(&["+15551234567".into()], "Test", &options)
            .await
            .unwrap();
        assert_eq!(id, Some(MessageId("m9".into())));
    }

    #[tokio::test]
    async fn send_message_includes_sim_number() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .and(body_json(serde_json::json!({
                "phoneNumbers": ["+15551234567"],
                "textMessage": {"text": "Test"},
                "priority": 50,
                "ttl": 120,
                "simNumber": 2,
            })))
            .respond_with(
                ResponseTemplate::new(202).insert_header("Location", "/messages/m1"),
            )
            .mount(&server)
            .await;

        let client = test_client(&server);
        let options = SendOptions {
            priority: 50,
            ttl: 120,
            sim_number: Some(2),
            skip_validation: true,
        };
        let id = client
            .send_message(&["+15551234567".into()], "Test", &options)
            .await
            .unwrap();
        assert_eq!(id, Some(MessageId("m1".into())));
    }

    #[tokio::test]
    async fn send_message_rejects_empty_recipients() {
        let client = GatewayClient::new("http://127.0.0.1:9", "sms", "secret").unwrap();
        let err = client
            .send_message(&[], "Test", &SendOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SmsGateError::EmptyRecipients));
    }

    #[tokio::test]
    async fn send_message_surfaces_transport_error() {
        let client = GatewayClient::new("http://127.0.0.1:9", "sms", "secret").unwrap();
        let err = client
            .send_message(&["+15551234567".into()], "Test", &SendOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SmsGateError::Gateway { .. }));
    }

    #[tokio::test]
    async fn list_messages_parses_and_normalizes_recipients() {
        let server = MockServer::start().await;
        let listing = serde_json::json!([
            {"id": "m1", "state": "Pending", "recipients": ["+15550001111"], "deviceId": "dev-1"},
            {"id": "m2", "state": "Delivered", "recipients": [{"phoneNumber": "+15550002222"}]},
        ]);
        Mock::given(method("GET"))
            .and(path("/messages"))
            .and(query_param("limit", "20"))
            .and(query_param("offset", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&listing))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let messages = client.list_messages(&ListQuery::default()).await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].state, MessageState::Pending);
        assert_eq!(messages[0].recipients, vec!["+15550001111"]);
        assert_eq!(messages[1].recipients, vec!["+15550002222"]);
    }

    #[tokio::test]
    async fn list_messages_passes_state_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/messages"))
            .and(query_param("state", "Pending"))
            .and(query_param("limit", "5"))
            .and(query_param("offset", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let query = ListQuery {
            state: Some(MessageState::Pending),
            limit: 5,
            offset: 10,
        };
        let messages = client.list_messages(&query).await;
        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn list_messages_empty_on_500() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let messages = client.list_messages(&ListQuery::default()).await;
        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn try_list_messages_surfaces_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result = client.try_list_messages(&ListQuery::default()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn get_message_returns_parsed_message() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "id": "abc123", "state": "Sent",
            "recipients": ["+15551234567"], "deviceId": "dev-1",
        });
        Mock::given(method("GET"))
            .and(path("/messages/abc123"))
            .and(basic_auth("sms", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let message = client.get_message("abc123").await.expect("should parse");
        assert_eq!(message.id, "abc123");
        assert_eq!(message.state, MessageState::Sent);
    }

    #[tokio::test]
    async fn get_message_absent_on_404() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = test_client(&server);
        assert!(client.get_message("missing").await.is_none());
    }

    #[test]
    fn body_excerpt_respects_char_boundaries() {
        let body = "é".repeat(200);
        let excerpt = body_excerpt(&body);
        assert_eq!(excerpt.chars().count(), 100);
    }

    #[test]
    fn body_excerpt_keeps_short_bodies() {
        assert_eq!(body_excerpt("short"), "short");
    }
}
