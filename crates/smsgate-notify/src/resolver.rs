// SPDX-FileCopyrightText: 2026 Smsgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure recipient and template resolution.
//!
//! Maps human-friendly recipient names to phone numbers and renders
//! `{{identifier}}`-style message templates against a string context.
//! No I/O; [`resolve`] is total and never returns an error. A template
//! that fails to render falls back to the raw message with a logged
//! warning.

use std::collections::HashMap;

use thiserror::Error;
use tracing::warn;

/// Friendly name -> phone number, supplied by configuration.
pub type RecipientDirectory = HashMap<String, String>;

/// Template name -> template body, supplied by configuration.
pub type TemplateDirectory = HashMap<String, String>;

/// A template body that cannot be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unclosed placeholder at byte {position}")]
    UnclosedPlaceholder { position: usize },

    #[error("empty placeholder at byte {position}")]
    EmptyPlaceholder { position: usize },

    #[error("invalid placeholder identifier `{identifier}`")]
    InvalidIdentifier { identifier: String },

    #[error("unknown template variable `{identifier}`")]
    UnknownVariable { identifier: String },
}

/// Render a template body, substituting `{{identifier}}` placeholders from
/// `ctx`. Identifiers are `[A-Za-z0-9_]+`; whitespace inside the braces is
/// allowed (`{{ message }}`).
pub fn render_template(
    body: &str,
    ctx: &HashMap<String, String>,
) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(body.len());
    let mut rest = body;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let position = body.len() - rest.len() + start;
        let after = &rest[start + 2..];

        let Some(end) = after.find("}}") else {
            return Err(TemplateError::UnclosedPlaceholder { position });
        };

        let identifier = after[..end].trim();
        if identifier.is_empty() {
            return Err(TemplateError::EmptyPlaceholder { position });
        }
        if !identifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(TemplateError::InvalidIdentifier {
                identifier: identifier.to_string(),
            });
        }

        let value = ctx
            .get(identifier)
            .ok_or_else(|| TemplateError::UnknownVariable {
                identifier: identifier.to_string(),
            })?;
        out.push_str(value);

        rest = &after[end + 2..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Map recipient entries to phone numbers.
///
/// Each entry is trimmed; empties are skipped. Directory hits substitute
/// the mapped number (also trimmed); misses pass through unchanged as
/// literal phone numbers. Output order matches input order.
pub fn resolve_recipients(recipients: &[String], directory: &RecipientDirectory) -> Vec<String> {
    recipients
        .iter()
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(|entry| match directory.get(entry) {
            Some(number) => number.trim().to_string(),
            None => entry.to_string(),
        })
        .collect()
}

/// Resolve a send request into `(phone_numbers, final_text)`.
///
/// The template context is `{message}` merged with `template_data`, where
/// caller-supplied keys win collisions. An unknown template name leaves the
/// message verbatim; a rendering failure is reported as a warning and falls
/// back to the raw message.
pub fn resolve(
    message: &str,
    recipients: &[String],
    template_name: Option<&str>,
    template_data: &HashMap<String, String>,
    recipient_directory: &RecipientDirectory,
    template_directory: &TemplateDirectory,
) -> (Vec<String>, String) {
    let phone_numbers = resolve_recipients(recipients, recipient_directory);

    let final_text = match template_name.and_then(|name| {
        template_directory.get(name).map(|body| (name, body))
    }) {
        Some((name, body)) => {
            let mut ctx = HashMap::with_capacity(template_data.len() + 1);
            ctx.insert("message".to_string(), message.to_string());
            for (key, value) in template_data {
                ctx.insert(key.clone(), value.clone());
            }
            match render_template(body, &ctx) {
                Ok(text) => text,
                Err(e) => {
                    warn!(template = name, error = %e, "template rendering failed, using raw message");
                    message.to_string()
                }
            }
        }
        None => message.to_string(),
    };

    (phone_numbers, final_text)
}
