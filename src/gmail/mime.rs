//! RFC 2822 message construction
//!
//! Builds the base64url-encoded `raw` payload that `messages.send` and
//! `drafts.create` expect. Only plain-text single-part messages are
//! produced here; callers that need richer MIME supply `raw` themselves.

use base64::{engine::general_purpose::STANDARD, engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use crate::error::{Result, ToolError};

/// Structured fields for an outgoing message.
#[derive(Debug, Clone, Default)]
pub struct MessageFields {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub cc: Option<String>,
    pub bcc: Option<String>,
}

/// Validate a single email address. Deliberately loose: Gmail is the final
/// arbiter, this only catches obvious slips before a network round trip.
pub fn validate_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !local.contains(' ')
        && !domain.contains(' ')
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// Encode text for a MIME header (RFC 2047, base64 variant) when it carries
/// non-ASCII characters.
pub fn encode_mime_header(text: &str) -> String {
    if text.chars().all(|c| c.is_ascii() && c != '\r' && c != '\n') {
        return text.to_string();
    }
    format!("=?UTF-8?B?{}?=", STANDARD.encode(text.as_bytes()))
}

/// Encode a raw RFC 2822 message for the Gmail API (base64url, no padding).
pub fn encode_raw_message(message: &str) -> String {
    URL_SAFE_NO_PAD.encode(message.as_bytes())
}

/// Build the base64url-encoded `raw` value from structured fields.
///
/// Recipient lists are comma-separated; each address is checked before the
/// message is assembled.
pub fn build_raw_message(fields: &MessageFields) -> Result<String> {
    check_addresses("to", &fields.to)?;
    if let Some(cc) = &fields.cc {
        check_addresses("cc", cc)?;
    }
    if let Some(bcc) = &fields.bcc {
        check_addresses("bcc", bcc)?;
    }

    let mut lines = Vec::new();
    lines.push(format!("To: {}", fields.to));
    if let Some(cc) = fields.cc.as_deref().filter(|s| !s.is_empty()) {
        lines.push(format!("Cc: {}", cc));
    }
    if let Some(bcc) = fields.bcc.as_deref().filter(|s| !s.is_empty()) {
        lines.push(format!("Bcc: {}", bcc));
    }
    lines.push(format!("Subject: {}", encode_mime_header(&fields.subject)));
    lines.push("MIME-Version: 1.0".to_string());
    lines.push("Content-Type: text/plain; charset=UTF-8".to_string());
    lines.push("Content-Transfer-Encoding: 7bit".to_string());
    lines.push(String::new());
    lines.push(fields.body.clone());

    Ok(encode_raw_message(&lines.join("\r\n")))
}

fn check_addresses(field: &str, list: &str) -> Result<()> {
    for address in list.split(',') {
        let address = address.trim();
        if !address.is_empty() && !validate_email(address) {
            return Err(ToolError::invalid_argument(
                field,
                format!("invalid email address: {address}"),
            ));
        }
    }
    Ok(())
}
