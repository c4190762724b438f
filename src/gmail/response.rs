//! Response shaping
//!
//! Maps a raw transport outcome (status + body bytes) to the tool result:
//! pass-through JSON on success, a classified error otherwise. Gmail's own
//! field names (including `nextPageToken` on list responses) are preserved
//! untouched so callers can page through results themselves.

use serde_json::Value;

use crate::error::{Result, ToolError};

/// Raw outcome of an executed Gmail request.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Shape a transport outcome into the tool result.
pub fn shape(response: RawResponse) -> Result<Value> {
    let RawResponse { status, body } = response;

    match status {
        200..=299 => {
            // DELETE and trash endpoints can legitimately return no body.
            if body.is_empty() {
                return Ok(Value::Object(Default::default()));
            }
            serde_json::from_slice(&body).map_err(|e| ToolError::UpstreamProtocol {
                message: format!("undecodable response body: {e}"),
            })
        }
        401 | 403 => Err(ToolError::Auth {
            message: upstream_detail(status, &body),
        }),
        404 => Err(ToolError::NotFound {
            message: upstream_detail(status, &body),
        }),
        429 | 500..=599 => Err(ToolError::TransientUpstream {
            message: upstream_detail(status, &body),
        }),
        _ => Err(ToolError::UpstreamProtocol {
            message: upstream_detail(status, &body),
        }),
    }
}

/// Status plus Gmail's error message when the body carries one, the raw text
/// otherwise. Kept short; the host sees this verbatim.
fn upstream_detail(status: u16, body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let gmail_message = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string));
    match gmail_message {
        Some(message) => format!("HTTP {status}: {message}"),
        None if text.trim().is_empty() => format!("HTTP {status}"),
        None => format!("HTTP {status}: {}", text.trim()),
    }
}
