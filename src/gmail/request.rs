//! Request construction
//!
//! Pure mapping from (tool descriptor, validated arguments) to the HTTP
//! request a tool issues. No network I/O happens here, which is what makes
//! the endpoint mapping table-testable.

use reqwest::Method;
use serde_json::{json, Map, Value};

use crate::error::{Result, ToolError};
use crate::gmail::mime::{self, MessageFields};
use crate::gmail::registry::ToolDescriptor;

/// Default page size for list endpoints, mirroring the Gmail API examples.
pub const DEFAULT_MAX_RESULTS: u64 = 10;

/// A single Gmail API request, built fresh per tool call and never reused.
#[derive(Debug, Clone)]
pub struct GmailRequest {
    pub method: Method,
    /// Path relative to the API base URL, no leading slash
    pub path: String,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<Value>,
}

/// Map a validated tool call onto a `GmailRequest`.
///
/// Fails with `UnsupportedOperation` only if a descriptor exists without a
/// builder rule below; the registry consistency test keeps that from
/// happening in practice.
pub fn build(descriptor: &ToolDescriptor, args: &Map<String, Value>) -> Result<GmailRequest> {
    let request = match descriptor.name {
        // ==================== Messages ====================
        "gmail_list_messages" => {
            let mut query = list_query(args);
            if bool_arg(args, "include_spam_trash").unwrap_or(false) {
                query.push(("includeSpamTrash", "true".to_string()));
            }
            GmailRequest {
                method: Method::GET,
                path: "users/me/messages".to_string(),
                query,
                body: None,
            }
        }
        "gmail_get_message" => GmailRequest {
            method: Method::GET,
            path: format!("users/me/messages/{}", require_str(args, "message_id")?),
            query: format_query(args),
            body: None,
        },
        "gmail_send_message" => GmailRequest {
            method: Method::POST,
            path: "users/me/messages/send".to_string(),
            query: Vec::new(),
            body: Some(json!({ "raw": raw_payload(args)? })),
        },
        "gmail_trash_message" => message_action(args, "trash")?,
        "gmail_untrash_message" => message_action(args, "untrash")?,
        "gmail_modify_message" => {
            let mut body = Map::new();
            if let Some(add) = list_arg(args, "add_label_ids") {
                body.insert("addLabelIds".to_string(), Value::Array(add));
            }
            if let Some(remove) = list_arg(args, "remove_label_ids") {
                body.insert("removeLabelIds".to_string(), Value::Array(remove));
            }
            GmailRequest {
                method: Method::POST,
                path: format!("users/me/messages/{}/modify", require_str(args, "message_id")?),
                query: Vec::new(),
                body: Some(Value::Object(body)),
            }
        }

        // ==================== Threads ====================
        "gmail_list_threads" => GmailRequest {
            method: Method::GET,
            path: "users/me/threads".to_string(),
            query: list_query(args),
            body: None,
        },
        "gmail_get_thread" => GmailRequest {
            method: Method::GET,
            path: format!("users/me/threads/{}", require_str(args, "thread_id")?),
            query: format_query(args),
            body: None,
        },
        "gmail_trash_thread" => GmailRequest {
            method: Method::POST,
            path: format!("users/me/threads/{}/trash", require_str(args, "thread_id")?),
            query: Vec::new(),
            body: None,
        },

        // ==================== Labels ====================
        "gmail_list_labels" => GmailRequest {
            method: Method::GET,
            path: "users/me/labels".to_string(),
            query: Vec::new(),
            body: None,
        },
        "gmail_get_label" => GmailRequest {
            method: Method::GET,
            path: format!("users/me/labels/{}", require_str(args, "label_id")?),
            query: Vec::new(),
            body: None,
        },
        "gmail_create_label" => GmailRequest {
            method: Method::POST,
            path: "users/me/labels".to_string(),
            query: Vec::new(),
            body: Some(json!({
                "name": require_str(args, "name")?,
                "labelListVisibility": str_arg(args, "label_list_visibility").unwrap_or("labelShow"),
                "messageListVisibility": str_arg(args, "message_list_visibility").unwrap_or("show"),
            })),
        },
        "gmail_delete_label" => GmailRequest {
            method: Method::DELETE,
            path: format!("users/me/labels/{}", require_str(args, "label_id")?),
            query: Vec::new(),
            body: None,
        },

        // ==================== Drafts ====================
        "gmail_list_drafts" => {
            let mut query = vec![("maxResults", max_results(args).to_string())];
            if let Some(token) = str_arg(args, "page_token") {
                query.push(("pageToken", token.to_string()));
            }
            GmailRequest {
                method: Method::GET,
                path: "users/me/drafts".to_string(),
                query,
                body: None,
            }
        }
        "gmail_get_draft" => GmailRequest {
            method: Method::GET,
            path: format!("users/me/drafts/{}", require_str(args, "draft_id")?),
            query: format_query(args),
            body: None,
        },
        "gmail_create_draft" => GmailRequest {
            method: Method::POST,
            path: "users/me/drafts".to_string(),
            query: Vec::new(),
            body: Some(json!({ "message": { "raw": raw_payload(args)? } })),
        },
        "gmail_send_draft" => GmailRequest {
            method: Method::POST,
            path: "users/me/drafts/send".to_string(),
            query: Vec::new(),
            body: Some(json!({ "id": require_str(args, "draft_id")? })),
        },
        "gmail_delete_draft" => GmailRequest {
            method: Method::DELETE,
            path: format!("users/me/drafts/{}", require_str(args, "draft_id")?),
            query: Vec::new(),
            body: None,
        },

        // ==================== Profile ====================
        "gmail_get_profile" => GmailRequest {
            method: Method::GET,
            path: "users/me/profile".to_string(),
            query: Vec::new(),
            body: None,
        },

        name => {
            return Err(ToolError::UnsupportedOperation {
                name: name.to_string(),
            })
        }
    };

    Ok(request)
}

// ==================== Argument accessors ====================

fn str_arg<'a>(args: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    args.get(name).and_then(Value::as_str)
}

fn require_str<'a>(args: &'a Map<String, Value>, name: &'static str) -> Result<&'a str> {
    str_arg(args, name).ok_or_else(|| ToolError::invalid_argument(name, "missing required argument"))
}

fn bool_arg(args: &Map<String, Value>, name: &str) -> Option<bool> {
    args.get(name).and_then(Value::as_bool)
}

fn list_arg(args: &Map<String, Value>, name: &str) -> Option<Vec<Value>> {
    args.get(name).and_then(Value::as_array).cloned()
}

fn max_results(args: &Map<String, Value>) -> u64 {
    args.get("max_results")
        .and_then(Value::as_u64)
        .unwrap_or(DEFAULT_MAX_RESULTS)
}

/// Common query parameters for `messages.list` / `threads.list`.
fn list_query(args: &Map<String, Value>) -> Vec<(&'static str, String)> {
    let mut query = vec![("maxResults", max_results(args).to_string())];
    if let Some(q) = str_arg(args, "query").filter(|q| !q.is_empty()) {
        query.push(("q", q.to_string()));
    }
    if let Some(labels) = list_arg(args, "label_ids") {
        for label in labels {
            if let Some(label) = label.as_str() {
                query.push(("labelIds", label.trim().to_string()));
            }
        }
    }
    if let Some(token) = str_arg(args, "page_token") {
        query.push(("pageToken", token.to_string()));
    }
    query
}

/// `format` query parameter for get endpoints, defaulting to `full`.
fn format_query(args: &Map<String, Value>) -> Vec<(&'static str, String)> {
    vec![("format", str_arg(args, "format").unwrap_or("full").to_string())]
}

/// Empty-bodied POST against `users/me/messages/{id}/{action}`.
fn message_action(args: &Map<String, Value>, action: &str) -> Result<GmailRequest> {
    Ok(GmailRequest {
        method: Method::POST,
        path: format!("users/me/messages/{}/{}", require_str(args, "message_id")?, action),
        query: Vec::new(),
        body: None,
    })
}

/// The `raw` message payload for send/draft tools: either supplied verbatim
/// or assembled from structured fields.
fn raw_payload(args: &Map<String, Value>) -> Result<String> {
    if let Some(raw) = str_arg(args, "raw") {
        return Ok(raw.to_string());
    }
    let fields = MessageFields {
        to: require_field(args, "to")?.to_string(),
        subject: require_field(args, "subject")?.to_string(),
        body: require_field(args, "body")?.to_string(),
        cc: str_arg(args, "cc").map(str::to_string),
        bcc: str_arg(args, "bcc").map(str::to_string),
    };
    mime::build_raw_message(&fields)
}

fn require_field<'a>(args: &'a Map<String, Value>, name: &'static str) -> Result<&'a str> {
    str_arg(args, name).ok_or_else(|| {
        ToolError::invalid_argument(name, "required unless 'raw' is supplied")
    })
}
