//! Tool descriptor registry
//!
//! One immutable descriptor per supported Gmail operation: the declared
//! parameter schema as explicit (name, type, required) triples, the OAuth
//! scopes the operation needs, and the documented Gmail endpoint. The
//! registry is built once at startup and passed by reference into the
//! dispatcher; there is no process-wide mutable state.

use serde_json::{Map, Value};

use crate::config::gmail::scopes;
use crate::error::{Result, ToolError};

/// Primitive type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Integer,
    Boolean,
    StringList,
}

impl ParamKind {
    /// Name used in validation messages and JSON schemas.
    pub fn type_name(self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Integer => "non-negative integer",
            ParamKind::Boolean => "boolean",
            ParamKind::StringList => "array of strings",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            ParamKind::String => value.is_string(),
            ParamKind::Integer => value.is_u64(),
            ParamKind::Boolean => value.is_boolean(),
            ParamKind::StringList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
        }
    }
}

/// A single declared tool parameter.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub description: &'static str,
}

const fn req(name: &'static str, kind: ParamKind, description: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        kind,
        required: true,
        description,
    }
}

const fn opt(name: &'static str, kind: ParamKind, description: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        kind,
        required: false,
        description,
    }
}

/// Immutable description of one tool: schema, scopes, and the Gmail endpoint
/// it maps to. `method` and `path` document the endpoint; path parameters
/// appear in `{braces}` and are substituted by the request builder.
#[derive(Debug, Clone, Copy)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
    pub scopes: &'static [&'static str],
    pub method: &'static str,
    pub path: &'static str,
}

const MESSAGE_FIELDS: &[ParamSpec] = &[
    opt("to", ParamKind::String, "Recipient email address(es), comma-separated"),
    opt("subject", ParamKind::String, "Email subject"),
    opt("body", ParamKind::String, "Plain-text email body"),
    opt("cc", ParamKind::String, "Cc recipients, comma-separated"),
    opt("bcc", ParamKind::String, "Bcc recipients, comma-separated"),
    opt(
        "raw",
        ParamKind::String,
        "Pre-built base64url-encoded RFC 2822 message; overrides to/subject/body",
    ),
];

/// All supported tools, one entry per Gmail endpoint.
pub const TOOLS: &[ToolDescriptor] = &[
    // ==================== Messages ====================
    ToolDescriptor {
        name: "gmail_list_messages",
        description: "List messages in the user's mailbox. Supports Gmail search syntax like 'from:someone@example.com is:unread'.",
        params: &[
            req("query", ParamKind::String, "Gmail search query"),
            opt("label_ids", ParamKind::StringList, "Only return messages with all of these label IDs"),
            opt("max_results", ParamKind::Integer, "Maximum number of results (default 10)"),
            opt("page_token", ParamKind::String, "Page token from a previous list call"),
            opt("include_spam_trash", ParamKind::Boolean, "Include messages from SPAM and TRASH"),
        ],
        scopes: &[scopes::READONLY],
        method: "GET",
        path: "users/me/messages",
    },
    ToolDescriptor {
        name: "gmail_get_message",
        description: "Get a specific message by ID, including headers and body.",
        params: &[
            req("message_id", ParamKind::String, "ID of the message"),
            opt("format", ParamKind::String, "full, metadata, minimal, or raw (default full)"),
        ],
        scopes: &[scopes::READONLY],
        method: "GET",
        path: "users/me/messages/{message_id}",
    },
    ToolDescriptor {
        name: "gmail_send_message",
        description: "Send an email message to the specified recipients.",
        params: MESSAGE_FIELDS,
        scopes: &[scopes::SEND],
        method: "POST",
        path: "users/me/messages/send",
    },
    ToolDescriptor {
        name: "gmail_trash_message",
        description: "Move a message to trash.",
        params: &[req("message_id", ParamKind::String, "ID of the message")],
        scopes: &[scopes::MODIFY],
        method: "POST",
        path: "users/me/messages/{message_id}/trash",
    },
    ToolDescriptor {
        name: "gmail_untrash_message",
        description: "Remove a message from trash.",
        params: &[req("message_id", ParamKind::String, "ID of the message")],
        scopes: &[scopes::MODIFY],
        method: "POST",
        path: "users/me/messages/{message_id}/untrash",
    },
    ToolDescriptor {
        name: "gmail_modify_message",
        description: "Add or remove labels on a message (INBOX, STARRED, user labels, ...).",
        params: &[
            req("message_id", ParamKind::String, "ID of the message"),
            opt("add_label_ids", ParamKind::StringList, "Label IDs to add"),
            opt("remove_label_ids", ParamKind::StringList, "Label IDs to remove"),
        ],
        scopes: &[scopes::MODIFY],
        method: "POST",
        path: "users/me/messages/{message_id}/modify",
    },
    // ==================== Threads ====================
    ToolDescriptor {
        name: "gmail_list_threads",
        description: "List email threads (conversations) in the user's mailbox.",
        params: &[
            opt("query", ParamKind::String, "Gmail search query"),
            opt("label_ids", ParamKind::StringList, "Only return threads with all of these label IDs"),
            opt("max_results", ParamKind::Integer, "Maximum number of results (default 10)"),
            opt("page_token", ParamKind::String, "Page token from a previous list call"),
        ],
        scopes: &[scopes::READONLY],
        method: "GET",
        path: "users/me/threads",
    },
    ToolDescriptor {
        name: "gmail_get_thread",
        description: "Get a thread (conversation) by ID with all its messages.",
        params: &[
            req("thread_id", ParamKind::String, "ID of the thread"),
            opt("format", ParamKind::String, "full, metadata, or minimal (default full)"),
        ],
        scopes: &[scopes::READONLY],
        method: "GET",
        path: "users/me/threads/{thread_id}",
    },
    ToolDescriptor {
        name: "gmail_trash_thread",
        description: "Move an entire thread to trash.",
        params: &[req("thread_id", ParamKind::String, "ID of the thread")],
        scopes: &[scopes::MODIFY],
        method: "POST",
        path: "users/me/threads/{thread_id}/trash",
    },
    // ==================== Labels ====================
    ToolDescriptor {
        name: "gmail_list_labels",
        description: "List all labels, system (INBOX, SENT, ...) and user-created.",
        params: &[],
        scopes: &[scopes::READONLY],
        method: "GET",
        path: "users/me/labels",
    },
    ToolDescriptor {
        name: "gmail_get_label",
        description: "Get details about a specific label by ID.",
        params: &[req("label_id", ParamKind::String, "ID of the label")],
        scopes: &[scopes::READONLY],
        method: "GET",
        path: "users/me/labels/{label_id}",
    },
    ToolDescriptor {
        name: "gmail_create_label",
        description: "Create a new user label.",
        params: &[
            req("name", ParamKind::String, "Name for the new label"),
            opt("label_list_visibility", ParamKind::String, "labelShow, labelShowIfUnread, or labelHide (default labelShow)"),
            opt("message_list_visibility", ParamKind::String, "show or hide (default show)"),
        ],
        scopes: &[scopes::MODIFY],
        method: "POST",
        path: "users/me/labels",
    },
    ToolDescriptor {
        name: "gmail_delete_label",
        description: "Delete a user-created label. System labels cannot be deleted.",
        params: &[req("label_id", ParamKind::String, "ID of the label")],
        scopes: &[scopes::MODIFY],
        method: "DELETE",
        path: "users/me/labels/{label_id}",
    },
    // ==================== Drafts ====================
    ToolDescriptor {
        name: "gmail_list_drafts",
        description: "List draft emails.",
        params: &[
            opt("max_results", ParamKind::Integer, "Maximum number of results (default 10)"),
            opt("page_token", ParamKind::String, "Page token from a previous list call"),
        ],
        scopes: &[scopes::READONLY],
        method: "GET",
        path: "users/me/drafts",
    },
    ToolDescriptor {
        name: "gmail_get_draft",
        description: "Get a specific draft by ID.",
        params: &[
            req("draft_id", ParamKind::String, "ID of the draft"),
            opt("format", ParamKind::String, "full, metadata, minimal, or raw (default full)"),
        ],
        scopes: &[scopes::READONLY],
        method: "GET",
        path: "users/me/drafts/{draft_id}",
    },
    ToolDescriptor {
        name: "gmail_create_draft",
        description: "Create a new draft email.",
        params: MESSAGE_FIELDS,
        scopes: &[scopes::COMPOSE],
        method: "POST",
        path: "users/me/drafts",
    },
    ToolDescriptor {
        name: "gmail_send_draft",
        description: "Send an existing draft.",
        params: &[req("draft_id", ParamKind::String, "ID of the draft to send")],
        scopes: &[scopes::SEND],
        method: "POST",
        path: "users/me/drafts/send",
    },
    ToolDescriptor {
        name: "gmail_delete_draft",
        description: "Delete a draft.",
        params: &[req("draft_id", ParamKind::String, "ID of the draft")],
        scopes: &[scopes::COMPOSE],
        method: "DELETE",
        path: "users/me/drafts/{draft_id}",
    },
    // ==================== Profile ====================
    ToolDescriptor {
        name: "gmail_get_profile",
        description: "Get the user's Gmail profile: email address, message and thread totals.",
        params: &[],
        scopes: &[scopes::READONLY],
        method: "GET",
        path: "users/me/profile",
    },
];

/// Immutable lookup over the descriptor table.
#[derive(Debug, Clone, Copy)]
pub struct Registry {
    tools: &'static [ToolDescriptor],
}

impl Registry {
    pub fn new() -> Self {
        Self { tools: TOOLS }
    }

    /// Look up a descriptor by tool name.
    pub fn get(&self, name: &str) -> Option<&'static ToolDescriptor> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static ToolDescriptor> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Check arguments against a descriptor's parameter triples. Runs before any
/// request is built; unknown extra arguments are tolerated and ignored.
pub fn validate_args(descriptor: &ToolDescriptor, args: &Map<String, Value>) -> Result<()> {
    for param in descriptor.params {
        match args.get(param.name) {
            None | Some(Value::Null) => {
                if param.required {
                    return Err(ToolError::invalid_argument(
                        param.name,
                        "missing required argument",
                    ));
                }
            }
            Some(value) => {
                if !param.kind.matches(value) {
                    return Err(ToolError::invalid_argument(
                        param.name,
                        format!("expected {}", param.kind.type_name()),
                    ));
                }
            }
        }
    }
    Ok(())
}
