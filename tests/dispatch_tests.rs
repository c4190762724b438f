//! Dispatcher integration tests
//!
//! Exercise the full validate -> build -> execute -> shape pipeline against a
//! simulated transport that records every request it receives. No network.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use gmail_mcp::error::{Result, ToolError};
use gmail_mcp::gmail::registry::Registry;
use gmail_mcp::gmail::request::GmailRequest;
use gmail_mcp::gmail::response::RawResponse;
use gmail_mcp::gmail::transport::Transport;
use gmail_mcp::mcp::dispatch::{Dispatcher, ToolCall};

/// Simulated transport: hands out queued responses and records calls.
#[derive(Default)]
struct FakeTransport {
    responses: Mutex<VecDeque<RawResponse>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<(GmailRequest, String)>>,
}

impl FakeTransport {
    fn with_responses(responses: impl IntoIterator<Item = RawResponse>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().collect()),
            ..Default::default()
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> (GmailRequest, String) {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn execute(&self, request: &GmailRequest, bearer_token: &str) -> Result<RawResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((request.clone(), bearer_token.to_string()));
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| RawResponse::new(200, "{}")))
    }
}

fn dispatcher(transport: Arc<FakeTransport>) -> Dispatcher {
    Dispatcher::new(Registry::new(), transport)
}

fn call(name: &str, arguments: Value) -> ToolCall {
    ToolCall {
        tool_name: name.to_string(),
        arguments: arguments.as_object().cloned().unwrap_or_else(Map::new),
        bearer_token: "test-token".to_string(),
    }
}

#[tokio::test]
async fn unknown_tool_never_reaches_transport() {
    let transport = FakeTransport::with_responses([]);
    let err = dispatcher(transport.clone())
        .dispatch(call("gmail_summon_pigeons", json!({})))
        .await
        .unwrap_err();

    assert!(matches!(err, ToolError::UnknownTool { ref name } if name == "gmail_summon_pigeons"));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn missing_required_argument_short_circuits() {
    let transport = FakeTransport::with_responses([]);
    let err = dispatcher(transport.clone())
        .dispatch(call("gmail_get_message", json!({"format": "minimal"})))
        .await
        .unwrap_err();

    match err {
        ToolError::InvalidArgument { field, .. } => assert_eq!(field, "message_id"),
        other => panic!("expected InvalidArgument, got {other:?}"),
    }
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn wrong_argument_type_short_circuits() {
    let transport = FakeTransport::with_responses([]);
    let err = dispatcher(transport.clone())
        .dispatch(call(
            "gmail_modify_message",
            json!({"message_id": "m1", "add_label_ids": "STARRED"}),
        ))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "invalid_argument");
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn empty_bearer_token_is_an_auth_error() {
    let transport = FakeTransport::with_responses([]);
    let mut invocation = call("gmail_get_profile", json!({}));
    invocation.bearer_token = String::new();

    let err = dispatcher(transport.clone())
        .dispatch(invocation)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "auth_error");
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn bearer_token_is_forwarded_to_transport() {
    let transport = FakeTransport::with_responses([RawResponse::new(200, "{}")]);
    dispatcher(transport.clone())
        .dispatch(call("gmail_get_profile", json!({})))
        .await
        .unwrap();

    let (request, token) = transport.last_request();
    assert_eq!(token, "test-token");
    assert_eq!(request.path, "users/me/profile");
}

#[tokio::test]
async fn success_payload_passes_through_with_page_token() {
    let body = r#"{"messages":[{"id":"m1","threadId":"t1"}],"nextPageToken":"page-2","resultSizeEstimate":42}"#;
    let transport = FakeTransport::with_responses([RawResponse::new(200, body)]);

    let value = dispatcher(transport.clone())
        .dispatch(call("gmail_list_messages", json!({"query": "is:unread"})))
        .await
        .unwrap();

    // Gmail's field names come back untouched, pagination token included.
    assert_eq!(value["nextPageToken"], "page-2");
    assert_eq!(value["messages"][0]["threadId"], "t1");
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn rate_limit_maps_to_transient_error_without_retry() {
    let transport = FakeTransport::with_responses([RawResponse::new(
        429,
        r#"{"error":{"code":429,"message":"Rate limit exceeded"}}"#,
    )]);

    let err = dispatcher(transport.clone())
        .dispatch(call("gmail_list_messages", json!({"query": "is:unread"})))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "transient_upstream_error");
    // No automatic retry: exactly one transport call.
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn unauthorized_maps_to_auth_error_for_any_tool() {
    for (tool, args) in [
        ("gmail_get_profile", json!({})),
        ("gmail_list_labels", json!({})),
        ("gmail_trash_message", json!({"message_id": "m1"})),
        ("gmail_delete_draft", json!({"draft_id": "d1"})),
    ] {
        let transport = FakeTransport::with_responses([RawResponse::new(401, "")]);
        let err = dispatcher(transport.clone())
            .dispatch(call(tool, args))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "auth_error", "tool {tool}");
        assert_eq!(transport.call_count(), 1, "tool {tool}");
    }
}

#[tokio::test]
async fn server_errors_map_to_transient() {
    let transport = FakeTransport::with_responses([RawResponse::new(503, "upstream wobble")]);
    let err = dispatcher(transport)
        .dispatch(call("gmail_get_thread", json!({"thread_id": "t1"})))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "transient_upstream_error");
}

#[tokio::test]
async fn trash_message_is_idempotent_from_our_side() {
    // Gmail returns 200 for trashing an already-trashed message; both calls
    // succeed and we issue exactly one request each.
    let transport = FakeTransport::with_responses([
        RawResponse::new(200, r#"{"id":"m1","labelIds":["TRASH"]}"#),
        RawResponse::new(200, r#"{"id":"m1","labelIds":["TRASH"]}"#),
    ]);
    let dispatcher = dispatcher(transport.clone());

    for _ in 0..2 {
        let value = dispatcher
            .dispatch(call("gmail_trash_message", json!({"message_id": "m1"})))
            .await
            .unwrap();
        assert_eq!(value["labelIds"][0], "TRASH");
    }
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test]
async fn deleting_a_deleted_label_yields_not_found() {
    let transport = FakeTransport::with_responses([
        RawResponse::new(204, ""),
        RawResponse::new(
            404,
            r#"{"error":{"code":404,"message":"Requested entity was not found."}}"#,
        ),
    ]);
    let dispatcher = dispatcher(transport);

    dispatcher
        .dispatch(call("gmail_delete_label", json!({"label_id": "Label_3"})))
        .await
        .unwrap();

    let err = dispatcher
        .dispatch(call("gmail_delete_label", json!({"label_id": "Label_3"})))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "not_found");
}

#[tokio::test]
async fn create_then_get_label_round_trip() {
    let created = r#"{"id":"Label_9","name":"Receipts","type":"user"}"#;
    let fetched = r#"{"id":"Label_9","name":"Receipts","type":"user"}"#;
    let transport = FakeTransport::with_responses([
        RawResponse::new(200, created),
        RawResponse::new(200, fetched),
    ]);
    let dispatcher = dispatcher(transport.clone());

    let created = dispatcher
        .dispatch(call("gmail_create_label", json!({"name": "Receipts"})))
        .await
        .unwrap();
    let label_id = created["id"].as_str().unwrap().to_string();

    let fetched = dispatcher
        .dispatch(call("gmail_get_label", json!({"label_id": label_id})))
        .await
        .unwrap();

    assert_eq!(fetched["name"], created["name"]);
    let (request, _) = transport.last_request();
    assert_eq!(request.path, "users/me/labels/Label_9");
}

#[tokio::test]
async fn a_failed_call_does_not_poison_the_next_one() {
    let transport = FakeTransport::with_responses([
        RawResponse::new(500, "boom"),
        RawResponse::new(200, r#"{"emailAddress":"me@example.com"}"#),
    ]);
    let dispatcher = dispatcher(transport);

    assert!(dispatcher
        .dispatch(call("gmail_get_profile", json!({})))
        .await
        .is_err());

    let value = dispatcher
        .dispatch(call("gmail_get_profile", json!({})))
        .await
        .unwrap();
    assert_eq!(value["emailAddress"], "me@example.com");
}
