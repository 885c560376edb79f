use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use todos_core::config::TodosConfig;
use todos_core::todo::{Priority, SortBy, TodoFields, TodoGateway, TodoPatch, TodoQuery};
use todos_core::{Result, TodosError};
use todos_interaction::{GraphQlTodoGateway, HttpRequest, HttpResponse, HttpTransport, SessionPhase};

const GRAPHQL_URL: &str = "https://data.example.test/app/todo-app/graphql";

/// Transport that answers identity calls itself and replays queued
/// responses for GraphQL calls.
struct ScriptedTransport {
    graphql: Mutex<VecDeque<HttpResponse>>,
    refresh: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
    logins: AtomicUsize,
    refreshes: AtomicUsize,
}

impl ScriptedTransport {
    fn new(graphql: Vec<HttpResponse>) -> Arc<Self> {
        Arc::new(Self {
            graphql: Mutex::new(graphql.into()),
            refresh: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            logins: AtomicUsize::new(0),
            refreshes: AtomicUsize::new(0),
        })
    }

    fn with_refresh_responses(self: Arc<Self>, responses: Vec<HttpResponse>) -> Arc<Self> {
        *self.refresh.lock().unwrap() = responses.into();
        self
    }

    fn graphql_requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url == GRAPHQL_URL)
            .cloned()
            .collect()
    }

    fn logins(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn post_json(&self, request: HttpRequest) -> Result<HttpResponse> {
        // Give racing callers a chance to interleave.
        tokio::task::yield_now().await;
        self.requests.lock().unwrap().push(request.clone());

        if request.url.ends_with("/auth/providers/anon-user/login") {
            let n = self.logins.fetch_add(1, Ordering::SeqCst) + 1;
            return Ok(HttpResponse::new(
                200,
                serde_json::json!({
                    "access_token": format!("access-{n}"),
                    "refresh_token": format!("refresh-{n}"),
                    "user_id": format!("user-{n}"),
                    "device_id": "000000000000000000000000"
                })
                .to_string(),
            ));
        }

        if request.url.ends_with("/auth/session") {
            let n = self.refreshes.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(response) = self.refresh.lock().unwrap().pop_front() {
                return Ok(response);
            }
            return Ok(HttpResponse::new(
                201,
                serde_json::json!({ "access_token": format!("refreshed-{n}") }).to_string(),
            ));
        }

        Ok(self
            .graphql
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| HttpResponse::new(500, "unexpected request")))
    }
}

fn config() -> TodosConfig {
    let mut config = TodosConfig::new("todo-app", GRAPHQL_URL);
    config.auth_url = "https://auth.example.test".to_string();
    config
}

fn gateway(transport: &Arc<ScriptedTransport>) -> GraphQlTodoGateway {
    GraphQlTodoGateway::with_transport(transport.clone(), &config())
}

fn ok(data: serde_json::Value) -> HttpResponse {
    HttpResponse::new(200, serde_json::json!({ "data": data }).to_string())
}

fn unauthorized() -> HttpResponse {
    HttpResponse::new(401, r#"{"error":"invalid session: access token expired"}"#)
}

#[tokio::test]
async fn test_list_sends_operation_with_bearer_and_defaults() {
    let transport = ScriptedTransport::new(vec![ok(serde_json::json!({
        "todos": [
            { "_id": "2", "title": "B", "body": "", "completed": false,
              "createdAt": "2024-03-02T00:00:00Z" },
            { "_id": "1", "title": "A", "body": "x", "completed": true,
              "createdAt": "2024-03-01T00:00:00Z" }
        ]
    }))]);
    let gateway = gateway(&transport);

    let todos = gateway
        .list(None, SortBy::default(), 100)
        .await
        .expect("list should succeed");

    assert_eq!(todos.len(), 2);
    assert_eq!(todos[0].id, "2");
    assert!(todos[1].completed);

    let requests = transport.graphql_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].bearer.as_deref(), Some("access-1"));
    assert!(requests[0].body["query"].as_str().unwrap().contains("query Todos("));
    assert_eq!(requests[0].body["variables"]["sortBy"], "CREATEDAT_DESC");
    assert_eq!(requests[0].body["variables"]["limit"], 100);
    assert!(requests[0].body["variables"]["query"].is_null());
    assert_eq!(transport.logins(), 1);
}

#[tokio::test]
async fn test_401_triggers_exactly_one_refresh_and_replay() {
    let transport = ScriptedTransport::new(vec![
        unauthorized(),
        ok(serde_json::json!({ "updateOneTodo": { "_id": "1" } })),
    ]);
    let gateway = gateway(&transport);

    let id = gateway
        .update(&TodoQuery::by_id("1"), &TodoPatch::new().completed(true))
        .await
        .expect("replay should succeed");

    assert_eq!(id, "1");
    assert_eq!(transport.refreshes(), 1);

    let requests = transport.graphql_requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].bearer.as_deref(), Some("access-1"));
    assert_eq!(requests[1].bearer.as_deref(), Some("refreshed-1"));
    assert_eq!(requests[0].body, requests[1].body);
}

#[tokio::test]
async fn test_second_401_is_fatal_without_further_retry() {
    let transport = ScriptedTransport::new(vec![unauthorized(), unauthorized(), unauthorized()]);
    let gateway = gateway(&transport);

    let err = gateway
        .delete_one(&TodoQuery::by_id("1"))
        .await
        .unwrap_err();

    assert!(err.is_auth(), "expected auth error, got {err:?}");
    assert_eq!(transport.refreshes(), 1);
    assert_eq!(transport.graphql_requests().len(), 2);
}

#[tokio::test]
async fn test_server_error_propagates_without_retry() {
    let transport = ScriptedTransport::new(vec![HttpResponse::new(500, "internal error")]);
    let gateway = gateway(&transport);

    let err = gateway.list(None, SortBy::default(), 100).await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(transport.refreshes(), 0);
    assert_eq!(transport.graphql_requests().len(), 1);
}

#[tokio::test]
async fn test_concurrent_first_calls_share_one_login() {
    let transport = ScriptedTransport::new(
        (0..8)
            .map(|_| ok(serde_json::json!({ "todos": [] })))
            .collect(),
    );
    let gateway = gateway(&transport);

    let calls = (0..8).map(|_| gateway.list(None, SortBy::default(), 100));
    let results = futures::future::join_all(calls).await;

    assert!(results.iter().all(|r| r.is_ok()));
    assert_eq!(transport.logins(), 1);
    assert!(
        transport
            .graphql_requests()
            .iter()
            .all(|r| r.bearer.as_deref() == Some("access-1"))
    );
}

#[tokio::test]
async fn test_concurrent_401s_share_one_refresh() {
    let transport = ScriptedTransport::new(vec![
        unauthorized(),
        unauthorized(),
        ok(serde_json::json!({ "todos": [] })),
        ok(serde_json::json!({ "todos": [] })),
    ]);
    let gateway = gateway(&transport);
    gateway
        .client()
        .credentials()
        .get_token()
        .await
        .expect("login should succeed");

    let results = futures::future::join_all([
        gateway.list(None, SortBy::default(), 100),
        gateway.list(None, SortBy::default(), 100),
    ])
    .await;

    assert!(results.iter().all(|r| r.is_ok()), "results: {results:?}");
    assert_eq!(transport.logins(), 1);
    assert_eq!(transport.refreshes(), 1);

    let bearers: Vec<_> = transport
        .graphql_requests()
        .into_iter()
        .map(|r| r.bearer)
        .collect();
    assert_eq!(bearers.len(), 4);
    assert_eq!(
        bearers.iter().filter(|b| b.as_deref() == Some("access-1")).count(),
        2
    );
    assert_eq!(
        bearers.iter().filter(|b| b.as_deref() == Some("refreshed-1")).count(),
        2
    );
}

#[tokio::test]
async fn test_failed_refresh_drops_session_and_next_call_logs_in_again() {
    let transport = ScriptedTransport::new(vec![
        unauthorized(),
        ok(serde_json::json!({ "todos": [] })),
    ])
    .with_refresh_responses(vec![HttpResponse::new(401, "refresh token expired")]);
    let gateway = gateway(&transport);

    let err = gateway.list(None, SortBy::default(), 100).await.unwrap_err();
    assert!(err.is_auth());
    assert_eq!(
        gateway.client().credentials().phase().await,
        SessionPhase::Uninitialized
    );

    gateway
        .list(None, SortBy::default(), 100)
        .await
        .expect("fresh login should succeed");
    assert_eq!(transport.logins(), 2);
    assert_eq!(
        gateway.client().credentials().user_id().await.as_deref(),
        Some("user-2")
    );
}

#[tokio::test]
async fn test_insert_sends_fields_and_returns_server_id() {
    let transport = ScriptedTransport::new(vec![ok(
        serde_json::json!({ "insertOneTodo": { "_id": "65f1c0ffee" } }),
    )]);
    let gateway = gateway(&transport);
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

    let id = gateway
        .insert(&TodoFields {
            title: "Call mom".to_string(),
            body: "Sunday".to_string(),
            completed: false,
            priority: Priority::default(),
            created_at: at,
            updated_at: at,
        })
        .await
        .expect("insert should succeed");

    assert_eq!(id, "65f1c0ffee");
    let data = &transport.graphql_requests()[0].body["variables"]["data"];
    assert_eq!(data["title"], "Call mom");
    assert_eq!(data["priority"], "LOW");
    assert_eq!(data["createdAt"], "2024-03-01T12:00:00Z");
}

#[tokio::test]
async fn test_update_of_missing_todo_is_not_found() {
    let transport = ScriptedTransport::new(vec![ok(serde_json::json!({ "updateOneTodo": null }))]);
    let gateway = gateway(&transport);

    let err = gateway
        .update(&TodoQuery::by_id("gone"), &TodoPatch::new().title("x"))
        .await
        .unwrap_err();

    assert_eq!(err, TodosError::not_found("todo", "gone"));
}

#[tokio::test]
async fn test_delete_many_filters_by_id_in_and_returns_count() {
    let transport = ScriptedTransport::new(vec![ok(
        serde_json::json!({ "deleteManyTodos": { "deletedCount": 2 } }),
    )]);
    let gateway = gateway(&transport);

    let count = gateway
        .delete_many(&TodoQuery::by_ids(["1", "2"]))
        .await
        .expect("delete many should succeed");

    assert_eq!(count, 2);
    assert_eq!(
        transport.graphql_requests()[0].body["variables"]["query"],
        serde_json::json!({ "_id_in": ["1", "2"] })
    );
}

#[tokio::test]
async fn test_graphql_errors_surface_as_request_errors() {
    let transport = ScriptedTransport::new(vec![HttpResponse::new(
        200,
        r#"{"data":null,"errors":[{"message":"role does not have insert access"}]}"#,
    )]);
    let gateway = gateway(&transport);

    let err = gateway.delete_many(&TodoQuery::default()).await.unwrap_err();
    assert!(err.is_request());
    assert!(err.to_string().contains("insert access"));
}
