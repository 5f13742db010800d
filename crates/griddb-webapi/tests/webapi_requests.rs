//! Request-level tests for the GridDB Web API store
//!
//! These tests run the client against a local HTTP server that records every
//! request and answers with configured status codes.

use axum::{
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use chrono::DateTime;
use griddb_webapi::{GridDbClient, WebApiConfig};
use loader_core::{Batch, Row, Template, Value};
use loader_populate::{ContainerStore, LoadPipeline, StoreError};
use serde_json::{json, Value as JsonValue};
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

const BASE: &str = "/griddb/v2/myCluster/dbs/public";

/// `admin:secret` in base64
const AUTHORIZATION: &str = "Basic YWRtaW46c2VjcmV0";

#[derive(Debug, Clone, PartialEq)]
struct Recorded {
    method: String,
    path: String,
    authorization: Option<String>,
    body: String,
}

impl Recorded {
    fn json(&self) -> JsonValue {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Records requests; answers 200 unless a response is configured for the
/// method and path.
#[derive(Clone, Default)]
struct RecordingServer {
    requests: Arc<Mutex<Vec<Recorded>>>,
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
}

impl RecordingServer {
    fn respond(&self, method: &str, path: &str, status: u16, body: &str) {
        self.responses.lock().unwrap().insert(
            (method.to_string(), format!("{BASE}{path}")),
            (status, body.to_string()),
        );
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    /// `(method, path relative to the database)` of every request
    fn calls(&self) -> Vec<(String, String)> {
        self.requests()
            .into_iter()
            .map(|r| (r.method, r.path.trim_start_matches(BASE).to_string()))
            .collect()
    }
}

async fn record(
    State(server): State<RecordingServer>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri.path().to_string();
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    server.requests.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: path.clone(),
        authorization,
        body,
    });

    let (status, body) = server
        .responses
        .lock()
        .unwrap()
        .get(&(method.to_string(), path))
        .cloned()
        .unwrap_or((200, String::new()));

    (StatusCode::from_u16(status).unwrap(), body).into_response()
}

/// Start a recording server on a free port
async fn start_test_server() -> (RecordingServer, WebApiConfig) {
    let server = RecordingServer::default();
    let app = Router::new().fallback(record).with_state(server.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = WebApiConfig {
        url: format!("http://{addr}"),
        password: "secret".to_string(),
        ..Default::default()
    };
    (server, config)
}

async fn connected() -> (RecordingServer, GridDbClient) {
    let (server, config) = start_test_server().await;
    let client = GridDbClient::connect(config).await.unwrap();
    (server, client)
}

#[tokio::test]
async fn test_connect_checks_connection_with_basic_auth() {
    let (server, _client) = connected().await;

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, format!("{BASE}/checkConnection"));
    assert_eq!(requests[0].authorization.as_deref(), Some(AUTHORIZATION));
}

#[tokio::test]
async fn test_connect_refused_credentials() {
    let (server, config) = start_test_server().await;
    server.respond("GET", "/checkConnection", 401, "Unauthorized user");

    match GridDbClient::connect(config).await {
        Err(StoreError::Connection(message)) => {
            assert!(message.contains("401"));
            assert!(message.contains("Unauthorized user"));
        }
        Err(e) => panic!("Expected Connection error, got {e:?}"),
        Ok(_) => panic!("Expected Connection error, got a client"),
    }
}

#[tokio::test]
async fn test_container_exists_maps_status() {
    let (server, mut client) = connected().await;
    server.respond("GET", "/containers/absent/info", 404, "");
    server.respond("GET", "/containers/broken/info", 500, "boom");

    assert!(client.container_exists("present").await.unwrap());
    assert!(!client.container_exists("absent").await.unwrap());
    match client.container_exists("broken").await {
        Err(StoreError::Rejected { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("Expected Rejected, got {other:?}"),
    }

    let requests = server.requests();
    assert_eq!(requests[1].path, format!("{BASE}/containers/present/info"));
    assert!(requests
        .iter()
        .all(|r| r.authorization.as_deref() == Some(AUTHORIZATION)));
}

#[tokio::test]
async fn test_container_names_are_encoded() {
    let (server, mut client) = connected().await;

    client.container_exists("a b").await.unwrap();

    assert_eq!(
        server.requests()[1].path,
        format!("{BASE}/containers/a%20b/info")
    );
}

#[tokio::test]
async fn test_create_container_body() {
    let (server, mut client) = connected().await;

    client
        .create_container("series", &Template::OneThousandRows.schema())
        .await
        .unwrap();

    let request = &server.requests()[1];
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, format!("{BASE}/containers"));
    assert_eq!(
        request.json(),
        json!({
            "container_name": "series",
            "container_type": "TIME_SERIES",
            "rowkey": true,
            "columns": [
                {"name": "time", "type": "TIMESTAMP"},
                {"name": "column1", "type": "INTEGER"},
                {"name": "column2", "type": "INTEGER"},
                {"name": "column3", "type": "INTEGER"},
                {"name": "column4", "type": "INTEGER"},
                {"name": "column5", "type": "INTEGER"}
            ]
        })
    );
}

#[tokio::test]
async fn test_drop_container_body() {
    let (server, mut client) = connected().await;

    client.drop_container("old").await.unwrap();

    let request = &server.requests()[1];
    assert_eq!(request.method, "DELETE");
    assert_eq!(request.path, format!("{BASE}/containers"));
    assert_eq!(request.json(), json!(["old"]));
}

#[tokio::test]
async fn test_write_batch_puts_rows() {
    let (server, mut client) = connected().await;
    let ts = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
    let rows = vec![
        Row::new(vec![Value::Timestamp(ts), Value::String("test-401".to_string())]),
        Row::new(vec![Value::Timestamp(ts), Value::String("test-455".to_string())]),
    ];

    client
        .write_batch(Batch::single("notes", rows))
        .await
        .unwrap();

    let request = &server.requests()[1];
    assert_eq!(request.method, "PUT");
    assert_eq!(request.path, format!("{BASE}/containers/notes/rows"));
    assert_eq!(
        request.json(),
        json!([
            ["2023-11-14T22:13:20.000Z", "test-401"],
            ["2023-11-14T22:13:20.000Z", "test-455"]
        ])
    );
}

#[tokio::test]
async fn test_write_rejection_carries_status_and_message() {
    let (server, mut client) = connected().await;
    server.respond("PUT", "/containers/notes/rows", 400, "column count mismatch");

    let result = client
        .write_batch(Batch::single("notes", vec![Row::new(vec![Value::Bool(true)])]))
        .await;

    match result {
        Err(StoreError::Rejected { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "column count mismatch");
        }
        other => panic!("Expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_batch_sends_no_request() {
    let (server, mut client) = connected().await;

    client
        .write_batch(Batch::single("notes", Vec::new()))
        .await
        .unwrap();

    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_pipeline_request_sequence() {
    let (server, client) = connected().await;

    let metrics = LoadPipeline::new(client)
        .with_batch_capacity(NonZeroUsize::new(2).unwrap())
        .with_seed(3)
        .run("samples", &Template::MultipleType.schema(), 3)
        .await
        .unwrap();
    assert_eq!(metrics.rows_written, 3);

    let expected: Vec<(String, String)> = [
        ("GET", "/checkConnection"),
        ("GET", "/containers/samples/info"),
        ("DELETE", "/containers"),
        ("POST", "/containers"),
        ("PUT", "/containers/samples/rows"),
        ("PUT", "/containers/samples/rows"),
    ]
    .into_iter()
    .map(|(m, p)| (m.to_string(), p.to_string()))
    .collect();
    assert_eq!(server.calls(), expected);

    let requests = server.requests();
    assert_eq!(requests[4].json().as_array().unwrap().len(), 2);
    assert_eq!(requests[5].json().as_array().unwrap().len(), 1);
}
