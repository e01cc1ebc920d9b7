//! In-process mock of the remote legacy stock-item API.
//!
//! Serves the three endpoints the client uses, checks the bearer token, and
//! records every request (after routing) so tests can assert on exact calls.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::Router;
use axum::body::Bytes;
use axum::extract::{OriginalUri, Path, State};
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use serde_json::{Value, json};

/// One request as seen by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    /// Raw (still percent-encoded) request path.
    pub path: String,
    /// Decoded SKU path parameter, when the route has one.
    pub sku: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug)]
struct Inner {
    token: String,
    records: HashMap<String, Value>,
    requests: Vec<RecordedRequest>,
    /// Status forced onto the next N requests (`None` count = every request).
    forced: Option<(StatusCode, Option<usize>)>,
    /// Status returned by the update endpoint instead of applying the write.
    reject_updates: Option<StatusCode>,
}

type Shared = Arc<Mutex<Inner>>;

fn lock(state: &Shared) -> MutexGuard<'_, Inner> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

/// Mock remote inventory bound to an ephemeral localhost port.
pub struct MockRemote {
    base_url: String,
    state: Shared,
    handle: tokio::task::JoinHandle<()>,
}

impl MockRemote {
    /// Start a server that accepts `Authorization: Bearer <token>`.
    pub async fn start(token: &str) -> Self {
        let state: Shared = Arc::new(Mutex::new(Inner {
            token: token.to_string(),
            records: HashMap::new(),
            requests: Vec::new(),
            forced: None,
            reject_updates: None,
        }));

        let app = Router::new()
            .route("/rest/V1/stockItems/:sku", get(get_stock_item))
            .route(
                "/rest/V1/products/:sku/stockItems/:item_id",
                put(put_stock_item),
            )
            .route("/rest/V1/store/storeConfigs", get(get_store_configs))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().expect("listener has no local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock remote server failed");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            handle,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Store (or replace) the stock record returned for `sku`.
    pub fn insert_record(&self, sku: &str, record: Value) {
        lock(&self.state).records.insert(sku.to_string(), record);
    }

    pub fn record(&self, sku: &str) -> Option<Value> {
        lock(&self.state).records.get(sku).cloned()
    }

    /// Answer every subsequent request with `status`.
    pub fn fail_with(&self, status: u16) {
        lock(&self.state).forced = Some((status_code(status), None));
    }

    /// Answer the next `times` requests with `status`, then behave normally.
    pub fn fail_times(&self, status: u16, times: usize) {
        lock(&self.state).forced = Some((status_code(status), Some(times)));
    }

    /// Make the update endpoint answer `status` while reads keep working.
    pub fn reject_updates(&self, status: u16) {
        lock(&self.state).reject_updates = Some(status_code(status));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state).requests.clone()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.state).requests.len()
    }

    pub fn puts(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == Method::PUT)
            .collect()
    }
}

impl Drop for MockRemote {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).expect("invalid HTTP status for mock")
}

/// Record the request, then apply forced failures and the token check.
fn admit(
    state: &Shared,
    method: Method,
    uri: &OriginalUri,
    headers: &HeaderMap,
    sku: Option<String>,
    body: Option<Value>,
) -> Result<(), Response> {
    let mut inner = lock(state);

    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    inner.requests.push(RecordedRequest {
        method,
        path: uri.0.path().to_string(),
        sku,
        authorization: authorization.clone(),
        body,
    });

    if let Some((status, remaining)) = inner.forced {
        match remaining {
            None => return Err(error_response(status, "forced failure")),
            Some(0) => inner.forced = None,
            Some(n) => {
                inner.forced = if n > 1 { Some((status, Some(n - 1))) } else { None };
                return Err(error_response(status, "forced failure"));
            }
        }
    }

    let expected = format!("Bearer {}", inner.token);
    if authorization.as_deref() != Some(expected.as_str()) {
        return Err(error_response(
            StatusCode::UNAUTHORIZED,
            "The consumer isn't authorized to access %resources.",
        ));
    }

    Ok(())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(json!({ "message": message }))).into_response()
}

async fn get_stock_item(
    State(state): State<Shared>,
    Path(sku): Path<String>,
    uri: OriginalUri,
    headers: HeaderMap,
) -> Response {
    if let Err(resp) = admit(&state, Method::GET, &uri, &headers, Some(sku.clone()), None) {
        return resp;
    }

    match lock(&state).records.get(&sku) {
        Some(record) => axum::Json(record.clone()).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            "The Product with the \"%1\" SKU doesn't exist.",
        ),
    }
}

async fn put_stock_item(
    State(state): State<Shared>,
    Path((sku, item_id)): Path<(String, i64)>,
    uri: OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let parsed = serde_json::from_slice::<Value>(&body).ok();
    if let Err(resp) = admit(&state, Method::PUT, &uri, &headers, Some(sku.clone()), parsed.clone()) {
        return resp;
    }

    let Some(fields) = parsed.as_ref().and_then(|b| b.get("stockItem")).cloned() else {
        return error_response(StatusCode::BAD_REQUEST, "stockItem is required");
    };

    let mut inner = lock(&state);
    if let Some(status) = inner.reject_updates {
        return error_response(status, "update rejected");
    }
    let Some(record) = inner.records.get_mut(&sku) else {
        return error_response(StatusCode::NOT_FOUND, "product not found");
    };
    if record.get("item_id").and_then(Value::as_i64) != Some(item_id) {
        return error_response(StatusCode::NOT_FOUND, "stock item not found");
    }

    if let Some(qty) = fields.get("qty") {
        record["qty"] = qty.clone();
    }
    if let Some(flag) = fields.get("is_in_stock") {
        record["is_in_stock"] = flag.clone();
    }

    axum::Json(json!(item_id)).into_response()
}

async fn get_store_configs(
    State(state): State<Shared>,
    uri: OriginalUri,
    headers: HeaderMap,
) -> Response {
    if let Err(resp) = admit(&state, Method::GET, &uri, &headers, None, None) {
        return resp;
    }

    axum::Json(json!([{ "id": 1, "code": "default", "base_currency_code": "USD" }])).into_response()
}
