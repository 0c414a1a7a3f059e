use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// One recorded `generateContent` call
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Last path segment, e.g. `gemini-test:generateContent`
    pub call: String,
    pub api_key: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
pub enum StubBody {
    Json(Value),
    /// Served verbatim as `text/html`
    Html(String),
}

#[derive(Clone)]
pub struct StubReply {
    pub status: StatusCode,
    pub body: StubBody,
}

impl StubReply {
    /// Successful reply whose single candidate carries `text`
    pub fn text(text: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: StubBody::Json(json!({
                "candidates": [{
                    "content": { "role": "model", "parts": [{ "text": text }] },
                    "finishReason": "STOP"
                }],
                "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 7 }
            })),
        }
    }

    pub fn error(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            body: StubBody::Json(json!({ "error": { "code": status.as_u16(), "message": message } })),
        }
    }

    pub fn blocked(reason: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: StubBody::Json(json!({ "promptFeedback": { "blockReason": reason } })),
        }
    }

    /// 200 with a body that is not a Gemini envelope, e.g. a proxy error page
    pub fn html(body: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: StubBody::Html(body.to_string()),
        }
    }
}

#[derive(Clone)]
struct StubState {
    script: Arc<Mutex<VecDeque<StubReply>>>,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<RecordedCall>>>,
}

/// Local stand-in for the Gemini REST endpoint.
///
/// Replies are served in order; once the script runs out every call gets a 500.
pub struct GeminiStub {
    base_url: String,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<RecordedCall>>>,
    shutdown: Mutex<Option<oneshot::Sender<()>>>,
}

impl GeminiStub {
    pub async fn start(script: Vec<StubReply>) -> Self {
        let calls = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            script: Arc::new(Mutex::new(script.into())),
            calls: calls.clone(),
            requests: requests.clone(),
        };

        let router = Router::new()
            .route("/v1beta/models/:call", post(generate_handler))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind gemini stub");
        let addr = listener.local_addr().expect("gemini stub local addr");
        let (tx, rx) = oneshot::channel::<()>();

        let server = axum::serve(listener, router.into_make_service());
        tokio::spawn(async move {
            tokio::select! {
                res = server => {
                    if let Err(err) = res {
                        eprintln!("Gemini stub server error: {err:?}");
                    }
                }
                _ = rx => {}
            }
        });

        GeminiStub {
            base_url: format!("http://{}/v1beta", addr),
            calls,
            requests,
            shutdown: Mutex::new(Some(tx)),
        }
    }

    /// Value for `gateway.api_base`
    pub fn api_base(&self) -> String {
        self.base_url.clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RecordedCall> {
        self.requests.lock().expect("lock stub requests").clone()
    }
}

impl Drop for GeminiStub {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.shutdown.lock() {
            if let Some(tx) = guard.take() {
                let _ = tx.send(());
            }
        }
    }
}

async fn generate_handler(
    State(state): State<StubState>,
    Path(call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.calls.fetch_add(1, Ordering::SeqCst);
    let api_key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    if let Ok(mut guard) = state.requests.lock() {
        guard.push(RecordedCall {
            call,
            api_key,
            body,
        });
    }

    let next = state.script.lock().ok().and_then(|mut s| s.pop_front());
    match next {
        Some(StubReply {
            status,
            body: StubBody::Json(body),
        }) => (status, Json(body)).into_response(),
        Some(StubReply {
            status,
            body: StubBody::Html(body),
        }) => (status, Html(body)).into_response(),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": { "message": "stub script exhausted" } })),
        )
            .into_response(),
    }
}
