#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use backoffice_client::{
    ApiClient, ClientConfig, MemorySessionStore, Notice, Session, SessionState, SessionStore,
};
use futures::future::BoxFuture;
use serde_json::Value as JsonValue;

/// A request as the mock server saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Recorded {
    pub fn path_and_query(&self) -> String {
        self.uri
            .path_and_query()
            .map(|pq| pq.as_str().to_owned())
            .unwrap_or_default()
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    }

    pub fn json(&self) -> JsonValue {
        serde_json::from_slice(&self.body).expect("json body")
    }
}

pub type Reply = (u16, JsonValue);
type Responder = Arc<dyn Fn(Recorded) -> BoxFuture<'static, Reply> + Send + Sync>;

#[derive(Clone)]
struct MockState {
    log: Arc<Mutex<Vec<Recorded>>>,
    respond: Responder,
}

pub struct MockServer {
    pub addr: SocketAddr,
    log: Arc<Mutex<Vec<Recorded>>>,
}

impl MockServer {
    /// Serve every request with `respond`, recording it first.
    pub async fn start<F>(respond: F) -> Self
    where
        F: Fn(Recorded) -> BoxFuture<'static, Reply> + Send + Sync + 'static,
    {
        let log = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            log: log.clone(),
            respond: Arc::new(respond),
        };
        let app = Router::new().fallback(handle).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });

        Self { addr, log }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(self.base_url().parse().expect("base url"))
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.uri.path() == path)
            .collect()
    }

    pub fn last(&self) -> Recorded {
        self.requests().pop().expect("at least one request")
    }
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = Recorded {
        method,
        uri,
        headers,
        body,
    };
    state.log.lock().unwrap().push(recorded.clone());
    let (status, body) = (state.respond)(recorded).await;
    let status = StatusCode::from_u16(status).expect("valid status");
    (status, axum::Json(body)).into_response()
}

/// Notifications and expiry callbacks observed by a client.
#[derive(Clone, Default)]
pub struct Observed {
    pub notices: Arc<Mutex<Vec<Notice>>>,
    pub expirations: Arc<Mutex<Vec<String>>>,
}

impl Observed {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn expirations(&self) -> Vec<String> {
        self.expirations.lock().unwrap().clone()
    }
}

pub fn session(token: &str) -> Session {
    Session {
        access_token: token.into(),
        refresh_token: format!("{token}-refresh"),
        user_id: None,
    }
}

/// Client wired to `config`, seeded with `seed`, recording hook calls.
pub fn client(config: ClientConfig, seed: Option<Session>) -> (ApiClient, Observed) {
    let store = match seed {
        Some(session) => MemorySessionStore::with_session(session),
        None => MemorySessionStore::new(),
    };
    client_with_store(config, store)
}

/// Client backed by `store`, recording hook calls.
pub fn client_with_store<S: SessionStore>(config: ClientConfig, store: S) -> (ApiClient, Observed) {
    let observed = Observed::default();
    let notices = observed.notices.clone();
    let expirations = observed.expirations.clone();
    let client = ApiClient::builder(config)
        .session_store(store)
        .notifier(move |notice: &Notice| notices.lock().unwrap().push(notice.clone()))
        .on_session_expired(move |login: &str| expirations.lock().unwrap().push(login.to_owned()))
        .build()
        .expect("build client");
    (client, observed)
}

pub async fn assert_state(client: &ApiClient, expected: SessionState) {
    assert_eq!(client.session_state().await, expected);
}
