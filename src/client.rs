use std::sync::{Arc, Mutex, PoisonError};

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Value as JsonValue, json};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::{ClientConfig, EXPIRED_TOKEN};
use crate::envelope::{ApiResponse, NOTICE_FALLBACK, Payload};
use crate::error::Error;
use crate::hooks::{LogExpiry, Notice, Notifier, SessionExpiredHandler, TracingNotifier};
use crate::request::{APPLICATION_JSON, MULTIPART_FORM_DATA, RequestBody, RequestConfig};
use crate::session::{MemorySessionStore, Session, SessionState, SessionStore, SessionStoreDyn};
use crate::single_flight::SingleFlight;
use crate::types::{Credentials, TokenPair};

const SESSION_TIMED_OUT: &str = "Session timed out. Please sign in again.";
const REQUEST_CANCELLED: &str = "Request cancelled";
const REQUEST_TIMED_OUT: &str = "Request timed out";

/// What an expired-token recovery decided for the request that hit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recovery {
    /// A fresh token is stored; replay the request.
    Retry,
    /// The session is gone; surface the failure.
    Ended,
    /// The refresh was cancelled; the session is untouched.
    Cancelled,
}

/// Result of one HTTP exchange, before envelope shaping.
enum Exchange {
    Response { status: StatusCode, payload: Payload },
    Cancelled,
    Transport(String),
}

/// Outcome of a token refresh.
enum Refresh {
    Rotated(TokenPair),
    Cancelled,
    Failed,
}

/// Back-office REST API client.
///
/// Cheap to clone; clones share the session store, hooks and cancellation root.
/// Every request method resolves to an [`ApiResponse`] and never fails.
///
/// ```rust,ignore
/// let client = ApiClient::builder(ClientConfig::from_env()?)
///     .on_session_expired(|login: &str| router.navigate(login))
///     .build()?;
///
/// client.login(&Credentials::new("admin@example.com", "secret")).await;
/// let players = client.get("players?page=1&perPage=10", RequestConfig::new()).await;
/// if players.success { /* render players.data */ }
/// ```
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

struct Inner {
    config: ClientConfig,
    http: reqwest::Client,
    session: Arc<dyn SessionStoreDyn>,
    notifier: Arc<dyn Notifier>,
    on_expired: Arc<dyn SessionExpiredHandler>,
    recovery: SingleFlight<String, Recovery>,
    cancel_root: Mutex<CancellationToken>,
}

/// Builder for [`ApiClient`].
#[must_use]
pub struct ApiClientBuilder {
    config: ClientConfig,
    http: Option<reqwest::Client>,
    session: Option<Arc<dyn SessionStoreDyn>>,
    notifier: Option<Arc<dyn Notifier>>,
    on_expired: Option<Arc<dyn SessionExpiredHandler>>,
}

impl ApiClientBuilder {
    /// Persist credentials in `store` (default: [`MemorySessionStore`]).
    pub fn session_store<S: SessionStore>(mut self, store: S) -> Self {
        self.session = Some(Arc::new(store));
        self
    }

    /// Share an existing store with other components.
    pub fn shared_session_store<S: SessionStore>(mut self, store: Arc<S>) -> Self {
        self.session = Some(store);
        self
    }

    /// Surface failed-request messages through `notifier` (default: [`TracingNotifier`]).
    pub fn notifier<N: Notifier>(mut self, notifier: N) -> Self {
        self.notifier = Some(Arc::new(notifier));
        self
    }

    /// Call `handler` after an expired session has been wiped (default: [`LogExpiry`]).
    pub fn on_session_expired<H: SessionExpiredHandler>(mut self, handler: H) -> Self {
        self.on_expired = Some(Arc::new(handler));
        self
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the default HTTP client cannot be created.
    pub fn build(self) -> Result<ApiClient, Error> {
        let http = match self.http {
            Some(http) => http,
            None => reqwest::Client::builder().build()?,
        };
        Ok(ApiClient {
            inner: Arc::new(Inner {
                config: self.config,
                http,
                session: self
                    .session
                    .unwrap_or_else(|| Arc::new(MemorySessionStore::new())),
                notifier: self.notifier.unwrap_or_else(|| Arc::new(TracingNotifier)),
                on_expired: self.on_expired.unwrap_or_else(|| Arc::new(LogExpiry)),
                recovery: SingleFlight::new(),
                cancel_root: Mutex::new(CancellationToken::new()),
            }),
        })
    }
}

impl ApiClient {
    /// Start building a client for `config`.
    pub fn builder(config: ClientConfig) -> ApiClientBuilder {
        ApiClientBuilder {
            config,
            http: None,
            session: None,
            notifier: None,
            on_expired: None,
        }
    }

    /// Client with an in-memory session and default hooks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        Self::builder(config).build()
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    // ── Verbs ──────────────────────────────────────────────────────────

    pub async fn get(&self, path: &str, config: RequestConfig) -> ApiResponse {
        self.request(Method::GET, path, RequestBody::Empty, config)
            .await
    }

    pub async fn post(
        &self,
        path: &str,
        body: impl Into<RequestBody>,
        config: RequestConfig,
    ) -> ApiResponse {
        self.request(Method::POST, path, body.into(), config).await
    }

    pub async fn put(
        &self,
        path: &str,
        body: impl Into<RequestBody>,
        config: RequestConfig,
    ) -> ApiResponse {
        self.request(Method::PUT, path, body.into(), config).await
    }

    pub async fn patch(
        &self,
        path: &str,
        body: impl Into<RequestBody>,
        config: RequestConfig,
    ) -> ApiResponse {
        self.request(Method::PATCH, path, body.into(), config).await
    }

    /// `DELETE` request.
    pub async fn remove(&self, path: &str, config: RequestConfig) -> ApiResponse {
        self.request(Method::DELETE, path, RequestBody::Empty, config)
            .await
    }

    /// Send a request and decode the payload's `data` field as `T`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        config: RequestConfig,
    ) -> ApiResponse<T> {
        self.dispatch(method, path, &body, &config, true).await
    }

    // ── Session ────────────────────────────────────────────────────────

    /// Sign in and store the returned token pair.
    ///
    /// A failed sign-in leaves the stored session untouched and raises no notification;
    /// the caller shows the error inline.
    pub async fn login(&self, credentials: &Credentials) -> ApiResponse<TokenPair> {
        let body = match RequestBody::json(credentials) {
            Ok(body) => body,
            Err(e) => return ApiResponse::transport(e.to_string()),
        };
        let path = self.inner.config.sign_in_path.clone();
        let res: ApiResponse<TokenPair> = self
            .dispatch(Method::POST, &path, &body, &RequestConfig::new(), false)
            .await;

        if let Some(pair) = res.ok() {
            let session = Session::from_tokens(pair.clone());
            if let Err(e) = self.inner.session.save_dyn(session).await {
                tracing::error!(error = %e, "Failed to store session after sign-in");
                return ApiResponse::transport(format!("Failed to store session: {e}"));
            }
            tracing::info!("Signed in");
        }
        res
    }

    /// Forget the stored credentials. No request is sent and no hook is called.
    pub async fn logout(&self) {
        self.inner.clear_session().await;
        tracing::info!("Signed out");
    }

    /// Currently stored session.
    pub async fn current_session(&self) -> Option<Session> {
        self.inner.load_session().await
    }

    pub async fn session_state(&self) -> SessionState {
        match self.inner.load_session().await {
            Some(_) => SessionState::Authenticated,
            None => SessionState::Anonymous,
        }
    }

    // ── Cancellation ───────────────────────────────────────────────────

    /// Abort every in-flight request. Requests issued afterwards proceed normally.
    pub fn cancel_all(&self) {
        let mut root = self
            .inner
            .cancel_root
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        root.cancel();
        *root = CancellationToken::new();
        tracing::debug!("Cancelled in-flight requests");
    }

    // ── Internals ──────────────────────────────────────────────────────

    async fn dispatch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &RequestBody,
        config: &RequestConfig,
        notify: bool,
    ) -> ApiResponse<T> {
        let url = match self.inner.config.resolve(path) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(error = %e, "Rejected request path");
                return ApiResponse::transport(e.to_string());
            }
        };

        let mut retried = false;
        loop {
            let token = self.inner.load_session().await.map(|s| s.access_token);
            let exchange = self
                .inner
                .send(&method, &url, path, body, config, token.as_deref())
                .await;

            let (status, payload) = match exchange {
                Exchange::Response { status, payload } => (status, payload),
                Exchange::Cancelled => return ApiResponse::transport(REQUEST_CANCELLED),
                Exchange::Transport(message) => return ApiResponse::transport(message),
            };

            if status.is_success() {
                return payload.into_success(status.as_u16());
            }

            if status == StatusCode::UNAUTHORIZED
                && payload.message() == Some(EXPIRED_TOKEN)
                && !retried
            {
                retried = true;
                let recovery = match token {
                    Some(stale) => self.recover(stale).await,
                    None => Recovery::Ended,
                };
                match recovery {
                    Recovery::Retry => continue,
                    Recovery::Cancelled => return ApiResponse::transport(REQUEST_CANCELLED),
                    Recovery::Ended => return payload.into_failure(status.as_u16()),
                }
            }

            if notify {
                self.inner.notify(Notice {
                    status: i32::from(status.as_u16()),
                    message: payload.message().unwrap_or(NOTICE_FALLBACK).to_owned(),
                });
            }
            return payload.into_failure(status.as_u16());
        }
    }

    /// Handle an expired-token response to a request sent with `stale`.
    ///
    /// Concurrent callers that sent the same token share one recovery. A
    /// recovery only acts while the stored token is still `stale`, so late
    /// arrivals after a wipe or rotation never repeat the side effects.
    async fn recover(&self, stale: String) -> Recovery {
        let inner = Arc::clone(&self.inner);
        let key = stale.clone();
        self.inner
            .recovery
            .run(key, move || async move { inner.recover(stale).await })
            .await
    }
}

impl Inner {
    async fn load_session(&self) -> Option<Session> {
        match self.session.load_dyn().await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!(error = %e, "Session store read failed; continuing unauthenticated");
                None
            }
        }
    }

    async fn clear_session(&self) {
        if let Err(e) = self.session.clear_dyn().await {
            tracing::error!(error = %e, "Session store clear failed");
        }
    }

    fn notify(&self, notice: Notice) {
        self.notifier.notify(&notice);
    }

    fn cancel_root(&self) -> CancellationToken {
        self.cancel_root
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn send(
        &self,
        method: &Method,
        url: &Url,
        path: &str,
        body: &RequestBody,
        config: &RequestConfig,
        token: Option<&str>,
    ) -> Exchange {
        let content_type = if self.config.is_multipart(method, path) {
            MULTIPART_FORM_DATA
        } else {
            APPLICATION_JSON
        };

        let mut req = self
            .http
            .request(method.clone(), url.clone())
            .timeout(config.timeout.unwrap_or(self.config.timeout))
            .header(ACCEPT, APPLICATION_JSON);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        req = match body {
            RequestBody::Empty => req.header(CONTENT_TYPE, content_type),
            RequestBody::Json(value) => req
                .header(CONTENT_TYPE, content_type)
                .body(value.to_string()),
            // reqwest sets the content type, boundary included.
            RequestBody::Multipart(form) => match form.to_form() {
                Ok(form) => req.multipart(form),
                Err(e) => {
                    tracing::warn!(error = %e, "Invalid multipart form");
                    return Exchange::Transport(e.to_string());
                }
            },
        };
        if !config.headers.is_empty() {
            req = req.headers(config.headers.clone());
        }

        tracing::debug!(%method, %url, authenticated = token.is_some(), "Sending request");

        let root = self.cancel_root();
        let own = config.cancel.clone().unwrap_or_else(CancellationToken::new);
        let exchange = async {
            let response = req.send().await?;
            let status = response.status();
            let bytes = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, bytes))
        };

        tokio::select! {
            () = root.cancelled() => Exchange::Cancelled,
            () = own.cancelled() => Exchange::Cancelled,
            res = exchange => match res {
                Ok((status, bytes)) => {
                    tracing::debug!(%method, %url, status = status.as_u16(), "Received response");
                    Exchange::Response { status, payload: Payload::parse(&bytes) }
                }
                Err(e) if e.is_timeout() => {
                    tracing::warn!(%method, %url, "Request timed out");
                    Exchange::Transport(REQUEST_TIMED_OUT.into())
                }
                Err(e) => {
                    tracing::warn!(%method, %url, error = %e, "Request failed");
                    Exchange::Transport(crate::envelope::FALLBACK_MESSAGE.into())
                }
            },
        }
    }

    async fn recover(&self, stale: String) -> Recovery {
        let session = match self.load_session().await {
            Some(session) if session.access_token == stale => session,
            Some(_) if self.config.token_refresh => return Recovery::Retry,
            _ => return Recovery::Ended,
        };

        tracing::warn!("Access token expired");

        if self.config.token_refresh {
            match self.refresh(&session).await {
                Refresh::Rotated(pair) => {
                    match self.session.save_dyn(Session::from_tokens(pair)).await {
                        Ok(()) => {
                            tracing::info!("Access token refreshed");
                            return Recovery::Retry;
                        }
                        Err(e) => tracing::error!(error = %e, "Failed to store refreshed session"),
                    }
                }
                Refresh::Cancelled => {
                    tracing::debug!("Token refresh cancelled");
                    return Recovery::Cancelled;
                }
                Refresh::Failed => {}
            }
            self.notify(Notice {
                status: i32::from(StatusCode::UNAUTHORIZED.as_u16()),
                message: SESSION_TIMED_OUT.into(),
            });
        }

        self.clear_session().await;
        self.on_expired.on_session_expired(&self.config.login_path);
        Recovery::Ended
    }

    /// Exchange the refresh token for a new pair.
    async fn refresh(&self, session: &Session) -> Refresh {
        let Ok(url) = self.config.resolve(&self.config.refresh_path) else {
            return Refresh::Failed;
        };
        let body = RequestBody::Json(json!({ "refreshToken": session.refresh_token }));
        let exchange = self
            .send(
                &Method::POST,
                &url,
                &self.config.refresh_path,
                &body,
                &RequestConfig::new(),
                Some(&session.access_token),
            )
            .await;

        let (status, payload) = match exchange {
            Exchange::Response { status, payload } => (status, payload),
            Exchange::Cancelled => return Refresh::Cancelled,
            Exchange::Transport(_) => return Refresh::Failed,
        };
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Token refresh rejected");
            return Refresh::Failed;
        }

        match payload
            .response_data
            .or(payload.data)
            .and_then(|value: JsonValue| serde_json::from_value::<TokenPair>(value).ok())
        {
            Some(pair) => Refresh::Rotated(pair),
            None => {
                tracing::warn!("Token refresh response carried no token pair");
                Refresh::Failed
            }
        }
    }
}
