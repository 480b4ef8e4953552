use std::time::Duration;

use reqwest::Method;
use url::Url;

use crate::error::Error;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(50);

/// Server message that, together with `401`, marks an expired session.
pub const EXPIRED_TOKEN: &str = "EXPIRED_TOKEN";

/// An endpoint whose requests are sent as `multipart/form-data`.
///
/// Matching is by substring of the request path, optionally restricted
/// to a single method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartEndpoint {
    fragment: String,
    method: Option<Method>,
}

impl MultipartEndpoint {
    /// Match `fragment` for every method.
    #[must_use]
    pub fn any(fragment: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
            method: None,
        }
    }

    /// Match `fragment` only for `method`.
    #[must_use]
    pub fn only(method: Method, fragment: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
            method: Some(method),
        }
    }

    pub(crate) fn matches(&self, method: &Method, path: &str) -> bool {
        path.contains(&self.fragment) && self.method.as_ref().is_none_or(|m| m == method)
    }
}

fn default_multipart_endpoints() -> Vec<MultipartEndpoint> {
    vec![
        MultipartEndpoint::any("product/duplicatePrintifyProduct"),
        MultipartEndpoint::any("/attachment/upload"),
        MultipartEndpoint::only(Method::POST, "me/profileImage"),
    ]
}

/// Back-office API client configuration.
///
/// The base URL is the only required field and is a constructor parameter.
///
/// ```rust,ignore
/// use backoffice_client::ClientConfig;
///
/// let config = ClientConfig::new("https://api.example.com/".parse()?)
///     .with_timeout(std::time::Duration::from_secs(10))
///     .with_token_refresh(true);
/// ```
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ClientConfig {
    pub(crate) base_url: Url,
    pub(crate) timeout: Duration,
    pub(crate) login_path: String,
    pub(crate) sign_in_path: String,
    pub(crate) refresh_path: String,
    pub(crate) token_refresh: bool,
    pub(crate) multipart_endpoints: Vec<MultipartEndpoint>,
}

impl ClientConfig {
    /// Create a configuration for `base_url` with defaults for everything else.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            login_path: "/login".into(),
            sign_in_path: "auth/sign-in".into(),
            refresh_path: "/refreshToken".into(),
            token_refresh: false,
            multipart_endpoints: default_multipart_endpoints(),
        }
    }

    /// Create config from environment variables.
    ///
    /// # Required env vars
    /// - `BACKOFFICE_BASE_URL`: API base URL
    ///
    /// # Optional env vars
    /// - `BACKOFFICE_TIMEOUT_SECS`: per-request timeout in seconds
    /// - `BACKOFFICE_LOGIN_PATH`: path handed to the session-expired handler
    /// - `BACKOFFICE_TOKEN_REFRESH`: `"1"` or `"true"` to refresh expired tokens
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the base URL is missing or a value is malformed.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let base_url_str = var("BACKOFFICE_BASE_URL")
            .ok_or_else(|| Error::Config("BACKOFFICE_BASE_URL is required".into()))?;
        let base_url: Url = base_url_str
            .parse()
            .map_err(|e| Error::Config(format!("BACKOFFICE_BASE_URL: {e}")))?;

        let mut config = Self::new(base_url);

        if let Some(secs) = var("BACKOFFICE_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|e| Error::Config(format!("BACKOFFICE_TIMEOUT_SECS: {e}")))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(path) = var("BACKOFFICE_LOGIN_PATH") {
            config = config.with_login_path(path);
        }

        let refresh = matches!(
            var("BACKOFFICE_TOKEN_REFRESH").as_deref(),
            Some("1") | Some("true"),
        );

        Ok(config.with_token_refresh(refresh))
    }

    /// Override the per-request timeout (default: 50 seconds).
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the path handed to the session-expired handler (default: `/login`).
    #[must_use]
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// Override the sign-in endpoint (default: `auth/sign-in`).
    #[must_use]
    pub fn with_sign_in_path(mut self, path: impl Into<String>) -> Self {
        self.sign_in_path = path.into();
        self
    }

    /// Override the token refresh endpoint (default: `/refreshToken`).
    #[must_use]
    pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    /// Refresh and retry on an expired token instead of ending the session.
    #[must_use]
    pub fn with_token_refresh(mut self, enabled: bool) -> Self {
        self.token_refresh = enabled;
        self
    }

    /// Replace the multipart endpoint allow-list.
    #[must_use]
    pub fn with_multipart_endpoints(mut self, endpoints: Vec<MultipartEndpoint>) -> Self {
        self.multipart_endpoints = endpoints;
        self
    }

    /// API base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Path handed to the session-expired handler.
    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Whether expired tokens are refreshed.
    #[must_use]
    pub fn token_refresh(&self) -> bool {
        self.token_refresh
    }

    pub(crate) fn is_multipart(&self, method: &Method, path: &str) -> bool {
        self.multipart_endpoints
            .iter()
            .any(|e| e.matches(method, path))
    }

    /// Resolve `path` against the base URL.
    ///
    /// Slashes at the seam are collapsed, so `api/` + `/players` and
    /// `api` + `players` both yield `api/players`. Absolute URLs pass through.
    pub(crate) fn resolve(&self, path: &str) -> Result<Url, Error> {
        let joined = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_owned()
        } else if path.is_empty() {
            self.base_url.as_str().to_owned()
        } else {
            format!(
                "{}/{}",
                self.base_url.as_str().trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        };
        joined.parse().map_err(|source| Error::InvalidUrl {
            input: path.to_owned(),
            source,
        })
    }
}
