#![doc = include_str!("../README.md")]

mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod hooks;
pub mod request;
#[cfg(feature = "resources")]
pub mod resources;
pub mod session;
mod single_flight;
pub mod types;

// Re-exports for convenient access
pub use client::{ApiClient, ApiClientBuilder};
pub use config::{ClientConfig, EXPIRED_TOKEN, MultipartEndpoint};
pub use envelope::{ApiResponse, NO_STATUS};
pub use error::Error;
pub use hooks::{LogExpiry, Notice, Notifier, SessionExpiredHandler, TracingNotifier};
pub use request::{RequestBody, RequestConfig, UploadForm};
#[cfg(feature = "cookies")]
pub use session::CookieSessionStore;
pub use session::{MemorySessionStore, Session, SessionState, SessionStore};
pub use tokio_util::sync::CancellationToken;
pub use types::{Credentials, PageQuery, RecordId, TokenPair, UserId};
