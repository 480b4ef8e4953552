//! Credential persistence for the API client.
//!
//! A [`Session`] is the access/refresh token pair of a signed-in admin.
//! The client never touches global state: it reads and writes sessions
//! through an injected [`SessionStore`].
//!
//! ```rust,ignore
//! use backoffice_client::session::{MemorySessionStore, Session};
//!
//! let store = MemorySessionStore::new();
//! let client = ApiClient::builder(config).session_store(store).build()?;
//! ```

mod claims;
#[cfg(feature = "cookies")]
mod cookies;
mod store;

use serde::{Deserialize, Serialize};

use crate::types::{TokenPair, UserId};

pub use claims::user_id_from_token;
#[cfg(feature = "cookies")]
pub use cookies::CookieSessionStore;
pub(crate) use store::SessionStoreDyn;
pub use store::{MemorySessionStore, SessionStore};

/// Storage key of the access token.
pub const TOKEN_KEY: &str = "token";
/// Storage key of the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
/// Storage key of the user id derived from the access token.
pub const USER_ID_KEY: &str = "userId";

/// Credentials of a signed-in admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// `user_id` claim of the access token, when it carries one.
    pub user_id: Option<UserId>,
}

impl Session {
    /// Build a session from a token pair, deriving the user id from the access token.
    #[must_use]
    pub fn from_tokens(pair: TokenPair) -> Self {
        let user_id = user_id_from_token(&pair.token);
        Self {
            access_token: pair.token,
            refresh_token: pair.refresh_token,
            user_id,
        }
    }
}

/// Session validity as observed by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No token; requests go out unauthenticated.
    Anonymous,
    /// Token present; requests carry a bearer header.
    Authenticated,
}
