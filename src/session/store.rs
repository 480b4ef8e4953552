use std::future::Future;
use std::pin::Pin;
use std::sync::{PoisonError, RwLock};

use super::Session;

type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Consumer-provided session persistence.
///
/// The client calls [`load`](SessionStore::load) before every request,
/// [`save`](SessionStore::save) on sign-in and token refresh, and
/// [`clear`](SessionStore::clear) on sign-out and session expiry.
/// `clear` must be idempotent.
///
/// # Example
///
/// ```rust,ignore
/// impl SessionStore for KeyringStore {
///     async fn load(&self) -> Result<Option<Session>, ...> {
///         self.keyring.get("backoffice").await
///     }
///
///     async fn save(&self, session: Session) -> Result<(), ...> {
///         self.keyring.set("backoffice", &session).await
///     }
///
///     async fn clear(&self) -> Result<(), ...> {
///         self.keyring.delete("backoffice").await
///     }
/// }
/// ```
pub trait SessionStore: Send + Sync + 'static {
    /// Current session, if any.
    fn load(&self) -> impl Future<Output = Result<Option<Session>, StoreError>> + Send;

    /// Replace the current session.
    fn save(&self, session: Session) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Remove every stored credential.
    fn clear(&self) -> impl Future<Output = Result<(), StoreError>> + Send;
}

type BoxFut<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Object-safe wrapper for SessionStore (needed for Arc<dyn>).
pub(crate) trait SessionStoreDyn: Send + Sync {
    fn load_dyn(&self) -> BoxFut<'_, Option<Session>>;
    fn save_dyn(&self, session: Session) -> BoxFut<'_, ()>;
    fn clear_dyn(&self) -> BoxFut<'_, ()>;
}

impl<T: SessionStore> SessionStoreDyn for T {
    fn load_dyn(&self) -> BoxFut<'_, Option<Session>> {
        Box::pin(self.load())
    }

    fn save_dyn(&self, session: Session) -> BoxFut<'_, ()> {
        Box::pin(self.save(session))
    }

    fn clear_dyn(&self) -> BoxFut<'_, ()> {
        Box::pin(self.clear())
    }
}

/// In-process session store. Credentials live as long as the store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `session`.
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            session: RwLock::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<Option<Session>, StoreError> {
        Ok(self
            .session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    async fn save(&self, session: Session) -> Result<(), StoreError> {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(())
    }
}
