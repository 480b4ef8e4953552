use std::mem;
use std::sync::{Mutex, PoisonError};

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use super::store::SessionStore;
use super::{REFRESH_TOKEN_KEY, Session, TOKEN_KEY, USER_ID_KEY};
use crate::types::UserId;

type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Session store that keeps credentials as cookies.
///
/// Each credential lives under its fixed key (`token`, `refreshToken`,
/// `userId`). Hosts that relay state to a browser can seed the store from
/// an incoming `Cookie` header and emit the current cookies with
/// [`set_cookie_headers`](Self::set_cookie_headers). After
/// [`clear`](SessionStore::clear) those are removal cookies (empty value,
/// `Max-Age=0`) so the browser drops its copies too.
#[derive(Debug)]
pub struct CookieSessionStore {
    jar: Mutex<CookieJar>,
    http_only: bool,
    secure: bool,
    max_age: Duration,
}

impl Default for CookieSessionStore {
    fn default() -> Self {
        Self {
            jar: Mutex::new(CookieJar::new()),
            http_only: true,
            secure: true,
            max_age: Duration::days(7),
        }
    }
}

impl CookieSessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store from a `Cookie` request header (`a=1; b=2`).
    ///
    /// Unparseable pairs are skipped.
    #[must_use]
    pub fn from_cookie_header(header: &str) -> Self {
        let jar = header
            .split(';')
            .map(str::trim)
            .filter(|pair| !pair.is_empty())
            .filter_map(|pair| Cookie::parse(pair.to_owned()).ok())
            .fold(CookieJar::new(), |jar, cookie| jar.add(cookie));
        Self {
            jar: Mutex::new(jar),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    #[must_use]
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    #[must_use]
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Current credentials, or their removals, as `Set-Cookie` header values.
    #[must_use]
    pub fn set_cookie_headers(&self) -> Vec<String> {
        let jar = self.lock();
        [TOKEN_KEY, REFRESH_TOKEN_KEY, USER_ID_KEY]
            .into_iter()
            .filter_map(|key| jar.get(key))
            .map(ToString::to_string)
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CookieJar> {
        self.jar.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn credential_cookie(&self, name: &'static str, value: String) -> Cookie<'static> {
        Cookie::build((name, value))
            .http_only(self.http_only)
            .secure(self.secure)
            .same_site(SameSite::Strict)
            .path("/")
            .max_age(self.max_age)
            .build()
    }

    fn removal_cookie(&self, name: &'static str) -> Cookie<'static> {
        Cookie::build((name, ""))
            .http_only(self.http_only)
            .secure(self.secure)
            .same_site(SameSite::Strict)
            .path("/")
            .max_age(Duration::ZERO)
            .build()
    }
}

/// Value of `key`; removal cookies count as absent.
fn value_of(jar: &CookieJar, key: &str) -> Option<String> {
    jar.get(key)
        .map(|c| c.value().to_owned())
        .filter(|v| !v.is_empty())
}

impl SessionStore for CookieSessionStore {
    async fn load(&self) -> Result<Option<Session>, StoreError> {
        let jar = self.lock();
        let Some(token) = value_of(&jar, TOKEN_KEY) else {
            return Ok(None);
        };
        Ok(Some(Session {
            access_token: token,
            refresh_token: value_of(&jar, REFRESH_TOKEN_KEY).unwrap_or_default(),
            user_id: value_of(&jar, USER_ID_KEY).map(UserId),
        }))
    }

    async fn save(&self, session: Session) -> Result<(), StoreError> {
        let mut jar = self.lock();
        let mut next = mem::replace(&mut *jar, CookieJar::new())
            .add(self.credential_cookie(TOKEN_KEY, session.access_token))
            .add(self.credential_cookie(REFRESH_TOKEN_KEY, session.refresh_token));
        next = match session.user_id {
            Some(id) => next.add(self.credential_cookie(USER_ID_KEY, id.0)),
            None => next.add(self.removal_cookie(USER_ID_KEY)),
        };
        *jar = next;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut jar = self.lock();
        *jar = mem::replace(&mut *jar, CookieJar::new())
            .add(self.removal_cookie(TOKEN_KEY))
            .add(self.removal_cookie(REFRESH_TOKEN_KEY))
            .add(self.removal_cookie(USER_ID_KEY));
        Ok(())
    }
}
