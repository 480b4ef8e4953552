use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Server-assigned identifier of a back-office record (player, contact, listing, ...).
///
/// The API uses both numeric and string ids; both travel as path segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl RecordId {
    /// The id percent-encoded as a single path segment.
    #[must_use]
    pub fn as_segment(&self) -> String {
        // form_urlencoded writes a space as `+` and a literal `+` as `%2B`.
        url::form_urlencoded::byte_serialize(self.0.as_bytes())
            .collect::<String>()
            .replace('+', "%20")
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

/// Identifier of the signed-in admin, as carried in the access token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into)]
#[serde(transparent)]
pub struct UserId(pub String);

/// Sign-in credentials.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Access/refresh token pair returned by sign-in and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
}

/// Pagination and filter parameters for list endpoints.
///
/// Serialized as `page=..&perPage=..[&status=..][&category=..]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub page: u32,
    pub per_page: u32,
    pub status: Option<String>,
    pub category: Option<String>,
}

impl PageQuery {
    #[must_use]
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page,
            per_page,
            status: None,
            category: None,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Encode as a URL query string (no leading `?`).
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut ser = url::form_urlencoded::Serializer::new(String::new());
        ser.append_pair("page", &self.page.to_string())
            .append_pair("perPage", &self.per_page.to_string());
        if let Some(status) = &self.status {
            ser.append_pair("status", status);
        }
        if let Some(category) = &self.category {
            ser.append_pair("category", category);
        }
        ser.finish()
    }

    /// Parse a query string produced by [`to_query_string`](Self::to_query_string).
    ///
    /// Key order is irrelevant and unknown keys are ignored. A leading `?` is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Query`] if `page` or `perPage` is missing or not a number.
    pub fn parse(query: &str) -> Result<Self, Error> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut page = None;
        let mut per_page = None;
        let mut status = None;
        let mut category = None;

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "page" => page = Some(parse_number("page", &value)?),
                "perPage" => per_page = Some(parse_number("perPage", &value)?),
                "status" => status = Some(value.into_owned()),
                "category" => category = Some(value.into_owned()),
                _ => {}
            }
        }

        Ok(Self {
            page: page.ok_or_else(|| Error::Query("missing page".into()))?,
            per_page: per_page.ok_or_else(|| Error::Query("missing perPage".into()))?,
            status,
            category,
        })
    }

    /// `path?query`.
    pub(crate) fn append_to(&self, path: &str) -> String {
        format!("{path}?{}", self.to_query_string())
    }
}

fn parse_number(key: &str, value: &str) -> Result<u32, Error> {
    value
        .parse()
        .map_err(|e| Error::Query(format!("{key}: {e}")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn pairs(query: &str) -> HashMap<String, String> {
        url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }

    #[test]
    fn page_query_encodes_camel_case() {
        let q = PageQuery::new(2, 10).to_query_string();
        assert_eq!(q, "page=2&perPage=10");
    }

    #[test]
    fn page_query_round_trip_with_filters() {
        let q = PageQuery::new(1, 50)
            .with_status("pending review")
            .with_category("golf & tennis");
        let parsed = PageQuery::parse(&q.to_query_string()).unwrap();
        assert_eq!(parsed, q);
    }

    #[test]
    fn page_query_parse_ignores_order() {
        let parsed = PageQuery::parse("?category=x&perPage=3&page=4").unwrap();
        assert_eq!(parsed, PageQuery::new(4, 3).with_category("x"));
        assert_eq!(
            pairs(&parsed.to_query_string()),
            pairs("page=4&perPage=3&category=x")
        );
    }

    #[test]
    fn page_query_parse_rejects_missing_page() {
        assert!(matches!(PageQuery::parse("perPage=3"), Err(Error::Query(_))));
        assert!(matches!(PageQuery::parse("page=a&perPage=3"), Err(Error::Query(_))));
    }

    #[test]
    fn record_id_conversions() {
        assert_eq!(RecordId::from(42u64).to_string(), "42");
        assert_eq!(RecordId::from("abc").to_string(), "abc");
        let s: String = RecordId::from("x".to_string()).into();
        assert_eq!(s, "x");
    }

    #[test]
    fn record_id_segment_is_encoded() {
        assert_eq!(RecordId::from(7u64).as_segment(), "7");
        assert_eq!(RecordId::from("a/b?x=1").as_segment(), "a%2Fb%3Fx%3D1");
        assert_eq!(RecordId::from("a b+c").as_segment(), "a%20b%2Bc");
        assert_eq!(RecordId::from("2024-05_x.y").as_segment(), "2024-05_x.y");
    }

    #[test]
    fn token_pair_uses_camel_case() {
        let pair: TokenPair =
            serde_json::from_str(r#"{"token":"a","refreshToken":"b"}"#).unwrap();
        assert_eq!(pair.refresh_token, "b");
    }
}
