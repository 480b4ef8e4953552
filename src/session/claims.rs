use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::Value as JsonValue;

use crate::types::UserId;

/// Read the `user_id` claim from a JWT-shaped access token without verifying it.
///
/// The id is only used to label the stored session; the server remains the
/// sole authority on the token. Opaque tokens yield `None`.
#[must_use]
pub fn user_id_from_token(token: &str) -> Option<UserId> {
    let mut parts = token.split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    // Some issuers pad the payload segment anyway.
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: JsonValue = serde_json::from_slice(&bytes).ok()?;

    match claims.get("user_id")? {
        JsonValue::String(s) if !s.is_empty() => Some(UserId(s.clone())),
        JsonValue::Number(n) => Some(UserId(n.to_string())),
        _ => None,
    }
}
