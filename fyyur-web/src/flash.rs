//! One-shot flash notices carried in a signed cookie
//!
//! Cookie value: `<base64url(json messages)>.<sha256 hex signature>`.
//! A cookie that fails verification is treated as absent (and cleared).
//! Pages that read a flash clear the cookie in the same response.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use fyyur_common::SecretKey;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use tracing::debug;

use crate::AppState;

/// Cookie name for pending flash notices
pub const FLASH_COOKIE: &str = "fyyur_flash";

/// Notice severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

/// A user-visible notice shown once on the next rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub text: String,
}

impl FlashMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            text: text.into(),
        }
    }

    /// CSS class used by the layout
    pub fn css_class(&self) -> &'static str {
        match self.level {
            FlashLevel::Success => "flash-success",
            FlashLevel::Error => "flash-error",
        }
    }
}

/// Encode and sign messages into a cookie value
pub fn encode(key: &SecretKey, messages: &[FlashMessage]) -> String {
    // Serializing a Vec of plain structs cannot fail
    let json = serde_json::to_vec(messages).unwrap_or_default();
    let payload = URL_SAFE_NO_PAD.encode(json);
    let signature = key.sign(&payload);
    format!("{}.{}", payload, signature)
}

/// Verify and decode a cookie value
pub fn decode(key: &SecretKey, value: &str) -> Option<Vec<FlashMessage>> {
    let (payload, signature) = value.rsplit_once('.')?;
    if !key.verify(payload, signature) {
        return None;
    }
    let json = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&json).ok()
}

/// `Set-Cookie` value storing messages for the next page
pub fn set_cookie(key: &SecretKey, messages: &[FlashMessage]) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        FLASH_COOKIE,
        encode(key, messages)
    )
}

/// `Set-Cookie` value removing the flash cookie
pub fn clear_cookie() -> String {
    format!("{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax", FLASH_COOKIE)
}

/// Find a cookie by name in a `Cookie` header value
fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
}

/// Flash notices sent with the current request
#[derive(Debug, Clone, Default)]
pub struct IncomingFlash {
    messages: Vec<FlashMessage>,
    cookie_present: bool,
}

impl IncomingFlash {
    /// Parse from the request's `Cookie` headers
    pub fn from_headers(key: &SecretKey, headers: &axum::http::HeaderMap) -> Self {
        let raw = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(|h| find_cookie(h, FLASH_COOKIE));

        match raw {
            None => Self::default(),
            Some(value) => {
                let messages = decode(key, value).unwrap_or_else(|| {
                    debug!("Ignoring flash cookie that failed verification");
                    Vec::new()
                });
                Self {
                    messages,
                    cookie_present: true,
                }
            }
        }
    }

    pub fn messages(&self) -> Vec<FlashMessage> {
        self.messages.clone()
    }

    /// True when the response should clear the cookie
    pub fn needs_clearing(&self) -> bool {
        self.cookie_present
    }
}

#[async_trait]
impl FromRequestParts<AppState> for IncomingFlash {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&state.secret_key, &parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue};

    fn key() -> SecretKey {
        SecretKey::from_configured("test-key").unwrap()
    }

    #[test]
    fn test_decode_recovers_messages() {
        let messages = vec![
            FlashMessage::success("Venue The Musical Hop was successfully listed!"),
            FlashMessage::error("Ünïcode & <markup> survive"),
        ];
        let value = encode(&key(), &messages);
        assert_eq!(decode(&key(), &value), Some(messages));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let value = encode(&key(), &[FlashMessage::success("ok")]);
        let forged_payload = URL_SAFE_NO_PAD.encode(br#"[{"level":"success","text":"forged"}]"#);
        let (_, signature) = value.rsplit_once('.').unwrap();
        let forged = format!("{}.{}", forged_payload, signature);
        assert_eq!(decode(&key(), &forged), None);
    }

    #[test]
    fn test_other_key_rejected() {
        let value = encode(&key(), &[FlashMessage::success("ok")]);
        let other = SecretKey::from_configured("other-key").unwrap();
        assert_eq!(decode(&other, &value), None);
    }

    #[test]
    fn test_unsigned_value_rejected() {
        assert_eq!(decode(&key(), "no-signature-here"), None);
    }

    #[test]
    fn test_find_cookie_among_others() {
        let header = "theme=dark; fyyur_flash=abc.def; lang=en";
        assert_eq!(find_cookie(header, FLASH_COOKIE), Some("abc.def"));
        assert_eq!(find_cookie(header, "missing"), None);
    }

    #[test]
    fn test_incoming_flash_from_headers() {
        let value = encode(&key(), &[FlashMessage::error("nope")]);
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("{}={}", FLASH_COOKIE, value)).unwrap(),
        );
        let flash = IncomingFlash::from_headers(&key(), &headers);
        assert!(flash.needs_clearing());
        assert_eq!(flash.messages(), vec![FlashMessage::error("nope")]);
    }

    #[test]
    fn test_invalid_cookie_still_cleared() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("fyyur_flash=garbage"));
        let flash = IncomingFlash::from_headers(&key(), &headers);
        assert!(flash.needs_clearing());
        assert!(flash.messages().is_empty());
    }

    #[test]
    fn test_no_cookie() {
        let flash = IncomingFlash::from_headers(&key(), &HeaderMap::new());
        assert!(!flash.needs_clearing());
        assert!(flash.messages().is_empty());
    }

    #[test]
    fn test_set_cookie_shape() {
        let header = set_cookie(&key(), &[FlashMessage::success("hi")]);
        assert!(header.starts_with("fyyur_flash="));
        assert!(header.contains("HttpOnly"));
        assert!(clear_cookie().contains("Max-Age=0"));
    }
}
