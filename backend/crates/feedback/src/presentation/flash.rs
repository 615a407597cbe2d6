//! Flash Messages
//!
//! One-shot messages carried across a redirect in a short-lived cookie
//! holding base64url(JSON). The next rendered page shows it and clears it.
//!
//! Handlers never write the cookie themselves. They attach a
//! [`FlashCookie`] to the response and [`write_flash_cookie`] turns it into
//! a `Set-Cookie` header using the board's cookie settings.

use std::convert::Infallible;
use std::sync::Arc;

use axum::Extension;
use axum::body::Body;
use axum::extract::{FromRequestParts, State};
use axum::http::header::SET_COOKIE;
use axum::http::request::Parts;
use axum::http::{HeaderValue, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use platform::cookie::{CookieConfig, extract_cookie};
use platform::crypto::{from_base64_url, to_base64_url};
use serde::{Deserialize, Serialize};

use crate::application::config::BoardConfig;

pub const FLASH_COOKIE_NAME: &str = "board_flash";

const FLASH_MAX_AGE_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Success,
    Info,
    Primary,
    Error,
}

impl FlashCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashCategory::Success => "success",
            FlashCategory::Info => "info",
            FlashCategory::Primary => "primary",
            FlashCategory::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub category: FlashCategory,
    pub message: String,
}

impl Flash {
    pub fn new(category: FlashCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(FlashCategory::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(FlashCategory::Info, message)
    }

    pub fn primary(message: impl Into<String>) -> Self {
        Self::new(FlashCategory::Primary, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(FlashCategory::Error, message)
    }

    fn cookie_config(secure: bool) -> CookieConfig {
        CookieConfig {
            name: FLASH_COOKIE_NAME.to_string(),
            secure,
            http_only: true,
            max_age_secs: Some(FLASH_MAX_AGE_SECS),
            ..CookieConfig::default()
        }
    }

    pub fn to_set_cookie(&self, secure: bool) -> String {
        // Serializing two plain fields cannot fail
        let json = serde_json::to_vec(self).unwrap_or_default();
        Self::cookie_config(secure).build_set_cookie(&to_base64_url(&json))
    }

    pub fn clear_cookie(secure: bool) -> String {
        Self::cookie_config(secure).build_delete_cookie()
    }

    pub fn decode(value: &str) -> Option<Self> {
        let bytes = from_base64_url(value).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Response part that stores this flash for the next page
    pub fn into_cookie(self) -> Extension<FlashCookie> {
        Extension(FlashCookie::Set(self))
    }

    /// 303 to `location` carrying this flash
    pub fn redirect(self, location: &str) -> Response {
        (self.into_cookie(), Redirect::to(location)).into_response()
    }
}

/// Pending change to the flash cookie, attached as a response extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlashCookie {
    Set(Flash),
    Clear,
}

/// Write the pending [`FlashCookie`] of a response as a `Set-Cookie` header
pub async fn write_flash_cookie(
    State(config): State<Arc<BoardConfig>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;

    let Some(pending) = response.extensions_mut().remove::<FlashCookie>() else {
        return response;
    };

    let set_cookie = match pending {
        FlashCookie::Set(flash) => flash.to_set_cookie(config.cookie_secure),
        FlashCookie::Clear => Flash::clear_cookie(config.cookie_secure),
    };

    match HeaderValue::from_str(&set_cookie) {
        Ok(value) => {
            response.headers_mut().append(SET_COOKIE, value);
        }
        Err(e) => tracing::error!(error = %e, "Flash cookie is not a valid header value"),
    }

    response
}

/// The flash left by the previous response, if any
#[derive(Debug, Default)]
pub struct IncomingFlash {
    flash: Option<Flash>,
    /// A flash cookie was sent (even an unreadable one) and must be cleared
    present: bool,
}

impl IncomingFlash {
    pub fn flash(&self) -> Option<&Flash> {
        self.flash.as_ref()
    }

    pub fn needs_clearing(&self) -> bool {
        self.present
    }
}

impl<S> FromRequestParts<S> for IncomingFlash
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = extract_cookie(&parts.headers, FLASH_COOKIE_NAME);
        Ok(Self {
            present: raw.is_some(),
            flash: raw.as_deref().and_then(Flash::decode),
        })
    }
}
