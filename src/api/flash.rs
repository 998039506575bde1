//! One-shot status messages carried across the post/redirect/get cycle.
//!
//! The cookie holds a fixed code, never user text. The listing page maps
//! the code back to a message and clears the cookie.

use axum::http::header::{COOKIE, LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::pipeline::Rejection;

pub const FLASH_COOKIE: &str = "flash";

const SUCCESS_CODE: &str = "submitted";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    Submitted,
    Rejected(Rejection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Success,
    Error,
}

impl FlashLevel {
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl Flash {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Submitted => SUCCESS_CODE,
            Self::Rejected(r) => r.code(),
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        if code == SUCCESS_CODE {
            return Some(Self::Submitted);
        }
        Rejection::from_code(code).map(Self::Rejected)
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Submitted => "Submission successful",
            Self::Rejected(r) => r.message(),
        }
    }

    pub fn level(&self) -> FlashLevel {
        match self {
            Self::Submitted => FlashLevel::Success,
            Self::Rejected(_) => FlashLevel::Error,
        }
    }

    fn set_cookie(&self) -> HeaderValue {
        let cookie = format!("{FLASH_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", self.code());
        // Codes are ASCII identifiers, so this never falls through.
        HeaderValue::from_str(&cookie).unwrap_or_else(|_| clear_cookie())
    }
}

/// `303 See Other` to `location`, setting the flash cookie.
pub fn redirect_with(flash: Flash, location: &'static str) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(LOCATION, HeaderValue::from_static(location));
    headers.insert(SET_COOKIE, flash.set_cookie());
    (StatusCode::SEE_OTHER, headers).into_response()
}

/// Pending flash from the request cookies. Unknown codes are ignored.
pub fn read(headers: &HeaderMap) -> Option<Flash> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == FLASH_COOKIE)
        .and_then(|(_, code)| Flash::from_code(code.trim()))
}

/// Cookie header that expires the flash.
pub fn clear_cookie() -> HeaderValue {
    HeaderValue::from_static("flash=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
}
