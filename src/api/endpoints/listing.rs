//! Listing page.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::flash;
use crate::api::page::render_listing;
use crate::api::types::AppState;

/// `GET /`: every stored submission plus the submission form. A pending
/// flash message is shown once and then cleared.
pub async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let store = state.store.clone();
    let records = tokio::task::spawn_blocking(move || store.list_all()).await??;

    let pending = flash::read(&headers);
    let mut response = Html(render_listing(&records, pending)).into_response();
    if pending.is_some() {
        response
            .headers_mut()
            .insert(SET_COOKIE, flash::clear_cookie());
    }

    Ok(response)
}
