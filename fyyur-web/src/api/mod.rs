//! HTTP handlers for fyyur-web

pub mod artists;
pub mod buildinfo;
pub mod health;
pub mod home;
pub mod shows;
pub mod venues;

pub use buildinfo::get_build_info;
pub use health::health_routes;

use askama::Template;
use axum::http::header::SET_COOKIE;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;
use sqlx::{Sqlite, Transaction};
use tracing::warn;

use crate::error::{ApiError, ApiResult};
use crate::flash::{self, FlashMessage, IncomingFlash};
use crate::AppState;

/// Body of the venue and artist search forms
#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search_term: String,
}

/// Render a page, clearing any flash cookie the request carried
pub fn render<T: Template>(page: T, flash: &IncomingFlash) -> ApiResult<Response> {
    let html = Html(page.render()?);
    if flash.needs_clearing() {
        Ok(([(SET_COOKIE, flash::clear_cookie())], html).into_response())
    } else {
        Ok(html.into_response())
    }
}

/// 303 redirect that leaves notices for the next page
pub fn redirect_with_flash(state: &AppState, to: &str, messages: Vec<FlashMessage>) -> Response {
    let cookie = flash::set_cookie(&state.secret_key, &messages);
    ([(SET_COOKIE, cookie)], Redirect::to(to)).into_response()
}

/// Parse a path id; anything that is not a positive integer cannot exist
pub fn parse_id(raw: &str) -> ApiResult<i64> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::NotFound(format!("id {:?}", raw))),
    }
}

/// Commit on success, roll back on failure
///
/// The transaction is consumed either way. A rollback failure is logged and
/// the operation's error is returned.
pub async fn finish<T>(
    tx: Transaction<'_, Sqlite>,
    outcome: fyyur_common::Result<T>,
) -> fyyur_common::Result<T> {
    match outcome {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!("Rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}

/// Unknown routes
pub async fn not_found() -> ApiError {
    ApiError::NotFound("route".to_string())
}
