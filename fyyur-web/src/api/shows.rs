//! Show pages: listing and create

use axum::{extract::State, response::Response, Form};
use fyyur_common::db::{artists, shows, venues, NewShow};
use fyyur_common::time;
use sqlx::SqlitePool;
use tracing::{info, warn};

use super::{finish, redirect_with_flash, render};
use crate::error::ApiResult;
use crate::flash::{FlashMessage, IncomingFlash};
use crate::forms::{validate_show, FormData};
use crate::views::{ShowFormPage, ShowRow, ShowsPage};
use crate::AppState;

/// GET /shows
pub async fn list_shows(
    State(state): State<AppState>,
    flash: IncomingFlash,
) -> ApiResult<Response> {
    let rows = shows::list_all(&state.db)
        .await?
        .into_iter()
        .map(ShowRow::from)
        .collect();
    render(
        ShowsPage {
            messages: flash.messages(),
            shows: rows,
        },
        &flash,
    )
}

/// GET /shows/create
pub async fn create_show_form(
    State(state): State<AppState>,
    flash: IncomingFlash,
) -> ApiResult<Response> {
    let artist_choices = artists::names(&state.db).await?;
    let venue_choices = venues::names(&state.db).await?;
    let default_start = time::display_timestamp(&time::now());
    render(
        ShowFormPage::new(flash.messages(), artist_choices, venue_choices, default_start),
        &flash,
    )
}

async fn insert_show(pool: &SqlitePool, show: &NewShow) -> fyyur_common::Result<i64> {
    let mut tx = pool.begin().await?;
    let outcome = shows::insert(&mut *tx, show).await;
    finish(tx, outcome).await
}

/// POST /shows/create
///
/// Unknown venue or artist ids are rejected by the foreign keys and reported
/// like any other failed write.
pub async fn create_show_submission(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let form = FormData::new(pairs);

    let failure = match validate_show(&form) {
        Ok(show) => match insert_show(&state.db, &show).await {
            Ok(id) => {
                info!(
                    "Listed show {} (artist {} at venue {})",
                    id, show.artist_id, show.venue_id
                );
                return redirect_with_flash(
                    &state,
                    "/",
                    vec![FlashMessage::success("Show was successfully listed!")],
                );
            }
            Err(e) => e.to_string(),
        },
        Err(errors) => errors.to_string(),
    };

    warn!("Show could not be listed: {}", failure);
    redirect_with_flash(
        &state,
        "/",
        vec![
            FlashMessage::error("An error occurred. Show could not be listed."),
            FlashMessage::error(failure),
        ],
    )
}
