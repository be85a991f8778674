//! Venue pages: listing, search, detail, create, edit, delete

use axum::{
    extract::{Path, State},
    response::Response,
    Form,
};
use fyyur_common::db::{venues, VenueFields};
use fyyur_common::{listing, schedule, time};
use sqlx::SqlitePool;
use tracing::{info, warn};

use super::{finish, parse_id, redirect_with_flash, render, SearchForm};
use crate::error::ApiResult;
use crate::flash::{FlashMessage, IncomingFlash};
use crate::forms::{validate_venue, FormData};
use crate::views::{
    ConfirmDeletePage, SearchPage, VenueDetailPage, VenueFormPage, VenueFormView, VenuesPage,
};
use crate::AppState;

/// GET /venues
pub async fn list_venues(
    State(state): State<AppState>,
    flash: IncomingFlash,
) -> ApiResult<Response> {
    let areas = listing::venue_areas(&state.db, time::now()).await?;
    render(
        VenuesPage {
            messages: flash.messages(),
            areas,
        },
        &flash,
    )
}

/// POST /venues/search
pub async fn search_venues(
    State(state): State<AppState>,
    flash: IncomingFlash,
    Form(form): Form<SearchForm>,
) -> ApiResult<Response> {
    let results = listing::search_venues(&state.db, &form.search_term, time::now()).await?;
    render(
        SearchPage {
            messages: flash.messages(),
            kind: "venues",
            search_term: form.search_term,
            results,
        },
        &flash,
    )
}

/// GET /venues/:id
pub async fn show_venue(
    State(state): State<AppState>,
    Path(id): Path<String>,
    flash: IncomingFlash,
) -> ApiResult<Response> {
    let id = parse_id(&id)?;
    let venue = venues::find(&state.db, id).await?;
    let shows = schedule::classify(venues::shows_for(&state.db, id).await?, time::now());
    render(
        VenueDetailPage {
            messages: flash.messages(),
            venue: venue.into(),
            shows,
        },
        &flash,
    )
}

/// GET /venues/create
pub async fn create_venue_form(flash: IncomingFlash) -> ApiResult<Response> {
    render(
        VenueFormPage {
            messages: flash.messages(),
            heading: "List a new venue".to_string(),
            action: "/venues/create".to_string(),
            form: VenueFormView::from(VenueFields::default()),
        },
        &flash,
    )
}

async fn insert_venue(pool: &SqlitePool, fields: &VenueFields) -> fyyur_common::Result<i64> {
    let mut tx = pool.begin().await?;
    let outcome = venues::insert(&mut *tx, fields, time::now()).await;
    finish(tx, outcome).await
}

/// POST /venues/create
pub async fn create_venue_submission(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let form = FormData::new(pairs);
    let name = form.display_name();

    let failure = match validate_venue(&form) {
        Ok(fields) => match insert_venue(&state.db, &fields).await {
            Ok(id) => {
                info!("Listed venue {} ({})", id, fields.name);
                return redirect_with_flash(
                    &state,
                    "/",
                    vec![FlashMessage::success(format!(
                        "Venue {} was successfully listed!",
                        fields.name
                    ))],
                );
            }
            Err(e) => e.to_string(),
        },
        Err(errors) => errors.to_string(),
    };

    warn!("Venue {} could not be listed: {}", name, failure);
    redirect_with_flash(
        &state,
        "/",
        vec![
            FlashMessage::error(format!("An error occurred. Venue {} could not be listed.", name)),
            FlashMessage::error(failure),
        ],
    )
}

/// GET /venues/:id/edit
pub async fn edit_venue_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    flash: IncomingFlash,
) -> ApiResult<Response> {
    let id = parse_id(&id)?;
    let venue = venues::find(&state.db, id).await?;
    render(
        VenueFormPage {
            messages: flash.messages(),
            heading: format!("Edit venue {}", venue.name),
            action: format!("/venues/{}/edit", id),
            form: VenueFormView::from(VenueFields::from(venue)),
        },
        &flash,
    )
}

async fn update_venue(
    pool: &SqlitePool,
    id: i64,
    fields: &VenueFields,
) -> fyyur_common::Result<()> {
    let mut tx = pool.begin().await?;
    let outcome = venues::update(&mut *tx, id, fields).await;
    finish(tx, outcome).await
}

/// POST /venues/:id/edit
pub async fn edit_venue_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> ApiResult<Response> {
    let id = parse_id(&id)?;
    let existing = venues::find(&state.db, id).await?;
    let detail = format!("/venues/{}", id);
    let form = FormData::new(pairs);

    let failure = match validate_venue(&form) {
        Ok(fields) => match update_venue(&state.db, id, &fields).await {
            Ok(()) => {
                info!("Updated venue {} ({})", id, fields.name);
                return Ok(redirect_with_flash(
                    &state,
                    &detail,
                    vec![FlashMessage::success(format!(
                        "Venue {} was successfully updated!",
                        fields.name
                    ))],
                ));
            }
            Err(e) if e.is_not_found() => return Err(e.into()),
            Err(e) => e.to_string(),
        },
        Err(errors) => errors.to_string(),
    };

    warn!("Venue {} could not be updated: {}", id, failure);
    Ok(redirect_with_flash(
        &state,
        &detail,
        vec![
            FlashMessage::error(format!(
                "An error occurred. Venue {} could not be updated.",
                existing.name
            )),
            FlashMessage::error(failure),
        ],
    ))
}

/// GET /venues/:id/delete
pub async fn delete_venue_confirm(
    State(state): State<AppState>,
    Path(id): Path<String>,
    flash: IncomingFlash,
) -> ApiResult<Response> {
    let id = parse_id(&id)?;
    let venue = venues::find(&state.db, id).await?;
    render(
        ConfirmDeletePage {
            messages: flash.messages(),
            kind: "Venue",
            name: venue.name,
            action: format!("/venues/{}/delete", id),
            cancel: format!("/venues/{}", id),
        },
        &flash,
    )
}

async fn remove_venue(pool: &SqlitePool, id: i64) -> fyyur_common::Result<()> {
    let mut tx = pool.begin().await?;
    let outcome = venues::delete(&mut *tx, id).await;
    finish(tx, outcome).await
}

/// POST /venues/:id/delete
pub async fn delete_venue(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_id(&id)?;
    let venue = venues::find(&state.db, id).await?;

    match remove_venue(&state.db, id).await {
        Ok(()) => {
            info!("Deleted venue {} ({})", id, venue.name);
            Ok(redirect_with_flash(
                &state,
                "/",
                vec![FlashMessage::success(format!(
                    "Venue {} was successfully deleted!",
                    venue.name
                ))],
            ))
        }
        Err(e) if e.is_not_found() => Err(e.into()),
        Err(e) => {
            warn!("Venue {} could not be deleted: {}", id, e);
            Ok(redirect_with_flash(
                &state,
                &format!("/venues/{}", id),
                vec![FlashMessage::error(format!(
                    "Venue {} was not successfully deleted!",
                    venue.name
                ))],
            ))
        }
    }
}
