//! Artist pages: listing, search, detail, create, edit, delete

use axum::{
    extract::{Path, State},
    response::Response,
    Form,
};
use fyyur_common::db::{artists, ArtistFields, NamedEntity};
use fyyur_common::{listing, schedule, time};
use sqlx::SqlitePool;
use tracing::{info, warn};

use super::{finish, parse_id, redirect_with_flash, render, SearchForm};
use crate::error::ApiResult;
use crate::flash::{FlashMessage, IncomingFlash};
use crate::forms::{validate_artist, FormData};
use crate::views::{
    ArtistDetailPage, ArtistFormPage, ArtistFormView, ArtistsPage, ConfirmDeletePage, SearchPage,
};
use crate::AppState;

/// GET /artists
pub async fn list_artists(
    State(state): State<AppState>,
    flash: IncomingFlash,
) -> ApiResult<Response> {
    let artists = artists::list_all(&state.db)
        .await?
        .into_iter()
        .map(|a| NamedEntity {
            id: a.id,
            name: a.name,
        })
        .collect();
    render(
        ArtistsPage {
            messages: flash.messages(),
            artists,
        },
        &flash,
    )
}

/// POST /artists/search
pub async fn search_artists(
    State(state): State<AppState>,
    flash: IncomingFlash,
    Form(form): Form<SearchForm>,
) -> ApiResult<Response> {
    let results = listing::search_artists(&state.db, &form.search_term, time::now()).await?;
    render(
        SearchPage {
            messages: flash.messages(),
            kind: "artists",
            search_term: form.search_term,
            results,
        },
        &flash,
    )
}

/// GET /artists/:id
pub async fn show_artist(
    State(state): State<AppState>,
    Path(id): Path<String>,
    flash: IncomingFlash,
) -> ApiResult<Response> {
    let id = parse_id(&id)?;
    let artist = artists::find(&state.db, id).await?;
    let shows = schedule::classify(artists::shows_for(&state.db, id).await?, time::now());
    render(
        ArtistDetailPage {
            messages: flash.messages(),
            artist: artist.into(),
            shows,
        },
        &flash,
    )
}

/// GET /artists/create
pub async fn create_artist_form(flash: IncomingFlash) -> ApiResult<Response> {
    render(
        ArtistFormPage {
            messages: flash.messages(),
            heading: "List a new artist".to_string(),
            action: "/artists/create".to_string(),
            form: ArtistFormView::from(ArtistFields::default()),
        },
        &flash,
    )
}

async fn insert_artist(pool: &SqlitePool, fields: &ArtistFields) -> fyyur_common::Result<i64> {
    let mut tx = pool.begin().await?;
    let outcome = artists::insert(&mut *tx, fields, time::now()).await;
    finish(tx, outcome).await
}

/// POST /artists/create
pub async fn create_artist_submission(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let form = FormData::new(pairs);
    let name = form.display_name();

    let failure = match validate_artist(&form) {
        Ok(fields) => match insert_artist(&state.db, &fields).await {
            Ok(id) => {
                info!("Listed artist {} ({})", id, fields.name);
                return redirect_with_flash(
                    &state,
                    "/",
                    vec![FlashMessage::success(format!(
                        "Artist {} was successfully listed!",
                        fields.name
                    ))],
                );
            }
            Err(e) => e.to_string(),
        },
        Err(errors) => errors.to_string(),
    };

    warn!("Artist {} could not be listed: {}", name, failure);
    redirect_with_flash(
        &state,
        "/",
        vec![
            FlashMessage::error(format!("An error occurred. Artist {} could not be listed.", name)),
            FlashMessage::error(failure),
        ],
    )
}

/// GET /artists/:id/edit
pub async fn edit_artist_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    flash: IncomingFlash,
) -> ApiResult<Response> {
    let id = parse_id(&id)?;
    let artist = artists::find(&state.db, id).await?;
    render(
        ArtistFormPage {
            messages: flash.messages(),
            heading: format!("Edit artist {}", artist.name),
            action: format!("/artists/{}/edit", id),
            form: ArtistFormView::from(ArtistFields::from(artist)),
        },
        &flash,
    )
}

async fn update_artist(
    pool: &SqlitePool,
    id: i64,
    fields: &ArtistFields,
) -> fyyur_common::Result<()> {
    let mut tx = pool.begin().await?;
    let outcome = artists::update(&mut *tx, id, fields).await;
    finish(tx, outcome).await
}

/// POST /artists/:id/edit
pub async fn edit_artist_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> ApiResult<Response> {
    let id = parse_id(&id)?;
    let existing = artists::find(&state.db, id).await?;
    let detail = format!("/artists/{}", id);
    let form = FormData::new(pairs);

    let failure = match validate_artist(&form) {
        Ok(fields) => match update_artist(&state.db, id, &fields).await {
            Ok(()) => {
                info!("Updated artist {} ({})", id, fields.name);
                return Ok(redirect_with_flash(
                    &state,
                    &detail,
                    vec![FlashMessage::success(format!(
                        "Artist {} was successfully updated!",
                        fields.name
                    ))],
                ));
            }
            Err(e) if e.is_not_found() => return Err(e.into()),
            Err(e) => e.to_string(),
        },
        Err(errors) => errors.to_string(),
    };

    warn!("Artist {} could not be updated: {}", id, failure);
    Ok(redirect_with_flash(
        &state,
        &detail,
        vec![
            FlashMessage::error(format!(
                "An error occurred. Artist {} could not be updated.",
                existing.name
            )),
            FlashMessage::error(failure),
        ],
    ))
}

/// GET /artists/:id/delete
pub async fn delete_artist_confirm(
    State(state): State<AppState>,
    Path(id): Path<String>,
    flash: IncomingFlash,
) -> ApiResult<Response> {
    let id = parse_id(&id)?;
    let artist = artists::find(&state.db, id).await?;
    render(
        ConfirmDeletePage {
            messages: flash.messages(),
            kind: "Artist",
            name: artist.name,
            action: format!("/artists/{}/delete", id),
            cancel: format!("/artists/{}", id),
        },
        &flash,
    )
}

async fn remove_artist(pool: &SqlitePool, id: i64) -> fyyur_common::Result<()> {
    let mut tx = pool.begin().await?;
    let outcome = artists::delete(&mut *tx, id).await;
    finish(tx, outcome).await
}

/// POST /artists/:id/delete
pub async fn delete_artist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_id(&id)?;
    let artist = artists::find(&state.db, id).await?;

    match remove_artist(&state.db, id).await {
        Ok(()) => {
            info!("Deleted artist {} ({})", id, artist.name);
            Ok(redirect_with_flash(
                &state,
                "/",
                vec![FlashMessage::success(format!(
                    "Artist {} was successfully deleted!",
                    artist.name
                ))],
            ))
        }
        Err(e) if e.is_not_found() => Err(e.into()),
        Err(e) => {
            warn!("Artist {} could not be deleted: {}", id, e);
            Ok(redirect_with_flash(
                &state,
                &format!("/artists/{}", id),
                vec![FlashMessage::error(format!(
                    "Artist {} was not successfully deleted!",
                    artist.name
                ))],
            ))
        }
    }
}
