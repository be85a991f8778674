//! fyyur-web library - venue, artist and show listings
//!
//! Server-rendered pages over the shared SQLite store. Handlers live in
//! [`api`]; the router is assembled by [`build_router`].

use axum::Router;
use fyyur_common::SecretKey;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod flash;
pub mod forms;
pub mod views;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Key signing flash cookies
    pub secret_key: SecretKey,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, secret_key: SecretKey) -> Self {
        Self { db, secret_key }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let venues = Router::new()
        .route("/venues", get(api::venues::list_venues))
        .route("/venues/search", post(api::venues::search_venues))
        .route(
            "/venues/create",
            get(api::venues::create_venue_form).post(api::venues::create_venue_submission),
        )
        .route("/venues/:id", get(api::venues::show_venue))
        .route(
            "/venues/:id/edit",
            get(api::venues::edit_venue_form).post(api::venues::edit_venue_submission),
        )
        .route(
            "/venues/:id/delete",
            get(api::venues::delete_venue_confirm).post(api::venues::delete_venue),
        );

    let artists = Router::new()
        .route("/artists", get(api::artists::list_artists))
        .route("/artists/search", post(api::artists::search_artists))
        .route(
            "/artists/create",
            get(api::artists::create_artist_form).post(api::artists::create_artist_submission),
        )
        .route("/artists/:id", get(api::artists::show_artist))
        .route(
            "/artists/:id/edit",
            get(api::artists::edit_artist_form).post(api::artists::edit_artist_submission),
        )
        .route(
            "/artists/:id/delete",
            get(api::artists::delete_artist_confirm).post(api::artists::delete_artist),
        );

    let shows = Router::new()
        .route("/shows", get(api::shows::list_shows))
        .route(
            "/shows/create",
            get(api::shows::create_show_form).post(api::shows::create_show_submission),
        );

    Router::new()
        .route("/", get(api::home::index))
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(venues)
        .merge(artists)
        .merge(shows)
        .merge(api::health_routes())
        .fallback(api::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
