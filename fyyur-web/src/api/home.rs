//! Homepage

use axum::{extract::State, response::Response};
use fyyur_common::db::{artists, venues};

use super::render;
use crate::error::ApiResult;
use crate::flash::IncomingFlash;
use crate::views::HomePage;
use crate::AppState;

/// Number of recent listings shown per kind
const RECENT_LIMIT: i64 = 5;

/// GET /
pub async fn index(State(state): State<AppState>, flash: IncomingFlash) -> ApiResult<Response> {
    let recent_artists = artists::recent(&state.db, RECENT_LIMIT).await?;
    let recent_venues = venues::recent(&state.db, RECENT_LIMIT).await?;
    render(
        HomePage {
            messages: flash.messages(),
            artists: recent_artists,
            venues: recent_venues,
        },
        &flash,
    )
}
