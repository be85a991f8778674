//! Show queries
//!
//! Shows have no delete of their own; they disappear with their venue or
//! artist through the foreign-key cascades.

use crate::db::models::{NewShow, ShowListing};
use crate::Result;
use sqlx::{SqliteConnection, SqlitePool};

/// All shows with venue and artist, latest start first
pub async fn list_all(pool: &SqlitePool) -> Result<Vec<ShowListing>> {
    let shows = sqlx::query_as::<_, ShowListing>(
        r#"
        SELECT s.id AS show_id,
               v.id AS venue_id,
               v.name AS venue_name,
               a.id AS artist_id,
               a.name AS artist_name,
               a.image_link AS artist_image_link,
               s.start_time AS start_time
        FROM shows s
        JOIN venues v ON v.id = s.venue_id
        JOIN artists a ON a.id = s.artist_id
        ORDER BY s.start_time DESC, s.id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(shows)
}

/// Number of shows
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shows")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Insert a show, returning its generated id
///
/// Fails with a foreign-key violation when the venue or artist is missing.
pub async fn insert(conn: &mut SqliteConnection, show: &NewShow) -> Result<i64> {
    let result = sqlx::query("INSERT INTO shows (venue_id, artist_id, start_time) VALUES (?, ?, ?)")
        .bind(show.venue_id)
        .bind(show.artist_id)
        .bind(show.start_time)
        .execute(&mut *conn)
        .await?;

    Ok(result.last_insert_rowid())
}
