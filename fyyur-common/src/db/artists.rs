//! Artist queries

use crate::db::filter_by_name;
use crate::db::models::{Artist, ArtistFields, CounterpartShow, NamedEntity, ShowTime};
use crate::{Error, Result};
use chrono::NaiveDateTime;
use sqlx::types::Json;
use sqlx::{SqliteConnection, SqlitePool};

const SELECT_ARTIST: &str = "SELECT id, name, city, state, phone, genres, image_link, \
     facebook_link, website_link, seeking_venue, seeking_description, date_listed FROM artists";

/// All artists ordered by id
pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Artist>> {
    let artists = sqlx::query_as::<_, Artist>(&format!("{} ORDER BY id ASC", SELECT_ARTIST))
        .fetch_all(pool)
        .await?;
    Ok(artists)
}

/// Artist by id, `None` when absent
pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<Artist>> {
    let artist = sqlx::query_as::<_, Artist>(&format!("{} WHERE id = ?", SELECT_ARTIST))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(artist)
}

/// Artist by id, `Error::NotFound` when absent
pub async fn find(pool: &SqlitePool, id: i64) -> Result<Artist> {
    get(pool, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("artist {}", id)))
}

/// Most recently listed artists
pub async fn recent(pool: &SqlitePool, limit: i64) -> Result<Vec<NamedEntity>> {
    let artists = sqlx::query_as::<_, NamedEntity>(
        "SELECT id, name FROM artists ORDER BY date_listed DESC, id DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(artists)
}

/// Artist id/name pairs ordered by name (show form choices)
pub async fn names(pool: &SqlitePool) -> Result<Vec<NamedEntity>> {
    let artists =
        sqlx::query_as::<_, NamedEntity>("SELECT id, name FROM artists ORDER BY name, id")
            .fetch_all(pool)
            .await?;
    Ok(artists)
}

/// Artists whose name contains `term`, case-insensitively
///
/// Matching happens in Rust so case folding covers non-ASCII names.
pub async fn search_by_name(pool: &SqlitePool, term: &str) -> Result<Vec<NamedEntity>> {
    let all = sqlx::query_as::<_, NamedEntity>("SELECT id, name FROM artists ORDER BY id ASC")
        .fetch_all(pool)
        .await?;
    Ok(filter_by_name(all, term))
}

/// Start times of every show, keyed by artist
pub async fn show_times(pool: &SqlitePool) -> Result<Vec<ShowTime>> {
    let times = sqlx::query_as::<_, ShowTime>(
        "SELECT artist_id AS owner_id, start_time FROM shows ORDER BY id ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(times)
}

/// Shows by one artist, each with its venue
pub async fn shows_for(pool: &SqlitePool, artist_id: i64) -> Result<Vec<CounterpartShow>> {
    let shows = sqlx::query_as::<_, CounterpartShow>(
        r#"
        SELECT s.id AS show_id,
               v.id AS counterpart_id,
               v.name AS counterpart_name,
               v.image_link AS counterpart_image_link,
               s.start_time AS start_time
        FROM shows s
        JOIN venues v ON v.id = s.venue_id
        WHERE s.artist_id = ?
        ORDER BY s.id ASC
        "#,
    )
    .bind(artist_id)
    .fetch_all(pool)
    .await?;
    Ok(shows)
}

/// Number of artists
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM artists")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Insert an artist, returning its generated id
pub async fn insert(
    conn: &mut SqliteConnection,
    fields: &ArtistFields,
    date_listed: NaiveDateTime,
) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO artists (name, city, state, phone, genres, image_link,
                             facebook_link, website_link, seeking_venue,
                             seeking_description, date_listed)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&fields.name)
    .bind(&fields.city)
    .bind(&fields.state)
    .bind(&fields.phone)
    .bind(Json(&fields.genres))
    .bind(&fields.image_link)
    .bind(&fields.facebook_link)
    .bind(&fields.website_link)
    .bind(fields.seeking_venue)
    .bind(&fields.seeking_description)
    .bind(date_listed)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Overwrite the editable fields of an artist
pub async fn update(conn: &mut SqliteConnection, id: i64, fields: &ArtistFields) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE artists
        SET name = ?, city = ?, state = ?, phone = ?, genres = ?,
            image_link = ?, facebook_link = ?, website_link = ?,
            seeking_venue = ?, seeking_description = ?
        WHERE id = ?
        "#,
    )
    .bind(&fields.name)
    .bind(&fields.city)
    .bind(&fields.state)
    .bind(&fields.phone)
    .bind(Json(&fields.genres))
    .bind(&fields.image_link)
    .bind(&fields.facebook_link)
    .bind(&fields.website_link)
    .bind(fields.seeking_venue)
    .bind(&fields.seeking_description)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("artist {}", id)));
    }
    Ok(())
}

/// Delete an artist; their shows go with them (`ON DELETE CASCADE`)
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM artists WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("artist {}", id)));
    }
    Ok(())
}
