//! Venue queries

use crate::db::filter_by_name;
use crate::db::models::{CounterpartShow, NamedEntity, ShowTime, Venue, VenueFields};
use crate::{Error, Result};
use chrono::NaiveDateTime;
use sqlx::types::Json;
use sqlx::{SqliteConnection, SqlitePool};

const SELECT_VENUE: &str = "SELECT id, name, city, state, address, phone, genres, image_link, \
     facebook_link, website_link, seeking_talent, seeking_description, date_listed FROM venues";

/// All venues in storage order
pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Venue>> {
    let venues = sqlx::query_as::<_, Venue>(&format!("{} ORDER BY id ASC", SELECT_VENUE))
        .fetch_all(pool)
        .await?;
    Ok(venues)
}

/// Venue by id, `None` when absent
pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<Venue>> {
    let venue = sqlx::query_as::<_, Venue>(&format!("{} WHERE id = ?", SELECT_VENUE))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(venue)
}

/// Venue by id, `Error::NotFound` when absent
pub async fn find(pool: &SqlitePool, id: i64) -> Result<Venue> {
    get(pool, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("venue {}", id)))
}

/// Most recently listed venues
pub async fn recent(pool: &SqlitePool, limit: i64) -> Result<Vec<NamedEntity>> {
    let venues = sqlx::query_as::<_, NamedEntity>(
        "SELECT id, name FROM venues ORDER BY date_listed DESC, id DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(venues)
}

/// Venue id/name pairs ordered by name (show form choices)
pub async fn names(pool: &SqlitePool) -> Result<Vec<NamedEntity>> {
    let venues = sqlx::query_as::<_, NamedEntity>("SELECT id, name FROM venues ORDER BY name, id")
        .fetch_all(pool)
        .await?;
    Ok(venues)
}

/// Venues whose name contains `term`, case-insensitively
///
/// Matching happens in Rust so case folding covers non-ASCII names.
pub async fn search_by_name(pool: &SqlitePool, term: &str) -> Result<Vec<NamedEntity>> {
    let all = sqlx::query_as::<_, NamedEntity>("SELECT id, name FROM venues ORDER BY id ASC")
        .fetch_all(pool)
        .await?;
    Ok(filter_by_name(all, term))
}

/// Start times of every show, keyed by venue
pub async fn show_times(pool: &SqlitePool) -> Result<Vec<ShowTime>> {
    let times = sqlx::query_as::<_, ShowTime>(
        "SELECT venue_id AS owner_id, start_time FROM shows ORDER BY id ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(times)
}

/// Shows at one venue, each with its artist
pub async fn shows_for(pool: &SqlitePool, venue_id: i64) -> Result<Vec<CounterpartShow>> {
    let shows = sqlx::query_as::<_, CounterpartShow>(
        r#"
        SELECT s.id AS show_id,
               a.id AS counterpart_id,
               a.name AS counterpart_name,
               a.image_link AS counterpart_image_link,
               s.start_time AS start_time
        FROM shows s
        JOIN artists a ON a.id = s.artist_id
        WHERE s.venue_id = ?
        ORDER BY s.id ASC
        "#,
    )
    .bind(venue_id)
    .fetch_all(pool)
    .await?;
    Ok(shows)
}

/// Number of venues
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM venues")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Insert a venue, returning its generated id
pub async fn insert(
    conn: &mut SqliteConnection,
    fields: &VenueFields,
    date_listed: NaiveDateTime,
) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO venues (name, city, state, address, phone, genres, image_link,
                            facebook_link, website_link, seeking_talent,
                            seeking_description, date_listed)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&fields.name)
    .bind(&fields.city)
    .bind(&fields.state)
    .bind(&fields.address)
    .bind(&fields.phone)
    .bind(Json(&fields.genres))
    .bind(&fields.image_link)
    .bind(&fields.facebook_link)
    .bind(&fields.website_link)
    .bind(fields.seeking_talent)
    .bind(&fields.seeking_description)
    .bind(date_listed)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Overwrite the editable fields of a venue
pub async fn update(conn: &mut SqliteConnection, id: i64, fields: &VenueFields) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE venues
        SET name = ?, city = ?, state = ?, address = ?, phone = ?, genres = ?,
            image_link = ?, facebook_link = ?, website_link = ?,
            seeking_talent = ?, seeking_description = ?
        WHERE id = ?
        "#,
    )
    .bind(&fields.name)
    .bind(&fields.city)
    .bind(&fields.state)
    .bind(&fields.address)
    .bind(&fields.phone)
    .bind(Json(&fields.genres))
    .bind(&fields.image_link)
    .bind(&fields.facebook_link)
    .bind(&fields.website_link)
    .bind(fields.seeking_talent)
    .bind(&fields.seeking_description)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("venue {}", id)));
    }
    Ok(())
}

/// Delete a venue; its shows go with it (`ON DELETE CASCADE`)
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM venues WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("venue {}", id)));
    }
    Ok(())
}
