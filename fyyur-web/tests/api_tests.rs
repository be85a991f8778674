//! Integration tests for fyyur-web routes
//!
//! Each test runs the router against its own SQLite file in a temp dir.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use chrono::Duration;
use fyyur_common::db::{self, artists, shows, venues, ArtistFields, NewShow, VenueFields};
use fyyur_common::{time, SecretKey};
use fyyur_web::{build_router, AppState};
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

/// Test helper: fresh database in a temp dir (keep the dir alive)
async fn setup_test_db() -> (TempDir, SqlitePool) {
    let dir = TempDir::new().expect("Should create temp dir");
    let pool = db::init_database(&dir.path().join("fyyur.db"))
        .await
        .expect("Should initialize database");
    (dir, pool)
}

fn test_key() -> SecretKey {
    SecretKey::from_configured("integration-test-key").unwrap()
}

fn setup_app(pool: SqlitePool) -> axum::Router {
    build_router(AppState::new(pool, test_key()))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Minimal form encoding for test values
fn encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            b' ' => "+".to_string(),
            _ => format!("%{:02X}", b),
        })
        .collect()
}

fn post_form(uri: &str, pairs: &[(&str, &str)]) -> Request<Body> {
    let body = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    String::from_utf8(bytes.to_vec()).expect("Should be UTF-8")
}

fn set_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn venue_fields(name: &str, city: &str, state: &str) -> VenueFields {
    VenueFields {
        name: name.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        address: "1015 Folsom Street".to_string(),
        genres: vec!["Jazz".to_string()],
        ..Default::default()
    }
}

fn artist_fields(name: &str) -> ArtistFields {
    ArtistFields {
        name: name.to_string(),
        city: "San Francisco".to_string(),
        state: "CA".to_string(),
        genres: vec!["Rock n Roll".to_string()],
        ..Default::default()
    }
}

async fn seed_venue(pool: &SqlitePool, fields: &VenueFields) -> i64 {
    let mut conn = pool.acquire().await.unwrap();
    venues::insert(&mut *conn, fields, time::now()).await.unwrap()
}

async fn seed_artist(pool: &SqlitePool, fields: &ArtistFields) -> i64 {
    let mut conn = pool.acquire().await.unwrap();
    artists::insert(&mut *conn, fields, time::now()).await.unwrap()
}

async fn seed_show(pool: &SqlitePool, venue_id: i64, artist_id: i64, offset: Duration) -> i64 {
    let mut conn = pool.acquire().await.unwrap();
    let show = NewShow {
        venue_id,
        artist_id,
        start_time: time::now() + offset,
    };
    shows::insert(&mut *conn, &show).await.unwrap()
}

// =============================================================================
// Health and build info
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (_dir, pool) = setup_test_db().await;
    let response = setup_app(pool).oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "fyyur-web");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_build_info_endpoint() {
    let (_dir, pool) = setup_test_db().await;
    let response = setup_app(pool).oneshot(get("/api/buildinfo")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert!(body["git_hash"].is_string());
    assert!(body["build_profile"].is_string());
}

// =============================================================================
// Not found
// =============================================================================

#[tokio::test]
async fn test_unknown_route_renders_404_page() {
    let (_dir, pool) = setup_test_db().await;
    let response = setup_app(pool).oneshot(get("/no/such/page")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("404"));
}

#[tokio::test]
async fn test_missing_ids_are_404() {
    let (_dir, pool) = setup_test_db().await;
    let app = setup_app(pool);

    for uri in [
        "/venues/999",
        "/artists/999",
        "/venues/abc",
        "/artists/0",
        "/venues/999/edit",
        "/artists/999/edit",
        "/venues/999/delete",
        "/artists/999/delete",
    ] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "GET {}", uri);
    }

    for uri in ["/venues/999/delete", "/artists/999/delete"] {
        let response = app.clone().oneshot(post_form(uri, &[])).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "POST {}", uri);
    }
}

// =============================================================================
// Venues
// =============================================================================

#[tokio::test]
async fn test_create_venue_then_view_detail() {
    let (_dir, pool) = setup_test_db().await;
    let app = setup_app(pool.clone());

    let response = app
        .clone()
        .oneshot(post_form(
            "/venues/create",
            &[
                ("name", "The Musical Hop"),
                ("city", "San Francisco"),
                ("state", "CA"),
                ("address", "1015 Folsom Street"),
                ("phone", "123-123-1234"),
                ("genres", "Jazz"),
                ("genres", "Reggae"),
                ("website_link", "https://www.themusicalhop.com"),
                ("seeking_talent", "y"),
                ("seeking_description", "Looking for local artists"),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");
    assert!(set_cookie(&response).unwrap().starts_with("fyyur_flash="));

    assert_eq!(venues::count(&pool).await.unwrap(), 1);
    let venue = venues::list_all(&pool).await.unwrap().remove(0);
    assert_eq!(venue.name, "The Musical Hop");
    assert_eq!(venue.genres, vec!["Jazz", "Reggae"]);
    assert!(venue.seeking_talent);

    let response = app
        .oneshot(get(&format!("/venues/{}", venue.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("The Musical Hop"));
    assert!(html.contains("1015 Folsom Street"));
    assert!(html.contains("123-123-1234"));
    assert!(html.contains("Reggae"));
    assert!(html.contains("0 Upcoming Shows"));
    assert!(html.contains("0 Past Shows"));
}

#[tokio::test]
async fn test_invalid_venue_is_not_listed() {
    let (_dir, pool) = setup_test_db().await;
    let app = setup_app(pool.clone());

    let response = app
        .oneshot(post_form(
            "/venues/create",
            &[("name", "Nameless Hall"), ("state", "ZZ")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(set_cookie(&response).is_some());
    assert_eq!(venues::count(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn test_flash_shown_once_after_redirect() {
    let (_dir, pool) = setup_test_db().await;
    let app = setup_app(pool);

    let response = app
        .clone()
        .oneshot(post_form(
            "/artists/create",
            &[
                ("name", "Guns N Petals"),
                ("city", "San Francisco"),
                ("state", "CA"),
                ("genres", "Rock n Roll"),
            ],
        ))
        .await
        .unwrap();
    let cookie = set_cookie(&response).unwrap();
    let pair = cookie.split(';').next().unwrap().to_string();

    let request = Request::builder()
        .uri("/")
        .header(header::COOKIE, pair)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response).unwrap().contains("Max-Age=0"));
    let html = body_text(response).await;
    assert!(html.contains("Artist Guns N Petals was successfully listed!"));
}

#[tokio::test]
async fn test_venues_grouped_by_city_and_state() {
    let (_dir, pool) = setup_test_db().await;
    seed_venue(&pool, &venue_fields("The Musical Hop", "San Francisco", "CA")).await;
    seed_venue(&pool, &venue_fields("The Dueling Pianos Bar", "New York", "NY")).await;
    seed_venue(
        &pool,
        &venue_fields("Park Square Live Music & Coffee", "San Francisco", "CA"),
    )
    .await;

    let response = setup_app(pool).oneshot(get("/venues")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    let sf = html.find("San Francisco").unwrap();
    let ny = html.find("New York").unwrap();
    assert!(sf < ny, "groups keep first-seen order");
    assert_eq!(html.matches("San Francisco").count(), 1);
    assert!(html.contains("Park Square Live Music &amp; Coffee"));
}

#[tokio::test]
async fn test_search_venues_case_insensitive() {
    let (_dir, pool) = setup_test_db().await;
    let hop = seed_venue(&pool, &venue_fields("The Musical Hop", "San Francisco", "CA")).await;
    seed_venue(&pool, &venue_fields("The Dueling Pianos Bar", "New York", "NY")).await;
    let artist = seed_artist(&pool, &artist_fields("Guns N Petals")).await;
    seed_show(&pool, hop, artist, Duration::days(3)).await;
    let app = setup_app(pool);

    let response = app
        .clone()
        .oneshot(post_form("/venues/search", &[("search_term", "hop")]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"<strong id="result-count">1</strong>"#));
    assert!(html.contains("The Musical Hop"));
    assert!(html.contains("(1 upcoming)"));
    assert!(!html.contains("Dueling"));

    let response = app
        .oneshot(post_form("/venues/search", &[("search_term", "xyz-no-match")]))
        .await
        .unwrap();
    let html = body_text(response).await;
    assert!(html.contains(r#"<strong id="result-count">0</strong>"#));
}

#[tokio::test]
async fn test_edit_venue_updates_fields() {
    let (_dir, pool) = setup_test_db().await;
    let id = seed_venue(&pool, &venue_fields("The Musical Hop", "San Francisco", "CA")).await;
    let app = setup_app(pool.clone());

    let response = app
        .clone()
        .oneshot(get(&format!("/venues/{}/edit", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"value="The Musical Hop""#));
    assert!(html.contains(r#"<option value="CA" selected>"#));

    let response = app
        .oneshot(post_form(
            &format!("/venues/{}/edit", id),
            &[
                ("name", "The Musical Hop II"),
                ("city", "Oakland"),
                ("state", "CA"),
                ("address", "1 Broadway"),
                ("genres", "Blues"),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], format!("/venues/{}", id));

    let venue = venues::find(&pool, id).await.unwrap();
    assert_eq!(venue.name, "The Musical Hop II");
    assert_eq!(venue.city, "Oakland");
    assert_eq!(venue.genres, vec!["Blues"]);
}

#[tokio::test]
async fn test_delete_venue_removes_its_shows() {
    let (_dir, pool) = setup_test_db().await;
    let venue = seed_venue(&pool, &venue_fields("The Musical Hop", "San Francisco", "CA")).await;
    let other = seed_venue(&pool, &venue_fields("The Dueling Pianos Bar", "New York", "NY")).await;
    let artist = seed_artist(&pool, &artist_fields("Guns N Petals")).await;
    seed_show(&pool, venue, artist, Duration::days(-2)).await;
    seed_show(&pool, venue, artist, Duration::days(2)).await;
    seed_show(&pool, other, artist, Duration::days(2)).await;
    let app = setup_app(pool.clone());

    // The confirmation page changes nothing
    let response = app
        .clone()
        .oneshot(get(&format!("/venues/{}/delete", venue)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(shows::count(&pool).await.unwrap(), 3);

    let response = app
        .oneshot(post_form(&format!("/venues/{}/delete", venue), &[]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    assert!(venues::get(&pool, venue).await.unwrap().is_none());
    assert_eq!(shows::count(&pool).await.unwrap(), 1);
    assert_eq!(artists::count(&pool).await.unwrap(), 1);
}

// =============================================================================
// Artists
// =============================================================================

#[tokio::test]
async fn test_artist_detail_splits_past_and_upcoming() {
    let (_dir, pool) = setup_test_db().await;
    let venue = seed_venue(&pool, &venue_fields("The Musical Hop", "San Francisco", "CA")).await;
    let artist = seed_artist(&pool, &artist_fields("Guns N Petals")).await;
    seed_show(&pool, venue, artist, Duration::days(-30)).await;
    seed_show(&pool, venue, artist, Duration::days(10)).await;
    seed_show(&pool, venue, artist, Duration::days(20)).await;

    let response = setup_app(pool)
        .oneshot(get(&format!("/artists/{}", artist)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("2 Upcoming Shows"));
    assert!(html.contains("1 Past Shows"));
    assert!(html.contains(&format!(r#"href="/venues/{}""#, venue)));
}

#[tokio::test]
async fn test_artists_listing_and_search() {
    let (_dir, pool) = setup_test_db().await;
    seed_artist(&pool, &artist_fields("Guns N Petals")).await;
    seed_artist(&pool, &artist_fields("Matt Quevedo")).await;
    seed_artist(&pool, &artist_fields("The Wild Sax Band")).await;
    let app = setup_app(pool);

    let response = app.clone().oneshot(get("/artists")).await.unwrap();
    let html = body_text(response).await;
    let first = html.find("Guns N Petals").unwrap();
    let last = html.find("The Wild Sax Band").unwrap();
    assert!(first < last);

    let response = app
        .oneshot(post_form("/artists/search", &[("search_term", "A")]))
        .await
        .unwrap();
    let html = body_text(response).await;
    assert!(html.contains(r#"<strong id="result-count">3</strong>"#));
}

// =============================================================================
// Shows
// =============================================================================

#[tokio::test]
async fn test_create_show() {
    let (_dir, pool) = setup_test_db().await;
    let venue = seed_venue(&pool, &venue_fields("The Musical Hop", "San Francisco", "CA")).await;
    let artist = seed_artist(&pool, &artist_fields("Guns N Petals")).await;
    let app = setup_app(pool.clone());

    let response = app.clone().oneshot(get("/shows/create")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Guns N Petals"));

    let response = app
        .clone()
        .oneshot(post_form(
            "/shows/create",
            &[
                ("artist_id", &artist.to_string()),
                ("venue_id", &venue.to_string()),
                ("start_time", "2035-04-01 20:00:00"),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(shows::count(&pool).await.unwrap(), 1);

    let response = app.oneshot(get("/shows")).await.unwrap();
    let html = body_text(response).await;
    assert!(html.contains("The Musical Hop"));
    assert!(html.contains("2035-04-01 20:00:00"));
}

#[tokio::test]
async fn test_show_with_unknown_artist_rolls_back() {
    let (_dir, pool) = setup_test_db().await;
    let venue = seed_venue(&pool, &venue_fields("The Musical Hop", "San Francisco", "CA")).await;
    let artist = seed_artist(&pool, &artist_fields("Guns N Petals")).await;
    seed_show(&pool, venue, artist, Duration::days(1)).await;
    let app = setup_app(pool.clone());

    let response = app
        .oneshot(post_form(
            "/shows/create",
            &[
                ("artist_id", "999"),
                ("venue_id", &venue.to_string()),
                ("start_time", "2035-04-01 20:00"),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(set_cookie(&response).unwrap().starts_with("fyyur_flash="));
    assert_eq!(shows::count(&pool).await.unwrap(), 1);
}

#[tokio::test]
async fn test_homepage_lists_recent() {
    let (_dir, pool) = setup_test_db().await;
    for i in 0..7 {
        seed_artist(&pool, &artist_fields(&format!("Act {}", i))).await;
    }
    let response = setup_app(pool).oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Act 6"));
    assert!(html.contains("Act 2"));
    assert!(!html.contains("Act 1<"));
    assert!(html.contains("No venues listed yet."));
}
