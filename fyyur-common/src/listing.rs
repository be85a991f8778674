//! Listing aggregation: venues grouped by area, name search
//!
//! Both attach a per-entity upcoming show count computed with
//! [`crate::schedule`]. Search results carry each match's own count.

use crate::db::models::{NamedEntity, Venue};
use crate::db::{artists, venues};
use crate::schedule::{upcoming_counts, upcoming_for};
use crate::Result;
use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::HashMap;

/// One venue or artist line in a listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingEntry {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: usize,
}

/// Venues sharing a (city, state) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Area {
    pub city: String,
    pub state: String,
    pub venues: Vec<ListingEntry>,
}

/// Name search response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    pub count: usize,
    pub data: Vec<ListingEntry>,
}

/// Group venues by (city, state) in one pass
///
/// Groups appear in the order their pair is first seen; venues keep their
/// input order within a group.
pub fn group_by_area(venues: &[Venue], upcoming: &HashMap<i64, usize>) -> Vec<Area> {
    let mut areas: Vec<Area> = Vec::new();
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();

    for venue in venues {
        let key = (venue.city.as_str(), venue.state.as_str());
        let slot = *index.entry(key).or_insert_with(|| {
            areas.push(Area {
                city: venue.city.clone(),
                state: venue.state.clone(),
                venues: Vec::new(),
            });
            areas.len() - 1
        });
        areas[slot].venues.push(ListingEntry {
            id: venue.id,
            name: venue.name.clone(),
            num_upcoming_shows: upcoming_for(upcoming, venue.id),
        });
    }

    areas
}

/// Attach per-match upcoming counts to search matches
pub fn search_results(matches: Vec<NamedEntity>, upcoming: &HashMap<i64, usize>) -> SearchResults {
    let data: Vec<ListingEntry> = matches
        .into_iter()
        .map(|m| ListingEntry {
            num_upcoming_shows: upcoming_for(upcoming, m.id),
            id: m.id,
            name: m.name,
        })
        .collect();

    SearchResults {
        count: data.len(),
        data,
    }
}

/// All venues grouped by area
pub async fn venue_areas(pool: &SqlitePool, now: NaiveDateTime) -> Result<Vec<Area>> {
    let all = venues::list_all(pool).await?;
    let times = venues::show_times(pool).await?;
    Ok(group_by_area(&all, &upcoming_counts(&times, now)))
}

/// Venues whose name contains `term`
pub async fn search_venues(
    pool: &SqlitePool,
    term: &str,
    now: NaiveDateTime,
) -> Result<SearchResults> {
    let matches = venues::search_by_name(pool, term).await?;
    let times = venues::show_times(pool).await?;
    Ok(search_results(matches, &upcoming_counts(&times, now)))
}

/// Artists whose name contains `term`
pub async fn search_artists(
    pool: &SqlitePool,
    term: &str,
    now: NaiveDateTime,
) -> Result<SearchResults> {
    let matches = artists::search_by_name(pool, term).await?;
    let times = artists::show_times(pool).await?;
    Ok(search_results(matches, &upcoming_counts(&times, now)))
}
