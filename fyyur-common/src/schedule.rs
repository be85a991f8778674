//! Past/upcoming show classification
//!
//! A show is upcoming iff its start time is strictly after `now`; a show
//! starting exactly at `now` is past. Every caller that splits or counts
//! shows goes through [`is_upcoming`] so the boundary is decided once.

use crate::db::models::{CounterpartShow, ShowTime};
use crate::time::{display_timestamp, format_datetime, DateStyle};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;

/// True when a show starting at `start_time` has not started by `now`
pub fn is_upcoming(start_time: &NaiveDateTime, now: &NaiveDateTime) -> bool {
    start_time > now
}

/// One show as displayed on a venue or artist page
///
/// `id`, `name` and `image_link` belong to the counterpart entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowCard {
    pub id: i64,
    pub name: String,
    pub image_link: Option<String>,
    pub start_time: String,
    /// Long form of `start_time` for display
    pub when: String,
}

impl ShowCard {
    /// Image link, empty when none is set
    pub fn image(&self) -> &str {
        self.image_link.as_deref().unwrap_or("")
    }
}

impl From<CounterpartShow> for ShowCard {
    fn from(show: CounterpartShow) -> Self {
        Self {
            id: show.counterpart_id,
            name: show.counterpart_name,
            image_link: show.counterpart_image_link,
            start_time: display_timestamp(&show.start_time),
            when: format_datetime(&show.start_time, DateStyle::Full),
        }
    }
}

/// Shows of one venue or artist split around a reference instant
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassifiedShows {
    pub past: Vec<ShowCard>,
    pub upcoming: Vec<ShowCard>,
}

impl ClassifiedShows {
    pub fn past_count(&self) -> usize {
        self.past.len()
    }

    pub fn upcoming_count(&self) -> usize {
        self.upcoming.len()
    }
}

/// Split shows into past and upcoming, keeping fetch order within each
pub fn classify(shows: Vec<CounterpartShow>, now: NaiveDateTime) -> ClassifiedShows {
    let mut classified = ClassifiedShows::default();
    for show in shows {
        if is_upcoming(&show.start_time, &now) {
            classified.upcoming.push(show.into());
        } else {
            classified.past.push(show.into());
        }
    }
    classified
}

/// Upcoming show count per owner id
///
/// Owners without upcoming shows are absent from the map; look them up
/// with [`upcoming_for`].
pub fn upcoming_counts(times: &[ShowTime], now: NaiveDateTime) -> HashMap<i64, usize> {
    let mut counts = HashMap::new();
    for time in times.iter().filter(|t| is_upcoming(&t.start_time, &now)) {
        *counts.entry(time.owner_id).or_insert(0) += 1;
    }
    counts
}

/// Upcoming count for one owner from an [`upcoming_counts`] map
pub fn upcoming_for(counts: &HashMap<i64, usize>, owner_id: i64) -> usize {
    counts.get(&owner_id).copied().unwrap_or(0)
}
