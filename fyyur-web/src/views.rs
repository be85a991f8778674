//! Page view models and their templates
//!
//! Handlers assemble these from query results and classifier output. Optional
//! database values are flattened to empty strings so templates only deal
//! with plain text.

use askama::Template;
use fyyur_common::db::models::{Artist, ArtistFields, NamedEntity, ShowListing, Venue, VenueFields};
use fyyur_common::listing::{Area, SearchResults};
use fyyur_common::schedule::ClassifiedShows;
use fyyur_common::time::{display_timestamp, format_datetime, DateStyle};
use serde::Serialize;

use crate::flash::FlashMessage;
use crate::forms::{GENRES, STATES};

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// An `<option>` in a select
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl Choice {
    fn from_list(options: &[&str], selected: &[String]) -> Vec<Choice> {
        options
            .iter()
            .map(|o| Choice {
                value: o.to_string(),
                label: o.to_string(),
                selected: selected.iter().any(|s| s == o),
            })
            .collect()
    }

    fn from_entities(entities: Vec<NamedEntity>) -> Vec<Choice> {
        entities
            .into_iter()
            .map(|e| Choice {
                label: format!("{} (#{})", e.name, e.id),
                value: e.id.to_string(),
                selected: false,
            })
            .collect()
    }
}

/// Venue detail as displayed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueView {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub website_link: String,
    pub facebook_link: String,
    pub seeking_talent: bool,
    pub seeking_description: String,
    pub image_link: String,
}

impl From<Venue> for VenueView {
    fn from(v: Venue) -> Self {
        Self {
            phone: text(&v.phone),
            website_link: text(&v.website_link),
            facebook_link: text(&v.facebook_link),
            seeking_description: text(&v.seeking_description),
            image_link: text(&v.image_link),
            id: v.id,
            name: v.name,
            genres: v.genres,
            city: v.city,
            state: v.state,
            address: v.address,
            seeking_talent: v.seeking_talent,
        }
    }
}

/// Artist detail as displayed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistView {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub website_link: String,
    pub facebook_link: String,
    pub seeking_venue: bool,
    pub seeking_description: String,
    pub image_link: String,
}

impl From<Artist> for ArtistView {
    fn from(a: Artist) -> Self {
        Self {
            phone: text(&a.phone),
            website_link: text(&a.website_link),
            facebook_link: text(&a.facebook_link),
            seeking_description: text(&a.seeking_description),
            image_link: text(&a.image_link),
            id: a.id,
            name: a.name,
            genres: a.genres,
            city: a.city,
            state: a.state,
            seeking_venue: a.seeking_venue,
        }
    }
}

/// One line of the shows listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowRow {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: String,
    pub start_time: String,
    pub when: String,
}

impl From<ShowListing> for ShowRow {
    fn from(s: ShowListing) -> Self {
        Self {
            start_time: display_timestamp(&s.start_time),
            when: format_datetime(&s.start_time, DateStyle::Medium),
            artist_image_link: text(&s.artist_image_link),
            venue_id: s.venue_id,
            venue_name: s.venue_name,
            artist_id: s.artist_id,
            artist_name: s.artist_name,
        }
    }
}

/// Venue form values (create or edit)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueFormView {
    pub name: String,
    pub city: String,
    pub address: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: String,
    pub website_link: String,
    pub seeking_talent: bool,
    pub seeking_description: String,
    pub states: Vec<Choice>,
    pub genres: Vec<Choice>,
}

impl From<VenueFields> for VenueFormView {
    fn from(f: VenueFields) -> Self {
        Self {
            states: Choice::from_list(STATES, std::slice::from_ref(&f.state)),
            genres: Choice::from_list(GENRES, &f.genres),
            phone: text(&f.phone),
            image_link: text(&f.image_link),
            facebook_link: text(&f.facebook_link),
            website_link: text(&f.website_link),
            seeking_description: text(&f.seeking_description),
            name: f.name,
            city: f.city,
            address: f.address,
            seeking_talent: f.seeking_talent,
        }
    }
}

/// Artist form values (create or edit)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistFormView {
    pub name: String,
    pub city: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: String,
    pub website_link: String,
    pub seeking_venue: bool,
    pub seeking_description: String,
    pub states: Vec<Choice>,
    pub genres: Vec<Choice>,
}

impl From<ArtistFields> for ArtistFormView {
    fn from(f: ArtistFields) -> Self {
        Self {
            states: Choice::from_list(STATES, std::slice::from_ref(&f.state)),
            genres: Choice::from_list(GENRES, &f.genres),
            phone: text(&f.phone),
            image_link: text(&f.image_link),
            facebook_link: text(&f.facebook_link),
            website_link: text(&f.website_link),
            seeking_description: text(&f.seeking_description),
            name: f.name,
            city: f.city,
            seeking_venue: f.seeking_venue,
        }
    }
}

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomePage {
    pub messages: Vec<FlashMessage>,
    pub artists: Vec<NamedEntity>,
    pub venues: Vec<NamedEntity>,
}

#[derive(Template)]
#[template(path = "pages/venues.html")]
pub struct VenuesPage {
    pub messages: Vec<FlashMessage>,
    pub areas: Vec<Area>,
}

#[derive(Template)]
#[template(path = "pages/artists.html")]
pub struct ArtistsPage {
    pub messages: Vec<FlashMessage>,
    pub artists: Vec<NamedEntity>,
}

/// Search results for venues or artists; `kind` is the URL segment
#[derive(Template)]
#[template(path = "pages/search.html")]
pub struct SearchPage {
    pub messages: Vec<FlashMessage>,
    pub kind: &'static str,
    pub search_term: String,
    pub results: SearchResults,
}

#[derive(Template)]
#[template(path = "pages/show_venue.html")]
pub struct VenueDetailPage {
    pub messages: Vec<FlashMessage>,
    pub venue: VenueView,
    pub shows: ClassifiedShows,
}

#[derive(Template)]
#[template(path = "pages/show_artist.html")]
pub struct ArtistDetailPage {
    pub messages: Vec<FlashMessage>,
    pub artist: ArtistView,
    pub shows: ClassifiedShows,
}

#[derive(Template)]
#[template(path = "pages/shows.html")]
pub struct ShowsPage {
    pub messages: Vec<FlashMessage>,
    pub shows: Vec<ShowRow>,
}

#[derive(Template)]
#[template(path = "forms/venue.html")]
pub struct VenueFormPage {
    pub messages: Vec<FlashMessage>,
    pub heading: String,
    pub action: String,
    pub form: VenueFormView,
}

#[derive(Template)]
#[template(path = "forms/artist.html")]
pub struct ArtistFormPage {
    pub messages: Vec<FlashMessage>,
    pub heading: String,
    pub action: String,
    pub form: ArtistFormView,
}

#[derive(Template)]
#[template(path = "forms/show.html")]
pub struct ShowFormPage {
    pub messages: Vec<FlashMessage>,
    pub artists: Vec<Choice>,
    pub venues: Vec<Choice>,
    pub start_time: String,
}

impl ShowFormPage {
    pub fn new(
        messages: Vec<FlashMessage>,
        artists: Vec<NamedEntity>,
        venues: Vec<NamedEntity>,
        start_time: String,
    ) -> Self {
        Self {
            messages,
            artists: Choice::from_entities(artists),
            venues: Choice::from_entities(venues),
            start_time,
        }
    }
}

/// Confirmation step in front of a delete
#[derive(Template)]
#[template(path = "pages/confirm_delete.html")]
pub struct ConfirmDeletePage {
    pub messages: Vec<FlashMessage>,
    pub kind: &'static str,
    pub name: String,
    pub action: String,
    pub cancel: String,
}

#[derive(Template)]
#[template(path = "errors/404.html")]
pub struct NotFoundPage {
    pub messages: Vec<FlashMessage>,
}

#[derive(Template)]
#[template(path = "errors/500.html")]
pub struct ServerErrorPage {
    pub messages: Vec<FlashMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_choices_mark_selected() {
        let choices = Choice::from_list(&["Jazz", "Rock n Roll", "Soul"], &["Soul".to_string()]);
        let selected: Vec<_> = choices
            .iter()
            .filter(|c| c.selected)
            .map(|c| c.value.as_str())
            .collect();
        assert_eq!(selected, vec!["Soul"]);
    }

    #[test]
    fn test_venue_form_view_prefills() {
        let view = VenueFormView::from(VenueFields {
            name: "The Dueling Pianos Bar".to_string(),
            state: "NY".to_string(),
            genres: vec!["Classical".to_string(), "R&B".to_string()],
            ..Default::default()
        });
        assert_eq!(view.name, "The Dueling Pianos Bar");
        assert_eq!(view.states.iter().filter(|c| c.selected).count(), 1);
        assert_eq!(view.genres.iter().filter(|c| c.selected).count(), 2);
        assert_eq!(view.phone, "");
    }

    #[test]
    fn test_show_row_formats_times() {
        let row = ShowRow::from(ShowListing {
            show_id: 1,
            venue_id: 1,
            venue_name: "The Musical Hop".to_string(),
            artist_id: 4,
            artist_name: "Guns N Petals".to_string(),
            artist_image_link: None,
            start_time: NaiveDate::from_ymd_opt(2019, 5, 21)
                .unwrap()
                .and_hms_opt(21, 30, 0)
                .unwrap(),
        });
        assert_eq!(row.start_time, "2019-05-21 21:30:00");
        assert_eq!(row.when, "Tue 05, 21, 2019 9:30PM");
        assert_eq!(row.artist_image_link, "");
    }

    #[test]
    fn test_error_pages_render() {
        let html = NotFoundPage { messages: Vec::new() }.render().unwrap();
        assert!(html.contains("404"));
        let html = ServerErrorPage { messages: Vec::new() }.render().unwrap();
        assert!(html.contains("500"));
    }

    #[test]
    fn test_layout_escapes_flash_text() {
        let html = NotFoundPage {
            messages: vec![FlashMessage::error("<script>alert(1)</script>")],
        }
        .render()
        .unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
