//! Form parsing and validation
//!
//! Submissions arrive as `application/x-www-form-urlencoded` pairs. Repeated
//! keys are kept (the genres multi-select sends one pair per genre), so the
//! raw body is taken as a list of pairs and validated into typed fields here.

use fyyur_common::db::models::{ArtistFields, NewShow, VenueFields};
use fyyur_common::time::parse_start_time;
use std::fmt;

/// Genres offered by the venue and artist forms
pub const GENRES: &[&str] = &[
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock n Roll",
    "Soul",
    "Other",
];

/// US state codes offered by the venue and artist forms
pub const STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH",
    "OK", "OR", "MD", "MA", "MI", "MN", "MS", "MO", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

/// Values that leave a checkbox unticked
const FALSE_VALUES: &[&str] = &["", "false", "n", "no", "off", "0"];

/// Minimum digit count for a phone number
const MIN_PHONE_DIGITS: usize = 7;

/// Submitted form pairs
#[derive(Debug, Clone, Default)]
pub struct FormData {
    pairs: Vec<(String, String)>,
}

impl FormData {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// First non-blank value for `name`, trimmed
    pub fn value(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.trim())
            .find(|v| !v.is_empty())
    }

    /// Every non-blank value for `name`, trimmed, in submission order
    pub fn values(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
            .collect()
    }

    /// Checkbox state: present with a value other than a false-like one
    pub fn checked(&self, name: &str) -> bool {
        self.pairs
            .iter()
            .filter(|(k, _)| k == name)
            .any(|(_, v)| !FALSE_VALUES.contains(&v.trim().to_lowercase().as_str()))
    }

    /// Submitted name, for notices (may be empty)
    pub fn display_name(&self) -> String {
        self.value("name").unwrap_or_default().to_string()
    }
}

/// Validation failures, one message per offending field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormErrors(pub Vec<String>);

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("; "))
    }
}

impl std::error::Error for FormErrors {}

/// Field-by-field checker that accumulates every failure
struct Checker<'a> {
    form: &'a FormData,
    errors: Vec<String>,
}

impl<'a> Checker<'a> {
    fn new(form: &'a FormData) -> Self {
        Self {
            form,
            errors: Vec::new(),
        }
    }

    fn required(&mut self, name: &str) -> String {
        match self.form.value(name) {
            Some(v) => v.to_string(),
            None => {
                self.errors.push(format!("{} is required", name));
                String::new()
            }
        }
    }

    fn optional(&self, name: &str) -> Option<String> {
        self.form.value(name).map(str::to_string)
    }

    fn choice(&mut self, name: &str, choices: &[&str]) -> String {
        let value = self.required(name);
        if !value.is_empty() && !choices.contains(&value.as_str()) {
            self.errors.push(format!("{} is not a valid choice: {}", name, value));
        }
        value
    }

    fn multi_choice(&mut self, name: &str, choices: &[&str]) -> Vec<String> {
        let values = self.form.values(name);
        if values.is_empty() {
            self.errors.push(format!("{} is required", name));
        }
        for value in &values {
            if !choices.contains(value) {
                self.errors.push(format!("{} is not a valid choice: {}", name, value));
            }
        }
        values.into_iter().map(str::to_string).collect()
    }

    fn url(&mut self, name: &str) -> Option<String> {
        let value = self.optional(name)?;
        if !(value.starts_with("http://") || value.starts_with("https://")) {
            self.errors.push(format!("{} must be an http(s) URL", name));
        }
        Some(value)
    }

    fn phone(&mut self, name: &str) -> Option<String> {
        let value = self.optional(name)?;
        let allowed = value
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')' | '+' | '.'));
        let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
        if !allowed || digits < MIN_PHONE_DIGITS {
            self.errors.push(format!("{} is not a valid phone number", name));
        }
        Some(value)
    }

    fn id(&mut self, name: &str) -> i64 {
        let value = self.required(name);
        if value.is_empty() {
            return 0;
        }
        match value.parse::<i64>() {
            Ok(id) if id > 0 => id,
            _ => {
                self.errors.push(format!("{} must be a positive integer", name));
                0
            }
        }
    }

    fn finish<T>(self, value: T) -> Result<T, FormErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(FormErrors(self.errors))
        }
    }
}

/// Validate a venue submission
pub fn validate_venue(form: &FormData) -> Result<VenueFields, FormErrors> {
    let mut c = Checker::new(form);
    let fields = VenueFields {
        name: c.required("name"),
        city: c.required("city"),
        state: c.choice("state", STATES),
        address: c.required("address"),
        phone: c.phone("phone"),
        genres: c.multi_choice("genres", GENRES),
        image_link: c.url("image_link"),
        facebook_link: c.url("facebook_link"),
        website_link: c.url("website_link"),
        seeking_talent: form.checked("seeking_talent"),
        seeking_description: c.optional("seeking_description"),
    };
    c.finish(fields)
}

/// Validate an artist submission
pub fn validate_artist(form: &FormData) -> Result<ArtistFields, FormErrors> {
    let mut c = Checker::new(form);
    let fields = ArtistFields {
        name: c.required("name"),
        city: c.required("city"),
        state: c.choice("state", STATES),
        phone: c.phone("phone"),
        genres: c.multi_choice("genres", GENRES),
        image_link: c.url("image_link"),
        facebook_link: c.url("facebook_link"),
        website_link: c.url("website_link"),
        seeking_venue: form.checked("seeking_venue"),
        seeking_description: c.optional("seeking_description"),
    };
    c.finish(fields)
}

/// Validate a show submission
///
/// Only the shape is checked here; whether the venue and artist exist is
/// left to the foreign keys at commit time.
pub fn validate_show(form: &FormData) -> Result<NewShow, FormErrors> {
    let mut c = Checker::new(form);
    let artist_id = c.id("artist_id");
    let venue_id = c.id("venue_id");
    let raw_start = c.required("start_time");
    let start_time = parse_start_time(&raw_start);
    if start_time.is_none() && !raw_start.is_empty() {
        c.errors.push(format!("start_time is not a valid date and time: {}", raw_start));
    }
    match start_time {
        Some(start_time) => c.finish(NewShow {
            venue_id,
            artist_id,
            start_time,
        }),
        None => Err(FormErrors(c.errors)),
    }
}
