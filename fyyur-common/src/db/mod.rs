//! Database models and queries

pub mod artists;
pub mod init;
pub mod models;
pub mod shows;
pub mod venues;

pub use init::*;
pub use models::*;

/// Case-insensitive substring match on a name
///
/// Case folding uses Unicode lowercase, so non-ASCII letters match too.
/// An empty term matches every name.
pub(crate) fn name_matches(name: &str, term: &str) -> bool {
    name.to_lowercase().contains(&term.to_lowercase())
}

/// Keep the entities whose name contains `term`, preserving order
pub(crate) fn filter_by_name(entities: Vec<NamedEntity>, term: &str) -> Vec<NamedEntity> {
    entities
        .into_iter()
        .filter(|e| name_matches(&e.name, term))
        .collect()
}
