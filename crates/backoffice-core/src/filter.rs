//! # Filter Pipeline
//!
//! The two predicates behind every list view: an exact facet match, then a
//! case-insensitive substring search over the record's two text fields.
//!
//! ```text
//!   records ──► facet filter ──► text search ──► filtered view
//!               (All = pass)     (blank = pass)
//! ```

use std::fmt;

use crate::record::{Facet, Record};

/// Facet filter: everything, or one role / category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Filter<F> {
    #[default]
    All,
    Only(F),
}

impl<F: Facet> Filter<F> {
    /// Exact facet match. `All` lets everything through.
    pub fn admits(&self, facet: F) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(wanted) => *wanted == facet,
        }
    }

    /// Parses `all` or a facet name.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.eq_ignore_ascii_case("all") {
            return Some(Filter::All);
        }
        F::ALL
            .iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(input))
            .map(|f| Filter::Only(*f))
    }
}

impl<F: Facet> fmt::Display for Filter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => f.write_str("all"),
            Filter::Only(facet) => f.write_str(facet.as_str()),
        }
    }
}

/// Lowercased, trimmed query. `None` means no text filter applies.
pub fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// True if either search field contains the already-normalized needle.
pub fn matches_query<R: Record>(record: &R, needle: &str) -> bool {
    record
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Runs both predicates over `records`, cloning the survivors in order.
pub fn apply<'a, R, I>(records: I, filter: &Filter<R::Facet>, query: &str) -> Vec<R>
where
    R: Record + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let needle = normalize_query(query);
    records
        .into_iter()
        .filter(|r| filter.admits(r.facet()))
        .filter(|r| match &needle {
            Some(needle) => matches_query(*r, needle),
            None => true,
        })
        .cloned()
        .collect()
}
