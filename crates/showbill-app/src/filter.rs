// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;

use crate::model::Record;

/// Current search term and selected category tags. The filtered view is
/// always a pure function of (FilterState, full record set).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    search: String,
    selected: BTreeSet<String>,
}

impl FilterState {
    /// Seed the search term from a startup query parameter, if present.
    pub fn seeded(query: Option<&str>) -> Self {
        let mut state = Self::default();
        if let Some(term) = query {
            state.set_search(term);
        }
        state
    }

    /// Stored lowercased and trimmed so matching never re-normalizes.
    pub fn set_search(&mut self, term: &str) {
        self.search = term.trim().to_lowercase();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Toggles membership; returns true when the tag is now selected.
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        if self.selected.remove(tag) {
            false
        } else {
            self.selected.insert(tag.to_owned());
            true
        }
    }

    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.selected.is_empty()
    }

    pub fn clear(&mut self) {
        self.search.clear();
        self.selected.clear();
    }
}

/// Derives the filtered view: an order-preserving subsequence of `full`
/// whose records pass both the search and category predicates.
pub fn apply<'a, R: Record>(full: &'a [R], filter: &FilterState) -> Vec<&'a R> {
    full.iter()
        .filter(|record| matches_search(*record, filter.search()))
        .filter(|record| matches_tags(*record, filter.selected()))
        .collect()
}

fn matches_search<R: Record>(record: &R, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    if record
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(term))
    {
        return true;
    }
    // Numeric ids match by exact string equality only: "25" finds dex 25
    // but never 250.
    record
        .numeric_ident()
        .is_some_and(|number| number.to_string() == term)
}

fn matches_tags<R: Record>(record: &R, selected: &BTreeSet<String>) -> bool {
    if selected.is_empty() {
        return true;
    }
    record
        .tags()
        .iter()
        .any(|tag| selected.contains(*tag))
}
