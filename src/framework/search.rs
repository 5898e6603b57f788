//! Free-text + filter queries over a collection.

use crate::framework::entity::Entity;

/// A search: optional case-insensitive substring plus a conjunction of filters.
#[derive(Debug, Clone)]
pub struct SearchQuery<F> {
    pub text: Option<String>,
    pub filters: Vec<F>,
}

impl<F> Default for SearchQuery<F> {
    fn default() -> Self {
        Self {
            text: None,
            filters: Vec::new(),
        }
    }
}

impl<F> SearchQuery<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the text query. Blank text matches everything.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.text = if text.trim().is_empty() { None } else { Some(text) };
        self
    }

    pub fn filter(mut self, filter: F) -> Self {
        self.filters.push(filter);
        self
    }

    /// True when `item` contains the text in one of its search fields and
    /// satisfies every filter.
    pub fn matches<T>(&self, item: &T) -> bool
    where
        T: Entity<Filter = F>,
    {
        if let Some(text) = &self.text {
            let needle = text.trim().to_lowercase();
            let hit = item
                .search_text()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        self.filters.iter().all(|filter| item.matches(filter))
    }
}
