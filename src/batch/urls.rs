//! Capped, ordered list of URLs to encode

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of URLs a batch accepts
pub const MAX_URLS: usize = 10;

/// One URL slot with a stable identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlEntry {
    /// Stable identifier, unaffected by removals
    pub id: Uuid,
    /// URL text as entered; may be blank
    pub url: String,
}

impl UrlEntry {
    fn new(url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.into(),
        }
    }

    /// Whether the entry contains something other than whitespace.
    pub fn is_valid(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

/// Ordered URL entries, never empty and never longer than [`MAX_URLS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlList {
    entries: Vec<UrlEntry>,
}

impl UrlList {
    /// A list holding a single blank entry.
    pub fn new() -> Self {
        Self {
            entries: vec![UrlEntry::new("")],
        }
    }

    /// Build a list from URL strings, blank ones included.
    pub fn from_urls<I, S>(urls: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<UrlEntry> = urls.into_iter().map(UrlEntry::new).collect();
        if entries.len() > MAX_URLS {
            return Err(Error::TooManyUrls { max: MAX_URLS });
        }
        if entries.is_empty() {
            return Ok(Self::new());
        }
        Ok(Self { entries })
    }

    /// Append a blank entry and return its id.
    pub fn add(&mut self) -> Result<Uuid> {
        self.push("")
    }

    /// Append an entry holding `url` and return its id.
    pub fn push(&mut self, url: impl Into<String>) -> Result<Uuid> {
        if self.entries.len() >= MAX_URLS {
            return Err(Error::TooManyUrls { max: MAX_URLS });
        }
        let entry = UrlEntry::new(url);
        let id = entry.id;
        self.entries.push(entry);
        Ok(id)
    }

    /// Remove the entry with `id`; the last remaining entry is kept.
    ///
    /// Returns whether an entry was removed.
    pub fn remove(&mut self, id: Uuid) -> bool {
        if self.entries.len() <= 1 {
            return false;
        }
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        before != self.entries.len()
    }

    /// Replace the URL of the entry with `id`. Returns whether it was found.
    pub fn update(&mut self, id: Uuid, url: impl Into<String>) -> bool {
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                entry.url = url.into();
                true
            }
            None => false,
        }
    }

    /// Back to a single blank entry.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// All entries in order.
    pub fn entries(&self) -> &[UrlEntry] {
        &self.entries
    }

    /// Number of entries, blank ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list has no entries (never true for lists built here).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether another entry can be added.
    pub fn is_full(&self) -> bool {
        self.entries.len() >= MAX_URLS
    }

    /// Non-blank URLs exactly as entered, in order.
    pub fn valid_urls(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| entry.is_valid())
            .map(|entry| entry.url.clone())
            .collect()
    }
}

impl Default for UrlList {
    fn default() -> Self {
        Self::new()
    }
}
