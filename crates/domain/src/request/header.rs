//! HTTP Header types

use serde::{Deserialize, Serialize};

/// Header carrying the JSON content type sent with every request.
pub const CONTENT_TYPE: &str = "Content-Type";

/// Header carrying the bearer credential.
pub const AUTHORIZATION: &str = "Authorization";

/// Media type used for request and response bodies.
pub const APPLICATION_JSON: &str = "application/json";

/// A single HTTP header with name and value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// The header name (e.g., "Content-Type")
    pub name: String,
    /// The header value (e.g., "application/json")
    pub value: String,
}

impl Header {
    /// Creates a new header.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Creates an `Authorization: Bearer <token>` header.
    #[must_use]
    pub fn bearer(token: &str) -> Self {
        Self::new(AUTHORIZATION, format!("Bearer {token}"))
    }

    fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// An ordered collection of HTTP headers with case-insensitive names.
///
/// Setting a header that already exists replaces its value in place, so
/// the first-seen position of each name is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headers {
    items: Vec<Header>,
}

impl Headers {
    /// Creates an empty header collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// The headers every House API request starts from.
    #[must_use]
    pub fn json_defaults() -> Self {
        let mut headers = Self::new();
        headers.set(Header::new(CONTENT_TYPE, APPLICATION_JSON));
        headers
    }

    /// Inserts a header, replacing any existing header with the same name.
    pub fn set(&mut self, header: Header) {
        match self.items.iter_mut().find(|h| h.is_named(&header.name)) {
            Some(existing) => existing.value = header.value,
            None => self.items.push(header),
        }
    }

    /// Returns a copy of `self` with every header of `extra` set over it.
    #[must_use]
    pub fn merged_with(&self, extra: &Self) -> Self {
        let mut merged = self.clone();
        for header in &extra.items {
            merged.set(header.clone());
        }
        merged
    }

    /// Looks up a header value by name, ignoring case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|h| h.is_named(name))
            .map(|h| h.value.as_str())
    }

    /// Returns an iterator over all headers.
    pub fn iter(&self) -> impl Iterator<Item = &Header> {
        self.items.iter()
    }

    /// Returns the number of headers.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::len is not const in stable
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no headers.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::is_empty is not const in stable
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<Header> for Headers {
    fn from_iter<T: IntoIterator<Item = Header>>(iter: T) -> Self {
        let mut headers = Self::new();
        for header in iter {
            headers.set(header);
        }
        headers
    }
}
