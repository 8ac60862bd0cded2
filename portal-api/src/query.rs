//! List query parameters and pagination types.

use serde::{Deserialize, Serialize};

/// Default page number (1-indexed).
pub const DEFAULT_PAGE: u32 = 1;
/// Default page size.
pub const DEFAULT_LIMIT: u32 = 10;
/// Largest page size the backend accepts.
pub const MAX_LIMIT: u32 = 100;

/// Sort direction for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Filter, sort and pagination parameters shared by every list endpoint.
///
/// Only non-default values are serialized into the query string, so
/// `ListQuery::default()` produces no parameters at all.
///
/// # Default
///
/// No search, no status filter, no sorting, `page = 1`, `limit = 10`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Free-text search. Blank strings are treated as absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Status filter (entity-specific wire value, e.g. `"active"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Field to sort by.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    /// Sort direction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    /// Page number (1-indexed).
    pub page: u32,
    /// Number of items per page.
    pub limit: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: None,
            status: None,
            sort_by: None,
            sort_order: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ListQuery {
    /// Set the search term.
    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Set the status filter.
    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Set the sort field and direction.
    #[must_use]
    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(field.into());
        self.sort_order = Some(order);
        self
    }

    /// Set the page number.
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Set the page size.
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Clamp pagination values to valid ranges.
    ///
    /// - `page` is clamped to `>= 1`
    /// - `limit` is clamped to `1..=MAX_LIMIT`
    #[must_use]
    pub fn validated(&self) -> Self {
        Self {
            page: self.page.max(1),
            limit: self.limit.clamp(1, MAX_LIMIT),
            ..self.clone()
        }
    }

    /// Query-string pairs for exactly the non-default parameters, in a stable order.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let q = self.validated();
        let mut pairs = Vec::new();

        if let Some(search) = q.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(status) = q.status.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("status", status.to_string()));
        }
        if let Some(sort_by) = q.sort_by.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("sortBy", sort_by.to_string()));
        }
        if let Some(order) = q.sort_order {
            pairs.push(("sortOrder", order.as_str().to_string()));
        }
        if q.page != DEFAULT_PAGE {
            pairs.push(("page", q.page.to_string()));
        }
        if q.limit != DEFAULT_LIMIT {
            pairs.push(("limit", q.limit.to_string()));
        }

        pairs
    }

    /// Percent-encoded query string without the leading `?` (empty when all defaults).
    pub fn to_query_string(&self) -> String {
        self.to_query_pairs()
            .into_iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(&v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// A page of results returned by a list endpoint.
///
/// # Type Parameters
///
/// * `T`: The item type (e.g., [`Domain`](crate::Domain), [`Ticket`](crate::Ticket)).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items in the current page.
    pub items: Vec<T>,
    /// Current page number.
    pub page: u32,
    /// Page size used for this request.
    pub limit: u32,
    /// Total number of items across all pages.
    pub total: u32,
}

impl<T> Page<T> {
    /// Create a new page.
    pub fn new(items: Vec<T>, page: u32, limit: u32, total: u32) -> Self {
        Self {
            items,
            page,
            limit,
            total,
        }
    }

    /// Whether there are more pages after this one.
    pub fn has_more(&self) -> bool {
        self.page.saturating_mul(self.limit) < self.total
    }

    /// Total number of pages (at least 1).
    pub fn total_pages(&self) -> u32 {
        if self.limit == 0 {
            return 1;
        }
        self.total.div_ceil(self.limit).max(1)
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            total: 0,
        }
    }
}
