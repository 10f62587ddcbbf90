//! Pagination options and the server-reported `meta` block.

use serde::{Deserialize, Serialize};

/// Caller-supplied pagination for list endpoints.
///
/// Unset or zero fields emit no query parameter at all; the server then
/// applies its own defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageOptions {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Append `page` and `limit` pairs, but only when set and positive.
    pub(crate) fn apply_to(&self, query: &mut Vec<(String, String)>) {
        if let Some(page) = self.page {
            if page > 0 {
                query.push(("page".to_string(), page.to_string()));
            }
        }
        if let Some(limit) = self.limit {
            if limit > 0 {
                query.push(("limit".to_string(), limit.to_string()));
            }
        }
    }
}

/// Server-reported pagination metadata describing a partial collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total_items: u64,
    pub total_pages: u32,
}
