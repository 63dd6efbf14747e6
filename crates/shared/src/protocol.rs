use serde::{Deserialize, Serialize};

/// Largest page the server will return; larger requests are capped.
pub const MAX_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: MAX_PAGE_SIZE,
        }
    }
}

/// Envelope returned by the `/search` endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse<T> {
    pub results: Vec<T>,
    pub count: u64,
    pub total_count: u64,
    pub page: u32,
    pub size: u32,
    #[serde(default)]
    pub search_term: String,
    pub has_matches: bool,
}

impl<T> SearchResponse<T> {
    /// `count` matches the page length and never exceeds `total_count`.
    pub fn is_consistent(&self) -> bool {
        self.count == self.results.len() as u64 && self.count <= self.total_count
    }
}
