//! Pagination response types for list endpoints.

use serde::Serialize;

/// Paginated response wrapper, reusable for all list responses
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

/// Pagination metadata echoing the resolved query window
#[derive(Debug, Serialize)]
pub struct PageMeta {
    pub skip: u64,
    pub take: u64,
    pub total: u64,
}

impl<T> Paginated<T> {
    /// Create new paginated response
    pub fn new(data: Vec<T>, skip: u64, take: u64, total: u64) -> Self {
        Self {
            data,
            meta: PageMeta { skip, take, total },
        }
    }
}
