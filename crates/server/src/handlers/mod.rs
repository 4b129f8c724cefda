//! HTTP handlers and the response envelopes they share.
use serde::Serialize;
use service::pagination::Page;

pub mod health;
pub mod reference;
pub mod services;
pub mod users;

#[derive(Debug, Serialize)]
pub struct PageMeta {
    pub current_page: u64,
    pub last_page: u64,
    pub per_page: u64,
    pub total: u64,
}

/// `{"data": [...], "meta": {...}}`
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> From<Page<T>> for ListResponse<T> {
    fn from(page: Page<T>) -> Self {
        let meta = PageMeta {
            current_page: page.current_page,
            last_page: page.last_page,
            per_page: page.per_page,
            total: page.total,
        };
        Self { data: page.items, meta }
    }
}

/// `{"data": ...}` with an optional human-readable message.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self { Self { data, message: None } }

    pub fn with_message(data: T, message: &'static str) -> Self { Self { data, message: Some(message) } }
}
