//! Wire envelope shared by every panel endpoint and the HTTP wrapper that
//! attaches the session credential.

pub mod auth;
pub mod client;

use serde::{Deserialize, Serialize};

use crate::pagination::PaginationMeta;

pub use auth::{AuthApi, UserInfo};
pub use client::ApiClient;

/// `{ success, data, message }` as returned by the panel API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    /// Server-supplied text, preferring `message` over `error`
    pub fn text(&self) -> String {
        self.message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .or(self.error.as_deref())
            .unwrap_or_default()
            .to_string()
    }
}

/// Successful payload plus the server's message, for endpoints where the
/// message is what the user sees ("Additional analysis deleted successfully")
#[derive(Debug, Clone)]
pub struct Reply<T> {
    pub data: T,
    pub message: Option<String>,
}

/// One page of rows plus its pagination snapshot
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
pub struct Page<T> {
    #[serde(default)]
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyses::AdditionalAnalysis;

    #[test]
    fn page_of_rows_without_default() {
        let page: Page<AdditionalAnalysis> =
            serde_json::from_value(serde_json::json!({"pagination": {"current_page": 1, "last_page": 1}})).unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.pagination.current_page(), Some(1));
    }
}
