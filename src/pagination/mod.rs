//! Offset and cursor pagination state for list screens.
//!
//! A single [`Paginator`] owns page/limit/search state and delegates the
//! navigation rules to a [`NavigationStrategy`]: [`OffsetStrategy`] for plain
//! page-number lists and [`CursorStrategy`] for lists that can switch between
//! opaque server cursors and page numbers.

pub mod meta;
pub mod numbers;
pub mod paginator;
pub mod strategy;
pub mod view;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use meta::PaginationMeta;
pub use numbers::{centred_page_numbers, page_numbers, PageItem, PageLayout};
pub use paginator::{CursorPaginator, OffsetPaginator, Paginator, PaginatorOptions};
pub use strategy::{CursorStrategy, NavigationStrategy, OffsetStrategy};
pub use view::{PageControls, PaginationView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Cursor,
    Offset,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Cursor => "cursor",
            Mode::Offset => "offset",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cursor" => Ok(Mode::Cursor),
            "offset" => Ok(Mode::Offset),
            other => Err(format!("unknown pagination mode '{}' (expected cursor or offset)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Anything other than "asc" sorts newest first
    pub fn parse_or_desc(s: &str) -> Self {
        if s.eq_ignore_ascii_case("asc") {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }
}

/// Page/limit/search/sort as mutated by paginator operations
#[derive(Debug, Clone, PartialEq)]
pub struct PageState {
    pub page: u32,
    pub limit: u32,
    pub search: String,
    pub sort_field: String,
    pub sort_direction: SortDirection,
}

/// Request parameters produced by a paginator.
///
/// `page` and `cursor` are never both set: cursor mode omits the page number,
/// offset mode omits the cursor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageQuery {
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub order_by: String,
    pub order_dir: SortDirection,
}

impl PageQuery {
    /// Key/value pairs in paginator naming, empty values dropped
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("limit".to_string(), self.limit.to_string())];
        if let Some(mode) = self.mode {
            pairs.push(("mode".to_string(), mode.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(cursor) = self.cursor.as_deref().filter(|c| !c.is_empty()) {
            pairs.push(("cursor".to_string(), cursor.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search".to_string(), search.to_string()));
        }
        if !self.order_by.is_empty() {
            pairs.push(("order_by".to_string(), self.order_by.clone()));
        }
        pairs.push(("order_dir".to_string(), self.order_dir.as_str().to_string()));
        pairs
    }

    /// URL-encoded `key=value&...`
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_pairs())
            .finish()
    }
}

/// What a paginator operation asks its owner to do: every variant means
/// "reload with this query".
#[derive(Debug, Clone, PartialEq)]
pub enum PaginationEvent {
    PageChanged(PageQuery),
    LimitChanged(PageQuery),
    SearchChanged(PageQuery),
    ModeChanged(PageQuery),
}

impl PaginationEvent {
    pub fn query(&self) -> &PageQuery {
        match self {
            PaginationEvent::PageChanged(q)
            | PaginationEvent::LimitChanged(q)
            | PaginationEvent::SearchChanged(q)
            | PaginationEvent::ModeChanged(q) => q,
        }
    }

    pub fn into_query(self) -> PageQuery {
        match self {
            PaginationEvent::PageChanged(q)
            | PaginationEvent::LimitChanged(q)
            | PaginationEvent::SearchChanged(q)
            | PaginationEvent::ModeChanged(q) => q,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<u32>, cursor: Option<&str>) -> PageQuery {
        PageQuery {
            limit: 25,
            mode: Some(if cursor.is_some() { Mode::Cursor } else { Mode::Offset }),
            page,
            cursor: cursor.map(String::from),
            search: Some("kas bank".to_string()),
            order_by: "created_at".to_string(),
            order_dir: SortDirection::Desc,
        }
    }

    #[test]
    fn query_string_is_url_encoded() {
        let qs = query(Some(2), None).to_query_string();
        assert_eq!(qs, "limit=25&mode=offset&page=2&search=kas+bank&order_by=created_at&order_dir=desc");
    }

    #[test]
    fn cursor_query_has_no_page_key() {
        let pairs = query(None, Some("abc==")).to_pairs();
        assert!(pairs.iter().all(|(k, _)| k != "page"));
        assert!(pairs.contains(&("cursor".to_string(), "abc==".to_string())));
    }

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("Cursor".parse::<Mode>().unwrap(), Mode::Cursor);
        assert_eq!(" offset ".parse::<Mode>().unwrap(), Mode::Offset);
        assert!("keyset".parse::<Mode>().is_err());
    }
}
