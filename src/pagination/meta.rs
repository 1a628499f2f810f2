use serde::{Deserialize, Deserializer, Serialize};

use super::Mode;

/// Server pagination snapshot. Both `snake_case` and `camelCase` field names
/// are accepted; read it through the accessors, which treat zero and empty
/// values as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaginationMeta {
    #[serde(default, alias = "currentPage")]
    pub current_page: Option<u32>,
    #[serde(default, alias = "lastPage", alias = "totalPages", alias = "total_pages")]
    pub last_page: Option<u32>,
    #[serde(default, alias = "perPage")]
    pub per_page: Option<u32>,
    #[serde(default, alias = "totalItems", alias = "total_items")]
    pub total: Option<u64>,
    #[serde(default)]
    pub from: Option<u64>,
    #[serde(default)]
    pub to: Option<u64>,
    #[serde(default, alias = "hasMore")]
    pub has_more: Option<bool>,
    #[serde(default, alias = "nextCursor")]
    pub next_cursor: Option<String>,
    #[serde(default, alias = "prevCursor")]
    pub prev_cursor: Option<String>,
    #[serde(default, deserialize_with = "lenient_mode")]
    pub mode: Option<Mode>,
}

// Unknown or empty mode strings read as "not reported"
fn lenient_mode<'de, D>(deserializer: D) -> Result<Option<Mode>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

impl PaginationMeta {
    pub fn current_page(&self) -> Option<u32> {
        self.current_page.filter(|p| *p > 0)
    }

    pub fn last_page(&self) -> Option<u32> {
        self.last_page.filter(|p| *p > 0)
    }

    pub fn per_page(&self) -> Option<u32> {
        self.per_page.filter(|p| *p > 0)
    }

    pub fn total(&self) -> u64 {
        self.total.unwrap_or(0)
    }

    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref().filter(|c| !c.is_empty())
    }

    pub fn prev_cursor(&self) -> Option<&str> {
        self.prev_cursor.as_deref().filter(|c| !c.is_empty())
    }

    /// Explicit flag when sent, otherwise whether a page beyond the current one exists
    pub fn has_more(&self) -> bool {
        match self.has_more {
            Some(flag) => flag,
            None => match (self.current_page(), self.last_page()) {
                (Some(current), Some(last)) => current < last,
                _ => self.next_cursor().is_some(),
            },
        }
    }

    /// 1-based row range shown on the current page, computed when not sent
    pub fn row_range(&self, page: u32, limit: u32) -> (u64, u64) {
        let total = self.total();
        if let (Some(from), Some(to)) = (self.from, self.to) {
            return (from, to);
        }
        if total == 0 {
            return (0, 0);
        }
        let page = u64::from(page.max(1));
        let limit = u64::from(limit.max(1));
        let from = (page - 1) * limit + 1;
        (from.min(total), (page * limit).min(total))
    }
}
