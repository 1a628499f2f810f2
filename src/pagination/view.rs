use std::fmt;

use super::{Mode, PageItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSummary {
    pub from: u64,
    pub to: u64,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageControls {
    /// Clickable page list (offset mode)
    Numbered { current: u32, items: Vec<PageItem> },
    /// Page label only; cursor APIs cannot jump
    Badge(u32),
}

/// Everything a front end needs to draw the pagination bar
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationView {
    /// `None` until the first snapshot arrives
    pub summary: Option<RowSummary>,
    pub mode_badge: Option<Mode>,
    pub max_entries_note: Option<u32>,
    pub previous_enabled: bool,
    pub next_enabled: bool,
    pub controls: PageControls,
    pub limit: u32,
    pub limit_options: Vec<u32>,
    pub search: String,
}

/// 10000 -> "10,000"
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl fmt::Display for PaginationView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.summary {
            Some(s) => write!(f, "Showing {} to {} of {} results", s.from, s.to, s.total)?,
            None => f.write_str("Loading pagination...")?,
        }
        if let Some(mode) = self.mode_badge {
            let label = match mode {
                Mode::Cursor => "Cursor",
                Mode::Offset => "Offset",
            };
            write!(f, " [{}]", label)?;
        }
        if let Some(max) = self.max_entries_note {
            write!(f, " (max {} records)", group_thousands(u64::from(max)))?;
        }

        f.write_str("  ")?;
        f.write_str(if self.previous_enabled { "< Previous" } else { "  (Previous)" })?;
        match &self.controls {
            PageControls::Badge(page) => write!(f, "  Page {}", page)?,
            PageControls::Numbered { current, items } => {
                for item in items {
                    match item {
                        PageItem::Page(n) if n == current => write!(f, " [{}]", n)?,
                        other => write!(f, " {}", other)?,
                    }
                }
            }
        }
        f.write_str(if self.next_enabled { "  Next >" } else { "  (Next)" })?;

        let options: Vec<String> = self.limit_options.iter().map(|o| o.to_string()).collect();
        write!(f, "  | Show {} per page ({})", self.limit, options.join("/"))?;
        if !self.search.is_empty() {
            write!(f, "  | Search: {:?}", self.search)?;
        }
        Ok(())
    }
}
