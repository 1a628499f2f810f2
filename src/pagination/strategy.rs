use super::{Mode, PageLayout, PageState, PaginationMeta};

/// Navigation rules plugged into a [`Paginator`](super::Paginator).
///
/// Methods return `true` when they changed state and a reload is due.
pub trait NavigationStrategy: std::fmt::Debug + Default {
    /// Neighbours shown either side of the current page in the numbered list
    const WINDOW: u32;
    /// Placement of the numbered list in offset mode
    const LAYOUT: PageLayout;
    /// Whether the strategy can switch between cursor and offset modes
    const SWITCHABLE: bool;

    fn mode(&self) -> Mode;

    /// Cursor to send with the next request (cursor mode only)
    fn cursor(&self) -> Option<&str>;

    fn go_to_page(&mut self, state: &mut PageState, target: u32, meta: Option<&PaginationMeta>) -> bool;

    fn go_next(&mut self, state: &mut PageState, meta: Option<&PaginationMeta>) -> bool;

    fn go_previous(&mut self, state: &mut PageState, meta: Option<&PaginationMeta>) -> bool;

    /// Limit or search changed. Returns `true` when every piece of pagination
    /// state, cached metadata included, must be dropped.
    fn on_query_change(&mut self, state: &mut PageState) -> bool;

    fn switch_mode(&mut self, mode: Mode) -> bool;

    fn reset(&mut self);

    /// Take in a fresh server snapshot
    fn absorb(&mut self, state: &mut PageState, meta: &PaginationMeta);

    fn can_go_previous(&self, state: &PageState, meta: Option<&PaginationMeta>) -> bool;

    fn can_go_next(&self, state: &PageState, meta: Option<&PaginationMeta>) -> bool;
}

/// Page-number move shared by both strategies: rejects pages below 1, the
/// current page, and pages past the known last page.
fn jump_to(state: &mut PageState, target: u32, meta: Option<&PaginationMeta>) -> bool {
    if target < 1 || target == state.page {
        return false;
    }
    if let Some(last) = meta.and_then(|m| m.last_page()) {
        if target > last {
            return false;
        }
    }
    state.page = target;
    true
}

fn absorb_offset(state: &mut PageState, meta: &PaginationMeta) {
    state.page = meta.current_page().unwrap_or(1);
    if let Some(per_page) = meta.per_page() {
        state.limit = per_page;
    }
}

/// Plain page numbers. Limit and search changes only rewind to page 1.
#[derive(Debug, Clone, Default)]
pub struct OffsetStrategy;

impl NavigationStrategy for OffsetStrategy {
    const WINDOW: u32 = 2;
    const LAYOUT: PageLayout = PageLayout::Anchored;
    const SWITCHABLE: bool = false;

    fn mode(&self) -> Mode {
        Mode::Offset
    }

    fn cursor(&self) -> Option<&str> {
        None
    }

    fn go_to_page(&mut self, state: &mut PageState, target: u32, meta: Option<&PaginationMeta>) -> bool {
        jump_to(state, target, meta)
    }

    fn go_next(&mut self, state: &mut PageState, meta: Option<&PaginationMeta>) -> bool {
        jump_to(state, state.page.saturating_add(1), meta)
    }

    fn go_previous(&mut self, state: &mut PageState, meta: Option<&PaginationMeta>) -> bool {
        jump_to(state, state.page.saturating_sub(1), meta)
    }

    fn on_query_change(&mut self, state: &mut PageState) -> bool {
        state.page = 1;
        false
    }

    fn switch_mode(&mut self, mode: Mode) -> bool {
        if mode != Mode::Offset {
            tracing::warn!("offset paginator cannot switch to {} mode", mode);
        }
        false
    }

    fn reset(&mut self) {}

    fn absorb(&mut self, state: &mut PageState, meta: &PaginationMeta) {
        absorb_offset(state, meta);
    }

    fn can_go_previous(&self, state: &PageState, _meta: Option<&PaginationMeta>) -> bool {
        state.page > 1
    }

    fn can_go_next(&self, _state: &PageState, meta: Option<&PaginationMeta>) -> bool {
        meta.is_some_and(|m| m.has_more())
    }
}

/// Opaque server cursors with a local history stack, or page numbers when
/// switched to offset mode. A cursor is only valid for the query it was issued
/// under, so any limit/search/mode change discards all cursor state.
#[derive(Debug, Clone)]
pub struct CursorStrategy {
    mode: Mode,
    current: Option<String>,
    history: Vec<String>,
}

impl CursorStrategy {
    pub fn with_mode(mode: Mode) -> Self {
        Self { mode, current: None, history: Vec::new() }
    }

    /// Cursors behind the current one, most recent last
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl Default for CursorStrategy {
    fn default() -> Self {
        Self::with_mode(Mode::Cursor)
    }
}

impl NavigationStrategy for CursorStrategy {
    const WINDOW: u32 = 1;
    const LAYOUT: PageLayout = PageLayout::Centred;
    const SWITCHABLE: bool = true;

    fn mode(&self) -> Mode {
        self.mode
    }

    fn cursor(&self) -> Option<&str> {
        match self.mode {
            Mode::Cursor => self.current.as_deref(),
            Mode::Offset => None,
        }
    }

    fn go_to_page(&mut self, state: &mut PageState, target: u32, meta: Option<&PaginationMeta>) -> bool {
        if self.mode == Mode::Cursor {
            tracing::debug!("page jumps are not available in cursor mode");
            return false;
        }
        if !jump_to(state, target, meta) {
            return false;
        }
        self.current = None;
        true
    }

    fn go_next(&mut self, state: &mut PageState, meta: Option<&PaginationMeta>) -> bool {
        if self.mode == Mode::Offset {
            return self.go_to_page(state, state.page.saturating_add(1), meta);
        }

        let Some(next) = meta.and_then(|m| m.next_cursor()) else {
            return false;
        };
        if let Some(held) = self.current.take() {
            self.history.push(held);
        }
        self.current = Some(next.to_string());
        state.page = state.page.saturating_add(1);
        true
    }

    fn go_previous(&mut self, state: &mut PageState, meta: Option<&PaginationMeta>) -> bool {
        if self.mode == Mode::Offset {
            return self.go_to_page(state, state.page.saturating_sub(1), meta);
        }

        if let Some(previous) = self.history.pop() {
            self.current = Some(previous);
        } else if let Some(previous) = meta
            .and_then(|m| m.prev_cursor())
            .filter(|p| Some(*p) != self.current.as_deref())
        {
            self.current = Some(previous.to_string());
        } else if self.current.is_some() {
            // First step forward was taken without a cursor: go back to the start
            self.current = None;
        } else {
            return false;
        }
        state.page = state.page.saturating_sub(1).max(1);
        true
    }

    fn on_query_change(&mut self, state: &mut PageState) -> bool {
        state.page = 1;
        self.reset();
        true
    }

    fn switch_mode(&mut self, mode: Mode) -> bool {
        if mode == self.mode {
            return false;
        }
        self.mode = mode;
        self.reset();
        true
    }

    fn reset(&mut self) {
        self.current = None;
        self.history.clear();
    }

    fn absorb(&mut self, state: &mut PageState, meta: &PaginationMeta) {
        match self.mode {
            Mode::Offset => absorb_offset(state, meta),
            // The page label is a local counter in cursor mode
            Mode::Cursor => {
                if let Some(per_page) = meta.per_page() {
                    state.limit = per_page;
                }
            }
        }
    }

    fn can_go_previous(&self, state: &PageState, meta: Option<&PaginationMeta>) -> bool {
        match self.mode {
            Mode::Offset => state.page > 1,
            Mode::Cursor => {
                !self.history.is_empty() || self.current.is_some() || meta.is_some_and(|m| m.prev_cursor().is_some())
            }
        }
    }

    fn can_go_next(&self, _state: &PageState, meta: Option<&PaginationMeta>) -> bool {
        match self.mode {
            Mode::Offset => meta.is_some_and(|m| m.has_more()),
            Mode::Cursor => meta.is_some_and(|m| m.has_more() && m.next_cursor().is_some()),
        }
    }
}
