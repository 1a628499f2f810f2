use crate::config::ListingConfig;

use super::strategy::{CursorStrategy, NavigationStrategy, OffsetStrategy};
use super::view::{PageControls, PaginationView, RowSummary};
use super::{Mode, PageQuery, PageState, PaginationEvent, PaginationMeta, SortDirection};

#[derive(Debug, Clone)]
pub struct PaginatorOptions {
    pub default_limit: u32,
    pub limit_options: Vec<u32>,
    /// Advertised ceiling on rows per request; the server enforces it
    pub max_entries: u32,
    pub sort_field: String,
    pub sort_direction: SortDirection,
}

impl PaginatorOptions {
    pub fn from_config(listing: &ListingConfig) -> Self {
        Self {
            default_limit: listing.default_limit,
            limit_options: listing.limit_options.clone(),
            max_entries: listing.max_entries,
            sort_field: listing.default_sort_field.clone(),
            sort_direction: SortDirection::parse_or_desc(&listing.default_sort_direction),
        }
    }
}

impl Default for PaginatorOptions {
    fn default() -> Self {
        Self::from_config(&ListingConfig::default())
    }
}

/// Page/limit/search state machine. Navigation rules come from `S`.
#[derive(Debug, Clone)]
pub struct Paginator<S: NavigationStrategy> {
    state: PageState,
    options: PaginatorOptions,
    meta: Option<PaginationMeta>,
    /// Set when the query changed after `meta` arrived; its page bounds no
    /// longer apply until the next snapshot
    stale: bool,
    strategy: S,
}

/// Numbered pages, ±2 neighbours
pub type OffsetPaginator = Paginator<OffsetStrategy>;
/// Cursor or offset mode with backward cursor history, ±1 neighbours in offset mode
pub type CursorPaginator = Paginator<CursorStrategy>;

impl<S: NavigationStrategy> Paginator<S> {
    pub fn new(options: PaginatorOptions) -> Self {
        Self::with_strategy(options, S::default())
    }

    pub fn with_strategy(options: PaginatorOptions, strategy: S) -> Self {
        let state = PageState {
            page: 1,
            limit: options.default_limit,
            search: String::new(),
            sort_field: options.sort_field.clone(),
            sort_direction: options.sort_direction,
        };
        Self { state, options, meta: None, stale: false, strategy }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn page(&self) -> u32 {
        self.state.page
    }

    pub fn limit(&self) -> u32 {
        self.state.limit
    }

    pub fn search_term(&self) -> &str {
        &self.state.search
    }

    pub fn mode(&self) -> Mode {
        self.strategy.mode()
    }

    pub fn cursor(&self) -> Option<&str> {
        self.strategy.cursor()
    }

    pub fn metadata(&self) -> Option<&PaginationMeta> {
        self.meta.as_ref()
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn options(&self) -> &PaginatorOptions {
        &self.options
    }

    pub fn go_to_page(&mut self, page: u32) -> Option<PaginationEvent> {
        self.strategy
            .go_to_page(&mut self.state, page, self.meta.as_ref().filter(|_| !self.stale))
            .then(|| PaginationEvent::PageChanged(self.api_params()))
    }

    pub fn go_next(&mut self) -> Option<PaginationEvent> {
        self.strategy
            .go_next(&mut self.state, self.meta.as_ref().filter(|_| !self.stale))
            .then(|| PaginationEvent::PageChanged(self.api_params()))
    }

    pub fn go_previous(&mut self) -> Option<PaginationEvent> {
        self.strategy
            .go_previous(&mut self.state, self.meta.as_ref().filter(|_| !self.stale))
            .then(|| PaginationEvent::PageChanged(self.api_params()))
    }

    /// Set rows per page and start over from page 1.
    ///
    /// Zero and values above `max_entries` are ignored.
    pub fn change_limit(&mut self, limit: u32) -> Option<PaginationEvent> {
        if limit == 0 || limit > self.options.max_entries {
            tracing::warn!("ignoring page size {} (allowed 1..={})", limit, self.options.max_entries);
            return None;
        }
        self.state.limit = limit;
        self.rewind();
        tracing::debug!("limit changed to {}", limit);
        Some(PaginationEvent::LimitChanged(self.api_params()))
    }

    pub fn search(&mut self, term: &str) -> Option<PaginationEvent> {
        self.state.search = term.trim().to_string();
        self.rewind();
        tracing::debug!("search set to {:?}", self.state.search);
        Some(PaginationEvent::SearchChanged(self.api_params()))
    }

    pub fn clear_search(&mut self) -> Option<PaginationEvent> {
        self.state.search.clear();
        self.rewind();
        Some(PaginationEvent::SearchChanged(self.api_params()))
    }

    /// Query inputs owned elsewhere (column filters) changed: rewind the
    /// same way a new search does and reload.
    pub fn restart(&mut self) -> PaginationEvent {
        self.rewind();
        PaginationEvent::PageChanged(self.api_params())
    }

    /// Switch cursor/offset mode. Same mode is a no-op; otherwise all
    /// pagination state is dropped before the reload.
    pub fn change_mode(&mut self, mode: Mode) -> Option<PaginationEvent> {
        if !self.strategy.switch_mode(mode) {
            return None;
        }
        self.state.page = 1;
        self.meta = None;
        tracing::debug!("pagination mode changed to {}", mode);
        Some(PaginationEvent::ModeChanged(self.api_params()))
    }

    pub fn update_data(&mut self, meta: PaginationMeta) {
        self.strategy.absorb(&mut self.state, &meta);
        self.meta = Some(meta);
        self.stale = false;
    }

    /// Back to defaults: page 1, default limit, no search, no metadata
    pub fn reset(&mut self) {
        self.state.page = 1;
        self.state.limit = self.options.default_limit;
        self.state.search.clear();
        self.meta = None;
        self.strategy.reset();
    }

    /// Request parameters for the current state
    pub fn api_params(&self) -> PageQuery {
        let mode = self.strategy.mode();
        let search = Some(self.state.search.clone()).filter(|s| !s.is_empty());
        let (page, cursor) = match mode {
            Mode::Cursor => (None, self.strategy.cursor().map(str::to_string)),
            Mode::Offset => (Some(self.state.page), None),
        };

        PageQuery {
            limit: self.state.limit,
            mode: S::SWITCHABLE.then_some(mode),
            page,
            cursor,
            search,
            order_by: self.state.sort_field.clone(),
            order_dir: self.state.sort_direction,
        }
    }

    pub fn build_query_string(&self) -> String {
        self.api_params().to_query_string()
    }

    pub fn view(&self) -> PaginationView {
        let mode = self.strategy.mode();
        let meta = self.meta.as_ref();

        let summary = meta.map(|m| {
            let (from, to) = m.row_range(self.state.page, self.state.limit);
            RowSummary { from, to, total: m.total() }
        });

        let controls = match mode {
            Mode::Cursor => PageControls::Badge(self.state.page),
            Mode::Offset => {
                let last = meta.and_then(|m| m.last_page()).unwrap_or(1);
                PageControls::Numbered {
                    current: self.state.page,
                    items: S::LAYOUT.items(self.state.page, last, S::WINDOW),
                }
            }
        };

        let max_entries_note = summary
            .as_ref()
            .filter(|s| s.total >= u64::from(self.options.max_entries))
            .map(|_| self.options.max_entries);

        PaginationView {
            summary,
            mode_badge: S::SWITCHABLE.then_some(mode),
            max_entries_note,
            previous_enabled: self.strategy.can_go_previous(&self.state, meta),
            next_enabled: self.strategy.can_go_next(&self.state, meta),
            controls,
            limit: self.state.limit,
            limit_options: self.options.limit_options.clone(),
            search: self.state.search.clone(),
        }
    }

    fn rewind(&mut self) {
        if self.strategy.on_query_change(&mut self.state) {
            self.meta = None;
        }
        self.stale = self.meta.is_some();
    }
}

impl CursorPaginator {
    pub fn with_mode(options: PaginatorOptions, mode: Mode) -> Self {
        Self::with_strategy(options, CursorStrategy::with_mode(mode))
    }

    pub fn history(&self) -> &[String] {
        self.strategy.history()
    }
}
