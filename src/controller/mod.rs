//! List screen for additional analyses: composes a paginator, the column
//! filter panel and the resource API into one fetch/render cycle.

use crate::analyses::{AdditionalAnalysis, AnalysesApi, ExportRequest, Statistics};
use crate::api::Page;
use crate::error::ClientResult;
use crate::filter::{ColumnFilterPanel, ColumnSpec, FilterChange, FilterError, SelectOption};
use crate::pagination::{Mode, NavigationStrategy, PageQuery, PaginationEvent, Paginator};

/// Shown when the server gave no message of its own
pub const LOAD_FAILED: &str = "Failed to load additional analyses";

/// The one line of feedback shown above the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Info(text) | Notice::Error(text) => text,
        }
    }
}

/// A request that has been issued but not yet completed
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFetch {
    pub seq: u64,
    pub query: Vec<(String, String)>,
}

/// Filter columns of the additional-analyses table
pub fn analysis_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::text("account_code", "Account Code"),
        ColumnSpec::select("analysis_type", "Analysis Type", Vec::new()),
        ColumnSpec::select(
            "status",
            "Status",
            vec![SelectOption::new("active", "Active"), SelectOption::new("inactive", "Inactive")],
        ),
    ]
}

/// One list view. Every state-changing action ends in at most one request;
/// only the response to the most recently issued request is applied.
pub struct ResourceListController<S: NavigationStrategy> {
    api: AnalysesApi,
    paginator: Paginator<S>,
    filters: ColumnFilterPanel,
    rows: Vec<AdditionalAnalysis>,
    types: Vec<String>,
    statistics: Statistics,
    notice: Option<Notice>,
    issued: u64,
}

impl<S: NavigationStrategy> ResourceListController<S> {
    pub fn new(api: AnalysesApi, paginator: Paginator<S>, filters: ColumnFilterPanel) -> Self {
        Self {
            api,
            paginator,
            filters,
            rows: Vec::new(),
            types: Vec::new(),
            statistics: Statistics::default(),
            notice: None,
            issued: 0,
        }
    }

    pub fn api(&self) -> &AnalysesApi {
        &self.api
    }

    pub fn paginator(&self) -> &Paginator<S> {
        &self.paginator
    }

    /// Direct access for navigation; feed the returned event to [`handle`](Self::handle)
    pub fn paginator_mut(&mut self) -> &mut Paginator<S> {
        &mut self.paginator
    }

    pub fn filters(&self) -> &ColumnFilterPanel {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut ColumnFilterPanel {
        &mut self.filters
    }

    pub fn rows(&self) -> &[AdditionalAnalysis] {
        &self.rows
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn statistics(&self) -> Statistics {
        self.statistics
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    /// Full list query: pagination (page or cursor), search, active filters, sort
    pub fn build_query(&self) -> Vec<(String, String)> {
        Self::query_pairs(&self.paginator.api_params(), &self.filters)
    }

    fn query_pairs(page: &PageQuery, filters: &ColumnFilterPanel) -> Vec<(String, String)> {
        let mut pairs = vec![("limit".to_string(), page.limit.to_string())];
        if let Some(mode) = page.mode {
            pairs.push(("mode".to_string(), mode.to_string()));
        }
        match (page.page, page.cursor.as_deref()) {
            (Some(number), _) => pairs.push(("page".to_string(), number.to_string())),
            (None, Some(cursor)) if !cursor.is_empty() => pairs.push(("cursor".to_string(), cursor.to_string())),
            _ => {}
        }
        if let Some(search) = page.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search".to_string(), search.to_string()));
        }
        pairs.extend(filters.get_filters());
        pairs.push(("sort_by".to_string(), page.order_by.clone()));
        pairs.push(("sort_order".to_string(), page.order_dir.as_str().to_string()));
        pairs
    }

    /// Stamp a new request. Any earlier pending request becomes stale.
    pub fn begin_fetch(&mut self) -> PendingFetch {
        self.issued += 1;
        PendingFetch { seq: self.issued, query: self.build_query() }
    }

    /// Apply the outcome of request `seq`. Returns `false` when it was stale
    /// and dropped. Failures keep the rows already on screen.
    pub fn complete(&mut self, seq: u64, result: ClientResult<Page<AdditionalAnalysis>>) -> bool {
        if seq != self.issued {
            tracing::debug!("dropping stale response #{} (latest is #{})", seq, self.issued);
            return false;
        }

        match result {
            Ok(page) => {
                tracing::debug!("request #{} returned {} row(s)", seq, page.data.len());
                self.paginator.update_data(page.pagination);
                self.rows = page.data;
                self.statistics = Statistics::compute(&self.rows, self.types.len());
                self.notice = None;
            }
            Err(e) => {
                tracing::warn!("request #{} failed: {}", seq, e);
                self.notice = Some(Notice::Error(e.user_message(LOAD_FAILED)));
            }
        }
        true
    }

    /// Issue one list request for the current state
    pub async fn refresh(&mut self) -> bool {
        if let Err(e) = self.api.client().session().ensure_access() {
            self.notice = Some(Notice::Error(e.user_message(LOAD_FAILED)));
            return false;
        }
        let fetch = self.begin_fetch();
        let result = self.api.list(&fetch.query).await;
        self.complete(fetch.seq, result)
    }

    /// Reload when a paginator operation asked for it
    pub async fn handle(&mut self, event: Option<PaginationEvent>) -> bool {
        match event {
            Some(event) => {
                tracing::debug!("reloading after {:?}", event);
                self.refresh().await
            }
            None => false,
        }
    }

    /// Populate the type filter from the server. Failure only leaves the
    /// filter open to free values.
    pub async fn load_types(&mut self) {
        match self.api.types().await {
            Ok(types) => {
                let options = types.iter().map(|t| SelectOption::new(t.as_str(), t.as_str())).collect();
                if let Err(e) = self.filters.set_options("analysis_type", options) {
                    tracing::warn!("cannot set analysis type options: {}", e);
                }
                self.types = types;
                self.statistics.known_types = self.types.len();
            }
            Err(e) => {
                tracing::warn!("failed to load analysis types: {}", e);
                self.notice = Some(Notice::Error(e.user_message("Failed to load analysis types")));
            }
        }
    }

    /// Rewind pagination after the panel reported a filter change
    pub fn filters_changed(&mut self, _change: FilterChange) -> PaginationEvent {
        self.paginator.restart()
    }

    pub fn apply_filters(&mut self) -> PaginationEvent {
        let change = self.filters.apply_filters();
        self.filters_changed(change)
    }

    pub fn clear_filter(&mut self, key: &str) -> PaginationEvent {
        let change = self.filters.clear_filter(key);
        self.filters_changed(change)
    }

    pub fn clear_all_filters(&mut self) -> PaginationEvent {
        let change = self.filters.clear_all_filters();
        self.filters_changed(change)
    }

    /// Page size from the "show entries" selector
    pub fn show_entries(&mut self, entries: u32) -> Result<Option<PaginationEvent>, FilterError> {
        let _ = self.filters.set_show_entries(entries)?;
        Ok(self.paginator.change_limit(entries))
    }

    pub fn change_mode(&mut self, mode: Mode) -> Option<PaginationEvent> {
        self.paginator.change_mode(mode)
    }

    /// Export body for the current filters and search
    pub fn export_request(&self) -> ExportRequest {
        let filters = self.filters.get_filters();
        let search = self.paginator.search_term();
        ExportRequest {
            account_code: filters.get("account_code").cloned(),
            analysis_type: filters.get("analysis_type").cloned(),
            status: filters.get("status").cloned(),
            search: Some(search.to_string()).filter(|s| !s.is_empty()),
            ..ExportRequest::default()
        }
    }
}
