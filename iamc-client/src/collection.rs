//! Paginated collection controller
//!
//! One controller backs one list view. It combines three independent inputs
//! (a free-text search term, a structured filter record and a page cursor)
//! into the rows currently shown, and keeps a selection of row ids that is
//! independent of all three.
//!
//! Two paging modes:
//! - [`PageMode::Client`]: the full set is fetched once; filtering, search and
//!   windowing happen locally.
//! - [`PageMode::Server`]: `items` is exactly one server page; every input
//!   change requires a new fetch and the total comes from the server. While
//!   the demonstration fallback is installed, rows are windowed locally.
//!
//! Fetches are two-phase. [`CollectionController::begin_fetch`] hands out a
//! ticket carrying a sequence number; [`CollectionController::apply_fetch`]
//! only applies a result whose ticket is the most recent one issued. A slow
//! response for a superseded query is dropped.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use shared::{Entity, Page};
use tokio::sync::{Mutex, MutexGuard};

use crate::error::{ClientError, ClientResult};
use crate::notify::Notifier;
use crate::query::{CollectionQuery, FilterValue, Filters};

/// Page sizes offered by list views
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 20, 50, 100];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    Client,
    Server,
}

/// Outcome of handing a fetch result to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Result belonged to the latest request and was applied
    Fresh,
    /// A newer request was issued meanwhile; result discarded
    Stale,
}

/// What the view should render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// First load still in flight
    Loading,
    /// Loaded (or failed with data kept) and nothing matches
    Empty,
    Rows(usize),
}

/// Tri-state of a "select all" header checkbox over the visible rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderState {
    Unchecked,
    Indeterminate,
    Checked,
}

#[derive(Debug, Clone)]
pub struct FetchTicket {
    seq: u64,
    query: CollectionQuery,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &CollectionQuery {
        &self.query
    }
}

/// Anything that can serve one list query
#[async_trait]
pub trait CollectionSource<T: Entity>: Send + Sync {
    async fn fetch(&self, query: &CollectionQuery) -> ClientResult<Page<T>>;
}

#[derive(Debug)]
pub struct CollectionController<T: Entity> {
    mode: PageMode,
    items: Vec<T>,
    total: u64,
    search_term: String,
    filters: Filters,
    page: usize,
    page_size: usize,
    selected: BTreeSet<i64>,
    issued_seq: u64,
    loading: bool,
    loaded_once: bool,
    last_error: Option<String>,
    fallback: Option<Vec<T>>,
    demo: bool,
    notifier: Option<Notifier>,
}

impl<T: Entity> CollectionController<T> {
    pub fn new(mode: PageMode) -> Self {
        Self {
            mode,
            items: Vec::new(),
            total: 0,
            search_term: String::new(),
            filters: Filters::new(),
            page: 0,
            page_size: PAGE_SIZE_OPTIONS[0],
            selected: BTreeSet::new(),
            issued_seq: 0,
            loading: false,
            loaded_once: false,
            last_error: None,
            fallback: None,
            demo: false,
            notifier: None,
        }
    }

    pub fn client_side() -> Self {
        Self::new(PageMode::Client)
    }

    pub fn server_side() -> Self {
        Self::new(PageMode::Server)
    }

    /// Zero is ignored
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        if page_size > 0 {
            self.page_size = page_size;
        }
        self
    }

    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Rows to show when the very first load fails
    pub fn with_fallback(mut self, rows: Vec<T>) -> Self {
        self.fallback = Some(rows);
        self
    }

    // ========== Inputs ==========

    pub fn mode(&self) -> PageMode {
        self.mode
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Zero-based page index
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term != self.search_term {
            self.search_term = term;
            self.page = 0;
        }
    }

    pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        self.filters.set(key, value);
        self.page = 0;
    }

    pub fn remove_filter(&mut self, key: &str) {
        if self.filters.remove(key).is_some() {
            self.page = 0;
        }
    }

    pub fn set_filters(&mut self, filters: Filters) {
        self.filters = filters;
        self.page = 0;
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.search_term.clear();
        self.page = 0;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    pub fn set_page_size(&mut self, page_size: usize) -> ClientResult<()> {
        if page_size == 0 {
            return Err(ClientError::validation("page size must be positive"));
        }
        self.page_size = page_size;
        self.page = 0;
        Ok(())
    }

    // ========== Fetching ==========

    /// Query the backend should answer for the current inputs
    pub fn query(&self) -> CollectionQuery {
        match self.mode {
            PageMode::Client => CollectionQuery::default(),
            PageMode::Server => CollectionQuery::new(self.filters.clone())
                .with_search(self.search_term.clone())
                .paginate(self.page as u32 + 1, self.page_size as u32),
        }
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued_seq += 1;
        self.loading = true;
        FetchTicket {
            seq: self.issued_seq,
            query: self.query(),
        }
    }

    pub fn apply_fetch(&mut self, ticket: FetchTicket, result: ClientResult<Page<T>>) -> Applied {
        match result {
            Ok(page) => self.apply_page(ticket, page),
            Err(e) => self.apply_failure(ticket, &e),
        }
    }

    pub fn apply_page(&mut self, ticket: FetchTicket, page: Page<T>) -> Applied {
        if self.is_superseded(&ticket) {
            return Applied::Stale;
        }
        tracing::debug!(kind = %T::KIND, seq = ticket.seq, rows = page.items.len(), total = page.total, "collection loaded");
        self.loading = false;
        self.items = page.items;
        self.total = page.total;
        self.loaded_once = true;
        self.demo = false;
        self.last_error = None;
        Applied::Fresh
    }

    /// Record a failed fetch. Rows and selection are left as they were.
    pub fn apply_failure(&mut self, ticket: FetchTicket, error: &ClientError) -> Applied {
        if self.is_superseded(&ticket) {
            return Applied::Stale;
        }
        tracing::warn!(kind = %T::KIND, seq = ticket.seq, error = %error, "collection fetch failed");
        self.loading = false;
        let message = format!("Falha ao carregar {}: {}", T::KIND.path(), error);
        if let Some(n) = &self.notifier {
            n.error(message.clone());
        }
        self.last_error = Some(message);
        self.install_fallback();
        Applied::Fresh
    }

    fn is_superseded(&self, ticket: &FetchTicket) -> bool {
        if ticket.seq == self.issued_seq {
            return false;
        }
        tracing::debug!(
            kind = %T::KIND,
            seq = ticket.seq,
            latest = self.issued_seq,
            "discarding superseded response"
        );
        true
    }

    fn install_fallback(&mut self) {
        if self.loaded_once || self.demo {
            return;
        }
        let Some(rows) = &self.fallback else {
            return;
        };
        self.items = rows.clone();
        self.total = self.items.len() as u64;
        self.demo = true;
        if let Some(n) = &self.notifier {
            n.warning(format!(
                "Servidor indisponivel: a mostrar dados de demonstracao para {}",
                T::KIND.path()
            ));
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Rows currently come from the demonstration dataset
    pub fn is_demo(&self) -> bool {
        self.demo
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // ========== Derived view ==========

    /// Every fetched row, ignoring filters and paging
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn contains(&self, id: i64) -> bool {
        self.items.iter().any(|row| row.id() == id)
    }

    pub fn ids(&self) -> BTreeSet<i64> {
        self.items.iter().map(Entity::id).collect()
    }

    /// Drop fetched rows for which `keep` is false. Selection is untouched.
    pub fn retain_items(&mut self, keep: impl FnMut(&T) -> bool) {
        self.items.retain(keep);
        if self.mode == PageMode::Client {
            self.total = self.items.len() as u64;
        }
    }

    fn matches_search(&self, row: &T) -> bool {
        let term = self.search_term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        row.id().to_string() == term
            || row
                .search_text()
                .iter()
                .any(|field| field.to_lowercase().contains(&term))
    }

    fn matches_filters(&self, row: &T) -> bool {
        if self.filters.is_empty() {
            return true;
        }
        serde_json::to_value(row).is_ok_and(|value| self.filters.matches(&value))
    }

    fn filtered(&self) -> impl Iterator<Item = &T> {
        self.items
            .iter()
            .filter(|row| self.matches_filters(row) && self.matches_search(row))
    }

    /// Demo rows are a full local set even in server mode
    fn windows_locally(&self) -> bool {
        self.mode == PageMode::Client || self.demo
    }

    /// Rows on the current page after filters and search
    pub fn visible_rows(&self) -> Vec<&T> {
        if !self.windows_locally() {
            return self.items.iter().collect();
        }
        self.filtered()
            .skip(self.page * self.page_size)
            .take(self.page_size)
            .collect()
    }

    pub fn visible_ids(&self) -> Vec<i64> {
        self.visible_rows().into_iter().map(Entity::id).collect()
    }

    /// Matching rows across all pages
    pub fn total_count(&self) -> u64 {
        if self.windows_locally() {
            self.filtered().count() as u64
        } else {
            self.total
        }
    }

    pub fn page_count(&self) -> usize {
        (self.total_count() as usize).div_ceil(self.page_size).max(1)
    }

    pub fn view_state(&self) -> ViewState {
        if self.loading && !self.loaded_once && !self.demo {
            return ViewState::Loading;
        }
        match self.visible_rows().len() {
            0 => ViewState::Empty,
            n => ViewState::Rows(n),
        }
    }

    // ========== Selection ==========

    pub fn is_selected(&self, id: i64) -> bool {
        self.selected.contains(&id)
    }

    pub fn select(&mut self, id: i64) {
        self.selected.insert(id);
    }

    pub fn deselect(&mut self, id: i64) {
        self.selected.remove(&id);
    }

    pub fn deselect_many(&mut self, ids: impl IntoIterator<Item = i64>) {
        for id in ids {
            self.selected.remove(&id);
        }
    }

    /// Returns the new state of the row
    pub fn toggle(&mut self, id: i64) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    /// Header checkbox: adds or removes exactly the visible row ids
    pub fn set_all_visible(&mut self, checked: bool) {
        let visible = self.visible_ids();
        if checked {
            self.selected.extend(visible);
        } else {
            for id in visible {
                self.selected.remove(&id);
            }
        }
    }

    pub fn header_state(&self) -> HeaderState {
        let visible = self.visible_ids();
        let picked = visible.iter().filter(|id| self.selected.contains(id)).count();
        match picked {
            0 => HeaderState::Unchecked,
            n if n == visible.len() => HeaderState::Checked,
            _ => HeaderState::Indeterminate,
        }
    }

    /// Keep only selected ids for which `keep` holds
    pub fn retain_selection(&mut self, keep: impl FnMut(&i64) -> bool) {
        self.selected.retain(keep);
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn selected_ids(&self) -> Vec<i64> {
        self.selected.iter().copied().collect()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }
}

/// Controller shared between surfaces of one view, bound to its source.
///
/// [`SharedCollection::load`] holds the lock only while issuing and applying,
/// never across the request, so overlapping loads are possible and resolved
/// by the sequence rule.
pub struct SharedCollection<T: Entity> {
    inner: Arc<Mutex<CollectionController<T>>>,
    source: Arc<dyn CollectionSource<T>>,
}

impl<T: Entity> Clone for SharedCollection<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            source: self.source.clone(),
        }
    }
}

impl<T: Entity> SharedCollection<T> {
    pub fn new(controller: CollectionController<T>, source: Arc<dyn CollectionSource<T>>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
            source,
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, CollectionController<T>> {
        self.inner.lock().await
    }

    pub async fn load(&self) -> Applied {
        let ticket = self.inner.lock().await.begin_fetch();
        let result = self.source.fetch(ticket.query()).await;
        self.inner.lock().await.apply_fetch(ticket, result)
    }

    /// Change inputs, then reload when the server owns paging.
    ///
    /// Client-side views derive everything locally and return `None`.
    pub async fn update<F>(&self, change: F) -> Option<Applied>
    where
        F: FnOnce(&mut CollectionController<T>) + Send,
    {
        let mode = {
            let mut guard = self.inner.lock().await;
            change(&mut guard);
            guard.mode()
        };
        match mode {
            PageMode::Server => Some(self.load().await),
            PageMode::Client => None,
        }
    }
}
