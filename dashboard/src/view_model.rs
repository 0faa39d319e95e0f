//! Per-screen view-model
//!
//! A `ViewModel` owns one screen's entity collection and its filter, sort,
//! page and selection state. Presentational code reads derived output
//! (`items`, `total_pages`, ...) and sends intents back (`set_search_query`,
//! `handle_sort`, `delete`, ...). Derived output is recomputed on every read.
//!
//! Data source calls go through the retry policy and the view-model's
//! cancellation token. After `teardown` no pending call writes to the
//! view-model; it returns `Cancelled` instead.

use crm_shared::{ClosedSet, Record};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DashboardError, DashboardResult};
use crate::pagination::{FIRST_PAGE, PageMeta, total_pages};
use crate::query::{self, Projection, SortDirection, StatusTab, ViewState};
use crate::retry::RetryPolicy;
use crate::source::{MockDataSource, Mutation, SharedSource};
use crate::store::EntityStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSettings {
    pub page_size: usize,
    pub retry: RetryPolicy,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            page_size: crate::pagination::DEFAULT_PAGE_SIZE,
            retry: RetryPolicy::default(),
        }
    }
}

/// Everything a table needs to render one frame
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot<R> {
    pub items: Vec<R>,
    pub loading: bool,
    pub total_items: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub page_size: usize,
    pub sort_field: &'static str,
    pub sort_direction: SortDirection,
    pub search_query: String,
    pub active_status: &'static str,
    pub selected: Vec<Uuid>,
}

pub struct ViewModel<R: Record> {
    store: EntityStore<R>,
    state: ViewState<R>,
    selection: BTreeSet<Uuid>,
    loading: bool,
    /// A load has completed at least once
    loaded: bool,
    /// Filtered size as of the last refresh
    last_filtered: usize,
    last_error: Option<DashboardError>,
    source: SharedSource<R>,
    retry: RetryPolicy,
    cancel: CancellationToken,
}

impl<R: Record> ViewModel<R> {
    /// A view-model that has not fetched yet; it reports `loading` until the
    /// first `load` completes.
    pub fn new(source: SharedSource<R>, settings: ViewSettings) -> Self {
        Self {
            store: EntityStore::new(),
            state: ViewState::new(settings.page_size),
            selection: BTreeSet::new(),
            loading: true,
            loaded: false,
            last_filtered: 0,
            last_error: None,
            source,
            retry: settings.retry,
            cancel: CancellationToken::new(),
        }
    }

    /// A view-model over records already in memory, backed by an instant,
    /// never-failing source.
    pub fn local(records: Vec<R>, page_size: usize) -> DashboardResult<Self> {
        let source = MockDataSource::new(Vec::new(), Duration::ZERO).into_shared();
        let settings = ViewSettings {
            page_size,
            retry: RetryPolicy::once(Duration::from_secs(1)),
        };
        let mut vm = Self::new(source, settings);
        vm.store.seed(records)?;
        vm.loading = false;
        vm.loaded = true;
        vm.refresh();
        Ok(vm)
    }

    // Derived output

    pub fn projection(&self) -> Projection<R> {
        query::project(self.store.as_slice(), &self.state)
    }

    /// Records on the current page
    pub fn items(&self) -> Vec<R> {
        self.projection().items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn total_items(&self) -> usize {
        query::filter(self.store.as_slice(), &self.state).len()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_items(), self.state.page_size)
    }

    pub fn current_page(&self) -> usize {
        self.state.current_page
    }

    pub fn page_size(&self) -> usize {
        self.state.page_size
    }

    pub fn page_meta(&self) -> PageMeta {
        self.projection().meta()
    }

    pub fn sort_field(&self) -> R::Field {
        self.state.sort_field
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.state.sort_direction
    }

    pub fn search_query(&self) -> &str {
        &self.state.search_query
    }

    pub fn active_status(&self) -> StatusTab<R::Status> {
        self.state.active_status
    }

    /// Tab badge counts under the current search
    pub fn status_counts(&self) -> Vec<(StatusTab<R::Status>, usize)> {
        query::status_counts(self.store.as_slice(), &self.state.search_query)
    }

    pub fn selected(&self) -> Vec<Uuid> {
        self.selection.iter().copied().collect()
    }

    pub fn is_selected(&self, id: Uuid) -> bool {
        self.selection.contains(&id)
    }

    pub fn get(&self, id: Uuid) -> Option<&R> {
        self.store.get(id)
    }

    /// The whole collection, unfiltered
    pub fn records(&self) -> &[R] {
        self.store.as_slice()
    }

    pub fn last_error(&self) -> Option<&DashboardError> {
        self.last_error.as_ref()
    }

    pub fn has_loaded(&self) -> bool {
        self.loaded
    }

    pub fn snapshot(&self) -> ViewSnapshot<R> {
        let projection = self.projection();
        ViewSnapshot {
            items: projection.items,
            loading: self.loading,
            total_items: projection.total_items,
            total_pages: projection.total_pages,
            current_page: projection.current_page,
            page_size: projection.page_size,
            sort_field: self.state.sort_field.as_str(),
            sort_direction: self.state.sort_direction,
            search_query: self.state.search_query.clone(),
            active_status: self.state.active_status.as_str(),
            selected: self.selected(),
        }
    }

    // View intents

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.state.search_query = query.into();
        self.state.current_page = FIRST_PAGE;
        debug!(kind = %R::KIND, query = %self.state.search_query, "search changed");
        self.refresh();
    }

    pub fn set_active_status(&mut self, tab: StatusTab<R::Status>) {
        self.state.active_status = tab;
        self.state.current_page = FIRST_PAGE;
        debug!(kind = %R::KIND, tab = tab.as_str(), "status tab changed");
        self.refresh();
    }

    /// `"all"` or a status key
    pub fn set_active_status_str(&mut self, value: &str) -> DashboardResult<()> {
        let tab = StatusTab::parse(value).ok_or_else(|| {
            DashboardError::InvalidInput(format!("unknown {} status '{}'", R::KIND, value))
        })?;
        self.set_active_status(tab);
        Ok(())
    }

    /// Moves to `page`, clamped to the pages that exist. Returns the page
    /// actually shown.
    pub fn set_current_page(&mut self, page: usize) -> usize {
        let last = self.total_pages().max(FIRST_PAGE);
        self.state.current_page = page.clamp(FIRST_PAGE, last);
        self.state.current_page
    }

    /// Same field flips the direction; a new field starts ascending
    pub fn handle_sort(&mut self, field: R::Field) {
        if self.state.sort_field == field {
            self.state.sort_direction = self.state.sort_direction.toggle();
        } else {
            self.state.sort_field = field;
            self.state.sort_direction = SortDirection::Asc;
        }
        debug!(
            kind = %R::KIND,
            field = field.as_str(),
            direction = self.state.sort_direction.as_str(),
            "sort changed"
        );
    }

    pub fn handle_sort_str(&mut self, field: &str) -> DashboardResult<()> {
        let field = R::Field::parse(field).ok_or_else(|| {
            DashboardError::InvalidInput(format!("{} cannot be sorted by '{}'", R::KIND, field))
        })?;
        self.handle_sort(field);
        Ok(())
    }

    // Selection

    pub fn select(&mut self, id: Uuid) -> DashboardResult<()> {
        if !self.store.contains(id) {
            return Err(DashboardError::not_found(R::KIND, id));
        }
        self.selection.insert(id);
        Ok(())
    }

    pub fn deselect(&mut self, id: Uuid) -> bool {
        self.selection.remove(&id)
    }

    /// Returns whether the id is selected afterwards
    pub fn toggle_selection(&mut self, id: Uuid) -> DashboardResult<bool> {
        if self.selection.remove(&id) {
            return Ok(false);
        }
        self.select(id)?;
        Ok(true)
    }

    /// Selects every record on the current page
    pub fn select_page(&mut self) {
        let ids: Vec<Uuid> = self.items().iter().map(Record::id).collect();
        self.selection.extend(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // Data source backed operations

    /// Fetches the collection, replacing whatever was held before
    pub async fn load(&mut self) -> DashboardResult<usize> {
        self.ensure_active("load")?;
        self.loading = true;
        info!(kind = %R::KIND, "loading");

        let source = Arc::clone(&self.source);
        let result = self
            .retry
            .run("load", &self.cancel, || source.fetch_all())
            .await;

        if self.cancel.is_cancelled() {
            warn!(kind = %R::KIND, "load finished after teardown, discarding");
            return Err(DashboardError::Cancelled("load".to_string()));
        }
        self.loading = false;

        let records = match result {
            Ok(records) => records,
            Err(err) => return Err(self.record_failure(err)),
        };
        if let Err(err) = self.store.seed(records) {
            return Err(self.record_failure(err));
        }

        let store = &self.store;
        self.selection.retain(|id| store.contains(*id));
        self.last_error = None;
        self.loaded = true;
        self.refresh();
        info!(kind = %R::KIND, count = self.store.len(), "loaded");
        Ok(self.store.len())
    }

    pub async fn create(&mut self, draft: R::Draft) -> DashboardResult<R> {
        self.ensure_active("create")?;
        let record = self.store.prepare(draft);
        self.persist(Mutation::Create(record.clone())).await?;

        self.store.insert(record.clone());
        self.refresh();
        info!(kind = %R::KIND, id = %record.id(), "created");
        Ok(record)
    }

    /// Merges `patch` into the record. Unknown ids are `NotFound` and leave
    /// the collection unchanged.
    pub async fn update(&mut self, id: Uuid, patch: R::Patch) -> DashboardResult<R> {
        self.ensure_active("update")?;
        let updated = self.store.preview_update(id, patch)?;
        self.persist(Mutation::Update(updated.clone())).await?;

        self.store.replace(updated.clone())?;
        self.refresh();
        info!(kind = %R::KIND, %id, "updated");
        Ok(updated)
    }

    pub async fn delete(&mut self, id: Uuid) -> DashboardResult<R> {
        self.ensure_active("delete")?;
        if !self.store.contains(id) {
            return Err(DashboardError::not_found(R::KIND, id));
        }
        self.persist(Mutation::Delete(id)).await?;

        let removed = self.store.remove(id)?;
        self.selection.remove(&id);
        self.refresh();
        info!(kind = %R::KIND, %id, "deleted");
        Ok(removed)
    }

    /// Deletes every selected record, stopping at the first failure
    pub async fn delete_selected(&mut self) -> DashboardResult<usize> {
        let mut deleted = 0;
        for id in self.selected() {
            self.delete(id).await?;
            deleted += 1;
        }
        Ok(deleted)
    }

    // Lifecycle

    /// Cancels outstanding work. The view-model is disposed afterwards.
    pub fn teardown(&mut self) {
        if !self.cancel.is_cancelled() {
            debug!(kind = %R::KIND, "teardown");
            self.cancel.cancel();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Token that cancels this view-model's work from elsewhere
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn ensure_active(&self, operation: &str) -> DashboardResult<()> {
        if self.is_disposed() {
            return Err(DashboardError::Cancelled(operation.to_string()));
        }
        Ok(())
    }

    async fn persist(&mut self, mutation: Mutation<R>) -> DashboardResult<()> {
        let operation = mutation.label();
        let source = Arc::clone(&self.source);
        let result = self
            .retry
            .run(operation, &self.cancel, || source.persist(mutation.clone()))
            .await;

        if self.cancel.is_cancelled() {
            return Err(DashboardError::Cancelled(operation.to_string()));
        }
        result.map_err(|err| self.record_failure(err))
    }

    fn record_failure(&mut self, err: DashboardError) -> DashboardError {
        warn!(kind = %R::KIND, code = err.error_code(), error = %err, "operation failed");
        self.last_error = Some(err.clone());
        err
    }

    /// Re-derives paging after any change: a different filtered size sends
    /// the view back to page 1, and the page never points past the end.
    fn refresh(&mut self) {
        let filtered = self.total_items();
        if filtered != self.last_filtered {
            self.last_filtered = filtered;
            self.state.current_page = FIRST_PAGE;
        }
        let last = total_pages(filtered, self.state.page_size).max(FIRST_PAGE);
        self.state.current_page = self.state.current_page.clamp(FIRST_PAGE, last);
    }
}

impl<R: Record> Drop for ViewModel<R> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
