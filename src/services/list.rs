//! List/paginate/filter view-model.
//!
//! Holds one [`PagedList`] replaced wholesale by each successful fetch, a
//! zero-based page counter and the [`FilterState`] of the listing.
//!
//! Fetches are fenced: every request takes a [`LoadTicket`] and only the
//! ticket of the most recently issued request may write state. A host that
//! dispatches fetches concurrently (double-clicking "next", typing into a
//! search box) therefore always ends up showing the response to the last
//! action, whatever order the responses arrive in.

use serde::de::DeserializeOwned;

use crate::domain::filter::FilterState;
use crate::domain::notification::Notification;
use crate::dto::api::FieldErrors;
use crate::pagination::PagedList;
use crate::repository::errors::RepositoryResult;
use crate::repository::{ResourceReader, fetch_page};
use crate::services::notify::Notifier;
use crate::services::{ServiceError, ServiceResult};

/// Name of the free-text filter field understood by the list endpoints.
pub const SEARCH_FIELD: &str = "search";

/// How the page counter moves once a fetch is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageMove {
    Reset,
    Keep,
    Forward,
    Back,
}

/// Handle for one issued fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    seq: u64,
    url: String,
    page_move: PageMove,
}

impl LoadTicket {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Clone, Debug)]
pub struct ListView<T> {
    endpoint: String,
    pub(crate) data: PagedList<T>,
    page: usize,
    filters: FilterState,
    loading: bool,
    last_error: Option<String>,
    pub(crate) field_errors: FieldErrors,
    issued: u64,
}

impl<T> ListView<T> {
    pub fn new(endpoint: impl Into<String>, filters: FilterState) -> Self {
        Self {
            endpoint: endpoint.into(),
            data: PagedList::default(),
            page: 0,
            filters,
            loading: false,
            last_error: None,
            field_errors: FieldErrors::new(),
            issued: 0,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn data(&self) -> &PagedList<T> {
        &self.data
    }

    pub fn results(&self) -> &[T] {
        &self.data.results
    }

    pub fn count(&self) -> usize {
        self.data.count
    }

    /// Zero-based index of the page currently shown.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterState {
        &mut self.filters
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Field errors from the last rejected create/update.
    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    /// URL of the listing with the current filters applied.
    pub fn filtered_url(&self) -> String {
        self.filters.apply_to(&self.endpoint)
    }

    /// Issues a new fetch, superseding any fetch still in flight.
    pub fn begin_load(&mut self, url: impl Into<String>, page_move: PageMove) -> LoadTicket {
        self.issued += 1;
        self.loading = true;
        LoadTicket {
            seq: self.issued,
            url: url.into(),
            page_move,
        }
    }

    /// Applies the outcome of a fetch.
    ///
    /// Returns `Ok(false)` when the ticket was superseded and its outcome
    /// dropped. A failed fetch leaves the list untouched, surfaces a
    /// notification and is returned to the caller.
    pub fn finish_load<N>(
        &mut self,
        ticket: LoadTicket,
        outcome: RepositoryResult<PagedList<T>>,
        ui: &N,
    ) -> ServiceResult<bool>
    where
        N: Notifier + ?Sized,
    {
        if ticket.seq != self.issued {
            log::debug!(
                "Discarding superseded response #{} for {} (latest is #{})",
                ticket.seq,
                ticket.url,
                self.issued
            );
            return Ok(false);
        }

        self.loading = false;

        match outcome {
            Ok(list) => {
                if !list.is_consistent() {
                    log::warn!(
                        "{} returned {} rows for a count of {}",
                        ticket.url,
                        list.results.len(),
                        list.count
                    );
                }
                self.data = list;
                self.last_error = None;
                self.page = match ticket.page_move {
                    PageMove::Reset => 0,
                    PageMove::Keep => self.page,
                    PageMove::Forward => self.page + 1,
                    PageMove::Back => self.page.saturating_sub(1),
                };
                Ok(true)
            }
            Err(err) => {
                log::error!("Failed to load {}: {err}", ticket.url);
                self.last_error = Some(err.to_string());
                ui.notify(Notification::error_occurred(&err));
                Err(ServiceError::from(err))
            }
        }
    }
}

impl<T> ListView<T>
where
    T: DeserializeOwned,
{
    fn fetch<R, N>(
        &mut self,
        repo: &R,
        ui: &N,
        url: String,
        page_move: PageMove,
    ) -> ServiceResult<bool>
    where
        R: ResourceReader + ?Sized,
        N: Notifier + ?Sized,
    {
        let ticket = self.begin_load(url, page_move);
        let outcome = fetch_page(repo, ticket.url());
        self.finish_load(ticket, outcome, ui)
    }

    /// Loads `url`, or the unfiltered listing when `None`.
    ///
    /// Loading the default listing returns the page counter to zero; an
    /// explicit URL keeps it.
    pub fn load<R, N>(&mut self, repo: &R, ui: &N, url: Option<&str>) -> ServiceResult<()>
    where
        R: ResourceReader + ?Sized,
        N: Notifier + ?Sized,
    {
        let (url, page_move) = match url {
            Some(url) => (url.to_string(), PageMove::Keep),
            None => (self.endpoint.clone(), PageMove::Reset),
        };
        self.fetch(repo, ui, url, page_move).map(|_| ())
    }

    /// Follows the `next` cursor. Returns `false` on the last page.
    pub fn next<R, N>(&mut self, repo: &R, ui: &N) -> ServiceResult<bool>
    where
        R: ResourceReader + ?Sized,
        N: Notifier + ?Sized,
    {
        match self.data.next.clone() {
            Some(url) => self.fetch(repo, ui, url, PageMove::Forward),
            None => Ok(false),
        }
    }

    /// Follows the `previous` cursor. Returns `false` on the first page.
    pub fn previous<R, N>(&mut self, repo: &R, ui: &N) -> ServiceResult<bool>
    where
        R: ResourceReader + ?Sized,
        N: Notifier + ?Sized,
    {
        match self.data.previous.clone() {
            Some(url) => self.fetch(repo, ui, url, PageMove::Back),
            None => Ok(false),
        }
    }

    /// Reloads the listing narrowed by the current filters.
    pub fn filter<R, N>(&mut self, repo: &R, ui: &N) -> ServiceResult<()>
    where
        R: ResourceReader + ?Sized,
        N: Notifier + ?Sized,
    {
        let url = self.filtered_url();
        self.fetch(repo, ui, url, PageMove::Reset).map(|_| ())
    }

    /// Resets the filters to their defaults and reloads.
    pub fn clear<R, N>(&mut self, repo: &R, ui: &N) -> ServiceResult<()>
    where
        R: ResourceReader + ?Sized,
        N: Notifier + ?Sized,
    {
        self.filters.reset();
        self.filter(repo, ui)
    }

    /// Sets the free-text search field and filters.
    pub fn search<R, N>(&mut self, repo: &R, ui: &N, term: &str) -> ServiceResult<()>
    where
        R: ResourceReader + ?Sized,
        N: Notifier + ?Sized,
    {
        self.filters.set(SEARCH_FIELD, term.trim());
        self.filter(repo, ui)
    }
}
