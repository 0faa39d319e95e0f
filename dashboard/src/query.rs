//! Filter, sort and paginate projection over an entity collection
//!
//! Everything here is a pure function of `(records, ViewState)`. Nothing is
//! cached, so the next projection always reflects the latest collection.

use crm_shared::{ClosedSet, Record, StatusSet};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::pagination::{FIRST_PAGE, MAX_PAGE_SIZE, PageMeta, PageRequest, total_pages};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Orients an ascending comparison
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Status filter tab. `All` is the sentinel that disables status filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusTab<S> {
    All,
    Only(S),
}

impl<S> Default for StatusTab<S> {
    fn default() -> Self {
        StatusTab::All
    }
}

impl<S: StatusSet> StatusTab<S> {
    pub const ALL_KEY: &'static str = "all";

    /// `"all"` or a status key, case-insensitive
    pub fn parse(value: &str) -> Option<Self> {
        if value.trim().eq_ignore_ascii_case(Self::ALL_KEY) {
            return Some(StatusTab::All);
        }
        S::parse(value).map(StatusTab::Only)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusTab::All => Self::ALL_KEY,
            StatusTab::Only(status) => status.as_str(),
        }
    }

    pub fn admits(&self, status: S) -> bool {
        match self {
            StatusTab::All => true,
            StatusTab::Only(active) => *active == status,
        }
    }

    /// The sentinel followed by every status, in lifecycle order
    pub fn tabs() -> Vec<Self> {
        std::iter::once(StatusTab::All)
            .chain(S::all().iter().copied().map(StatusTab::Only))
            .collect()
    }
}

/// Parameters driving one screen's projection
#[derive(Debug, Clone)]
pub struct ViewState<R: Record> {
    pub search_query: String,
    pub active_status: StatusTab<R::Status>,
    pub sort_field: R::Field,
    pub sort_direction: SortDirection,
    pub current_page: usize,
    pub page_size: usize,
}

impl<R: Record> ViewState<R> {
    /// Newest first, first page, no filters
    pub fn new(page_size: usize) -> Self {
        Self {
            search_query: String::new(),
            active_status: StatusTab::All,
            sort_field: R::DEFAULT_SORT,
            sort_direction: SortDirection::Desc,
            current_page: FIRST_PAGE,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.current_page, self.page_size)
    }
}

/// One page of the filtered, sorted collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection<R> {
    pub items: Vec<R>,
    pub total_items: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub page_size: usize,
}

impl<R> Projection<R> {
    pub fn meta(&self) -> PageMeta {
        PageMeta::new(self.current_page, self.page_size, self.total_items)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Search filter then status-tab filter, in collection order
pub fn filter<'a, R: Record>(records: &'a [R], state: &ViewState<R>) -> Vec<&'a R> {
    records
        .iter()
        .filter(|record| record.matches_search(&state.search_query))
        .filter(|record| state.active_status.admits(record.status()))
        .collect()
}

/// Stable sort by one field; records with equal keys keep their relative order
pub fn sort<R: Record>(rows: &mut [&R], field: R::Field, direction: SortDirection) {
    rows.sort_by(|a, b| direction.apply(a.sort_key(field).compare(&b.sort_key(field))));
}

pub fn project<R: Record>(records: &[R], state: &ViewState<R>) -> Projection<R> {
    let mut rows = filter(records, state);
    sort(&mut rows, state.sort_field, state.sort_direction);

    let items = state
        .page_request()
        .slice(&rows)
        .iter()
        .map(|record| (*record).clone())
        .collect();

    Projection {
        items,
        total_items: rows.len(),
        total_pages: total_pages(rows.len(), state.page_size),
        current_page: state.current_page,
        page_size: state.page_size,
    }
}

/// Badge counts per status tab, honoring the search query but not the active tab
pub fn status_counts<R: Record>(records: &[R], search_query: &str) -> Vec<(StatusTab<R::Status>, usize)> {
    let matching: Vec<&R> = records
        .iter()
        .filter(|record| record.matches_search(search_query))
        .collect();

    StatusTab::tabs()
        .into_iter()
        .map(|tab| {
            let count = matching.iter().filter(|record| tab.admits(record.status())).count();
            (tab, count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use crm_shared::{Lead, LeadField, LeadSource, LeadStatus};
    use uuid::Uuid;

    fn lead(name: &str, company: &str, status: LeadStatus, minute: i64) -> Lead {
        Lead {
            id: Uuid::new_v4(),
            name: name.to_string(),
            company: company.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: None,
            source: LeadSource::Website,
            status,
            value: None,
            owner: None,
            notes: None,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap() + Duration::minutes(minute),
        }
    }

    fn sample() -> Vec<Lead> {
        vec![
            lead("carol", "Globex", LeadStatus::New, 0),
            lead("Alice", "Initech", LeadStatus::Contacted, 1),
            lead("bob", "Globex", LeadStatus::Won, 2),
        ]
    }

    #[test]
    fn test_page_size_is_clamped() {
        assert_eq!(ViewState::<Lead>::new(0).page_size, 1);
        assert_eq!(ViewState::<Lead>::new(200).page_size, MAX_PAGE_SIZE);
        assert_eq!(ViewState::<Lead>::new(25).page_size, 25);
    }

    #[test]
    fn test_search_and_tab_filters() {
        let records = sample();
        let mut state = ViewState::<Lead>::new(10);
        state.search_query = "GLOBEX".to_string();
        assert_eq!(project(&records, &state).total_items, 2);

        state.active_status = StatusTab::Only(LeadStatus::Won);
        let projection = project(&records, &state);
        assert_eq!(projection.total_items, 1);
        assert_eq!(projection.items[0].name, "bob");
    }

    #[test]
    fn test_string_sort_is_case_insensitive() {
        let records = sample();
        let mut state = ViewState::<Lead>::new(10);
        state.sort_field = LeadField::Name;
        state.sort_direction = SortDirection::Asc;

        let names: Vec<String> = project(&records, &state).items.into_iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["Alice", "bob", "carol"]);
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let records = sample();
        let state = ViewState::<Lead>::new(10);
        let names: Vec<String> = project(&records, &state).items.into_iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["bob", "Alice", "carol"]);
    }

    #[test]
    fn test_sort_is_stable_in_both_directions() {
        let records = sample();
        let mut state = ViewState::<Lead>::new(10);
        state.sort_field = LeadField::Company;

        for direction in [SortDirection::Asc, SortDirection::Desc] {
            state.sort_direction = direction;
            let globex: Vec<String> = project(&records, &state)
                .items
                .into_iter()
                .filter(|l| l.company == "Globex")
                .map(|l| l.name)
                .collect();
            assert_eq!(globex, vec!["carol", "bob"]);
        }
    }

    #[test]
    fn test_projection_is_idempotent() {
        let records = sample();
        let mut state = ViewState::<Lead>::new(2);
        state.sort_field = LeadField::Status;
        let first = project(&records, &state);
        let second = project(&records, &state);
        assert_eq!(first, second);
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.items.len(), 2);
    }

    #[test]
    fn test_status_tab_parse() {
        assert_eq!(StatusTab::<LeadStatus>::parse("ALL"), Some(StatusTab::All));
        assert_eq!(
            StatusTab::<LeadStatus>::parse("won"),
            Some(StatusTab::Only(LeadStatus::Won))
        );
        assert_eq!(StatusTab::<LeadStatus>::parse("archived"), None);
        assert_eq!(StatusTab::Only(LeadStatus::Lost).as_str(), "lost");
    }

    #[test]
    fn test_status_counts() {
        let records = sample();
        let counts = status_counts(&records, "");
        assert_eq!(counts[0], (StatusTab::All, 3));
        assert!(counts.contains(&(StatusTab::Only(LeadStatus::Won), 1)));
        assert!(counts.contains(&(StatusTab::Only(LeadStatus::Lost), 0)));
    }
}
