// Collection and projection properties of the lead view-model

use crate::error::DashboardError;
use crate::query::{self, SortDirection, StatusTab, ViewState};
use crate::store::EntityStore;
use crate::tests::fixtures::*;
use crate::tests::helpers::*;
use crm_shared::{ClosedSet, Lead, LeadField, LeadPatch, LeadStatus, Record, StatusSet};
use std::collections::HashSet;
use uuid::Uuid;

#[test]
fn test_projection_is_deterministic() {
    let records = random_leads(40);
    for field in [LeadField::Name, LeadField::Company, LeadField::Value, LeadField::Status] {
        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let mut state = ViewState::<Lead>::new(7);
            state.sort_field = field;
            state.sort_direction = direction;
            state.current_page = 2;
            assert_eq!(query::project(&records, &state), query::project(&records, &state));
        }
    }
}

#[test]
fn test_pages_partition_the_filtered_rows() {
    let records = random_leads(23);
    let mut state = ViewState::<Lead>::new(5);
    let expected = query::filter(&records, &state).len();

    let mut seen = HashSet::new();
    let total_pages = query::project(&records, &state).total_pages;
    for page in 1..=total_pages {
        state.current_page = page;
        for lead in query::project(&records, &state).items {
            assert!(seen.insert(lead.id), "lead shown on two pages");
        }
    }
    assert_eq!(seen.len(), expected);
    assert_eq!(total_pages, 5);
}

#[test]
fn test_search_and_tab_always_reset_page() {
    let mut vm = local_leads(random_leads(30), 5);
    for status in LeadStatus::all() {
        vm.set_current_page(4);
        vm.set_active_status(StatusTab::Only(*status));
        assert_eq!(vm.current_page(), 1);
    }
    vm.set_active_status(StatusTab::All);
    vm.set_current_page(3);
    vm.set_search_query("a");
    assert_eq!(vm.current_page(), 1);
}

#[test]
fn test_sort_toggle_on_every_field() {
    let mut vm = local_leads(random_leads(5), 5);
    for field in [LeadField::Name, LeadField::Company, LeadField::Status] {
        vm.handle_sort(field);
        assert_eq!(vm.sort_direction(), SortDirection::Asc);
        vm.handle_sort(field);
        assert_eq!(vm.sort_direction(), SortDirection::Desc);
    }
}

#[test]
fn test_created_ids_are_fresh_and_status_initial() {
    let mut store = EntityStore::with_records(random_leads(10)).unwrap();
    let mut ids: HashSet<Uuid> = store.iter().map(Record::id).collect();

    for _ in 0..20 {
        let lead = store.create(lead_draft());
        assert!(ids.insert(lead.id));
        assert_eq!(lead.status, LeadStatus::INITIAL);
    }

    let removed = store.as_slice()[0].id;
    store.remove(removed).unwrap();
    let next = store.create(lead_draft());
    assert_ne!(next.id, removed);
}

#[tokio::test(start_paused = true)]
async fn test_update_merges_and_preserves_identity() {
    let mut vm = local_leads(random_leads(8), 10);
    let original = vm.records()[2].clone();

    let patch = LeadPatch {
        company: Some("Renamed Co".to_string()),
        value: Some(None),
        ..Default::default()
    };
    let updated = vm.update(original.id, patch).await.unwrap();

    assert_eq!(updated.id, original.id);
    assert_eq!(updated.created_at, original.created_at);
    assert_eq!(updated.company, "Renamed Co");
    assert_eq!(updated.value, None);
    assert_eq!(updated.name, original.name);
    assert_eq!(updated.status, original.status);
}

#[tokio::test(start_paused = true)]
async fn test_remove_shrinks_by_one_or_zero() {
    let mut vm = local_leads(random_leads(6), 10);
    let id = vm.records()[1].id;
    vm.select_page();
    assert_eq!(vm.selected().len(), 6);

    vm.delete(id).await.unwrap();
    assert_eq!(vm.records().len(), 5);
    assert!(!vm.selected().contains(&id));

    let result = vm.delete(Uuid::new_v4()).await;
    assert!(matches!(result, Err(DashboardError::NotFound { .. })));
    assert_eq!(vm.records().len(), 5);
    assert_eq!(vm.selected().len(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_mutation_is_visible_in_next_projection() {
    let mut vm = local_leads(three_leads(), 10);
    vm.set_search_query("globex");
    assert_eq!(page_names(&vm), vec!["Grace Hopper"]);

    let id = vm.items()[0].id;
    let patch = LeadPatch {
        company: Some("Hooli".to_string()),
        ..Default::default()
    };
    vm.update(id, patch).await.unwrap();
    assert!(vm.items().is_empty());
    assert_eq!(vm.total_pages(), 0);
    assert_eq!(vm.current_page(), 1);
}

#[test]
fn test_status_sorts_alphabetically() {
    let mut vm = local_leads(three_leads(), 10);
    vm.handle_sort(LeadField::Status);
    let statuses: Vec<&str> = vm.items().iter().map(|lead| lead.status.as_str()).collect();
    assert_eq!(statuses, ["contacted", "new", "won"]);

    vm.handle_sort(LeadField::Status);
    let statuses: Vec<&str> = vm.items().iter().map(|lead| lead.status.as_str()).collect();
    assert_eq!(statuses, ["won", "new", "contacted"]);
}
