// End-to-end scenarios on the leads screen

use std::sync::Arc;

use crate::error::DashboardError;
use crate::form::{EntityForm, FormMode, FormOverlay, LeadForm, OverlayState};
use crate::retry::RetryPolicy;
use crate::source::Mutation;
use crate::table::TableView;
use crate::tests::fixtures::*;
use crate::tests::helpers::*;
use crate::view_model::{ViewModel, ViewSettings};
use crm_shared::{Lead, LeadStatus};
use std::time::Duration;

#[test]
fn test_tabs_search_and_pages_over_three_leads() {
    let mut vm = local_leads(three_leads(), 10);

    vm.set_active_status_str("won").unwrap();
    assert_eq!(vm.items().len(), 1);
    assert_eq!(vm.items()[0].status, LeadStatus::Won);

    vm.set_active_status_str("all").unwrap();
    vm.set_search_query("acme");
    assert_eq!(vm.total_items(), 0);
    match TableView::build(&vm) {
        TableView::Empty { message, .. } => assert_eq!(message, "No leads match \"acme\""),
        other => panic!("expected the empty state, got {:?}", other),
    }

    let mut vm = local_leads(three_leads(), 2);
    assert_eq!(vm.total_items(), 3);
    assert_eq!(vm.total_pages(), 2);
    assert_eq!(vm.items().len(), 2);
    vm.set_current_page(2);
    assert_eq!(vm.items().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_new_lead_without_name_is_blocked() {
    let mut vm = local_leads(three_leads(), 10);
    let before = vm.records().to_vec();

    let mut overlay = FormOverlay::<LeadForm>::new();
    overlay.open_new().unwrap();
    overlay.set_field("company", "Acme").unwrap();
    overlay.set_field("email", "buyer@acme.com").unwrap();

    let result = overlay.submit(&mut vm).await;
    let details = match result {
        Err(DashboardError::Validation { details }) => details,
        other => panic!("expected a validation error, got {:?}", other),
    };
    assert_eq!(details["name"], vec!["Name is required"]);
    assert_eq!(overlay.field_errors("name").len(), 1);
    assert_eq!(overlay.state(), OverlayState::Open { mode: FormMode::New });
    assert_eq!(vm.records(), before.as_slice());
}

#[tokio::test(start_paused = true)]
async fn test_edit_status_new_to_qualified() {
    let mut vm = local_leads(three_leads(), 10);
    let original = vm
        .records()
        .iter()
        .find(|lead| lead.status == LeadStatus::New)
        .cloned()
        .unwrap();

    let mut overlay = FormOverlay::<LeadForm>::new();
    overlay.open_edit(&original).unwrap();
    overlay.set_field("status", "qualified").unwrap();
    overlay.submit(&mut vm).await.unwrap();

    let stored = vm.get(original.id).cloned().unwrap();
    assert_eq!(stored.status, LeadStatus::Qualified);
    assert_eq!(
        stored,
        Lead {
            status: LeadStatus::Qualified,
            ..original
        }
    );
    assert_eq!(vm.records().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_load_retries_transient_failures() {
    let leads = three_leads();
    let mut backend = MockLeadBackend::new();
    let mut calls = 0;
    backend.expect_fetch_all().times(3).returning(move || {
        calls += 1;
        if calls < 3 {
            Err(DashboardError::SimulatedFailure {
                operation: "lead fetch".to_string(),
            })
        } else {
            Ok(leads.clone())
        }
    });

    let mut vm = ViewModel::<Lead>::new(Arc::new(backend), ViewSettings::default());
    assert_eq!(vm.load().await.unwrap(), 3);
    assert!(vm.last_error().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_load_gives_up_after_max_attempts() {
    let mut backend = MockLeadBackend::new();
    backend.expect_fetch_all().times(2).returning(|| {
        Err(DashboardError::SimulatedFailure {
            operation: "lead fetch".to_string(),
        })
    });

    let settings = ViewSettings {
        page_size: 10,
        retry: RetryPolicy {
            max_attempts: 2,
            initial_backoff: Duration::from_millis(50),
            ..Default::default()
        },
    };
    let mut vm = ViewModel::<Lead>::new(Arc::new(backend), settings);
    assert!(matches!(vm.load().await, Err(DashboardError::SimulatedFailure { .. })));
    assert!(!vm.is_loading());
    assert!(vm.records().is_empty());
    assert!(vm.last_error().is_some());
}

#[tokio::test(start_paused = true)]
async fn test_conflict_is_not_retried() {
    let mut backend = MockLeadBackend::new();
    backend.expect_fetch_all().times(1).returning(|| Ok(three_leads()));
    backend
        .expect_persist()
        .withf(|mutation| matches!(mutation, Mutation::Create(_)))
        .times(1)
        .returning(|_| Err(DashboardError::Conflict("duplicate email".to_string())));

    let mut vm = ViewModel::<Lead>::new(Arc::new(backend), ViewSettings::default());
    vm.load().await.unwrap();

    let result = vm.create(lead_draft()).await;
    assert_eq!(result, Err(DashboardError::Conflict("duplicate email".to_string())));
    assert_eq!(vm.records().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_delete_sends_the_target_id() {
    let leads = three_leads();
    let target = leads[1].id;
    let mut backend = MockLeadBackend::new();
    backend.expect_fetch_all().returning(move || Ok(leads.clone()));
    backend
        .expect_persist()
        .withf(move |mutation| *mutation == Mutation::Delete(target))
        .times(1)
        .returning(|_| Ok(()));

    let mut vm = ViewModel::<Lead>::new(Arc::new(backend), ViewSettings::default());
    vm.load().await.unwrap();
    let removed = vm.delete(target).await.unwrap();
    assert_eq!(removed.id, target);
    assert!(vm.get(target).is_none());
}
