// Screen switching, loading overlay and teardown through the dashboard root

use std::time::Duration;

use crate::context::AppContext;
use crate::error::DashboardError;
use crate::form::{EntityForm, FormOverlay, WhatsAppForm};
use crate::retry::RetryPolicy;
use crate::screens::{Dashboard, Sources};
use crate::source::FailurePlan;
use crate::table::{TableIntent, TableView, dispatch};
use crate::view_model::ViewSettings;
use crm_shared::{EntityKind, Lead, MessageDirection, MessageStatus, WhatsAppMessage};

fn settings() -> ViewSettings {
    ViewSettings {
        page_size: 4,
        retry: RetryPolicy::default(),
    }
}

#[tokio::test(start_paused = true)]
async fn test_overlay_is_shown_while_loading() {
    let ctx = AppContext::new();
    let mut rx = ctx.loading.subscribe();
    let mut app = Dashboard::new(
        ctx.clone(),
        Sources::seeded(Duration::from_millis(400), FailurePlan::Never),
        settings(),
    );

    app.load_active().await.unwrap();
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), 0);
    assert!(!ctx.loading.is_active());
}

#[tokio::test(start_paused = true)]
async fn test_pending_load_is_discarded_on_switch() {
    let mut app = Dashboard::new(
        AppContext::new(),
        Sources::seeded(Duration::from_secs(2), FailurePlan::Never),
        settings(),
    );

    let result = tokio::select! {
        result = app.load_active() => Some(result),
        _ = tokio::time::sleep(Duration::from_millis(500)) => None,
    };
    assert!(result.is_none());
    assert!(!app.context().loading.is_active());

    app.switch_to(EntityKind::Consultation);
    assert!(matches!(app.active().table(), TableView::Loading { .. }));
    assert_eq!(app.load_active().await.unwrap(), 5);
    assert_eq!(app.active().table().title(), "Consultations");
}

#[tokio::test(start_paused = true)]
async fn test_compose_whatsapp_message() {
    let mut app = Dashboard::new(
        AppContext::new(),
        Sources::seeded(Duration::from_millis(100), FailurePlan::Never),
        settings(),
    );
    app.switch_to(EntityKind::WhatsAppMessage);
    app.load_active().await.unwrap();

    let mut overlay = FormOverlay::<WhatsAppForm>::new();
    overlay.open_new().unwrap();
    overlay.set_field("contact_name", "Marty McFly").unwrap();
    overlay.set_field("phone", "+1 555 014 1005").unwrap();
    overlay.set_field("body", "Thursday at 10 works.").unwrap();

    let vm = app.view_mut::<WhatsAppMessage>().unwrap();
    let sent = overlay.submit(vm).await.unwrap();
    assert_eq!(sent.direction, MessageDirection::Outbound);
    assert_eq!(sent.status, MessageStatus::Queued);
    assert_eq!(vm.records().len(), 9);
    assert_eq!(vm.items()[0].id, sent.id);
    assert!(WhatsAppForm::from_record(&sent).validate().is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_table_intents_after_shutdown_are_cancelled() {
    let mut app = Dashboard::new(
        AppContext::new(),
        Sources::seeded(Duration::from_millis(100), FailurePlan::Never),
        settings(),
    );
    app.load_active().await.unwrap();
    let id = app.view::<Lead>().unwrap().items()[0].id;

    app.shutdown();
    let vm = app.view_mut::<Lead>().unwrap();
    let result = dispatch(vm, TableIntent::Delete(id)).await;
    assert!(matches!(result, Err(DashboardError::Cancelled(_))));
    assert!(vm.get(id).is_some());
}
