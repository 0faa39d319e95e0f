//! Application root and screen switching
//!
//! The `Dashboard` owns the `AppContext` and exactly one active screen. A
//! screen is a view-model over one entity kind; switching tears the old one
//! down and starts the new one from scratch.

use crm_shared::{
    CallbackRequest, ClosedSet, Consultation, DemoRequest, Email, EntityKind, Lead, Record,
    WhatsAppMessage,
};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::assistant::ReplySuggester;
use crate::config::DashboardConfig;
use crate::context::AppContext;
use crate::error::{DashboardError, DashboardResult};
use crate::seed;
use crate::source::{FailurePlan, MockDataSource, SharedSource};
use crate::table::{TableColumns, TableView};
use crate::view_model::{ViewModel, ViewSettings};

/// One entry per screen in the sidebar
pub type ScreenKind = EntityKind;

/// Data sources for every screen
#[derive(Clone)]
pub struct Sources {
    pub leads: SharedSource<Lead>,
    pub demo_requests: SharedSource<DemoRequest>,
    pub callbacks: SharedSource<CallbackRequest>,
    pub consultations: SharedSource<Consultation>,
    pub emails: SharedSource<Email>,
    pub whatsapp: SharedSource<WhatsAppMessage>,
}

impl Sources {
    /// Mock sources over the seed datasets
    pub fn seeded(latency: Duration, failures: FailurePlan) -> Self {
        fn mock<R: Record>(records: Vec<R>, latency: Duration, failures: FailurePlan) -> SharedSource<R> {
            MockDataSource::new(records, latency)
                .with_failures(failures)
                .into_shared()
        }

        Self {
            leads: mock(seed::leads(), latency, failures),
            demo_requests: mock(seed::demo_requests(), latency, failures),
            callbacks: mock(seed::callbacks(), latency, failures),
            consultations: mock(seed::consultations(), latency, failures),
            emails: mock(seed::emails(), latency, failures),
            whatsapp: mock(seed::whatsapp_messages(), latency, failures),
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::seeded(config.sim_latency, config.failure_plan())
    }
}

pub enum Screen {
    Leads(ViewModel<Lead>),
    DemoRequests(ViewModel<DemoRequest>),
    Callbacks(ViewModel<CallbackRequest>),
    Consultations(ViewModel<Consultation>),
    Email(ViewModel<Email>),
    WhatsApp(ViewModel<WhatsAppMessage>),
}

/// Runs `$body` with `$vm` bound to whichever view-model the screen holds
macro_rules! with_view {
    ($screen:expr, $vm:ident => $body:expr) => {
        match $screen {
            Screen::Leads($vm) => $body,
            Screen::DemoRequests($vm) => $body,
            Screen::Callbacks($vm) => $body,
            Screen::Consultations($vm) => $body,
            Screen::Email($vm) => $body,
            Screen::WhatsApp($vm) => $body,
        }
    };
}

/// An entity kind that can be shown as a screen
pub trait ScreenRecord: TableColumns + Serialize {
    fn wrap(vm: ViewModel<Self>) -> Screen;

    fn view(screen: &Screen) -> Option<&ViewModel<Self>>;

    fn view_mut(screen: &mut Screen) -> Option<&mut ViewModel<Self>>;

    fn source(sources: &Sources) -> SharedSource<Self>;
}

macro_rules! screen_record {
    ($record:ty, $variant:ident, $source:ident) => {
        impl ScreenRecord for $record {
            fn wrap(vm: ViewModel<Self>) -> Screen {
                Screen::$variant(vm)
            }

            fn view(screen: &Screen) -> Option<&ViewModel<Self>> {
                match screen {
                    Screen::$variant(vm) => Some(vm),
                    _ => None,
                }
            }

            fn view_mut(screen: &mut Screen) -> Option<&mut ViewModel<Self>> {
                match screen {
                    Screen::$variant(vm) => Some(vm),
                    _ => None,
                }
            }

            fn source(sources: &Sources) -> SharedSource<Self> {
                sources.$source.clone()
            }
        }
    };
}

screen_record!(Lead, Leads, leads);
screen_record!(DemoRequest, DemoRequests, demo_requests);
screen_record!(CallbackRequest, Callbacks, callbacks);
screen_record!(Consultation, Consultations, consultations);
screen_record!(Email, Email, emails);
screen_record!(WhatsAppMessage, WhatsApp, whatsapp);

impl Screen {
    fn build<R: ScreenRecord>(sources: &Sources, settings: &ViewSettings) -> Screen {
        R::wrap(ViewModel::new(R::source(sources), settings.clone()))
    }

    fn open(kind: ScreenKind, sources: &Sources, settings: &ViewSettings) -> Screen {
        match kind {
            EntityKind::Lead => Self::build::<Lead>(sources, settings),
            EntityKind::DemoRequest => Self::build::<DemoRequest>(sources, settings),
            EntityKind::CallbackRequest => Self::build::<CallbackRequest>(sources, settings),
            EntityKind::Consultation => Self::build::<Consultation>(sources, settings),
            EntityKind::Email => Self::build::<Email>(sources, settings),
            EntityKind::WhatsAppMessage => Self::build::<WhatsAppMessage>(sources, settings),
        }
    }

    pub fn kind(&self) -> ScreenKind {
        match self {
            Screen::Leads(_) => EntityKind::Lead,
            Screen::DemoRequests(_) => EntityKind::DemoRequest,
            Screen::Callbacks(_) => EntityKind::CallbackRequest,
            Screen::Consultations(_) => EntityKind::Consultation,
            Screen::Email(_) => EntityKind::Email,
            Screen::WhatsApp(_) => EntityKind::WhatsAppMessage,
        }
    }

    pub fn is_loading(&self) -> bool {
        with_view!(self, vm => vm.is_loading())
    }

    pub fn table(&self) -> TableView {
        with_view!(self, vm => TableView::build(vm))
    }

    pub fn snapshot_json(&self) -> serde_json::Result<serde_json::Value> {
        with_view!(self, vm => serde_json::to_value(vm.snapshot()))
    }

    pub async fn load(&mut self) -> DashboardResult<usize> {
        with_view!(self, vm => vm.load().await)
    }

    pub fn set_search_query(&mut self, query: &str) {
        with_view!(self, vm => vm.set_search_query(query))
    }

    pub fn set_active_status(&mut self, status: &str) -> DashboardResult<()> {
        with_view!(self, vm => vm.set_active_status_str(status))
    }

    pub fn handle_sort(&mut self, field: &str) -> DashboardResult<()> {
        with_view!(self, vm => vm.handle_sort_str(field))
    }

    pub fn set_current_page(&mut self, page: usize) -> usize {
        with_view!(self, vm => vm.set_current_page(page))
    }

    pub fn teardown(&mut self) {
        with_view!(self, vm => vm.teardown())
    }

    fn cancellation_token(&self) -> tokio_util::sync::CancellationToken {
        with_view!(self, vm => vm.cancellation_token())
    }
}

pub struct Dashboard {
    ctx: AppContext,
    sources: Sources,
    settings: ViewSettings,
    active: Screen,
}

impl Dashboard {
    /// Opens on the leads screen
    pub fn new(ctx: AppContext, sources: Sources, settings: ViewSettings) -> Self {
        let active = Screen::open(EntityKind::Lead, &sources, &settings);
        info!(screen = %active.kind(), "dashboard started");
        Self {
            ctx,
            sources,
            settings,
            active,
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(
            AppContext::new(),
            Sources::from_config(config),
            config.view_settings(),
        )
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn active(&self) -> &Screen {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut Screen {
        &mut self.active
    }

    pub fn active_kind(&self) -> ScreenKind {
        self.active.kind()
    }

    /// Sidebar entries as `(kind, label, active)`
    pub fn navigation(&self) -> Vec<(ScreenKind, &'static str, bool)> {
        let active = self.active_kind();
        EntityKind::all()
            .iter()
            .map(|kind| (*kind, kind.label(), *kind == active))
            .collect()
    }

    /// Replaces the active screen. The old one is torn down first, so none of
    /// its pending work can land after the switch.
    pub fn switch_to(&mut self, kind: ScreenKind) -> &mut Screen {
        if kind != self.active.kind() {
            debug!(from = %self.active.kind(), to = %kind, "switching screen");
            self.active.teardown();
            self.active = Screen::open(kind, &self.sources, &self.settings);
        }
        &mut self.active
    }

    /// Loads the active screen with the loading overlay shown
    pub async fn load_active(&mut self) -> DashboardResult<usize> {
        let _guard = self.ctx.loading.begin(self.active.kind().as_str());
        self.active.load().await
    }

    pub fn view<R: ScreenRecord>(&self) -> DashboardResult<&ViewModel<R>> {
        let active = self.active.kind();
        R::view(&self.active).ok_or_else(|| inactive::<R>(active))
    }

    pub fn view_mut<R: ScreenRecord>(&mut self) -> DashboardResult<&mut ViewModel<R>> {
        let active = self.active.kind();
        R::view_mut(&mut self.active).ok_or_else(|| inactive::<R>(active))
    }

    /// Asks `suggester` for a reply under the active screen's cancellation.
    /// Only the Email and WhatsApp screens offer suggestions.
    pub async fn suggest_reply(
        &self,
        suggester: &dyn ReplySuggester,
        message: &str,
    ) -> DashboardResult<String> {
        match self.active.kind() {
            EntityKind::Email | EntityKind::WhatsAppMessage => {}
            other => {
                return Err(DashboardError::InvalidInput(format!(
                    "{} screen has no reply suggestions",
                    other
                )));
            }
        }
        let _guard = self.ctx.loading.begin("reply suggestion");
        suggester.suggest(message, &self.active.cancellation_token()).await
    }

    pub fn shutdown(&mut self) {
        info!(screen = %self.active.kind(), "dashboard shutting down");
        self.active.teardown();
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.active.teardown();
    }
}

fn inactive<R: Record>(active: ScreenKind) -> DashboardError {
    DashboardError::InvalidInput(format!("{} screen is not active ({} is)", R::KIND, active))
}
