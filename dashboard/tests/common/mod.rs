// Common test utilities that are shared across integration tests
use std::sync::Once;
use std::time::Duration;

use crm_dashboard::retry::RetryPolicy;
use crm_dashboard::source::FailurePlan;
use crm_dashboard::{AppContext, Dashboard, Sources, ViewSettings};

static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter("crm_dashboard=debug")
            .try_init()
            .ok();
    });
}

/// Dashboard over the seed data with the given mock latency and failures
pub fn dashboard(latency: Duration, failures: FailurePlan, page_size: usize) -> Dashboard {
    init_test_logging();
    let settings = ViewSettings {
        page_size,
        retry: RetryPolicy {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(100),
            ..Default::default()
        },
    };
    Dashboard::new(AppContext::new(), Sources::seeded(latency, failures), settings)
}
