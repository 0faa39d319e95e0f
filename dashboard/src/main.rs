use crm_dashboard::config::DEFAULT_LOG_FILTER;
use crm_dashboard::{Dashboard, DashboardConfig, ErrorNotice};
use crm_shared::EntityKind;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = DashboardConfig::from_env()?;
    tracing::info!(
        page_size = config.page_size,
        latency_ms = config.sim_latency.as_millis() as u64,
        failure_rate = config.sim_failure_rate,
        "starting dashboard"
    );

    let mut app = Dashboard::from_config(&config);
    let query = std::env::args().nth(1);

    for kind in [EntityKind::Lead, EntityKind::Email] {
        let screen = app.switch_to(kind);
        if let Some(query) = &query {
            screen.set_search_query(query);
        }
        if let Err(err) = app.load_active().await {
            let notice = ErrorNotice::from(&err);
            println!("{}", serde_json::to_string_pretty(&notice)?);
            continue;
        }
        println!("{}", app.active().table().render_text());
    }

    println!("{}", serde_json::to_string_pretty(&app.active().snapshot_json()?)?);

    app.shutdown();
    Ok(())
}
