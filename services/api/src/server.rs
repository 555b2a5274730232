use crate::cli::ServeArgs;
use crate::infra::{AppState, CatalogStore};
use crate::routes::router;
use axum_prometheus::PrometheusMetricLayer;
use benefit_screener::config::AppConfig;
use benefit_screener::error::AppError;
use benefit_screener::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(path) = args.catalog.take() {
        config.catalog.path = path;
    }

    telemetry::init(&config.telemetry)?;

    let catalog = Arc::new(CatalogStore::new(config.catalog.path.clone()));
    if let Err(err) = catalog.reload() {
        warn!(
            path = %catalog.path().display(),
            error = %err,
            "starting without a benefit catalog; POST /api/v1/catalog/reload to retry"
        );
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        catalog,
    };

    let app = router(state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "benefit screener ready");

    axum::serve(listener, app).await?;
    Ok(())
}
