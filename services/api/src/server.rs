use crate::cli::ServeArgs;
use crate::infra::{AppState, CaseFile, InMemoryDisputeRepository};
use crate::routes::with_dispute_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chargeback_ai::config::AppConfig;
use chargeback_ai::error::AppError;
use chargeback_ai::telemetry;
use chargeback_ai::workflows::disputes::DisputeAnalysisService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let case_file = match args.seed_file.take() {
        Some(path) => {
            let file = CaseFile::load(&path)?;
            info!(path = %path.display(), cases = file.cases.len(), "seeded dispute repository");
            file
        }
        None => CaseFile::default(),
    };
    let repository = Arc::new(InMemoryDisputeRepository::from_case_file(case_file));
    let engine = config.assessment.engine()?;
    let dispute_service = Arc::new(DisputeAnalysisService::with_engine(repository, engine));

    let app = with_dispute_routes(dispute_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        seeded = config.assessment.confidence_seed.is_some(),
        "chargeback decision engine ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
