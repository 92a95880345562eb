use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryNetRecordRepository, InMemoryScoreSheetRepository,
    InMemorySolvedEntryRepository, InMemoryTopicBoardRepository,
};
use crate::routes::{with_api_routes, ApiServices};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use yks_score::config::AppConfig;
use yks_score::error::AppError;
use yks_score::scoring::ScoreService;
use yks_score::telemetry;
use yks_score::tracking::{
    NetTrackingService, SolvedProblemService, TopicCatalog, TopicProgressService,
};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let profile = Arc::new(config.scoring.load_profile()?);
    match &config.scoring.profile_path {
        Some(path) => info!(path = %path.display(), "scoring profile loaded"),
        None => info!("using seeded scoring profile"),
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = Arc::new(TopicCatalog::standard().clone());
    let services = ApiServices {
        scores: Arc::new(ScoreService::new(
            Arc::new(InMemoryScoreSheetRepository::default()),
            profile,
        )),
        nets: Arc::new(NetTrackingService::new(Arc::new(
            InMemoryNetRecordRepository::default(),
        ))),
        topics: Arc::new(TopicProgressService::new(
            Arc::new(InMemoryTopicBoardRepository::default()),
            catalog.clone(),
        )),
        solved: Arc::new(SolvedProblemService::new(
            Arc::new(InMemorySolvedEntryRepository::default()),
            catalog,
        )),
    };

    let app = with_api_routes(services)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "yks score service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
