use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::{with_portal_routes, PortalServices};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use wellness_portal::care::memory::{
    MemoryAdvisoryRepository, MemoryPatientRepository, MemoryProviderRepository,
    MemoryReminderRepository, MemoryRuleRepository, MemoryWellnessRepository,
};
use wellness_portal::care::preventive::{EngineConfig, PreventiveCareService, RuleCatalog};
use wellness_portal::care::provider::{AdvisoryService, ProviderService};
use wellness_portal::care::reminder::ReminderService;
use wellness_portal::care::wellness::WellnessService;
use wellness_portal::config::AppConfig;
use wellness_portal::error::AppError;
use wellness_portal::telemetry;

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

    let patients = Arc::new(MemoryPatientRepository::new());
    let preventive_service = PreventiveCareService::new(
        patients.clone(),
        Arc::new(MemoryRuleRepository::new()),
        EngineConfig::from(&config.care),
    );
    preventive_service.seed_catalog(&RuleCatalog::standard())?;
    let wellness_service = Arc::new(WellnessService::new(
        Arc::new(MemoryWellnessRepository::new()),
        patients.clone(),
        config.care.default_range,
    ));
    let directory = Arc::new(MemoryProviderRepository::new());
    let provider_service =
        ProviderService::new(directory.clone(), patients.clone(), wellness_service.clone());
    let advisory_service = AdvisoryService::new(
        Arc::new(MemoryAdvisoryRepository::new()),
        directory,
        patients.clone(),
    );
    let reminder_service =
        ReminderService::new(Arc::new(MemoryReminderRepository::new()), patients);

    let app = with_portal_routes(PortalServices {
        preventive: Arc::new(preventive_service),
        wellness: wellness_service,
        providers: Arc::new(provider_service),
        advisories: Arc::new(advisory_service),
        reminders: Arc::new(reminder_service),
    })
    .layer(Extension(app_state))
    .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        strict_rules = config.care.strict_rules,
        default_range = config.care.default_range.label(),
        "wellness portal ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
