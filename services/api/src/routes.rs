use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use wellness_portal::care::preventive::{care_router, PreventiveCareService, RuleRepository};
use wellness_portal::care::provider::{
    provider_router, AdvisoryRepository, AdvisoryService, ProviderRepository, ProviderService,
};
use wellness_portal::care::reminder::{reminder_router, ReminderRepository, ReminderService};
use wellness_portal::care::wellness::{wellness_router, WellnessEntryRepository, WellnessService};
use wellness_portal::care::PatientRepository;

/// Services behind the portal's workflow routers, sharing one patient registry.
pub(crate) struct PortalServices<P, R, W, D, A, M> {
    pub(crate) preventive: Arc<PreventiveCareService<P, R>>,
    pub(crate) wellness: Arc<WellnessService<W, P>>,
    pub(crate) providers: Arc<ProviderService<D, W, P>>,
    pub(crate) advisories: Arc<AdvisoryService<A, D, P>>,
    pub(crate) reminders: Arc<ReminderService<M, P>>,
}

/// Merge the workflow routers with the operational endpoints.
pub(crate) fn with_portal_routes<P, R, W, D, A, M>(
    services: PortalServices<P, R, W, D, A, M>,
) -> axum::Router
where
    P: PatientRepository + 'static,
    R: RuleRepository + 'static,
    W: WellnessEntryRepository + 'static,
    D: ProviderRepository + 'static,
    A: AdvisoryRepository + 'static,
    M: ReminderRepository + 'static,
{
    care_router(services.preventive)
        .merge(wellness_router(services.wellness))
        .merge(provider_router(services.providers, services.advisories))
        .merge(reminder_router(services.reminders))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
