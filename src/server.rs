// JSON HTTP surface.
//
// `GET` only. Data endpoints return raw datasets (fixtures or generated
// series); insight endpoints return the same summaries the CLI reports
// export.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{Local, NaiveDate};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::errors::Result;
use crate::loader::load_file;
use crate::mock::{self, MockGenerator};
use crate::reports::{self, Datasets, Domain};
use crate::types::{GpsRecord, PhysicalRecord, PlayerRecord, PriorityArea, RecoveryRecord};

/// Shared, read-only request state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    /// Pinned calendar day; `None` follows the local clock.
    pub today: Option<NaiveDate>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            today: None,
        }
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    fn generator(&self) -> MockGenerator {
        MockGenerator::with_seed(self.today(), self.config.mock_seed)
    }
}

type SharedState = Arc<AppState>;

pub fn router(state: AppState) -> Router {
    let data = Router::new()
        .route("/mock-priority", get(mock_priority))
        .route("/mock-physical", get(mock_physical))
        .route("/physical-capability-data", get(physical_capability))
        .route("/simple-gps", get(simple_gps))
        .route("/mock-recovery", get(mock_recovery))
        .route("/recovery-data", get(recovery_data))
        .route("/gps-data", get(gps_data))
        .route("/player-data", get(player_data));

    Router::new()
        .route("/health", get(health))
        .nest("/api/data", data)
        .route("/api/insights/:domain", get(insights))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

async fn mock_priority() -> Json<&'static [PriorityArea]> {
    Json(mock::priority_areas())
}

async fn mock_physical(State(state): State<SharedState>) -> Json<Vec<PhysicalRecord>> {
    Json(state.generator().physical())
}

async fn physical_capability() -> Json<&'static [PhysicalRecord]> {
    Json(mock::physical_sample())
}

async fn simple_gps(State(state): State<SharedState>) -> Json<Vec<GpsRecord>> {
    Json(state.generator().simple_gps())
}

async fn mock_recovery(State(state): State<SharedState>) -> Json<Vec<RecoveryRecord>> {
    Json(state.generator().recovery())
}

async fn recovery_data() -> Json<&'static [RecoveryRecord]> {
    Json(mock::recovery_sample())
}

async fn player_data() -> Json<&'static [PlayerRecord]> {
    Json(mock::players())
}

async fn gps_data(State(state): State<SharedState>) -> Result<Json<Vec<GpsRecord>>> {
    let path = state.config.gps_csv_path();
    let (records, report) = load_file::<GpsRecord>(&path)?;
    if report.zeroed_fields > 0 || report.undated_rows > 0 {
        warn!(
            zeroed = report.zeroed_fields,
            undated = report.undated_rows,
            "gps data degraded during load"
        );
    }
    Ok(Json(records))
}

async fn insights(State(state): State<SharedState>, Path(domain): Path<Domain>) -> Json<Value> {
    let data = Datasets::mock(state.today(), state.config.mock_seed);
    Json(reports::build(domain, &data).summary)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn serve(config: AppConfig) -> Result<()> {
    let addr = config.resolve_addr().await?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, data_dir = %config.data_dir.display(), "listening");
    axum::serve(listener, router(AppState::new(config)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
