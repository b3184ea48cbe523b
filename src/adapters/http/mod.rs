pub mod compliance;
pub mod error;
pub mod routes;

use crate::config::{ComplianceConfig, ServerConfig};
use crate::core::compliance_service::ComplianceService;
use crate::core::route_service::RouteService;
use crate::domain::model::ErrorBody;
use crate::domain::ports::RouteRepository;
use axum::http::{header, StatusCode};
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub type SharedRepository = Arc<dyn RouteRepository>;

/// 伺服器共享狀態
///
/// 兩個服務各自持有可變狀態（基準航線、存入盈餘），由鎖保證每次修改都是完整的操作。
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RwLock<RouteService<dyn RouteRepository>>>,
    pub compliance: Arc<Mutex<ComplianceService<dyn RouteRepository>>>,
    pub year_min: i32,
    pub year_max: i32,
}

impl AppState {
    pub fn new(repository: SharedRepository, settings: &ComplianceConfig) -> Self {
        Self {
            routes: Arc::new(RwLock::new(RouteService::new(repository.clone()))),
            compliance: Arc::new(Mutex::new(ComplianceService::with_target(
                repository,
                settings.target_ghg,
            ))),
            year_min: settings.year_min,
            year_max: settings.year_max,
        }
    }
}

pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/routes", get(routes::list_routes))
        .route("/routes/comparison", get(routes::get_comparison))
        .route("/routes/:route_id/baseline", post(routes::set_baseline))
        .route("/compliance/cb", get(compliance::get_compliance_balance))
        .route("/compliance/adjusted-cb", get(compliance::get_adjusted_cbs))
        .route("/banking/bank", post(compliance::bank_surplus))
        .route("/banking/apply", post(compliance::apply_banked_surplus))
        .route("/pools", post(compliance::create_pool))
}

pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    let prefix = server.api_prefix.trim_end_matches('/');
    let router = if prefix.is_empty() {
        Router::new().merge(api_router())
    } else {
        Router::new().nest(prefix, api_router())
    };

    let router = router
        .route("/health", get(health))
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::map_response(json_method_not_allowed))
        .layer(TraceLayer::new_for_http());

    if server.cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
    service: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().to_rfc3339(),
        service: "marine-fleet",
    })
}

async fn not_found() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            message: "Endpoint not found".to_string(),
            status_code: 404,
        }),
    )
}

/// 路徑存在但方法不符時，axum 回傳空 body 的 405；改成統一的 JSON 錯誤格式並保留 Allow
async fn json_method_not_allowed(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let allow = response.headers().get(header::ALLOW).cloned();
    let mut json = (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody {
            message: "Method not allowed".to_string(),
            status_code: 405,
        }),
    )
        .into_response();
    if let Some(allow) = allow {
        json.headers_mut().insert(header::ALLOW, allow);
    }
    json
}
