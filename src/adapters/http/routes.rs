use super::AppState;
use crate::domain::model::{ComparisonData, MessageResponse, Route};
use crate::utils::error::Result;
use axum::extract::{Path, State};
use axum::Json;

/// GET /routes
pub async fn list_routes(State(state): State<AppState>) -> Result<Json<Vec<Route>>> {
    let routes = state.routes.read().await.find_all_routes()?;
    Ok(Json(routes))
}

/// POST /routes/:routeId/baseline
pub async fn set_baseline(
    State(state): State<AppState>,
    Path(route_id): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.routes.write().await.set_baseline(&route_id)?;
    Ok(Json(MessageResponse {
        message: format!("Baseline set for {}", route_id),
    }))
}

/// GET /routes/comparison
pub async fn get_comparison(State(state): State<AppState>) -> Result<Json<ComparisonData>> {
    let data = state.routes.read().await.get_comparison_data()?;
    Ok(Json(data))
}
