use super::AppState;
use crate::domain::model::{
    AdjustedCbRoute, ApplyResult, BankingResult, ComplianceBalance, PoolResult,
};
use crate::utils::error::{FleetError, Result};
use crate::utils::validation::{parse_year, validate_year};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub year: Option<String>,
}

type YearParams = std::result::Result<Query<YearQuery>, QueryRejection>;

impl AppState {
    /// 查詢字串解析失敗（例如重複的 year）同樣回 400
    fn year(&self, params: YearParams) -> Result<i32> {
        let Query(query) = params.map_err(|rejection| {
            FleetError::validation(format!("Invalid query string: {}", rejection.body_text()))
        })?;
        parse_year(query.year.as_deref(), self.year_min, self.year_max)
    }
}

/// GET /compliance/cb?year=YYYY
pub async fn get_compliance_balance(
    State(state): State<AppState>,
    params: YearParams,
) -> Result<Json<ComplianceBalance>> {
    let year = state.year(params)?;
    let balance = state.compliance.lock().await.get_compliance_balance(year)?;
    Ok(Json(balance))
}

/// POST /banking/bank?year=YYYY
pub async fn bank_surplus(
    State(state): State<AppState>,
    params: YearParams,
) -> Result<Json<BankingResult>> {
    let year = state.year(params)?;
    let result = state.compliance.lock().await.bank_surplus(year)?;
    Ok(Json(result))
}

/// POST /banking/apply?year=YYYY
pub async fn apply_banked_surplus(
    State(state): State<AppState>,
    params: YearParams,
) -> Result<Json<ApplyResult>> {
    let year = state.year(params)?;
    let result = state.compliance.lock().await.apply_banked_surplus(year)?;
    Ok(Json(result))
}

/// GET /compliance/adjusted-cb?year=YYYY
pub async fn get_adjusted_cbs(
    State(state): State<AppState>,
    params: YearParams,
) -> Result<Json<Vec<AdjustedCbRoute>>> {
    let year = state.year(params)?;
    let routes = state.compliance.lock().await.get_adjusted_cbs(year)?;
    Ok(Json(routes))
}

/// POST /pools  body: { routeIds: string[], year: number }
pub async fn create_pool(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<PoolResult>> {
    let Json(body) = payload.map_err(|rejection| {
        FleetError::validation(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    let (route_ids, year) = parse_pool_body(&body, state.year_min, state.year_max)?;
    let result = state.compliance.lock().await.create_pool(&route_ids, year)?;
    Ok(Json(result))
}

/// 檢查 body 形狀：routeIds 必須是字串陣列，year 必須是整數
fn parse_pool_body(body: &Value, year_min: i32, year_max: i32) -> Result<(Vec<String>, i32)> {
    let route_ids = body
        .get("routeIds")
        .and_then(Value::as_array)
        .ok_or_else(|| FleetError::validation("routeIds must be an array"))?
        .iter()
        .map(|id| {
            id.as_str()
                .map(str::to_string)
                .ok_or_else(|| FleetError::validation("routeIds must contain only strings"))
        })
        .collect::<Result<Vec<String>>>()?;

    let year = body
        .get("year")
        .and_then(Value::as_i64)
        .ok_or_else(|| FleetError::validation("year must be a number"))?;

    let year = validate_year(year, year_min, year_max).map_err(|_| {
        FleetError::validation(format!(
            "year must be between {} and {}",
            year_min, year_max
        ))
    })?;

    Ok((route_ids, year))
}
