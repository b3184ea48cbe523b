use crate::domain::model::ErrorBody;
use crate::utils::error::FleetError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

impl IntoResponse for FleetError {
    fn into_response(self) -> Response {
        // 非預期錯誤只記錄在日誌，不回傳細節
        let (status, message) = if self.is_client_error() {
            let status =
                StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::BAD_REQUEST);
            (status, self.to_string())
        } else {
            tracing::error!(
                "Unexpected error: {} (category: {:?})",
                self,
                self.category()
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        };

        let body = ErrorBody {
            message,
            status_code: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}
