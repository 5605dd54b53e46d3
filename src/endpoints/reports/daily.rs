use axum::{Json, extract::State, response::IntoResponse};

use crate::{error::ApiError, services, state::AppState};

#[cfg(feature = "docs")]
use crate::services::reports::DailySummary;

#[cfg_attr(feature = "docs", utoipa::path(
    get,
    path = "/daily_summary",
    operation_id = "daily_summary",
    responses(
        (status = 200, body = DailySummary)
    )
))]
#[tracing::instrument(skip(state))]
pub async fn daily_summary(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let daily = services::reports::daily(&state.data).await?;

    Ok(Json(daily))
}
