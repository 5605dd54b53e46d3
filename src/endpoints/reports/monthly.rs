use axum::{Json, extract::State, response::IntoResponse};

use crate::{error::ApiError, services, state::AppState};

#[cfg(feature = "docs")]
use crate::services::reports::MonthlySummary;

#[cfg_attr(feature = "docs", utoipa::path(
    get,
    path = "/monthly_summary",
    operation_id = "monthly_summary",
    responses(
        (status = 200, body = MonthlySummary)
    )
))]
#[tracing::instrument(skip(state))]
pub async fn monthly_summary(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let monthly = services::reports::monthly(&state.data).await?;

    Ok(Json(monthly))
}
