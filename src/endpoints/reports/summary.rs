use axum::{Json, extract::State, response::IntoResponse};

use crate::{error::ApiError, services, state::AppState};

#[cfg(feature = "docs")]
use crate::services::reports::Summary;

#[cfg_attr(feature = "docs", utoipa::path(
    get,
    path = "/summary",
    operation_id = "summary",
    responses(
        (status = 200, body = Summary)
    )
))]
#[tracing::instrument(skip(state))]
pub async fn summary(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let summary = services::reports::summary(&state.data).await?;

    Ok(Json(summary))
}
