use axum::{Json, extract::State, response::IntoResponse};

use crate::{error::ApiError, services, state::AppState};

#[cfg(feature = "docs")]
use crate::services::reports::Advice;

#[cfg_attr(feature = "docs", utoipa::path(
    get,
    path = "/advice",
    operation_id = "advice",
    responses(
        (status = 200, body = Advice)
    )
))]
#[tracing::instrument(skip(state))]
pub async fn advice(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let advice = services::reports::advice(&state.data).await?;

    Ok(Json(advice))
}
