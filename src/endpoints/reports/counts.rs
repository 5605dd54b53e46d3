use axum::{Json, extract::State, response::IntoResponse};

use crate::{error::ApiError, services, state::AppState};

#[cfg(feature = "docs")]
use crate::services::reports::TransactionCounts;

#[cfg_attr(feature = "docs", utoipa::path(
    get,
    path = "/transaction_counts",
    operation_id = "transaction_counts",
    responses(
        (status = 200, body = TransactionCounts)
    )
))]
#[tracing::instrument(skip(state))]
pub async fn transaction_counts(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let counts = services::reports::transaction_counts(&state.data).await?;

    Ok(Json(counts))
}
