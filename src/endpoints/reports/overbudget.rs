use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::{error::ApiError, services, state::AppState};

#[cfg(feature = "docs")]
use crate::services::reports::BudgetCheck;

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "docs", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "docs", into_params(parameter_in = Query))]
pub struct Input {
    pub limit: f64,
}

#[cfg_attr(feature = "docs", utoipa::path(
    get,
    path = "/check_overbudget",
    operation_id = "check_overbudget",
    params(
        Input
    ),
    responses(
        (status = 200, body = BudgetCheck)
    )
))]
#[tracing::instrument(skip(state))]
pub async fn check_overbudget(
    State(state): State<AppState>,
    input: Result<Query<Input>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(input) = input.map_err(|err| ApiError::BadRequest(err.body_text()))?;

    if !input.limit.is_finite() {
        return Err(ApiError::BadRequest("limit must be a number".to_owned()));
    }

    let check = services::reports::check_budget(&state.data, input.limit).await?;

    Ok(Json(check))
}
