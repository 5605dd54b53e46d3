use anyhow::Context;
use axum::{Json, extract::State, response::IntoResponse};

use crate::{error::ApiError, state::AppState};

#[cfg(feature = "docs")]
use crate::data::{ExpenseRecord, TransferRecord};

#[cfg_attr(feature = "docs", utoipa::path(
    get,
    path = "/expenses",
    operation_id = "expenses",
    responses(
        (status = 200, body = Vec<ExpenseRecord>)
    )
))]
#[tracing::instrument(skip(state))]
pub async fn expenses(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let expenses = state
        .data
        .list_expenses()
        .await
        .context("error listing expenses")?;

    Ok(Json(expenses))
}

#[cfg_attr(feature = "docs", utoipa::path(
    get,
    path = "/transfers",
    operation_id = "transfers",
    responses(
        (status = 200, body = Vec<TransferRecord>)
    )
))]
#[tracing::instrument(skip(state))]
pub async fn transfers(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let transfers = state
        .data
        .list_transfers()
        .await
        .context("error listing transfers")?;

    Ok(Json(transfers))
}
