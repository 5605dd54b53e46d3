use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    response::IntoResponse,
};
use http::StatusCode;
use serde::Serialize;

use crate::{error::ApiError, services, state::AppState};

pub const UPLOAD_SUCCESS: &str = "Файл успешно загружен и обработан.";
pub const NO_FILE: &str = "Файл не передан.";
pub const UNREADABLE_FILE: &str = "Не удалось прочитать файл.";
pub const FILE_TOO_LARGE: &str = "Файл слишком большой.";

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
pub struct UploadOutput {
    pub message: String,
    pub rows_added: usize,
    pub expenses_added: usize,
    pub transfers_added: usize,
    pub rows_skipped: usize,
}

#[cfg_attr(feature = "docs", utoipa::path(
    post,
    path = "/upload",
    operation_id = "upload",
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 200, body = UploadOutput)
    )
))]
#[tracing::instrument(skip(state, multipart))]
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let mut multipart = multipart.map_err(|err| {
        tracing::warn!("upload is not a multipart form: {}", err);
        ApiError::BadRequest(NO_FILE.to_owned())
    })?;

    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(unreadable)? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_owned();
        let contents = field.bytes().await.map_err(unreadable)?;

        file = Some((file_name, contents.to_vec()));
    }

    let (file_name, contents) = file.ok_or_else(|| ApiError::BadRequest(NO_FILE.to_owned()))?;

    tracing::info!(%file_name, bytes = contents.len(), "importing statement");

    let report =
        services::import::import_statement(&state.data, &state.rules, file_name, contents).await?;

    Ok(Json(UploadOutput {
        message: UPLOAD_SUCCESS.to_owned(),
        rows_added: report.rows_added,
        expenses_added: report.expenses_added,
        transfers_added: report.transfers_added,
        rows_skipped: report.rows_skipped,
    }))
}

fn unreadable(err: MultipartError) -> ApiError {
    tracing::warn!(status = %err.status(), "error reading upload: {}", err);

    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::PayloadTooLarge(FILE_TOO_LARGE.to_owned());
    }

    ApiError::BadRequest(UNREADABLE_FILE.to_owned())
}
