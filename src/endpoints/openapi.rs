#[cfg(feature = "docs")]
pub mod openapi {
    use crate::endpoints;
    use axum::Json;
    use utoipa::OpenApi;

    #[derive(utoipa::OpenApi)]
    #[openapi(paths(
        endpoints::upload::upload,
        endpoints::reports::summary::summary,
        endpoints::reports::daily::daily_summary,
        endpoints::reports::monthly::monthly_summary,
        endpoints::reports::overbudget::check_overbudget,
        endpoints::reports::advice::advice,
        endpoints::reports::counts::transaction_counts,
        endpoints::records::expenses,
        endpoints::records::transfers
    ))]
    struct ApiDoc;

    pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
        Json(ApiDoc::openapi())
    }
}
