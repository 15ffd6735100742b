use axum::Json;
use serde::Serialize;

/// Response DTO for the health check.
#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: &'static str,
}

#[utoipa::path(
    get,
    path = "/healthz",
    tag = "Health",
    operation_id = "healthcheck",
    summary = "Service health check",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
)]
pub async fn healthcheck() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
