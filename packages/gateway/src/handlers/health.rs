use axum::Json;
use serde::Serialize;

/// Health probe body.
#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthStatus {
    #[schema(example = "Server is running")]
    pub status: &'static str,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    operation_id = "healthCheck",
    summary = "Liveness probe",
    description = "Returns immediately. Clients call this before uploading to \
        avoid sending an archive to a gateway that is down.",
    responses((status = 200, description = "Gateway is up", body = HealthStatus)),
)]
pub async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "Server is running",
    })
}
