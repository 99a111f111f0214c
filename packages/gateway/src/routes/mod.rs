use utoipa_axum::{router::OpenApiRouter, routes};

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn api_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let health = OpenApiRouter::new().routes(routes!(handlers::health::health_check));

    let upload = OpenApiRouter::new()
        .routes(routes!(handlers::upload::upload_mod))
        .layer(handlers::upload::upload_body_limit(
            config.storage.max_upload_size,
        ));

    health.merge(upload)
}
