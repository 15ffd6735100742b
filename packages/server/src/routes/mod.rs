use axum::extract::DefaultBodyLimit;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn api_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let upload = OpenApiRouter::new()
        .routes(routes!(handlers::photo::upload_photos))
        .layer(DefaultBodyLimit::max(config.server.max_body_size));

    OpenApiRouter::new()
        .routes(routes!(handlers::health::healthcheck))
        .routes(routes!(
            handlers::photo::list_photos,
            handlers::photo::delete_photos
        ))
        .routes(routes!(handlers::photo::download_photo))
        .routes(routes!(handlers::share::create_share))
        .routes(routes!(handlers::share::get_share))
        .routes(routes!(handlers::share::download_shared_photo))
        .routes(routes!(handlers::share::download_selection))
        .merge(upload)
}
