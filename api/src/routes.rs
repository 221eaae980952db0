use crate::handlers::{health, ocr_image, parse_milk_log};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use ocr_relay::LlemmaService;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub llemma: Arc<LlemmaService>,
}

pub fn app(state: AppState, max_upload_bytes: usize) -> Router {
    // Any origin, method and header, with credentials. Mirroring is the
    // only form browsers accept alongside credentials.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Router::new()
        .route("/health", get(health))
        .route("/ocr", post(ocr_image))
        .route("/ocr/milk-log", post(parse_milk_log))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .with_state(state)
}
