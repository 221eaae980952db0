use crate::api_error::ApiError;
use crate::milk_log_params::MilkLogParams;
use crate::ocr_response::{HealthResponse, OcrResponse};
use crate::routes::AppState;
use crate::upload::read_upload;
use axum::{
    extract::{
        multipart::MultipartRejection, rejection::QueryRejection, Multipart, Query, State,
    },
    Json,
};
use ocr_relay::{milk_log, MilkLog, RelayError};

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn ocr_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<OcrResponse>, ApiError> {
    let upload = read_upload(multipart?).await?;
    let text = state.llemma.recognize(upload).await?;

    Ok(Json(OcrResponse { text }))
}

pub async fn parse_milk_log(
    State(state): State<AppState>,
    params: Result<Query<MilkLogParams>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MilkLog>, ApiError> {
    let Query(params) = params?;
    let upload = read_upload(multipart?).await?;
    let text = state.llemma.recognize(upload).await?;

    let raw = text.as_str().ok_or(RelayError::UnreadableText)?;
    let sheet = milk_log::parse(raw, params.cow_rate, params.milk_type);
    log::info!(
        "Parsed milk log for {} with {} entries",
        sheet.collector_id,
        sheet.entries.len()
    );

    Ok(Json(sheet))
}
