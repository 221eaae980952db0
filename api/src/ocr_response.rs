use ocr_relay::OcrText;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct OcrResponse {
    pub text: OcrText,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}
