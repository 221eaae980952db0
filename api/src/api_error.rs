use crate::ocr_response::ErrorResponse;
use axum::{
    extract::{multipart::MultipartRejection, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ocr_relay::RelayError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Relay(#[from] RelayError),

    /// Query string could not be read
    #[error("{0}")]
    InvalidQuery(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Relay(err) => err.status_code(),
            ApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            ApiError::Relay(err) => err.detail(),
            ApiError::InvalidQuery(message) => format!("OCR failed: {message}"),
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::Relay(RelayError::Multipart(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidQuery(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Relay(RelayError::Upstream { status, .. }) => {
                log::warn!("Upstream OCR failure ({}): {}", status, self);
            }
            _ => {
                log::debug!("Rejected OCR request: {}", self);
            }
        }

        let body = ErrorResponse {
            detail: self.detail(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_relay_errors_to_their_status() {
        let upstream = ApiError::from(RelayError::Upstream {
            status: StatusCode::BAD_GATEWAY,
            body: "bad gateway".to_string(),
        });
        assert_eq!(upstream.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(upstream.detail(), "Llemma API error: bad gateway");

        let missing = ApiError::from(RelayError::MissingFile);
        assert_eq!(missing.status_code(), StatusCode::BAD_REQUEST);
        assert!(missing.detail().starts_with("OCR failed: "));
    }

    #[tokio::test]
    async fn multipart_rejection_is_a_bad_request() {
        use axum::{body::Body, extract::FromRequest, extract::Multipart, http::Request};

        let request = Request::builder().body(Body::empty()).unwrap();
        let rejection = Multipart::from_request(request, &()).await.unwrap_err();

        let err = ApiError::from(rejection);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.detail().starts_with("OCR failed: invalid multipart upload"));
    }

    #[test]
    fn invalid_query_is_a_bad_request() {
        let err = ApiError::InvalidQuery("unknown variant `goat`".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
