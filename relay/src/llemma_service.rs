use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::models::*;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};

pub struct LlemmaService {
    client: Client,
    api_url: String,
    api_key: SecretString,
}

impl LlemmaService {
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Sends one upload to Llemma and returns the text it found.
    pub async fn recognize(&self, upload: Upload) -> Result<OcrText, RelayError> {
        log::info!(
            "Relaying {} ({} bytes, {}) to Llemma",
            upload.file_name.as_deref().unwrap_or("<unnamed>"),
            upload.bytes.len(),
            upload.mime()
        );

        let form = Form::new().part(UPLOAD_FIELD, Self::build_part(upload)?);

        let response = self.client
            .post(&self.api_url)
            .bearer_auth(self.api_key.expose_secret())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await?;
            log::warn!("Llemma answered {}: {}", status, body);
            return Err(RelayError::Upstream { status, body });
        }

        let body = response.bytes().await?;
        let text = OcrText::extract(serde_json::from_slice(&body)?)?;

        log::debug!("Llemma text taken from {}", text.source());
        Ok(text)
    }

    fn build_part(upload: Upload) -> Result<Part, RelayError> {
        let mime = upload.mime().to_string();
        let mut part = Part::bytes(upload.bytes).mime_str(&mime)?;
        if let Some(file_name) = upload.file_name {
            part = part.file_name(file_name);
        }
        Ok(part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn service_for(server: &MockServer) -> LlemmaService {
        let config = RelayConfig::new(format!("{}/v1/ocr", server.uri()), "test-key");
        LlemmaService::new(&config).unwrap()
    }

    fn receipt() -> Upload {
        Upload::new(b"fake png bytes".to_vec())
            .with_file_name("receipt.png")
            .with_content_type("image/png")
    }

    #[tokio::test]
    async fn sends_file_part_with_bearer_credential() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/ocr"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_string_contains(r#"name="file"; filename="receipt.png""#))
            .and(body_string_contains("Content-Type: image/png"))
            .and(body_string_contains("fake png bytes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "ABC"})))
            .expect(1)
            .mount(&server)
            .await;

        let text = service_for(&server).await.recognize(receipt()).await.unwrap();
        assert_eq!(text, OcrText::Text(json!("ABC")));
    }

    #[tokio::test]
    async fn missing_content_type_is_sent_as_octet_stream() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("Content-Type: application/octet-stream"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "XYZ"})))
            .expect(1)
            .mount(&server)
            .await;

        let upload = Upload::new(b"unlabelled".to_vec()).with_file_name("scan");
        let text = service_for(&server).await.recognize(upload).await.unwrap();
        assert_eq!(text.as_str(), Some("XYZ"));
    }

    #[tokio::test]
    async fn non_ok_status_is_an_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
            .mount(&server)
            .await;

        let err = service_for(&server).await.recognize(receipt()).await.unwrap_err();
        match err {
            RelayError::Upstream { status, ref body } => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(body, "Service Unavailable");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn other_success_codes_are_not_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({"text": "queued"})))
            .mount(&server)
            .await;

        let err = service_for(&server).await.recognize(receipt()).await.unwrap_err();
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn non_json_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = service_for(&server).await.recognize(receipt()).await.unwrap_err();
        assert!(matches!(err, RelayError::Decode(_)));
    }

    #[tokio::test]
    async fn non_object_json_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["line one"])))
            .mount(&server)
            .await;

        let err = service_for(&server).await.recognize(receipt()).await.unwrap_err();
        assert!(matches!(err, RelayError::NotAnObject("an array")));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn slow_upstream_times_out_as_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"text": "late"}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let mut config = RelayConfig::new(format!("{}/v1/ocr", server.uri()), "test-key");
        config.timeout = Some(Duration::from_secs(1));
        let service = LlemmaService::new(&config).unwrap();

        let err = service.recognize(receipt()).await.unwrap_err();
        match err {
            RelayError::Transport(ref inner) => assert!(inner.is_timeout()),
            other => panic!("expected transport error, got {other:?}"),
        }
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unreachable_upstream_is_a_transport_error() {
        let config = RelayConfig::new("http://127.0.0.1:1/v1/ocr", "test-key");
        let service = LlemmaService::new(&config).unwrap();

        let err = service.recognize(receipt()).await.unwrap_err();
        assert!(matches!(err, RelayError::Transport(_)));
    }
}
