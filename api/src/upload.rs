use axum::extract::Multipart;
use ocr_relay::{RelayError, Upload, UPLOAD_FIELD};

/// Pulls the `file` part out of a multipart body. Other parts are ignored.
pub async fn read_upload(mut multipart: Multipart) -> Result<Upload, RelayError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RelayError::Multipart(e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| RelayError::Multipart(e.body_text()))?;

        return Ok(Upload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Err(RelayError::MissingFile)
}
