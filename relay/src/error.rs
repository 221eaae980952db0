use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    /// Llemma answered with something other than 200
    #[error("Llemma API error: {body}")]
    Upstream { status: StatusCode, body: String },

    /// The upload carried no `file` part
    #[error("no file part named `file` in the upload")]
    MissingFile,

    /// The inbound multipart body could not be read
    #[error("invalid multipart upload: {0}")]
    Multipart(String),

    /// Building, sending or reading the upstream request failed
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Llemma answered 200 with a body that is not JSON
    #[error("invalid JSON from Llemma: {0}")]
    Decode(#[from] serde_json::Error),

    /// Llemma answered 200 with JSON that is not an object
    #[error("expected a JSON object from Llemma, got {0}")]
    NotAnObject(&'static str),

    /// The extracted value is not a string, so there is nothing to parse
    #[error("OCR response carried no readable text")]
    UnreadableText,
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::MissingFile
            | RelayError::Multipart(_)
            | RelayError::Transport(_)
            | RelayError::Decode(_)
            | RelayError::NotAnObject(_)
            | RelayError::UnreadableText => StatusCode::BAD_REQUEST,
        }
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, RelayError::Upstream { .. })
    }

    /// Message returned to the caller under `detail`.
    pub fn detail(&self) -> String {
        if self.is_upstream() {
            self.to_string()
        } else {
            format!("OCR failed: {self}")
        }
    }
}
