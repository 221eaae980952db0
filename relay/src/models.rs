use crate::error::RelayError;
use serde::Serialize;
use serde_json::Value;

/// Multipart field the upload travels under, inbound and upstream.
pub const UPLOAD_FIELD: &str = "file";

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// One uploaded file, read fully into memory.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            file_name: None,
            content_type: None,
            bytes,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Declared content type, or `application/octet-stream` when the client sent none.
    pub fn mime(&self) -> &str {
        self.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE)
    }
}

/// Text extracted from a Llemma response.
///
/// The provider is loosely typed: it may answer with a `text` field, a
/// `result` field, or something else entirely. Lookup order is `text`, then
/// `result`, then the whole body. Only JSON objects are accepted. Serializes
/// to the bare inner value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OcrText {
    Text(Value),
    Result(Value),
    Raw(Value),
}

impl OcrText {
    pub fn extract(body: Value) -> Result<Self, RelayError> {
        if !body.is_object() {
            return Err(RelayError::NotAnObject(json_kind(&body)));
        }
        if let Some(text) = non_empty_field(&body, "text") {
            return Ok(OcrText::Text(text));
        }
        if let Some(result) = non_empty_field(&body, "result") {
            return Ok(OcrText::Result(result));
        }
        Ok(OcrText::Raw(body))
    }

    /// Which part of the response the text came from.
    pub fn source(&self) -> &'static str {
        match self {
            OcrText::Text(_) => "text",
            OcrText::Result(_) => "result",
            OcrText::Raw(_) => "raw",
        }
    }

    pub fn as_value(&self) -> &Value {
        match self {
            OcrText::Text(value) | OcrText::Result(value) | OcrText::Raw(value) => value,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_value().as_str()
    }

    pub fn into_value(self) -> Value {
        match self {
            OcrText::Text(value) | OcrText::Result(value) | OcrText::Raw(value) => value,
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn non_empty_field(body: &Value, field: &str) -> Option<Value> {
    body.get(field).filter(|value| is_truthy(value)).cloned()
}

// Null, false, zero and empty containers count as absent.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
