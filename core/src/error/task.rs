use thiserror::Error;

const BODY_PREVIEW_LIMIT: usize = 512;

/// Failures surfaced by a task adaptor.
///
/// None of these are retried inside the adaptor; the caller decides.
#[derive(Error, Debug)]
pub enum TaskError {
    /// The submission or poll arguments break an invariant of the contract.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The vendor payload could not be parsed as the expected schema.
    #[error("malformed response: {message} | body={preview}")]
    MalformedResponse { message: String, preview: String },

    /// The vendor explicitly rejected the call.
    #[error("vendor error status={status}: {code}: {message}")]
    VendorError {
        code: String,
        message: String,
        status: u16,
    },

    /// Parseable, but missing something the contract needs (e.g. task id).
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The HTTP executor itself failed; its error is kept as the source.
    #[error("transport failure: {0}")]
    TransportFailure(#[source] anyhow::Error),
}

impl TaskError {
    pub fn malformed(err: serde_json::Error, body: &[u8]) -> Self {
        TaskError::MalformedResponse {
            message: err.to_string(),
            preview: preview_body(&String::from_utf8_lossy(body)),
        }
    }

    /// Stable machine-readable code for the failure class.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::MalformedResponse { .. } => "unmarshal_response_body_failed",
            Self::VendorError { .. } => "vendor_api_error",
            Self::InvalidResponse(_) => "invalid_response",
            Self::TransportFailure(_) => "do_request_failed",
        }
    }

    /// HTTP status class reported to whoever sits above the adaptor.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidRequest(_) => 400,
            Self::VendorError { status, .. } => *status,
            Self::MalformedResponse { .. } | Self::InvalidResponse(_) => 500,
            Self::TransportFailure(_) => 502,
        }
    }
}

/// Trimmed, length-bounded view of a response body for error messages.
pub fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    let mut out = String::new();
    let mut truncated = false;
    for (idx, ch) in trimmed.chars().enumerate() {
        if idx >= BODY_PREVIEW_LIMIT {
            truncated = true;
            break;
        }
        out.push(ch);
    }

    if truncated {
        out.push_str("...");
    }

    out
}
