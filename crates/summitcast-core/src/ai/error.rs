use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Unauthorized - API key missing or invalid")]
    Unauthorized,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Completion service not configured: {0}")]
    NotConfigured(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl CompletionError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => CompletionError::Unauthorized,
            403 => CompletionError::AccessDenied(truncated),
            429 => CompletionError::RateLimited,
            500..=599 => CompletionError::ServerError(truncated),
            _ => CompletionError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }
}
