use thiserror::Error;

/// Failure of a remote zone fetch or create.
///
/// Cloneable so a single failure can be emitted on a result stream; the
/// underlying `reqwest` error is therefore flattened into a message rather
/// than wrapped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("server error ({code}): {message}")]
    Server { code: u16, message: String },

    #[error("invalid response: {0}")]
    Parse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl FetchError {
    /// Truncate a response body to avoid logging excessive data.
    /// The cut is clamped to a char boundary; error bodies from this API
    /// are usually Korean, so a fixed byte offset can land mid-character.
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..end],
                body.len()
            )
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        FetchError::Server {
            code: status.as_u16(),
            message: Self::truncate_body(body),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Parse(err.to_string())
        } else {
            // Timeouts, connection failures and request build errors all
            // count as connectivity problems at this layer.
            FetchError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_truncates_multibyte_bodies_on_char_boundary() {
        // 3 bytes per char; byte 500 falls inside a character.
        let body = "한".repeat(200);
        assert!(body.len() > MAX_ERROR_BODY_LENGTH);

        let err = FetchError::from_status(reqwest::StatusCode::BAD_GATEWAY, &body);
        match err {
            FetchError::Server { code, message } => {
                assert_eq!(code, 502);
                assert!(message.contains("truncated"));
                assert!(message.starts_with('한'));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_status_truncates_long_bodies() {
        let body = "x".repeat(MAX_ERROR_BODY_LENGTH + 100);
        let err = FetchError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, &body);
        match err {
            FetchError::Server { code, message } => {
                assert_eq!(code, 500);
                assert!(message.contains("truncated"));
                assert!(message.len() < body.len());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
