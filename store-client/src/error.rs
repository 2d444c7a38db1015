//! Error types for the remote store client.
//!
//! # Design
//! The store client does not interpret "no rows" as an error: an empty result
//! set is a valid answer and the caller decides what it means. Everything
//! that prevented an answer from arriving lands in one of these variants, with
//! the raw store payload kept for debugging.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Missing or blank connection settings. Raised at construction time.
    #[error("store configuration error: {0}")]
    Config(String),

    /// The request never produced an HTTP response (DNS, connect, TLS, timeout).
    #[error("store request failed: {0}")]
    Transport(String),

    /// The store answered with a non-2xx status.
    #[error("store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be deserialized into the expected rows.
    #[error("failed to decode store response: {0}")]
    Decode(String),

    /// The row payload could not be serialized to JSON.
    #[error("failed to encode store payload: {0}")]
    Encode(String),
}

impl StoreError {
    pub fn config(msg: impl Into<String>) -> Self {
        StoreError::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_surfaces_store_body() {
        let err = StoreError::Status {
            status: 401,
            body: r#"{"message":"Invalid API key"}"#.to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("401"));
        assert!(text.contains("Invalid API key"));
    }
}
