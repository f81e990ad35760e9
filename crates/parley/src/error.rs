//! Error type for model calls.

/// Result alias for operations that talk to the model server.
pub type Result<T> = std::result::Result<T, ModelError>;

/// A model call failed.
///
/// Connectivity problems and model-side errors are both reported through
/// this one type; the interactive loop prints it and moves on.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("request to {url} failed: {source}. Make sure Ollama is running.")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("model server HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body was not valid chat-completion JSON.
    #[error("failed to parse model response: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_mentions_status_and_message() {
        let err = ModelError::Api {
            status: 404,
            message: "model 'nope' not found".into(),
        };
        let text = err.to_string();
        assert!(text.contains("HTTP 404"));
        assert!(text.contains("model 'nope' not found"));
    }

    #[test]
    fn parse_error_converts_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ModelError = serde_err.into();
        assert!(matches!(err, ModelError::Parse(_)));
        assert!(err.to_string().starts_with("failed to parse model response"));
    }
}
