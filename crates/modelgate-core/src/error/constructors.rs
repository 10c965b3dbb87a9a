//! Constructor methods for GateError

use super::types::GateError;

impl GateError {
    /// Create a missing-config error
    pub fn config_missing(path: impl Into<String>) -> Self {
        Self::ConfigMissing { path: path.into() }
    }

    /// Create a malformed-config error
    pub fn config_malformed(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigMalformed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an incomplete-config error
    pub fn config_incomplete(platform: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigIncomplete {
            platform: platform.into(),
            message: message.into(),
        }
    }

    /// Create a model-not-configured error listing the known models
    pub fn model_not_configured(
        model: impl Into<String>,
        platform: impl Into<String>,
        available: Vec<String>,
    ) -> Self {
        Self::ModelNotConfigured {
            model: model.into(),
            platform: platform.into(),
            available,
        }
    }

    /// Create a backend error with an HTTP status
    pub fn backend(platform: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::Backend {
            platform: platform.into(),
            status: Some(status),
            body: body.into(),
        }
    }

    /// Create a backend error for a failure below the HTTP layer
    pub fn transport(platform: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Backend {
            platform: platform.into(),
            status: None,
            body: body.into(),
        }
    }

    /// Create an invalid-response error
    pub fn invalid_response(platform: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            platform: platform.into(),
            message: message.into(),
        }
    }

    /// Create a mid-stream interruption error
    pub fn stream_interrupted(platform: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StreamInterrupted {
            platform: platform.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported-operation error
    pub fn unsupported(platform: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::Unsupported {
            platform: platform.into(),
            operation: operation.into(),
        }
    }

    /// Create an invalid-request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create an IO error with path
    pub fn io_with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl From<std::io::Error> for GateError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            path: None,
        }
    }
}
