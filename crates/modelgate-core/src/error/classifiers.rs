//! Error classification for the retry boundary

use super::types::GateError;

impl GateError {
    /// Check if an error should trigger key rotation and another attempt.
    ///
    /// Only per-call backend failures qualify. Construction errors never reach
    /// the retry loop, and `StreamInterrupted` cannot be replayed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Backend { .. } | Self::InvalidResponse { .. })
    }

    /// Check if an error belongs to the fatal construction-time group
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigMissing { .. }
                | Self::ConfigMalformed { .. }
                | Self::ConfigIncomplete { .. }
                | Self::ModelNotConfigured { .. }
                | Self::UnsupportedPlatform { .. }
        )
    }

    /// HTTP status carried by a backend error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Backend { status, .. } => *status,
            _ => None,
        }
    }
}
