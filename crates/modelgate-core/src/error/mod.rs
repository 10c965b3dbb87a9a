//! Error types for modelgate
//!
//! Errors fall into two groups. Construction errors (`ConfigMissing`,
//! `ConfigMalformed`, `ConfigIncomplete`, `ModelNotConfigured`,
//! `UnsupportedPlatform`) surface once from `Client::initialize` and are
//! never retried. Call errors (`Backend`, `InvalidResponse`, ...) are
//! classified by [`GateError::is_retryable`] at the retry boundary, and an
//! exhausted call is reported as a [`RetryFailure`] value.

mod classifiers;
mod constructors;
mod types;

pub use types::{GateError, GateResult, RetryFailure};
