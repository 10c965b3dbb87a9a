//! Unified client façade
//!
//! A [`Client`] is bound to one (platform, model) pair at construction and
//! routes every call through the retry orchestrator, which rotates API keys
//! and backs off between attempts.

mod answer;
mod constructor;
mod image;
mod retry;
mod text;
mod types;

pub use answer::{Answer, ImageOutcome};
pub use retry::{RetryPolicy, RotateCredential, backoff_delay};
pub use types::Client;
