//! LLM client, adapters and message types

pub mod client;
pub mod frame_decoder;
pub mod image;
pub mod messages;
pub mod prompt;
pub mod providers;
pub mod rotator;
pub mod streaming;

pub use client::{Answer, Client, ImageOutcome, RetryPolicy, RotateCredential, backoff_delay};
pub use frame_decoder::{Frame, FrameDecoder};
pub use image::{ImageRequest, save_image};
pub use messages::{Message, Role};
pub use prompt::flatten_messages;
pub use providers::{AdapterInstance, BackendAdapter};
pub use rotator::{KeyRotator, Transport};
pub use streaming::{FrameContent, TextStream};
