//! Backend adapters

pub mod error_utils;
pub mod gemini;
pub mod image;
pub mod openai;
pub mod openai_stream;
pub mod provider_trait;
pub mod request_builder;
pub mod rest;


pub use gemini::GeminiAdapter;
pub use image::ImageAdapter;
pub use openai::OpenAiAdapter;
pub use provider_trait::{AdapterInstance, BackendAdapter};
pub use rest::RestAdapter;
