//! Configuration loading and validation

mod env_loader;
mod file_loader;
mod llm_config;
mod platform_config;

pub mod credential;
pub mod platform;
pub mod timeouts;

pub use credential::{Credential, mask_api_key};
pub use file_loader::{CONFIG_FILE_NAMES, load_config};
pub use llm_config::LlmConfig;
pub use platform::{AdapterFamily, Platform};
pub use platform_config::PlatformConfig;
pub use timeouts::TimeoutConfig;
