//! Supported platforms and their adapter families

use crate::error::GateError;
use std::fmt;
use std::str::FromStr;

/// Wire protocol family an adapter speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdapterFamily {
    /// `/chat/completions` with bearer auth
    OpenAiCompatible,
    /// `generateContent` / `streamGenerateContent`
    Gemini,
    /// Per-model endpoint URLs taking a flattened prompt
    Rest,
    /// `/images/generations` followed by an asset download
    Image,
}

/// A backend platform that can be named in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    OpenAi,
    Volcengine,
    Gemini,
    Infingence,
    Deepbricks,
}

impl Platform {
    /// Every known platform, in the order they are reported to users
    pub const ALL: [Platform; 5] = [
        Platform::OpenAi,
        Platform::Gemini,
        Platform::Infingence,
        Platform::Deepbricks,
        Platform::Volcengine,
    ];

    /// Lowercase platform name as used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Platform::OpenAi => "openai",
            Platform::Volcengine => "volcengine",
            Platform::Gemini => "gemini",
            Platform::Infingence => "infingence",
            Platform::Deepbricks => "deepbricks",
        }
    }

    /// Key of this platform's section in the config file, e.g. `OPENAI_CONFIG`
    pub fn config_key(&self) -> String {
        format!("{}_CONFIG", self.name().to_uppercase())
    }

    /// Prefix for environment overrides, e.g. `MODELGATE_GEMINI`
    pub fn env_prefix(&self) -> String {
        format!("MODELGATE_{}", self.name().to_uppercase())
    }

    pub fn family(&self) -> AdapterFamily {
        match self {
            Platform::OpenAi | Platform::Volcengine => AdapterFamily::OpenAiCompatible,
            Platform::Gemini => AdapterFamily::Gemini,
            Platform::Infingence => AdapterFamily::Rest,
            Platform::Deepbricks => AdapterFamily::Image,
        }
    }

    /// Base URL used when a credential does not name one
    pub fn default_base_url(&self) -> Option<&'static str> {
        match self {
            Platform::OpenAi => Some("https://api.openai.com/v1"),
            Platform::Volcengine => Some("https://ark.cn-beijing.volces.com/api/v3"),
            Platform::Gemini => Some("https://generativelanguage.googleapis.com"),
            Platform::Infingence | Platform::Deepbricks => None,
        }
    }

    /// Value of `ALLOW_ANY_MODEL` when the section leaves it out
    pub fn default_allow_any_model(&self) -> bool {
        matches!(self, Platform::OpenAi | Platform::Deepbricks)
    }

    /// Names of all supported platforms
    pub fn supported_names() -> Vec<String> {
        Self::ALL.iter().map(|p| p.name().to_string()).collect()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Platform {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| GateError::UnsupportedPlatform {
                platform: s.to_string(),
                supported: Self::supported_names(),
            })
    }
}
