//! Message language for user-facing text
//!
//! The source of truth is the config (or a CLI override); the language value is
//! threaded through call parameters rather than held in process-wide state.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported message languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English
    En,
    /// Chinese
    Zh,
}

impl Language {
    /// Pick the text matching this language
    pub fn pick<'a>(&self, en: &'a str, zh: &'a str) -> &'a str {
        match self {
            Language::En => en,
            Language::Zh => zh,
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::En
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::En => write!(f, "en"),
            Language::Zh => write!(f, "zh"),
        }
    }
}
