use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::models::{Config, Language};

/// Load configuration from the working directory with CLI overrides
pub fn load_config(
    workdir: &Path,
    model: Option<String>,
    api_base: Option<String>,
    timeout: Option<u64>,
    language: Option<Language>,
    no_stream: bool,
) -> Result<Config> {
    let config = Config::load_from_dir(workdir)?;
    let config = config.with_overrides(model, api_base, timeout, language, no_stream);

    info!(
        "Configuration loaded: model={}, api_base={}, timeout={}s, language={}",
        config.llm.model,
        config.llm.api_base,
        config.llm.timeout_seconds,
        config.behavior.language
    );

    Ok(config)
}
