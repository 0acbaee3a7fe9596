//! Reference-test finder flow

use std::path::{Path, PathBuf};

use tracing::info;

use crate::core::files::{list_source_files, verify_file_list};
use crate::core::prompts;
use crate::core::{check_token_budget, parse_string_list, ChatMessage, LlmClient};
use crate::error::Result;
use crate::models::Config;

/// Ask the LLM for test files worth imitating when testing the given function,
/// then prune its answer down to files that actually exist.
pub async fn find_reference_tests(
    workdir: &Path,
    function_name: &str,
    file_path: &Path,
    config: &Config,
) -> Result<Vec<String>> {
    let files = list_source_files(workdir, config.limits.max_listed_files)?;
    let listing = files
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join("\n");

    let prompt = prompts::find_reference_tests_prompt(function_name, file_path, &listing);
    check_token_budget(&prompt, config.limits.prompt_token_budget)?;

    let client = LlmClient::new(config.llm.clone())?;
    let response = client.complete_json(vec![ChatMessage::user(prompt)]).await?;
    let candidates = parse_string_list(&response, "files");
    info!(
        "Model suggested {} candidate reference files",
        candidates.len()
    );

    Ok(verify_file_list(candidates, workdir))
}

/// CLI wrapper around [`find_reference_tests`]
pub async fn run_find_reference_tests(
    workdir: &Path,
    function_name: &str,
    file_path: PathBuf,
    config: &Config,
) -> Result<()> {
    let references = find_reference_tests(workdir, function_name, &file_path, config).await?;

    if references.is_empty() {
        println!("No reference test files found for {}.", function_name);
    } else {
        println!("Reference test files for {}:", function_name);
        for reference in &references {
            println!("  - {}", reference);
        }
    }

    Ok(())
}
