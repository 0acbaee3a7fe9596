//! AI-assisted commit flow
//!
//! Two interactive steps: pick the files to stage, then review the drafted
//! commit message. Both run over the same chatmark transport.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::chatmark::{render_widget, Checkbox, Component, Form, TextEditor, Transport};
use crate::core::prompts;
use crate::core::{
    check_token_budget, extract_markdown_block, scrub_issue_references, ChatMessage, GitRepo,
    LlmClient,
};
use crate::error::{DevmateError, LlmError, Result};
use crate::models::{Config, FileStatus, Language};

const DIFF_TOO_LARGE_EN: &str = "Commit failed. The modified content is too long \
and exceeds the model's length limit. \
You can try to make partial changes to the file and submit multiple times. \
Making small changes and submitting them multiple times is a better practice.";
const DIFF_TOO_LARGE_ZH: &str = "提交失败。修改内容太长，超出模型限制长度，\
可以尝试选择部分修改文件多次提交，小修改多提交是更好的做法。";

/// Run the full commit flow against a working directory
pub async fn run_commit(
    workdir: &Path,
    user_input: &str,
    config: &Config,
    transport: &mut dyn Transport,
) -> Result<()> {
    let language = config.behavior.language;

    println!(
        "{}\n",
        language.pick("Let's follow the steps below.", "开始按步骤操作。")
    );

    crate::core::git::check_git_installed()?;
    let repo = GitRepo::new(workdir);

    println!(
        "{}\n",
        language.pick(
            "Step 1/2: Select the files you've changed that you wish to include in this commit, \
             then click 'Submit'.",
            "第一步/2：选择您希望包含在这次提交中的文件，然后点击“提交”。",
        )
    );

    let entries = repo.status()?;
    if entries.is_empty() {
        println!(
            "{}",
            language.pick("There are no files to commit.", "没有可提交的文件。")
        );
        return Ok(());
    }

    let staged: Vec<FileStatus> = entries.iter().filter(|e| e.is_staged()).cloned().collect();
    let unstaged: Vec<FileStatus> = entries
        .iter()
        .filter(|e| e.has_worktree_changes())
        .cloned()
        .collect();

    let (staged_selected, unstaged_selected) =
        select_files(&staged, &unstaged, language, transport)?;

    if staged_selected.is_empty() && unstaged_selected.is_empty() {
        println!(
            "{}",
            language.pick(
                "No files selected, the commit has been aborted.",
                "没有选择任何文件，提交已中止。",
            )
        );
        return Ok(());
    }

    rebuild_stage_list(&repo, &staged_selected, &unstaged_selected)?;

    println!(
        "{}\n",
        language.pick(
            "Step 2/2: Review the commit message I've drafted for you. Edit it below if needed. \
             Then click 'Commit' to proceed with the commit using this message.",
            "第二步/2：查看我为您起草的提交消息。如果需要，请在下面编辑它。然后单击“提交”以使用此消息进行提交。",
        )
    );

    let diff = repo.diff_cached()?;
    let mut enriched_input = user_input.to_string();
    if let Some(branch) = repo.current_branch() {
        enriched_input.push_str("\ncurrent repo branch name is: ");
        enriched_input.push_str(&branch);
    }

    let message = match generate_commit_message(&diff, &enriched_input, config).await {
        Ok(message) => message,
        Err(DevmateError::TokenBudgetExceeded { .. })
        | Err(DevmateError::Llm(LlmError::ContextLengthExceeded(_))) => {
            println!("{}", language.pick(DIFF_TOO_LARGE_EN, DIFF_TOO_LARGE_ZH));
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let mut editor = TextEditor::new(message);
    render_widget(&mut editor, transport)?;

    match editor.new_text() {
        Some(edited) if !edited.trim().is_empty() => {
            repo.commit(edited)?;
            info!("Created commit on {:?}", repo.current_branch());
            println!(
                "{}",
                language.pick("Commit completed.", "提交已完成。")
            );
        }
        _ => {
            println!("{}", language.pick("Commit aborted.", "提交已中止。"));
        }
    }

    Ok(())
}

/// Present staged/unstaged files in one form and return the selected paths
pub fn select_files(
    staged: &[FileStatus],
    unstaged: &[FileStatus],
    language: Language,
    transport: &mut dyn Transport,
) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let mut components = Vec::new();
    let mut staged_pos = None;
    let mut unstaged_pos = None;

    if !staged.is_empty() {
        components.push(Component::from("Staged:\n"));
        staged_pos = Some(components.len());
        let labels: Vec<String> = staged.iter().map(FileStatus::staged_label).collect();
        components.push(Component::from(Checkbox::uniform(labels, true)?));
    }

    if !unstaged.is_empty() {
        components.push(Component::from("Unstaged:\n"));
        unstaged_pos = Some(components.len());
        let labels: Vec<String> = unstaged.iter().map(FileStatus::unstaged_label).collect();
        components.push(Component::from(Checkbox::uniform(labels, false)?));
    }

    let title = language
        .pick(
            "Select the files to include in this commit:",
            "选择要包含在这次提交中的文件：",
        )
        .to_string();
    let mut form = Form::new(components, Some(title))?;
    form.render(transport)?;

    let selected = |pos: Option<usize>, entries: &[FileStatus]| -> Vec<PathBuf> {
        let Some(pos) = pos else {
            return Vec::new();
        };
        form.components()[pos]
            .as_checkbox()
            .map(|checkbox| {
                checkbox
                    .selections()
                    .iter()
                    .map(|&i| entries[i].path.clone())
                    .collect()
            })
            .unwrap_or_default()
    };

    Ok((selected(staged_pos, staged), selected(unstaged_pos, unstaged)))
}

/// Make the staging area match the user's selection: stage the chosen
/// unstaged files, unstage everything staged that was deselected.
pub fn rebuild_stage_list(
    repo: &GitRepo,
    staged_selected: &[PathBuf],
    unstaged_selected: &[PathBuf],
) -> Result<()> {
    for path in unstaged_selected {
        repo.stage(path)?;
    }

    let current_staged = repo.staged_file_names()?;
    for name in files_to_unstage(&current_staged, staged_selected, unstaged_selected) {
        debug!("Unstaging deselected file {}", name);
        repo.unstage(Path::new(&name))?;
    }

    Ok(())
}

// Staged files the user did not keep in either list.
fn files_to_unstage(
    current_staged: &[String],
    staged_selected: &[PathBuf],
    unstaged_selected: &[PathBuf],
) -> Vec<String> {
    let keep: HashSet<&Path> = staged_selected
        .iter()
        .chain(unstaged_selected)
        .map(PathBuf::as_path)
        .collect();

    current_staged
        .iter()
        .filter(|name| !keep.contains(Path::new(name.as_str())))
        .cloned()
        .collect()
}

/// Draft a commit message from the staged diff via the LLM
pub async fn generate_commit_message(
    diff: &str,
    user_input: &str,
    config: &Config,
) -> Result<String> {
    let prompt = prompts::commit_message_prompt(diff, user_input, config.behavior.language);
    check_token_budget(&prompt, config.limits.prompt_token_budget)?;

    let client = LlmClient::new(config.llm.clone())?;
    let response = client
        .complete(
            vec![ChatMessage::user(prompt)],
            config.behavior.stream_output,
        )
        .await?;

    Ok(scrub_issue_references(&extract_markdown_block(&response)))
}
