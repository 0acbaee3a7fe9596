//! Prompt templates for the LLM calls
//!
//! Templates use `{__NAME__}` placeholders filled by plain string replacement;
//! the helpers below are the only way prompts get built.

use std::path::Path;

use crate::models::Language;

/// Prompt for drafting a commit message from the staged diff
pub const COMMIT_MESSAGE_PROMPT: &str = r#"You are an experienced software developer writing a git commit message.

Below is the output of `git diff --cached` for the changes to be committed:

```
{__DIFF__}
```

Additional context from the user:
{__USER_INPUT__}

Write a commit message for these changes:
- First line: a concise summary (max 72 characters) in imperative mood
- Blank line, then an optional body explaining what changed and why
- Describe only what the diff actually does
- Do not invent issue numbers or references

Answer with the commit message inside a single markdown code block and nothing else."#;

/// Prompt for proposing test cases for a target function
pub const PROPOSE_TEST_PROMPT: &str = r#"You're an advanced AI test case generator.
Given a user prompt and a target function, propose test cases for the function based on the prompt.

The user prompt is as follows:

{__USER_PROMPT__}

The target function is {__FUNCTION_NAME__}, located in the file {__FILE_PATH__}.

Here's the source code of the function:

{__FUNCTION_CONTENT__}

Propose each test case with a one-line description of what behavior it tests.
You don't have to write the test cases in code, just describe them in plain {__CHAT_LANGUAGE__}.
Do not generate more than {__MAX_CASES__} test cases.

Answer in JSON format:
{
    "test_cases": [
        {"description": "<describe test case 1 in {__CHAT_LANGUAGE__}>"},
        {"description": "<describe test case 2 in {__CHAT_LANGUAGE__}>"}
    ]
}"#;

/// Prompt for finding reference test files in a repository listing
pub const FIND_REFERENCE_TESTS_PROMPT: &str = r#"Identify a suitable reference test file that can be used as a guide for writing test cases
for the function {__FUNCTION_NAME__}, located in the file {__FILE_PATH__}.
The reference should provide a clear example of best practices in testing functions of a similar nature.

Here are the files in the repository:

{__FILE_LISTING__}

Answer in JSON format with the most promising candidates first:
{
    "files": ["<path 1>", "<path 2>"]
}"#;

/// Prompt for recommending symbols that lack context for test writing
pub const RECOMMEND_SYMBOLS_PROMPT: &str = r#"You're an advanced AI test generator.

You're about to write test cases for the function `{__FUNCTION_NAME__}` in the file `{__FILE_PATH__}`.
Before you start, you need to check if you have enough context information to write the test cases.

Here is the source code of the function:

```
{__FUNCTION_CONTENT__}
```

And here are some context information that might help you write the test cases:

{__CONTEXT_CONTENT__}

Do you think the context information is enough?
If the information is insufficient, recommend which symbols or types you need to know more about.

Return a JSON object with a single key "key_symbols" whose value is a list of strings.
- If the context information is enough, return an empty list.
- Each string is the name of a symbol or type appearing in the function that lacks context information for writing test.
- The list should contain the most important symbols and should not exceed 10 items.

JSON Format Example:
{
    "key_symbols": ["<symbol 1>", "<symbol 2>", "<symbol 3>"]
}"#;

fn chat_language(language: Language) -> &'static str {
    language.pick("English", "Chinese")
}

/// Build the commit-message prompt from the staged diff and user input
pub fn commit_message_prompt(diff: &str, user_input: &str, language: Language) -> String {
    let language_note = match language {
        Language::En => String::new(),
        Language::Zh => "\nYou must respond with a commit message in Chinese.".to_string(),
    };
    COMMIT_MESSAGE_PROMPT
        .replace("{__DIFF__}", diff)
        .replace(
            "{__USER_INPUT__}",
            &format!("{}{}", user_input, language_note),
        )
}

/// Build the test-proposal prompt for a target function
pub fn propose_test_prompt(
    user_prompt: &str,
    function_name: &str,
    file_path: &Path,
    function_content: &str,
    language: Language,
    max_cases: usize,
) -> String {
    PROPOSE_TEST_PROMPT
        .replace("{__USER_PROMPT__}", user_prompt)
        .replace("{__FUNCTION_NAME__}", function_name)
        .replace("{__FILE_PATH__}", &file_path.display().to_string())
        .replace("{__FUNCTION_CONTENT__}", function_content)
        .replace("{__CHAT_LANGUAGE__}", chat_language(language))
        .replace("{__MAX_CASES__}", &max_cases.to_string())
}

/// Build the reference-test-finder prompt from a repository file listing
pub fn find_reference_tests_prompt(
    function_name: &str,
    file_path: &Path,
    file_listing: &str,
) -> String {
    FIND_REFERENCE_TESTS_PROMPT
        .replace("{__FUNCTION_NAME__}", function_name)
        .replace("{__FILE_PATH__}", &file_path.display().to_string())
        .replace("{__FILE_LISTING__}", file_listing)
}

/// Build the symbol-recommendation prompt for a target function
pub fn recommend_symbols_prompt(
    function_name: &str,
    file_path: &Path,
    function_content: &str,
    known_context: &[String],
) -> String {
    let context_content = if known_context.is_empty() {
        "(no context collected yet)".to_string()
    } else {
        known_context.join("\n\n")
    };
    RECOMMEND_SYMBOLS_PROMPT
        .replace("{__FUNCTION_NAME__}", function_name)
        .replace("{__FILE_PATH__}", &file_path.display().to_string())
        .replace("{__FUNCTION_CONTENT__}", function_content)
        .replace("{__CONTEXT_CONTENT__}", &context_content)
}
