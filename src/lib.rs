//! devmate - AI-assisted commit messages and test proposals
//!
//! devmate is a CLI assistant that drafts git commit messages from the staged
//! diff and proposes unit-test cases for a target function, using any
//! OpenAI-compatible chat-completion API. User input flows through ChatMark,
//! a textual form protocol rendered inside a chat-style host.
//!
//! # Architecture
//!
//! - **chatmark**: the interactive form/widget protocol (Form, Checkbox,
//!   TextEditor, Button, transport round-trip)
//! - **commands**: CLI command implementations (commit, propose-tests,
//!   find-reference-tests)
//! - **core**: core functionality (git plumbing, LLM client, prompts,
//!   response parsing, token budget, file-list utilities)
//! - **models**: data structures (config, file status, language)
//! - **error**: error types

pub mod chatmark;
pub mod commands;
pub mod core;
pub mod error;
pub mod models;

pub use error::{DevmateError, Result};
