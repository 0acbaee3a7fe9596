//! Git plumbing via subprocess calls
//!
//! Thin wrappers around the `git` binary; no libgit2. Paths with non-ASCII
//! characters arrive quoted and octal-escaped from `git status` and are
//! decoded back to UTF-8.

use std::path::{Path, PathBuf};
use std::process::Command;

use regex::Regex;
use tracing::debug;

use crate::error::GitError;
use crate::models::FileStatus;

/// Handle to a git working directory
pub struct GitRepo {
    workdir: PathBuf,
}

/// Check that the `git` binary is available at all
pub fn check_git_installed() -> Result<(), GitError> {
    match Command::new("git").arg("--version").output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(GitError::NotInstalled),
        Err(_) => Err(GitError::NotInstalled),
    }
}

impl GitRepo {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn run(&self, args: &[&str]) -> Result<String, GitError> {
        debug!("Running git {}", args.join(" "));
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(GitError::Spawn)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if stderr.contains("not a git repository") {
                return Err(GitError::NotARepository);
            }
            return Err(GitError::CommandFailed {
                command: args.first().unwrap_or(&"").to_string(),
                stderr,
            });
        }

        String::from_utf8(output.stdout)
            .map_err(|e| GitError::InvalidOutput(e.to_string()))
    }

    /// All modified/untracked files from `git status -s -u`
    pub fn status(&self) -> Result<Vec<FileStatus>, GitError> {
        let output = self.run(&["status", "-s", "-u"])?;
        let mut entries = Vec::new();

        for line in output.lines() {
            if line.len() < 4 {
                continue;
            }
            let mut chars = line.chars();
            let index_status = chars.next().unwrap_or(' ');
            let worktree_status = chars.next().unwrap_or(' ');
            let name = decode_path(line[3..].trim());

            // Should not happen with -u, but git configs vary.
            let path = PathBuf::from(&name);
            if self.workdir.join(&path).is_dir() {
                continue;
            }

            entries.push(FileStatus {
                path,
                index_status,
                worktree_status,
            });
        }

        Ok(entries)
    }

    /// Names of files currently staged (`git diff --name-only --cached`)
    pub fn staged_file_names(&self) -> Result<Vec<String>, GitError> {
        let output = self.run(&["diff", "--name-only", "--cached"])?;
        Ok(output.lines().map(|l| decode_path(l.trim())).collect())
    }

    pub fn stage(&self, path: &Path) -> Result<(), GitError> {
        self.run(&["add", "--", &path.to_string_lossy()])?;
        Ok(())
    }

    pub fn unstage(&self, path: &Path) -> Result<(), GitError> {
        self.run(&["reset", "--", &path.to_string_lossy()])?;
        Ok(())
    }

    /// Full diff of the staging area
    pub fn diff_cached(&self) -> Result<String, GitError> {
        self.run(&["diff", "--cached"])
    }

    /// Current branch name, or `None` when detached or outside a repo
    pub fn current_branch(&self) -> Option<String> {
        match self.run(&["branch", "--show-current"]) {
            Ok(output) => {
                let branch = output.trim().to_string();
                if branch.is_empty() {
                    None
                } else {
                    Some(branch)
                }
            }
            Err(_) => None,
        }
    }

    pub fn commit(&self, message: &str) -> Result<(), GitError> {
        self.run(&["commit", "-m", message])?;
        Ok(())
    }
}

/// Decode a path as printed by `git status`.
///
/// Git wraps paths containing special characters in double quotes and escapes
/// non-ASCII bytes as `\ooo` octal sequences; recover the original UTF-8 name.
pub fn decode_path(encoded: &str) -> String {
    let unquoted = if encoded.len() >= 2 && encoded.starts_with('"') && encoded.ends_with('"') {
        &encoded[1..encoded.len() - 1]
    } else {
        encoded
    };

    let octal_pattern = Regex::new(r"\\[0-7]{3}").unwrap();
    if !octal_pattern.is_match(unquoted) && !unquoted.contains('\\') {
        return unquoted.to_string();
    }

    let mut bytes = Vec::with_capacity(unquoted.len());
    let mut chars = unquoted.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        match chars.peek() {
            Some(d) if d.is_digit(8) => {
                let mut value: u32 = 0;
                for _ in 0..3 {
                    match chars.peek() {
                        Some(d) if d.is_digit(8) => {
                            value = value * 8 + d.to_digit(8).unwrap();
                            chars.next();
                        }
                        _ => break,
                    }
                }
                bytes.push(value as u8);
            }
            Some('\\') => {
                bytes.push(b'\\');
                chars.next();
            }
            Some('"') => {
                bytes.push(b'"');
                chars.next();
            }
            Some('t') => {
                bytes.push(b'\t');
                chars.next();
            }
            Some('n') => {
                bytes.push(b'\n');
                chars.next();
            }
            _ => bytes.push(b'\\'),
        }
    }

    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}
