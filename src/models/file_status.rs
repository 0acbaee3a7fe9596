//! Per-file entry parsed from `git status -s -u`

use std::path::PathBuf;

/// One file reported by git's short status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStatus {
    /// Path relative to the repository root
    pub path: PathBuf,
    /// Index (staged) status column, ' ' when clean
    pub index_status: char,
    /// Worktree (unstaged) status column, ' ' when clean
    pub worktree_status: char,
}

impl FileStatus {
    /// Whether the index column marks this file as staged
    pub fn is_staged(&self) -> bool {
        matches!(self.index_status, 'M' | 'A' | 'D')
    }

    /// Whether the worktree column holds a pending change
    pub fn has_worktree_changes(&self) -> bool {
        self.worktree_status != ' '
    }

    /// Checkbox label for the staged list, e.g. "M src/main.rs"
    pub fn staged_label(&self) -> String {
        format!("{} {}", display_status(self.index_status), self.path.display())
    }

    /// Checkbox label for the unstaged list
    pub fn unstaged_label(&self) -> String {
        format!(
            "{} {}",
            display_status(self.worktree_status),
            self.path.display()
        )
    }
}

// Untracked files show as "??"; render the column as "U" for readability.
fn display_status(status: char) -> char {
    if status == '?' {
        'U'
    } else {
        status
    }
}
