//! Prompt-size guard
//!
//! Token counts are estimated locally (chars / 4) instead of calling a real
//! encoder; the budget is a guard rail, not an exact accounting.

use tracing::warn;

use crate::error::DevmateError;

/// Estimate token count for content (rough heuristic: chars / 4)
pub fn estimate_tokens(content: &str) -> usize {
    content.len() / 4
}

/// Reject a prompt that would blow the model's context window.
///
/// Warns as the estimate approaches the budget and fails once it crosses it.
pub fn check_token_budget(prompt: &str, budget: usize) -> Result<usize, DevmateError> {
    let estimated = estimate_tokens(prompt);

    let warning_threshold = (budget as f64 * 0.8) as usize;
    if estimated > warning_threshold && estimated <= budget {
        warn!(
            "Prompt near token budget: {} estimated tokens (budget: {})",
            estimated, budget
        );
    }

    if estimated > budget {
        return Err(DevmateError::TokenBudgetExceeded {
            estimated,
            max: budget,
        });
    }

    Ok(estimated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_tokens() {
        // 100 chars should be ~25 tokens
        let content = "a".repeat(100);
        assert_eq!(estimate_tokens(&content), 25);
    }

    #[test]
    fn test_budget_allows_small_prompt() {
        let prompt = "a".repeat(400); // ~100 tokens
        let estimated = check_token_budget(&prompt, 200).unwrap();
        assert_eq!(estimated, 100);
    }

    #[test]
    fn test_budget_rejects_oversized_prompt() {
        let prompt = "a".repeat(4000); // ~1000 tokens
        let err = check_token_budget(&prompt, 200).unwrap_err();
        match err {
            DevmateError::TokenBudgetExceeded { estimated, max } => {
                assert_eq!(estimated, 1000);
                assert_eq!(max, 200);
            }
            other => panic!("Expected TokenBudgetExceeded, got {other}"),
        }
    }
}
