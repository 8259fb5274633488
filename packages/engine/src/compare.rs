//! Output comparison.
//!
//! Actual and expected output are compared as ordered token sequences:
//! whitespace runs collapse to single separators and leading/trailing
//! whitespace is ignored. Tolerant of trailing newlines and incidental
//! spacing, intolerant of token content or order differences.

/// True iff both outputs contain the same tokens in the same order.
pub fn outputs_match(actual: &str, expected: &str) -> bool {
    actual.split_whitespace().eq(expected.split_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(outputs_match("4 5", "4 5"));
    }

    #[test]
    fn test_whitespace_runs_and_trailing_newline() {
        assert!(outputs_match("4   5\n", "4 5"));
        assert!(outputs_match("\n4\n5\n\n", "4 5"));
        assert!(outputs_match("4\t5", "4 5"));
    }

    #[test]
    fn test_token_order_matters() {
        assert!(!outputs_match("5 4", "4 5"));
    }

    #[test]
    fn test_token_content_matters() {
        assert!(!outputs_match("45", "4 5"));
        assert!(!outputs_match("4 5 6", "4 5"));
    }

    #[test]
    fn test_empty_outputs() {
        assert!(outputs_match("", ""));
        assert!(outputs_match("\n", ""));
        assert!(!outputs_match("", "4"));
    }
}
