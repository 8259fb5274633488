use crate::Verdict;
use serde::{Deserialize, Serialize};

/// Result of running one test case.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestCaseOutcome {
    /// 1-based test case number, in insertion order.
    pub test_number: usize,
    /// Input that was fed to the program.
    pub input: String,
    /// Expected output from the test case.
    pub expected_output: String,
    /// Captured program output, or diagnostic text for crashed runs.
    pub actual_output: String,
    /// Wall-clock time in milliseconds.
    pub execution_time_ms: f64,
    /// Coarse memory usage estimate in megabytes.
    pub memory_used_mb: f64,
    /// Verdict for this test case.
    pub verdict: Verdict,
}

/// Aggregate result of judging one submission. Created fresh per judging
/// invocation; the caller persists whatever summary it needs and discards
/// this value.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JudgeResult {
    /// Highest-severity verdict across recorded outcomes.
    pub overall_verdict: Verdict,
    /// True iff every test case was evaluated and all were correct.
    pub is_fully_correct: bool,
    /// Maximum execution time over attempted test cases (0 if none).
    pub max_execution_time_ms: f64,
    /// Maximum memory estimate over attempted test cases (0 if none).
    pub max_memory_used_mb: f64,
    /// Compiler diagnostics, preserved verbatim (None if compilation
    /// succeeded or was not needed).
    pub compile_output: Option<String>,
    /// Per-test outcomes in test-case order. Strictly shorter than the
    /// test-case list iff a fatal verdict truncated the run.
    pub outcomes: Vec<TestCaseOutcome>,
}

impl JudgeResult {
    /// Result for a submission that failed to build: no test case is
    /// attempted and no process is spawned.
    pub fn compilation_error(diagnostics: impl Into<String>) -> Self {
        Self {
            overall_verdict: Verdict::CompilationError,
            is_fully_correct: false,
            max_execution_time_ms: 0.0,
            max_memory_used_mb: 0.0,
            compile_output: Some(diagnostics.into()),
            outcomes: vec![],
        }
    }

    /// Fold an ordered outcome list into the aggregate result.
    /// `evaluated_all` is false when the early-exit policy truncated the
    /// run before the last test case.
    pub fn aggregate(outcomes: Vec<TestCaseOutcome>, evaluated_all: bool) -> Self {
        let overall_verdict = outcomes
            .iter()
            .map(|o| o.verdict)
            .max_by_key(|v| v.severity())
            .unwrap_or(Verdict::Correct);
        let is_fully_correct = evaluated_all && overall_verdict.is_correct();
        let max_execution_time_ms = outcomes
            .iter()
            .fold(0.0_f64, |max, o| max.max(o.execution_time_ms));
        let max_memory_used_mb = outcomes
            .iter()
            .fold(0.0_f64, |max, o| max.max(o.memory_used_mb));

        Self {
            overall_verdict,
            is_fully_correct,
            max_execution_time_ms,
            max_memory_used_mb,
            compile_output: None,
            outcomes,
        }
    }
}
