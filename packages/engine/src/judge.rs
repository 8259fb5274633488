//! Submission orchestration: compile once, run every test case in order,
//! classify, aggregate.

use std::sync::Arc;

use common::{JudgeResult, ProblemLimits, Submission, TestCase, TestCaseOutcome, Verdict};
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use crate::compare;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::languages::{self, LanguageAdapter};
use crate::sandbox::{SandboxOutcome, SandboxReport};
use crate::workspace::Workspace;

/// The judging engine. One instance serves many concurrent submissions;
/// a bounded semaphore caps how many judge at once (and therefore how
/// many child processes the host runs). Within a submission, test cases
/// always execute sequentially and in order.
pub struct Judge {
    config: EngineConfig,
    permits: Arc<Semaphore>,
}

impl Judge {
    pub fn new(config: EngineConfig) -> Self {
        let permits = Arc::new(Semaphore::new(config.max_concurrent_submissions.max(1)));
        Self { config, permits }
    }

    /// Judge one submission against an ordered list of test cases.
    ///
    /// Always yields exactly one `JudgeResult`: internal failures (file
    /// I/O, process spawning) are folded into a `RuntimeError` result
    /// with their diagnostic text, never raised to the caller.
    #[instrument(skip_all, fields(submission_id = %submission.id, language = %submission.language))]
    pub async fn judge(
        &self,
        submission: &Submission,
        limits: &ProblemLimits,
        test_cases: &[TestCase],
    ) -> JudgeResult {
        let adapter = languages::adapter_for(submission.language, &self.config.toolchain);
        self.judge_with_adapter(adapter.as_ref(), submission, limits, test_cases)
            .await
    }

    /// Judge with an explicit language adapter. This is the polymorphic
    /// entry point `judge` delegates to.
    pub async fn judge_with_adapter(
        &self,
        adapter: &dyn LanguageAdapter,
        submission: &Submission,
        limits: &ProblemLimits,
        test_cases: &[TestCase],
    ) -> JudgeResult {
        // The semaphore lives as long as the judge and is never closed.
        let _permit = self
            .permits
            .acquire()
            .await
            .expect("judge semaphore closed");

        match self.evaluate(adapter, submission, limits, test_cases).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Judging failed internally, folding into runtime error");
                internal_failure(test_cases, &e)
            }
        }
    }

    async fn evaluate(
        &self,
        adapter: &dyn LanguageAdapter,
        submission: &Submission,
        limits: &ProblemLimits,
        test_cases: &[TestCase],
    ) -> crate::error::Result<JudgeResult> {
        let workspace = Workspace::create(&self.config.workspace_root, &submission.id)?;
        workspace.write_source(adapter.source_filename(), &submission.source_code)?;

        // At most one compile step per submission, never one per test case.
        let compiled = adapter.compile(&workspace).await?;
        if !compiled.success {
            info!("Compilation failed");
            return Ok(JudgeResult::compilation_error(compiled.diagnostics));
        }

        let mut outcomes = Vec::new();
        let mut truncated = false;
        for (index, case) in test_cases.iter().enumerate() {
            let test_number = index + 1;
            let outcome = match adapter.run(&workspace, &case.input, limits).await {
                Ok(report) => classify(test_number, case, &report, limits),
                Err(e) => {
                    warn!(test_number, error = %e, "Execution failed, folding into runtime error");
                    failed_outcome(test_number, case, &e)
                }
            };
            debug!(
                test_number,
                verdict = %outcome.verdict,
                time_ms = outcome.execution_time_ms,
                memory_mb = outcome.memory_used_mb,
                "Test case finished"
            );

            let fatal = outcome.verdict.is_fatal();
            outcomes.push(outcome);

            if fatal && self.config.stop_on_first_failure {
                truncated = test_number < test_cases.len();
                break;
            }
        }

        let result = JudgeResult::aggregate(outcomes, !truncated);
        info!(
            verdict = %result.overall_verdict,
            attempted = result.outcomes.len(),
            total = test_cases.len(),
            "Submission judged"
        );
        Ok(result)
    }
}

/// Map one raw execution onto a verdict.
fn classify(
    test_number: usize,
    case: &TestCase,
    report: &SandboxReport,
    limits: &ProblemLimits,
) -> TestCaseOutcome {
    let mut verdict = match report.outcome {
        SandboxOutcome::TimedOut => Verdict::Timeout,
        SandboxOutcome::Crashed { .. } => Verdict::RuntimeError,
        SandboxOutcome::Completed => {
            if compare::outputs_match(&report.stdout, &case.expected_output) {
                Verdict::Correct
            } else {
                Verdict::WrongAnswer
            }
        }
    };

    // The memory check overrides every other classification, even a
    // completed run with matching output.
    if report.memory_delta_mb > f64::from(limits.memory_limit_mb) {
        verdict = Verdict::MemoryLimit;
    }

    let actual_output = match report.outcome {
        SandboxOutcome::Crashed { exit_code } => {
            if report.stderr.is_empty() {
                match exit_code {
                    Some(code) => format!("Process exited with code {code}"),
                    None => "Process killed by signal".to_string(),
                }
            } else {
                report.stderr.clone()
            }
        }
        _ => report.stdout.clone(),
    };

    TestCaseOutcome {
        test_number,
        input: case.input.clone(),
        expected_output: case.expected_output.clone(),
        actual_output,
        execution_time_ms: report.elapsed_ms,
        memory_used_mb: report.memory_delta_mb,
        verdict,
    }
}

fn failed_outcome(test_number: usize, case: &TestCase, error: &EngineError) -> TestCaseOutcome {
    TestCaseOutcome {
        test_number,
        input: case.input.clone(),
        expected_output: case.expected_output.clone(),
        actual_output: error.to_string(),
        execution_time_ms: 0.0,
        memory_used_mb: 0.0,
        verdict: Verdict::RuntimeError,
    }
}

/// Result for a submission that failed before any test case could run,
/// e.g. workspace creation or the compiler binary itself failing.
fn internal_failure(test_cases: &[TestCase], error: &EngineError) -> JudgeResult {
    // Never report more outcomes than there are test cases: with an empty
    // list the diagnostics live only in the overall verdict and the log.
    let outcomes = match test_cases.first() {
        Some(first) => vec![failed_outcome(1, first, error)],
        None => vec![],
    };
    let mut result = JudgeResult::aggregate(outcomes, false);
    result.overall_verdict = Verdict::RuntimeError;
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> ProblemLimits {
        ProblemLimits {
            time_limit_secs: 2,
            memory_limit_mb: 256,
        }
    }

    fn case(input: &str, expected: &str) -> TestCase {
        TestCase {
            input: input.into(),
            expected_output: expected.into(),
        }
    }

    fn report(outcome: SandboxOutcome, stdout: &str, memory_mb: f64) -> SandboxReport {
        SandboxReport {
            stdout: stdout.into(),
            stderr: String::new(),
            elapsed_ms: 10.0,
            memory_delta_mb: memory_mb,
            outcome,
        }
    }

    #[test]
    fn test_classify_matching_output() {
        let outcome = classify(
            1,
            &case("2 3", "5"),
            &report(SandboxOutcome::Completed, "5\n", 1.0),
            &limits(),
        );
        assert_eq!(outcome.verdict, Verdict::Correct);
        assert_eq!(outcome.test_number, 1);
    }

    #[test]
    fn test_classify_wrong_answer() {
        let outcome = classify(
            2,
            &case("2 3", "5"),
            &report(SandboxOutcome::Completed, "6\n", 1.0),
            &limits(),
        );
        assert_eq!(outcome.verdict, Verdict::WrongAnswer);
    }

    #[test]
    fn test_classify_timeout() {
        let outcome = classify(
            1,
            &case("", ""),
            &report(SandboxOutcome::TimedOut, "", 0.0),
            &limits(),
        );
        assert_eq!(outcome.verdict, Verdict::Timeout);
    }

    #[test]
    fn test_memory_check_overrides_matching_output() {
        let outcome = classify(
            1,
            &case("2 3", "5"),
            &report(SandboxOutcome::Completed, "5\n", 512.0),
            &limits(),
        );
        assert_eq!(outcome.verdict, Verdict::MemoryLimit);
    }

    #[test]
    fn test_crash_preserves_stderr_diagnostics() {
        let mut crash = report(SandboxOutcome::Crashed { exit_code: Some(1) }, "", 0.0);
        crash.stderr = "segmentation fault".into();
        let outcome = classify(1, &case("", ""), &crash, &limits());
        assert_eq!(outcome.verdict, Verdict::RuntimeError);
        assert_eq!(outcome.actual_output, "segmentation fault");
    }

    #[test]
    fn test_internal_failure_reports_the_first_case() {
        let error = EngineError::Workspace("disk full".into());
        let result = internal_failure(&[case("2 3", "5"), case("1", "1")], &error);
        assert_eq!(result.overall_verdict, Verdict::RuntimeError);
        assert_eq!(result.outcomes.len(), 1);
        assert!(result.outcomes[0].actual_output.contains("disk full"));
        assert!(!result.is_fully_correct);
    }

    #[test]
    fn test_internal_failure_with_no_test_cases_has_no_outcomes() {
        let error = EngineError::Workspace("disk full".into());
        let result = internal_failure(&[], &error);
        assert_eq!(result.overall_verdict, Verdict::RuntimeError);
        assert!(result.outcomes.is_empty());
        assert!(!result.is_fully_correct);
    }

    #[test]
    fn test_crash_without_stderr_reports_exit_code() {
        let outcome = classify(
            1,
            &case("", ""),
            &report(SandboxOutcome::Crashed { exit_code: Some(3) }, "", 0.0),
            &limits(),
        );
        assert!(outcome.actual_output.contains("code 3"));
    }
}
