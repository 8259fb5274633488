use anyhow::Context;
use common::JudgeJob;
use engine::{EngineConfig, Judge};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = EngineConfig::load().context("Failed to load config")?;
    let job = read_job().context("Failed to read judge job")?;

    info!(
        submission_id = %job.submission.id,
        language = %job.submission.language,
        test_cases = job.test_cases.len(),
        "Judging submission"
    );

    let judge = Judge::new(config);
    let result = judge
        .judge(&job.submission, &job.limits, &job.test_cases)
        .await;

    info!(
        verdict = %result.overall_verdict,
        max_time_ms = result.max_execution_time_ms,
        max_memory_mb = result.max_memory_used_mb,
        "Judging complete"
    );

    serde_json::to_writer_pretty(std::io::stdout().lock(), &result)?;
    println!();
    Ok(())
}

/// The job comes from a JSON file named on the command line, or from
/// stdin when no argument is given.
fn read_job() -> anyhow::Result<JudgeJob> {
    let raw = match std::env::args().nth(1) {
        Some(path) => {
            std::fs::read_to_string(&path).with_context(|| format!("Failed to read {path}"))?
        }
        None => std::io::read_to_string(std::io::stdin())?,
    };
    serde_json::from_str(&raw).context("Failed to parse JudgeJob")
}
