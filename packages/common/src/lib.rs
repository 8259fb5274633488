pub mod job;
pub mod outcome;
pub mod submission;
pub mod verdict;

pub use job::JudgeJob;
pub use outcome::{JudgeResult, TestCaseOutcome};
pub use submission::{Language, ProblemLimits, Submission, TestCase};
pub use verdict::Verdict;
