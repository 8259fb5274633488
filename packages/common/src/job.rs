use crate::{ProblemLimits, Submission, TestCase};
use serde::{Deserialize, Serialize};

/// Everything needed to judge one submission: the submission itself, the
/// problem's resource limits, and the ordered test cases. The caller
/// supplies all of it; the engine performs no storage or network access.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JudgeJob {
    pub submission: Submission,
    pub limits: ProblemLimits,
    pub test_cases: Vec<TestCase>,
}
