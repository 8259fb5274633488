use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Classification of a single test case's or a whole submission's outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Verdict {
    /// Ran to completion and the output matched.
    Correct,
    /// Ran to completion but the output did not match.
    WrongAnswer,
    /// Program crashed or exited with a non-zero code.
    RuntimeError,
    /// Exceeded the wall-clock time limit.
    Timeout,
    /// Exceeded the memory limit.
    MemoryLimit,
    /// Source failed to compile.
    CompilationError,
}

impl Verdict {
    /// Ordering used when aggregating per-test verdicts into an overall
    /// one: the highest-severity verdict present wins.
    pub fn severity(&self) -> u8 {
        match self {
            Self::Correct => 0,
            Self::WrongAnswer => 1,
            Self::RuntimeError => 2,
            Self::Timeout => 3,
            Self::MemoryLimit => 4,
            Self::CompilationError => 5,
        }
    }

    /// Fatal verdicts stop the test-case loop under the early-exit policy.
    /// A wrong answer is not fatal: later cases still run.
    pub fn is_fatal(&self) -> bool {
        self.severity() >= Self::RuntimeError.severity()
    }

    pub fn is_correct(&self) -> bool {
        matches!(self, Self::Correct)
    }

    /// All possible verdict values.
    pub const ALL: &'static [Verdict] = &[
        Self::Correct,
        Self::WrongAnswer,
        Self::RuntimeError,
        Self::Timeout,
        Self::MemoryLimit,
        Self::CompilationError,
    ];

    /// Returns the string representation (PascalCase).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correct => "Correct",
            Self::WrongAnswer => "WrongAnswer",
            Self::RuntimeError => "RuntimeError",
            Self::Timeout => "Timeout",
            Self::MemoryLimit => "MemoryLimit",
            Self::CompilationError => "CompilationError",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an invalid verdict string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVerdictError {
    invalid: String,
}

impl fmt::Display for ParseVerdictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid verdict '{}'. Valid values: {}",
            self.invalid,
            Verdict::ALL
                .iter()
                .map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for ParseVerdictError {}

impl FromStr for Verdict {
    type Err = ParseVerdictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Correct" => Ok(Self::Correct),
            "WrongAnswer" => Ok(Self::WrongAnswer),
            "RuntimeError" => Ok(Self::RuntimeError),
            "Timeout" => Ok(Self::Timeout),
            "MemoryLimit" => Ok(Self::MemoryLimit),
            "CompilationError" => Ok(Self::CompilationError),
            _ => Err(ParseVerdictError {
                invalid: s.to_string(),
            }),
        }
    }
}
