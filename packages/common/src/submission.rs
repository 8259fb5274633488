use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Programming languages the engine can judge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Cpp,
    Java,
    Python,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpp => "cpp",
            Self::Java => "java",
            Self::Python => "python",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an unsupported language string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLanguageError {
    invalid: String,
}

impl fmt::Display for ParseLanguageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unsupported language '{}'", self.invalid)
    }
}

impl std::error::Error for ParseLanguageError {}

impl FromStr for Language {
    type Err = ParseLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cpp" => Ok(Self::Cpp),
            "java" => Ok(Self::Java),
            "python" => Ok(Self::Python),
            _ => Err(ParseLanguageError {
                invalid: s.to_string(),
            }),
        }
    }
}

/// Resource limits for one problem, immutable for the duration of a
/// judging run. Owned by the external problem store.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ProblemLimits {
    /// Per-test-case wall-clock limit in seconds. Must be positive.
    pub time_limit_secs: u32,
    /// Memory cap in megabytes. Must be positive.
    pub memory_limit_mb: u32,
}

/// One input/expected-output pair. Test cases form an ordered sequence;
/// insertion order drives test numbering and the early-exit policy.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestCase {
    /// Input data fed to the program's stdin.
    pub input: String,
    /// Expected output for comparison.
    pub expected_output: String,
}

/// A user submission: one source file in one language.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Submission {
    /// Unique identifier for this judging attempt (UUID). Also names the
    /// attempt's filesystem workspace, so ids must never be reused
    /// concurrently.
    pub id: String,
    /// Source code content.
    pub source_code: String,
    /// Language the source is written in.
    pub language: Language,
}

impl Submission {
    /// Create a submission with a generated UUID.
    pub fn new(source_code: impl Into<String>, language: Language) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            source_code: source_code.into(),
            language,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parse() {
        assert_eq!("cpp".parse::<Language>().unwrap(), Language::Cpp);
        assert_eq!("python".parse::<Language>().unwrap(), Language::Python);
        assert!("brainfuck".parse::<Language>().is_err());
    }

    #[test]
    fn test_submission_ids_unique() {
        let a = Submission::new("print(1)", Language::Python);
        let b = Submission::new("print(1)", Language::Python);
        assert_ne!(a.id, b.id);
    }
}
