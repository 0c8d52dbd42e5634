//! Request and response types for the judge API.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use judgegate_core::{Error, InvalidInputError};

/// The authenticated user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
}

/// Tokens issued by login or registration.
#[derive(Deserialize)]
pub struct IssuedTokens {
    pub access: String,
    pub refresh: String,
}

impl fmt::Debug for IssuedTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedTokens")
            .field("access", &"[REDACTED]")
            .field("refresh", &"[REDACTED]")
            .finish()
    }
}

/// Response from login and registration.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub tokens: Option<IssuedTokens>,
}

impl AuthResponse {
    /// The user profile, when the response carried all of it.
    pub fn user(&self) -> Option<User> {
        Some(User {
            id: self.id?,
            username: self.username.clone()?,
            email: self.email.clone()?,
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password1: &'a str,
    pub password2: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct LogoutRequest<'a> {
    pub refresh: &'a str,
}

/// Problem difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(InvalidInputError::Other {
                message: format!("unknown difficulty '{}'", s),
            }
            .into()),
        }
    }
}

/// A language the judge can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Py,
    Java,
    Cpp,
    C,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Py => "py",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::C => "c",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "py" | "python" => Ok(Language::Py),
            "java" => Ok(Language::Java),
            "cpp" | "c++" => Ok(Language::Cpp),
            "c" => Ok(Language::C),
            _ => Err(InvalidInputError::Other {
                message: format!("unknown language '{}'", s),
            }
            .into()),
        }
    }
}

/// A topic label attached to problems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: u64,
    pub tag: String,
}

/// A problem as listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemSummary {
    #[serde(default)]
    pub id: Option<u64>,
    pub problem_name: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestExample {
    pub id: u64,
    pub input_data: String,
    pub output_data: String,
    pub problem: u64,
}

/// A problem with its statement and examples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemDetail {
    pub id: u64,
    pub problem_name: String,
    pub problem_statement: String,
    pub constraints: String,
    #[serde(default)]
    pub code_template: Option<String>,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub input_format: Option<String>,
    #[serde(default)]
    pub output_format: Option<String>,
    #[serde(default)]
    pub test_examples: Vec<TestExample>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RunRequest<'a> {
    pub code: &'a str,
    pub user_input: &'a str,
    pub language: Language,
}

/// Result of running code against custom input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub status: String,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub execution_time: Option<f64>,
}

impl RunResult {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmitRequest<'a> {
    pub user_id: u64,
    pub problem_id: u64,
    pub code: &'a str,
    pub language: Language,
}

/// Verdict for a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResult {
    pub verdict: String,
    #[serde(default)]
    pub details: String,
}

impl SubmitResult {
    pub fn is_accepted(&self) -> bool {
        self.verdict == "Accepted"
    }
}

/// Code saved for a problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCode {
    pub user_id: u64,
    pub problem_id: u64,
    pub language: Language,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SavedCodeResponse {
    #[serde(default)]
    pub code: Option<String>,
}

/// A past submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: u64,
    pub problem_name: String,
    pub language: Language,
    pub code: String,
    pub timestamp: DateTime<FixedOffset>,
    #[serde(default)]
    pub verdict: Option<String>,
    pub problem_id: u64,
    #[serde(default)]
    pub time_taken: Option<f64>,
    #[serde(default)]
    pub memory_taken: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmissionsResponse {
    pub submissions: Vec<Submission>,
}

/// What the AI reviewer is asked to do with a piece of code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReviewKind {
    CodeReview,
    AddComment,
    OptimizedCode,
    BugFix,
    /// A single hint for the problem; the code is ignored.
    ProvideHints,
}

impl ReviewKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewKind::CodeReview => "codeReview",
            ReviewKind::AddComment => "addComment",
            ReviewKind::OptimizedCode => "optimizedCode",
            ReviewKind::BugFix => "bugFix",
            ReviewKind::ProvideHints => "provideHints",
        }
    }
}

impl fmt::Display for ReviewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "codereview" | "review" => Ok(ReviewKind::CodeReview),
            "addcomment" | "comment" => Ok(ReviewKind::AddComment),
            "optimizedcode" | "optimize" => Ok(ReviewKind::OptimizedCode),
            "bugfix" => Ok(ReviewKind::BugFix),
            "providehints" | "hint" => Ok(ReviewKind::ProvideHints),
            _ => Err(InvalidInputError::Other {
                message: format!("unknown review kind '{}'", s),
            }
            .into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AiReviewRequest<'a> {
    pub code: &'a str,
    pub problem_statement: &'a str,
    pub problem_name: &'a str,
    pub problem_constraints: &'a str,
    #[serde(rename = "reviewType")]
    pub review_type: ReviewKind,
    pub language: Language,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AiReviewResponse {
    pub review: String,
}
