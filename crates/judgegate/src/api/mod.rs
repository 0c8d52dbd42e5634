//! Typed client for the judge API.
//!
//! Every authenticated call goes through [`AuthenticatedGateway::send`], so
//! expiry handling lives in one place. Login and registration establish the
//! session and therefore bypass it.

mod types;

pub use types::{
    AuthResponse, Difficulty, IssuedTokens, Language, ProblemDetail, ProblemSummary, ReviewKind,
    RunResult, SavedCode, SubmitResult, Submission, Tag, TestExample, User,
};

use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use judgegate_core::{AccessToken, ApiRequest, Error, RefreshToken, Result};

use crate::gateway::AuthenticatedGateway;
use types::{
    AiReviewRequest, AiReviewResponse, LoginRequest, LogoutRequest, RegisterRequest, RunRequest,
    SavedCodeResponse, SubmissionsResponse, SubmitRequest,
};

pub const LOGIN: &str = "login/";
pub const REGISTER: &str = "register/";
pub const LOGOUT: &str = "logout/";
pub const USER: &str = "user/";
pub const PROBLEMS: &str = "problems/";
pub const TAGS: &str = "tags/";
pub const RUN: &str = "execute/run/";
pub const SUBMIT: &str = "execute/submit/";
pub const SAVE_CODE: &str = "save-code/";
pub const SUBMISSIONS: &str = "submissions/";
pub const AI_REVIEW: &str = "ai-review/";

/// Statuses the judge uses to report a run or verdict it could not accept.
const VERDICT_STATUSES: [u16; 3] = [400, 408, 500];

/// Client for the judge's REST endpoints.
#[derive(Debug, Clone)]
pub struct JudgeApi {
    gateway: AuthenticatedGateway,
}

impl JudgeApi {
    pub fn new(gateway: AuthenticatedGateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &AuthenticatedGateway {
        &self.gateway
    }

    // ========================================================================
    // Session
    // ========================================================================

    /// Log in and store the issued tokens.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        info!("Logging in");
        let request = ApiRequest::post(LOGIN).json(&LoginRequest { email, password })?;
        let response: AuthResponse = self.gateway.send_unauthenticated(request).await?.json()?;
        self.store_issued(&response);
        Ok(response)
    }

    /// Create an account and store the issued tokens.
    #[instrument(skip(self, password1, password2))]
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password1: &str,
        password2: &str,
    ) -> Result<AuthResponse> {
        info!("Registering account");
        let request = ApiRequest::post(REGISTER).json(&RegisterRequest {
            username,
            email,
            password1,
            password2,
        })?;
        let response: AuthResponse = self.gateway.send_unauthenticated(request).await?.json()?;
        self.store_issued(&response);
        Ok(response)
    }

    /// Revoke the refresh token on the server and forget local credentials.
    ///
    /// Local credentials are cleared whatever the server answers. An already
    /// expired session counts as logged out. If the logout call itself
    /// triggered a refresh that rotated the refresh token, the rotated token
    /// is revoked as well.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        let store = self.gateway.store();
        let mut result = Ok(());
        let mut revoked: Option<RefreshToken> = None;

        while let Some(refresh) = store.refresh_token() {
            if revoked.as_ref() == Some(&refresh) {
                break;
            }
            debug!(rotated = revoked.is_some(), "Revoking refresh token");
            result = self
                .gateway
                .post_json_no_response(
                    LOGOUT,
                    &LogoutRequest {
                        refresh: refresh.as_str(),
                    },
                )
                .await;
            revoked = Some(refresh);
        }
        store.clear();

        match result {
            Err(Error::SessionExpired(_)) => Ok(()),
            other => other,
        }
    }

    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<User> {
        self.gateway.get_json(USER).await
    }

    // ========================================================================
    // Problems
    // ========================================================================

    #[instrument(skip(self))]
    pub async fn problems(&self, difficulty: Option<Difficulty>) -> Result<Vec<ProblemSummary>> {
        let request = ApiRequest::get(PROBLEMS).query_opt("difficulty", difficulty);
        self.gateway.send_json(request).await
    }

    #[instrument(skip(self))]
    pub async fn problem(&self, id: u64) -> Result<ProblemDetail> {
        self.gateway.get_json(&format!("{}{}/", PROBLEMS, id)).await
    }

    #[instrument(skip(self))]
    pub async fn tags(&self) -> Result<Vec<Tag>> {
        self.gateway.get_json(TAGS).await
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Run code against custom input.
    ///
    /// Compilation errors, runtime errors and timeouts come back as a
    /// [`RunResult`] rather than an error.
    #[instrument(skip(self, code, input))]
    pub async fn run_code(&self, code: &str, input: &str, language: Language) -> Result<RunResult> {
        let request = ApiRequest::post(RUN).json(&RunRequest {
            code,
            user_input: input,
            language,
        })?;
        verdict_or_error(self.gateway.send_json(request).await)
    }

    /// Submit code for judging against the hidden test cases.
    #[instrument(skip(self, code))]
    pub async fn submit_code(
        &self,
        user_id: u64,
        problem_id: u64,
        code: &str,
        language: Language,
    ) -> Result<SubmitResult> {
        let request = ApiRequest::post(SUBMIT).json(&SubmitRequest {
            user_id,
            problem_id,
            code,
            language,
        })?;
        verdict_or_error(self.gateway.send_json(request).await)
    }

    #[instrument(skip(self, saved), fields(problem_id = saved.problem_id))]
    pub async fn save_code(&self, saved: &SavedCode) -> Result<()> {
        self.gateway.post_json_no_response(SAVE_CODE, saved).await
    }

    /// Fetch previously saved code, if any.
    #[instrument(skip(self))]
    pub async fn saved_code(
        &self,
        user_id: u64,
        problem_id: u64,
        language: Language,
    ) -> Result<Option<String>> {
        let request = ApiRequest::get(SAVE_CODE)
            .query("user_id", user_id)
            .query("problem_id", problem_id)
            .query("language", language);

        match self.gateway.send_json::<SavedCodeResponse>(request).await {
            Ok(response) => Ok(response.code),
            Err(Error::Http(err)) if err.status == 404 => {
                debug!("No saved code");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    // ========================================================================
    // Submissions
    // ========================================================================

    #[instrument(skip(self))]
    pub async fn submissions(&self, user_id: u64) -> Result<Vec<Submission>> {
        let response: SubmissionsResponse = self
            .gateway
            .get_json(&format!("{}{}", SUBMISSIONS, user_id))
            .await?;
        Ok(response.submissions)
    }

    #[instrument(skip(self))]
    pub async fn problem_submissions(
        &self,
        user_id: u64,
        problem_name: &str,
    ) -> Result<Vec<Submission>> {
        let path = format!(
            "{}{}/{}",
            SUBMISSIONS,
            user_id,
            urlencoding::encode(problem_name)
        );
        let response: SubmissionsResponse = self.gateway.get_json(&path).await?;
        Ok(response.submissions)
    }

    // ========================================================================
    // AI review
    // ========================================================================

    /// Ask the judge's AI reviewer about `code` written for `problem`.
    ///
    /// Returns the review text as the server produced it.
    #[instrument(skip(self, problem, code), fields(problem_id = problem.id))]
    pub async fn ai_review(
        &self,
        kind: ReviewKind,
        problem: &ProblemDetail,
        code: &str,
        language: Language,
    ) -> Result<String> {
        let request = AiReviewRequest {
            code,
            problem_statement: &problem.problem_statement,
            problem_name: &problem.problem_name,
            problem_constraints: &problem.constraints,
            review_type: kind,
            language,
        };
        let response: AiReviewResponse = self.gateway.post_json(AI_REVIEW, &request).await?;
        Ok(response.review)
    }

    fn store_issued(&self, response: &AuthResponse) {
        if let Some(tokens) = &response.tokens {
            self.gateway.store().set_tokens(
                AccessToken::new(tokens.access.clone()),
                Some(RefreshToken::new(tokens.refresh.clone())),
            );
            debug!("Stored issued tokens");
        }
    }
}

/// Treat a judge verdict delivered with an error status as a value.
fn verdict_or_error<T: DeserializeOwned>(result: Result<T>) -> Result<T> {
    match result {
        Err(Error::Http(err)) if VERDICT_STATUSES.contains(&err.status) => {
            serde_json::from_slice(&err.body).map_err(|_| Error::Http(err))
        }
        other => other,
    }
}
