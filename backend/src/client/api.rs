// src/client/api.rs

//! Typed HTTP client for the REST API. Keeps the session cookie between calls.

use std::fmt;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use url::Url;

use crate::models::{
    attempt::{QuizAnswer, QuizAttempt},
    quiz::{CreateQuizRequest, Quiz, UpdateQuizRequest},
    user::UserResponse,
};

#[derive(Debug)]
pub enum ApiError {
    /// The request never produced a response.
    Transport(reqwest::Error),
    /// The server answered with a non-success status.
    Status { status: StatusCode, message: String },
    InvalidUrl(url::ParseError),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(err) => write!(f, "request failed: {err}"),
            ApiError::Status { status, message } => write!(f, "{status}: {message}"),
            ApiError::InvalidUrl(err) => write!(f, "invalid url: {err}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err)
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::InvalidUrl(err)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    /// `base` is the server origin, e.g. `http://127.0.0.1:3000`.
    pub fn new(base: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base: Url::parse(base)?,
        })
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        Ok(self.http.request(method, self.base.join(path)?))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed"))
                .to_string();
            return Err(ApiError::Status { status, message });
        }
        Ok(response.json().await?)
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<UserResponse, ApiError> {
        let request = self
            .request(Method::POST, "/api/auth/register")?
            .json(&Credentials { username, password });
        self.send(request).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<UserResponse, ApiError> {
        let request = self
            .request(Method::POST, "/api/auth/login")?
            .json(&Credentials { username, password });
        self.send(request).await
    }

    pub async fn logout(&self) -> Result<MessageResponse, ApiError> {
        self.send(self.request(Method::POST, "/api/auth/logout")?).await
    }

    pub async fn me(&self) -> Result<UserResponse, ApiError> {
        self.send(self.request(Method::GET, "/api/auth/me")?).await
    }

    pub async fn create_quiz(&self, quiz: &CreateQuizRequest) -> Result<Quiz, ApiError> {
        let request = self.request(Method::POST, "/api/quizzes")?.json(quiz);
        self.send(request).await
    }

    pub async fn list_quizzes(&self) -> Result<Vec<Quiz>, ApiError> {
        self.send(self.request(Method::GET, "/api/quizzes")?).await
    }

    pub async fn my_quizzes(&self) -> Result<Vec<Quiz>, ApiError> {
        self.send(self.request(Method::GET, "/api/quizzes/me")?).await
    }

    pub async fn get_quiz(&self, id: i64) -> Result<Quiz, ApiError> {
        self.send(self.request(Method::GET, &format!("/api/quizzes/{id}"))?)
            .await
    }

    pub async fn update_quiz(&self, id: i64, patch: &UpdateQuizRequest) -> Result<Quiz, ApiError> {
        let request = self
            .request(Method::PUT, &format!("/api/quizzes/{id}"))?
            .json(patch);
        self.send(request).await
    }

    pub async fn delete_quiz(&self, id: i64) -> Result<MessageResponse, ApiError> {
        self.send(self.request(Method::DELETE, &format!("/api/quizzes/{id}"))?)
            .await
    }

    pub async fn submit_attempt(
        &self,
        quiz_id: i64,
        answers: &[QuizAnswer],
    ) -> Result<QuizAttempt, ApiError> {
        let request = self
            .request(Method::POST, &format!("/api/quizzes/{quiz_id}/attempt"))?
            .json(&json!({ "answers": answers }));
        self.send(request).await
    }

    pub async fn my_attempts(&self) -> Result<Vec<QuizAttempt>, ApiError> {
        self.send(self.request(Method::GET, "/api/quiz-attempts/me")?)
            .await
    }

    pub async fn quiz_attempts(&self, quiz_id: i64) -> Result<Vec<QuizAttempt>, ApiError> {
        self.send(self.request(Method::GET, &format!("/api/quizzes/{quiz_id}/attempts"))?)
            .await
    }
}
