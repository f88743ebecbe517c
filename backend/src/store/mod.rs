// src/store/mod.rs

//! Persistence port. Handlers only ever see `Arc<dyn Storage>`, so a durable
//! backend can replace [`MemStorage`] without touching the API layer.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{
    attempt::{NewQuizAttempt, QuizAttempt},
    quiz::{NewQuiz, Quiz, QuizPatch},
    user::{NewUser, User},
};

mod memory;

pub use memory::MemStorage;

pub type SharedStorage = Arc<dyn Storage>;

#[derive(Debug)]
pub enum StoreError {
    /// The username is already registered. Checked under the same lock as the insert.
    DuplicateUsername(String),
    /// The backing store itself failed. `MemStorage` never reports this; it is the
    /// failure a durable implementation of [`Storage`] returns.
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::DuplicateUsername(name) => write!(f, "username {name} already exists"),
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

pub type StoreResult<T> = Result<T, StoreError>;

/// Record storage for users, quizzes and attempts.
///
/// Implementations assign ids and timestamps and keep usernames unique. Beyond that
/// none of the operations validate input.
/// Listing order is unspecified.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Fails with [`StoreError::DuplicateUsername`] if the name is taken.
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;
    async fn get_user(&self, id: i64) -> StoreResult<Option<User>>;
    /// First user whose username matches exactly.
    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Stores a quiz, backfilling missing question and option ids.
    async fn create_quiz(&self, quiz: NewQuiz) -> StoreResult<Quiz>;
    async fn get_quiz(&self, id: i64) -> StoreResult<Option<Quiz>>;
    async fn get_quizzes_by_user(&self, user_id: i64) -> StoreResult<Vec<Quiz>>;
    async fn get_all_quizzes(&self) -> StoreResult<Vec<Quiz>>;
    /// Shallow-merges the patch. `None` when the quiz does not exist.
    async fn update_quiz(&self, id: i64, patch: QuizPatch) -> StoreResult<Option<Quiz>>;
    /// `true` when a quiz was removed.
    async fn delete_quiz(&self, id: i64) -> StoreResult<bool>;

    async fn create_quiz_attempt(&self, attempt: NewQuizAttempt) -> StoreResult<QuizAttempt>;
    async fn get_quiz_attempts_by_user(&self, user_id: i64) -> StoreResult<Vec<QuizAttempt>>;
    async fn get_quiz_attempts_by_quiz(&self, quiz_id: i64) -> StoreResult<Vec<QuizAttempt>>;
}
