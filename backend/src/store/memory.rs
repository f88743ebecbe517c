// src/store/memory.rs

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{Storage, StoreError, StoreResult};
use crate::models::{
    attempt::{NewQuizAttempt, QuizAttempt},
    quiz::{NewQuiz, Quiz, QuizPatch},
    user::{NewUser, User},
};

/// Records of one kind plus the counter for the next id.
/// Both are only touched under the collection's write lock.
struct Collection<T> {
    next_id: i64,
    records: BTreeMap<i64, T>,
}

impl<T: Clone> Collection<T> {
    fn new() -> Self {
        Self {
            next_id: 1,
            records: BTreeMap::new(),
        }
    }

    fn insert_with(&mut self, build: impl FnOnce(i64) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let record = build(id);
        self.records.insert(id, record.clone());
        record
    }

    fn filtered(&self, keep: impl Fn(&T) -> bool) -> Vec<T> {
        self.records.values().filter(|r| keep(r)).cloned().collect()
    }
}

/// Process-lifetime store. Mutations are serialized per collection.
pub struct MemStorage {
    users: RwLock<Collection<User>>,
    quizzes: RwLock<Collection<Quiz>>,
    attempts: RwLock<Collection<QuizAttempt>>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(Collection::new()),
            quizzes: RwLock::new(Collection::new()),
            attempts: RwLock::new(Collection::new()),
        }
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.records.values().any(|u| u.username == user.username) {
            return Err(StoreError::DuplicateUsername(user.username));
        }
        Ok(users.insert_with(|id| User {
            id,
            username: user.username,
            password_hash: user.password_hash,
        }))
    }

    async fn get_user(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.records.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .records
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_quiz(&self, quiz: NewQuiz) -> StoreResult<Quiz> {
        let mut questions = quiz.questions;
        questions.iter_mut().for_each(|q| q.ensure_ids());

        let mut quizzes = self.quizzes.write().await;
        Ok(quizzes.insert_with(|id| Quiz {
            id,
            title: quiz.title,
            description: quiz.description,
            time_limit: quiz.time_limit,
            passing_score: quiz.passing_score,
            created_by: quiz.created_by,
            questions,
            created_at: Utc::now(),
        }))
    }

    async fn get_quiz(&self, id: i64) -> StoreResult<Option<Quiz>> {
        Ok(self.quizzes.read().await.records.get(&id).cloned())
    }

    async fn get_quizzes_by_user(&self, user_id: i64) -> StoreResult<Vec<Quiz>> {
        let quizzes = self.quizzes.read().await;
        Ok(quizzes.filtered(|q| q.created_by == user_id))
    }

    async fn get_all_quizzes(&self) -> StoreResult<Vec<Quiz>> {
        Ok(self.quizzes.read().await.filtered(|_| true))
    }

    async fn update_quiz(&self, id: i64, mut patch: QuizPatch) -> StoreResult<Option<Quiz>> {
        if let Some(questions) = patch.questions.as_mut() {
            questions.iter_mut().for_each(|q| q.ensure_ids());
        }

        let mut quizzes = self.quizzes.write().await;
        let Some(quiz) = quizzes.records.get_mut(&id) else {
            return Ok(None);
        };
        quiz.apply(patch);
        Ok(Some(quiz.clone()))
    }

    async fn delete_quiz(&self, id: i64) -> StoreResult<bool> {
        Ok(self.quizzes.write().await.records.remove(&id).is_some())
    }

    async fn create_quiz_attempt(&self, attempt: NewQuizAttempt) -> StoreResult<QuizAttempt> {
        let mut attempts = self.attempts.write().await;
        Ok(attempts.insert_with(|id| QuizAttempt {
            id,
            quiz_id: attempt.quiz_id,
            user_id: attempt.user_id,
            score: attempt.score,
            passed: attempt.passed,
            answers: attempt.answers,
            quiz: attempt.quiz,
            completed_at: Utc::now(),
        }))
    }

    async fn get_quiz_attempts_by_user(&self, user_id: i64) -> StoreResult<Vec<QuizAttempt>> {
        let attempts = self.attempts.read().await;
        Ok(attempts.filtered(|a| a.user_id == user_id))
    }

    async fn get_quiz_attempts_by_quiz(&self, quiz_id: i64) -> StoreResult<Vec<QuizAttempt>> {
        let attempts = self.attempts.read().await;
        Ok(attempts.filtered(|a| a.quiz_id == quiz_id))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;
    use crate::models::{
        attempt::QuizSnapshot,
        quiz::{QuizOption, QuizQuestion},
    };

    fn new_quiz(created_by: i64) -> NewQuiz {
        NewQuiz {
            title: "Rust basics".to_string(),
            description: "Ownership and borrowing".to_string(),
            time_limit: 30,
            passing_score: 70,
            created_by,
            questions: vec![QuizQuestion {
                id: String::new(),
                text: "Who owns a moved value?".to_string(),
                options: vec![
                    QuizOption {
                        id: String::new(),
                        text: "The new binding".to_string(),
                        is_correct: true,
                    },
                    QuizOption {
                        id: "keep-me".to_string(),
                        text: "Nobody".to_string(),
                        is_correct: false,
                    },
                ],
                explanation: Some("Moves transfer ownership.".to_string()),
            }],
        }
    }

    fn new_attempt(quiz: &Quiz, user_id: i64) -> NewQuizAttempt {
        NewQuizAttempt {
            quiz_id: quiz.id,
            user_id,
            score: 100,
            passed: true,
            answers: vec![],
            quiz: QuizSnapshot::from(quiz),
        }
    }

    #[tokio::test]
    async fn ids_increase_per_collection() {
        let store = MemStorage::new();
        let a = store
            .create_user(NewUser {
                username: "a".to_string(),
                password_hash: "h".to_string(),
            })
            .await
            .unwrap();
        let b = store
            .create_user(NewUser {
                username: "b".to_string(),
                password_hash: "h".to_string(),
            })
            .await
            .unwrap();
        let quiz = store.create_quiz(new_quiz(a.id)).await.unwrap();

        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(quiz.id, 1);
    }

    #[tokio::test]
    async fn user_lookup_by_name() {
        let store = MemStorage::new();
        let created = store
            .create_user(NewUser {
                username: "alice".to_string(),
                password_hash: "h".to_string(),
            })
            .await
            .unwrap();

        let found = store.get_user_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert!(store.get_user_by_username("bob").await.unwrap().is_none());
        assert!(store.get_user(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_is_refused() {
        let store = MemStorage::new();
        let user = || NewUser {
            username: "alice".to_string(),
            password_hash: "h".to_string(),
        };
        store.create_user(user()).await.unwrap();

        let err = store.create_user(user()).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateUsername(name) if name == "alice"));
        assert!(store.get_user(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn concurrent_same_name_creates_store_one_user() {
        let store = Arc::new(MemStorage::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .create_user(NewUser {
                            username: "racer".to_string(),
                            password_hash: "h".to_string(),
                        })
                        .await
                        .is_ok()
                })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
    }

    #[tokio::test]
    async fn create_quiz_backfills_ids_and_reads_back_equal() {
        let store = MemStorage::new();
        let quiz = store.create_quiz(new_quiz(1)).await.unwrap();

        let question = &quiz.questions[0];
        assert!(!question.id.is_empty());
        assert!(!question.options[0].id.is_empty());
        assert_eq!(question.options[1].id, "keep-me");

        let fetched = store.get_quiz(quiz.id).await.unwrap().unwrap();
        assert_eq!(fetched, quiz);
    }

    #[tokio::test]
    async fn update_merges_and_reports_missing() {
        let store = MemStorage::new();
        let quiz = store.create_quiz(new_quiz(1)).await.unwrap();

        let updated = store
            .update_quiz(
                quiz.id,
                QuizPatch {
                    title: Some("Advanced Rust".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Advanced Rust");
        assert_eq!(updated.questions, quiz.questions);
        assert_eq!(updated.created_at, quiz.created_at);

        let missing = store.update_quiz(42, QuizPatch::default()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn delete_keeps_attempts() {
        let store = MemStorage::new();
        let quiz = store.create_quiz(new_quiz(1)).await.unwrap();
        store.create_quiz_attempt(new_attempt(&quiz, 2)).await.unwrap();

        assert!(store.delete_quiz(quiz.id).await.unwrap());
        assert!(!store.delete_quiz(quiz.id).await.unwrap());

        let orphaned = store.get_quiz_attempts_by_user(2).await.unwrap();
        assert_eq!(orphaned.len(), 1);
        assert_eq!(orphaned[0].quiz.title, "Rust basics");
    }

    #[tokio::test]
    async fn filters_by_owner_and_quiz() {
        let store = MemStorage::new();
        let mine = store.create_quiz(new_quiz(1)).await.unwrap();
        let theirs = store.create_quiz(new_quiz(2)).await.unwrap();
        store.create_quiz_attempt(new_attempt(&mine, 3)).await.unwrap();
        store.create_quiz_attempt(new_attempt(&theirs, 3)).await.unwrap();
        store.create_quiz_attempt(new_attempt(&mine, 4)).await.unwrap();

        assert_eq!(store.get_quizzes_by_user(1).await.unwrap().len(), 1);
        assert_eq!(store.get_all_quizzes().await.unwrap().len(), 2);
        assert_eq!(store.get_quiz_attempts_by_user(3).await.unwrap().len(), 2);
        assert_eq!(store.get_quiz_attempts_by_quiz(mine.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn concurrent_creates_get_distinct_ids() {
        let store = Arc::new(MemStorage::new());
        let handles: Vec<_> = (0..32)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .create_user(NewUser {
                            username: format!("user{i}"),
                            password_hash: "h".to_string(),
                        })
                        .await
                        .unwrap()
                        .id
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap());
        }
        assert_eq!(ids.len(), 32);
        assert_eq!(ids.iter().max(), Some(&32));
    }
}
