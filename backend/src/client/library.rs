// src/client/library.rs

//! "My Quizzes": the signed-in user's quizzes with a confirm-before-delete flow.

use crate::client::api::{ApiClient, ApiError};
use crate::models::quiz::Quiz;

#[derive(Debug, Clone, Default)]
pub struct QuizLibrary {
    quizzes: Vec<Quiz>,
    pending_delete: Option<i64>,
}

impl QuizLibrary {
    pub fn new(quizzes: Vec<Quiz>) -> Self {
        Self {
            quizzes,
            pending_delete: None,
        }
    }

    /// Fetches the current user's quizzes.
    pub async fn load(api: &ApiClient) -> Result<Self, ApiError> {
        Ok(Self::new(api.my_quizzes().await?))
    }

    /// Refetches the list. On failure the old list is kept.
    pub async fn reload(&mut self, api: &ApiClient) -> Result<(), ApiError> {
        self.quizzes = api.my_quizzes().await?;
        if let Some(id) = self.pending_delete {
            if !self.contains(id) {
                self.pending_delete = None;
            }
        }
        Ok(())
    }

    pub fn quizzes(&self) -> &[Quiz] {
        &self.quizzes
    }

    pub fn is_empty(&self) -> bool {
        self.quizzes.is_empty()
    }

    fn contains(&self, quiz_id: i64) -> bool {
        self.quizzes.iter().any(|q| q.id == quiz_id)
    }

    pub fn pending_delete(&self) -> Option<&Quiz> {
        let id = self.pending_delete?;
        self.quizzes.iter().find(|q| q.id == id)
    }

    /// Opens the confirmation for `quiz_id`. Returns false if the quiz is not listed.
    pub fn request_delete(&mut self, quiz_id: i64) -> bool {
        if !self.contains(quiz_id) {
            return false;
        }
        self.pending_delete = Some(quiz_id);
        true
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Deletes the quiz awaiting confirmation. The list only changes once the server
    /// has accepted the delete.
    pub async fn confirm_delete(&mut self, api: &ApiClient) -> Result<Option<i64>, ApiError> {
        let Some(id) = self.pending_delete else {
            return Ok(None);
        };
        api.delete_quiz(id).await?;
        self.quizzes.retain(|q| q.id != id);
        self.pending_delete = None;
        tracing::debug!(quiz_id = id, "quiz removed from library");
        Ok(Some(id))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn quiz(id: i64) -> Quiz {
        Quiz {
            id,
            title: format!("Quiz {id}"),
            description: String::new(),
            time_limit: 30,
            passing_score: 70,
            created_by: 1,
            questions: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn delete_request_can_be_cancelled() {
        let mut library = QuizLibrary::new(vec![quiz(1), quiz(2)]);
        assert!(!library.request_delete(9));
        assert!(library.pending_delete().is_none());

        assert!(library.request_delete(2));
        assert_eq!(library.pending_delete().map(|q| q.id), Some(2));

        library.cancel_delete();
        assert!(library.pending_delete().is_none());
        assert_eq!(library.quizzes().len(), 2);
    }
}
