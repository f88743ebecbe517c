// src/models/attempt.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::quiz::{Quiz, QuizQuestion};

/// The judgment of one answered question.
/// An empty `selected_option_id` means the question timed out unanswered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswer {
    pub question_id: String,
    pub selected_option_id: String,
    pub correct: bool,
}

/// The parts of a quiz needed to review an attempt, frozen at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSnapshot {
    pub title: String,
    pub passing_score: i64,
    pub questions: Vec<QuizQuestion>,
}

impl From<&Quiz> for QuizSnapshot {
    fn from(quiz: &Quiz) -> Self {
        Self {
            title: quiz.title.clone(),
            passing_score: quiz.passing_score,
            questions: quiz.questions.clone(),
        }
    }
}

/// Represents one completed run of a quiz. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttempt {
    pub id: i64,
    pub quiz_id: i64,
    pub user_id: i64,
    /// Percentage score.
    pub score: i64,
    pub passed: bool,
    pub answers: Vec<QuizAnswer>,
    pub quiz: QuizSnapshot,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewQuizAttempt {
    pub quiz_id: i64,
    pub user_id: i64,
    pub score: i64,
    pub passed: bool,
    pub answers: Vec<QuizAnswer>,
    pub quiz: QuizSnapshot,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnswerInput {
    #[validate(required(message = "Question id is required"))]
    pub question_id: Option<String>,
    #[validate(required(message = "Selected option id is required"))]
    pub selected_option_id: Option<String>,
    #[validate(required(message = "Correct flag is required"))]
    pub correct: Option<bool>,
}

/// DTO for submitting a quiz attempt.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SubmitAttemptRequest {
    #[validate(required(message = "Answers are required"), nested)]
    pub answers: Option<Vec<AnswerInput>>,
}

impl SubmitAttemptRequest {
    /// Call only after `validate()` succeeded.
    pub fn into_answers(self) -> Vec<QuizAnswer> {
        self.answers
            .unwrap_or_default()
            .into_iter()
            .map(|a| QuizAnswer {
                question_id: a.question_id.unwrap_or_default(),
                selected_option_id: a.selected_option_id.unwrap_or_default(),
                correct: a.correct.unwrap_or_default(),
            })
            .collect()
    }
}

/// `num / den` rounded half up, for non-negative operands. Zero when `den` is zero.
pub fn round_div(num: i64, den: i64) -> i64 {
    if den <= 0 {
        return 0;
    }
    (2 * num + den) / (2 * den)
}

/// Outcome of grading a submission against a quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grade {
    pub answers: Vec<QuizAnswer>,
    pub correct_questions: usize,
    pub score: i64,
    pub passed: bool,
}

/// Grades submitted answers against the stored quiz.
///
/// The client's `correct` flag is only a hint: each answer is re-judged by looking up
/// the selected option in the stored question. When several answers name the same
/// question the last one counts. The score divides by the quiz's question count, so
/// unanswered questions lower it.
pub fn grade(quiz: &Quiz, answers: Vec<QuizAnswer>) -> Grade {
    let answers: Vec<QuizAnswer> = answers
        .into_iter()
        .map(|answer| {
            let correct = quiz
                .question(&answer.question_id)
                .is_some_and(|q| q.is_correct_choice(&answer.selected_option_id));
            if correct != answer.correct {
                tracing::debug!(
                    question_id = %answer.question_id,
                    claimed = answer.correct,
                    "client correctness hint overridden"
                );
            }
            QuizAnswer { correct, ..answer }
        })
        .collect();

    let mut latest: HashMap<&str, bool> = HashMap::new();
    for answer in &answers {
        latest.insert(answer.question_id.as_str(), answer.correct);
    }
    let correct_questions = quiz
        .questions
        .iter()
        .filter(|q| latest.get(q.id.as_str()).copied().unwrap_or(false))
        .count();

    let total = i64::try_from(quiz.questions.len()).unwrap_or(i64::MAX);
    let correct = i64::try_from(correct_questions).unwrap_or(0);
    let score = round_div(100 * correct, total);

    Grade {
        answers,
        correct_questions,
        score,
        passed: score >= quiz.passing_score,
    }
}
