// src/client/results.rs

//! Review of a finished attempt, built from the quiz snapshot stored with it.

use crate::models::attempt::{QuizAnswer, QuizAttempt};

pub const UNKNOWN_OPTION: &str = "Unknown option";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSummary {
    pub quiz_title: String,
    pub score: i64,
    pub passing_score: i64,
    pub passed: bool,
    pub correct_answers: usize,
    pub total_questions: usize,
}

impl ResultSummary {
    pub fn from_attempt(attempt: &QuizAttempt) -> Self {
        let correct_answers = attempt
            .quiz
            .questions
            .iter()
            .filter(|q| latest_answer(attempt, &q.id).is_some_and(|a| a.correct))
            .count();

        Self {
            quiz_title: attempt.quiz.title.clone(),
            score: attempt.score,
            passing_score: attempt.quiz.passing_score,
            passed: attempt.passed,
            correct_answers,
            total_questions: attempt.quiz.questions.len(),
        }
    }

    /// "You scored 3 out of 4 questions correctly."
    pub fn headline(&self) -> String {
        format!(
            "You scored {} out of {} questions correctly.",
            self.correct_answers, self.total_questions
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
    /// No answer, or the timer ran out.
    Unanswered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionReview {
    pub question_id: String,
    pub question_text: String,
    pub outcome: Outcome,
    /// Text of the chosen option. `None` when unanswered.
    pub selected_text: Option<String>,
    pub correct_text: Option<String>,
    pub explanation: Option<String>,
}

fn latest_answer<'a>(attempt: &'a QuizAttempt, question_id: &str) -> Option<&'a QuizAnswer> {
    attempt
        .answers
        .iter()
        .rev()
        .find(|a| a.question_id == question_id)
}

/// One entry per question of the snapshot, in quiz order.
pub fn review(attempt: &QuizAttempt) -> Vec<QuestionReview> {
    attempt
        .quiz
        .questions
        .iter()
        .map(|question| {
            let answer = latest_answer(attempt, &question.id)
                .filter(|a| !a.selected_option_id.is_empty());

            let (outcome, selected_text) = match answer {
                None => (Outcome::Unanswered, None),
                Some(answer) => {
                    let text = question
                        .option(&answer.selected_option_id)
                        .map_or_else(|| UNKNOWN_OPTION.to_string(), |o| o.text.clone());
                    let outcome = if answer.correct {
                        Outcome::Correct
                    } else {
                        Outcome::Incorrect
                    };
                    (outcome, Some(text))
                }
            };

            QuestionReview {
                question_id: question.id.clone(),
                question_text: question.text.clone(),
                outcome,
                selected_text,
                correct_text: question.correct_option().map(|o| o.text.clone()),
                explanation: question.explanation.clone(),
            }
        })
        .collect()
}
