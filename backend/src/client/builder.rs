// src/client/builder.rs

//! Draft state behind the "create quiz" form.

use std::fmt;

use uuid::Uuid;

use crate::models::quiz::{CreateQuizRequest, OptionInput, QuestionInput};

pub const DEFAULT_TIME_LIMIT: i64 = 30;
pub const DEFAULT_PASSING_SCORE: i64 = 70;
const DEFAULT_OPTION_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuilderError {
    /// The only remaining question cannot be deleted.
    LastQuestion,
    /// A question cannot drop below two options.
    TooFewOptions,
    UnknownQuestion(String),
    UnknownOption(String),
    /// Pre-submission check failed.
    Invalid(String),
}

impl fmt::Display for BuilderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuilderError::LastQuestion => f.write_str("A quiz must have at least one question"),
            BuilderError::TooFewOptions => f.write_str("A question must keep at least two options"),
            BuilderError::UnknownQuestion(id) => write!(f, "No question with id {id}"),
            BuilderError::UnknownOption(id) => write!(f, "No option with id {id}"),
            BuilderError::Invalid(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for BuilderError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDraft {
    pub id: String,
    pub text: String,
    pub is_correct: bool,
}

impl OptionDraft {
    fn blank(is_correct: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: String::new(),
            is_correct,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub id: String,
    pub text: String,
    pub options: Vec<OptionDraft>,
    pub explanation: String,
}

impl QuestionDraft {
    /// Four blank options, the first one marked correct.
    fn blank() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: String::new(),
            options: (0..DEFAULT_OPTION_COUNT)
                .map(|i| OptionDraft::blank(i == 0))
                .collect(),
            explanation: String::new(),
        }
    }

    fn option_mut(&mut self, option_id: &str) -> Result<&mut OptionDraft, BuilderError> {
        self.options
            .iter_mut()
            .find(|o| o.id == option_id)
            .ok_or_else(|| BuilderError::UnknownOption(option_id.to_string()))
    }
}

/// An ordered, editable list of question drafts plus the quiz details.
#[derive(Debug, Clone)]
pub struct QuizBuilder {
    pub title: String,
    pub description: String,
    pub time_limit: i64,
    pub passing_score: i64,
    questions: Vec<QuestionDraft>,
}

impl Default for QuizBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizBuilder {
    /// Starts with one blank question.
    pub fn new() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            time_limit: DEFAULT_TIME_LIMIT,
            passing_score: DEFAULT_PASSING_SCORE,
            questions: vec![QuestionDraft::blank()],
        }
    }

    pub fn questions(&self) -> &[QuestionDraft] {
        &self.questions
    }

    pub fn question(&self, question_id: &str) -> Option<&QuestionDraft> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    fn question_mut(&mut self, question_id: &str) -> Result<&mut QuestionDraft, BuilderError> {
        self.questions
            .iter_mut()
            .find(|q| q.id == question_id)
            .ok_or_else(|| BuilderError::UnknownQuestion(question_id.to_string()))
    }

    /// Appends a blank question and returns its id.
    pub fn add_question(&mut self) -> String {
        let question = QuestionDraft::blank();
        let id = question.id.clone();
        self.questions.push(question);
        id
    }

    pub fn delete_question(&mut self, question_id: &str) -> Result<(), BuilderError> {
        let index = self
            .questions
            .iter()
            .position(|q| q.id == question_id)
            .ok_or_else(|| BuilderError::UnknownQuestion(question_id.to_string()))?;
        if self.questions.len() <= 1 {
            return Err(BuilderError::LastQuestion);
        }
        self.questions.remove(index);
        Ok(())
    }

    pub fn set_question_text(&mut self, question_id: &str, text: &str) -> Result<(), BuilderError> {
        self.question_mut(question_id)?.text = text.to_string();
        Ok(())
    }

    pub fn set_explanation(&mut self, question_id: &str, text: &str) -> Result<(), BuilderError> {
        self.question_mut(question_id)?.explanation = text.to_string();
        Ok(())
    }

    /// Appends a blank, non-correct option and returns its id.
    pub fn add_option(&mut self, question_id: &str) -> Result<String, BuilderError> {
        let option = OptionDraft::blank(false);
        let id = option.id.clone();
        self.question_mut(question_id)?.options.push(option);
        Ok(id)
    }

    pub fn set_option_text(
        &mut self,
        question_id: &str,
        option_id: &str,
        text: &str,
    ) -> Result<(), BuilderError> {
        self.question_mut(question_id)?.option_mut(option_id)?.text = text.to_string();
        Ok(())
    }

    /// Removes an option. Refused when only two remain. Removing the correct
    /// option makes the first remaining one correct.
    pub fn remove_option(&mut self, question_id: &str, option_id: &str) -> Result<(), BuilderError> {
        let question = self.question_mut(question_id)?;
        let index = question
            .options
            .iter()
            .position(|o| o.id == option_id)
            .ok_or_else(|| BuilderError::UnknownOption(option_id.to_string()))?;
        if question.options.len() <= 2 {
            return Err(BuilderError::TooFewOptions);
        }

        let removed = question.options.remove(index);
        if removed.is_correct {
            if let Some(first) = question.options.first_mut() {
                first.is_correct = true;
            }
        }
        Ok(())
    }

    /// Makes `option_id` the only correct option of its question.
    pub fn mark_correct(&mut self, question_id: &str, option_id: &str) -> Result<(), BuilderError> {
        let question = self.question_mut(question_id)?;
        if !question.options.iter().any(|o| o.id == option_id) {
            return Err(BuilderError::UnknownOption(option_id.to_string()));
        }
        for option in &mut question.options {
            option.is_correct = option.id == option_id;
        }
        Ok(())
    }

    /// Checks the form before anything is sent. Reports the first problem found.
    pub fn validate(&self) -> Result<(), BuilderError> {
        let invalid = |msg: String| Err(BuilderError::Invalid(msg));

        if self.title.trim().is_empty() {
            return invalid("Title is required".to_string());
        }
        if self.description.trim().is_empty() {
            return invalid("Description is required".to_string());
        }
        if !(5..=300).contains(&self.time_limit) {
            return invalid("Time limit must be between 5 and 300 seconds".to_string());
        }
        if !(1..=100).contains(&self.passing_score) {
            return invalid("Passing score must be between 1% and 100%".to_string());
        }
        if self.questions.is_empty() {
            return invalid("Add at least one question to your quiz".to_string());
        }

        for (index, question) in self.questions.iter().enumerate() {
            let number = index + 1;
            if question.text.trim().is_empty() {
                return invalid(format!("Question {number} is missing text"));
            }
            let filled = question
                .options
                .iter()
                .filter(|o| !o.text.trim().is_empty());
            if filled.clone().count() < 2 {
                return invalid(format!("Question {number} needs at least 2 options"));
            }
            // The correct option must survive the empty-option cleanup.
            if !filled.into_iter().any(|o| o.is_correct) {
                return invalid(format!("Question {number} needs a correct answer"));
            }
        }
        Ok(())
    }

    /// Validates, then builds the request body with empty options stripped.
    pub fn to_request(&self) -> Result<CreateQuizRequest, BuilderError> {
        self.validate()?;

        let questions = self
            .questions
            .iter()
            .map(|q| QuestionInput {
                id: Some(q.id.clone()),
                text: Some(q.text.clone()),
                options: Some(
                    q.options
                        .iter()
                        .filter(|o| !o.text.trim().is_empty())
                        .map(|o| OptionInput {
                            id: Some(o.id.clone()),
                            text: Some(o.text.clone()),
                            is_correct: o.is_correct,
                        })
                        .collect(),
                ),
                explanation: Some(q.explanation.clone()).filter(|e| !e.trim().is_empty()),
            })
            .collect();

        Ok(CreateQuizRequest {
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
            time_limit: Some(self.time_limit),
            passing_score: Some(self.passing_score),
            questions: Some(questions),
        })
    }
}
