// src/models/quiz.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// One selectable answer choice within a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOption {
    /// Opaque token. Empty until the store backfills it.
    #[serde(default)]
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// A multiple-choice question embedded in a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    #[serde(default)]
    pub id: String,
    pub text: String,
    pub options: Vec<QuizOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl QuizQuestion {
    pub fn correct_option(&self) -> Option<&QuizOption> {
        self.options.iter().find(|o| o.is_correct)
    }

    pub fn option(&self, option_id: &str) -> Option<&QuizOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    /// True when `option_id` names one of this question's correct options.
    pub fn is_correct_choice(&self, option_id: &str) -> bool {
        self.option(option_id).is_some_and(|o| o.is_correct)
    }

    /// Assigns fresh ids to the question and any of its options that lack one.
    /// Existing ids are left untouched.
    pub fn ensure_ids(&mut self) {
        if self.id.is_empty() {
            self.id = Uuid::new_v4().to_string();
        }
        for option in &mut self.options {
            if option.id.is_empty() {
                option.id = Uuid::new_v4().to_string();
            }
        }
    }
}

/// Represents a stored quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Seconds allowed per question.
    pub time_limit: i64,
    /// Percentage needed to pass.
    pub passing_score: i64,
    pub created_by: i64,
    pub questions: Vec<QuizQuestion>,
    pub created_at: DateTime<Utc>,
}

impl Quiz {
    pub fn question(&self, question_id: &str) -> Option<&QuizQuestion> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    /// Shallow merge: every field present in the patch replaces the stored one.
    pub fn apply(&mut self, patch: QuizPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(time_limit) = patch.time_limit {
            self.time_limit = time_limit;
        }
        if let Some(passing_score) = patch.passing_score {
            self.passing_score = passing_score;
        }
        if let Some(questions) = patch.questions {
            self.questions = questions;
        }
    }
}

/// Validated data for a quiz that does not exist yet.
#[derive(Debug, Clone)]
pub struct NewQuiz {
    pub title: String,
    pub description: String,
    pub time_limit: i64,
    pub passing_score: i64,
    pub created_by: i64,
    pub questions: Vec<QuizQuestion>,
}

/// Validated partial update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct QuizPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub time_limit: Option<i64>,
    pub passing_score: Option<i64>,
    pub questions: Option<Vec<QuizQuestion>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OptionInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[validate(
        required(message = "Option text is required"),
        length(min = 1, message = "Option text is required")
    )]
    pub text: Option<String>,
    #[serde(default)]
    pub is_correct: bool,
}

impl From<OptionInput> for QuizOption {
    fn from(input: OptionInput) -> Self {
        Self {
            id: input.id.unwrap_or_default(),
            text: input.text.unwrap_or_default(),
            is_correct: input.is_correct,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = validate_options, skip_on_field_errors = false))]
pub struct QuestionInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[validate(
        required(message = "Question text is required"),
        length(min = 1, message = "Question text is required")
    )]
    pub text: Option<String>,
    #[validate(required(message = "Options are required"), nested)]
    pub options: Option<Vec<OptionInput>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl From<QuestionInput> for QuizQuestion {
    fn from(input: QuestionInput) -> Self {
        Self {
            id: input.id.unwrap_or_default(),
            text: input.text.unwrap_or_default(),
            options: input
                .options
                .unwrap_or_default()
                .into_iter()
                .map(QuizOption::from)
                .collect(),
            explanation: input.explanation,
        }
    }
}

/// At least two options, exactly one of them correct.
///
/// Checked on the whole question so the count rules never collide with the
/// per-option errors reported under `options`.
fn validate_options(question: &QuestionInput) -> Result<(), ValidationError> {
    let Some(options) = &question.options else {
        return Ok(());
    };
    if options.len() < 2 {
        return Err(ValidationError::new("too_few_options")
            .with_message("At least two options are required".into()));
    }
    if options.iter().filter(|o| o.is_correct).count() != 1 {
        return Err(ValidationError::new("single_correct_option")
            .with_message("Exactly one option must be marked correct".into()));
    }
    Ok(())
}

/// DTO for creating a new quiz. Ids of questions and options are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizRequest {
    #[validate(
        required(message = "Title is required"),
        length(min = 1, message = "Title is required")
    )]
    pub title: Option<String>,
    #[validate(
        required(message = "Description is required"),
        length(min = 1, message = "Description is required")
    )]
    pub description: Option<String>,
    #[validate(
        required(message = "Time limit is required"),
        range(
            min = 5,
            max = 300,
            message = "Time limit must be between 5 and 300 seconds"
        )
    )]
    pub time_limit: Option<i64>,
    #[validate(
        required(message = "Passing score is required"),
        range(min = 1, max = 100, message = "Passing score must be between 1 and 100")
    )]
    pub passing_score: Option<i64>,
    #[validate(
        required(message = "At least one question is required"),
        length(min = 1, message = "At least one question is required"),
        nested
    )]
    pub questions: Option<Vec<QuestionInput>>,
}

impl CreateQuizRequest {
    /// Call only after `validate()` succeeded.
    pub fn into_new_quiz(self, created_by: i64) -> NewQuiz {
        NewQuiz {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            time_limit: self.time_limit.unwrap_or_default(),
            passing_score: self.passing_score.unwrap_or_default(),
            created_by,
            questions: into_questions(self.questions.unwrap_or_default()),
        }
    }
}

/// DTO for a partial quiz update. Absent fields are not validated and not changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuizRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: Option<String>,
    #[validate(range(
        min = 5,
        max = 300,
        message = "Time limit must be between 5 and 300 seconds"
    ))]
    pub time_limit: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "Passing score must be between 1 and 100"))]
    pub passing_score: Option<i64>,
    #[validate(length(min = 1, message = "At least one question is required"), nested)]
    pub questions: Option<Vec<QuestionInput>>,
}

impl UpdateQuizRequest {
    pub fn into_patch(self) -> QuizPatch {
        QuizPatch {
            title: self.title,
            description: self.description,
            time_limit: self.time_limit,
            passing_score: self.passing_score,
            questions: self.questions.map(into_questions),
        }
    }
}

fn into_questions(inputs: Vec<QuestionInput>) -> Vec<QuizQuestion> {
    inputs.into_iter().map(QuizQuestion::from).collect()
}
