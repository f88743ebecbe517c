// src/client/runner.rs

//! Timed quiz runner: one question at a time, each with its own countdown.
//!
//! The runner is driven by its owner's event loop. Call [`QuizRunner::tick`] once per
//! second while a question is on screen; navigation away from the quiz simply stops
//! the ticks.

use std::fmt;

use crate::client::api::{ApiClient, ApiError};
use crate::models::attempt::{QuizAnswer, QuizAttempt};
use crate::models::quiz::{Quiz, QuizQuestion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Calm,
    Warning,
    Critical,
}

/// Seconds left on the active question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    limit: u32,
    remaining: u32,
}

impl Countdown {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            remaining: limit,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// Counts down one second. Returns true on the tick that reaches zero.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }

    pub fn reset(&mut self) {
        self.remaining = self.limit;
    }

    /// `mm:ss`
    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.remaining / 60, self.remaining % 60)
    }

    pub fn urgency(&self) -> Urgency {
        if self.limit == 0 {
            return Urgency::Critical;
        }
        // Compare remaining/limit against 1/2 and 1/5 without floats.
        let remaining = u64::from(self.remaining);
        let limit = u64::from(self.limit);
        if remaining * 2 > limit {
            Urgency::Calm
        } else if remaining * 5 > limit {
            Urgency::Warning
        } else {
            Urgency::Critical
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Quiz details shown, timer not running.
    Intro,
    InProgress,
    /// Answers handed off, waiting for the server.
    Submitting,
    Finished { attempt_id: i64 },
}

/// What the owner should do after the runner moved on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Advanced,
    /// The last question is done. Send these answers.
    Submit(Vec<QuizAnswer>),
}

#[derive(Debug)]
pub enum RunnerError {
    NoQuestions,
    /// The action is not available in the current phase.
    WrongPhase(Phase),
    UnknownOption(String),
    Api(ApiError),
}

impl fmt::Display for RunnerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunnerError::NoQuestions => f.write_str("This quiz has no questions"),
            RunnerError::WrongPhase(phase) => write!(f, "Not available while {phase:?}"),
            RunnerError::UnknownOption(id) => write!(f, "No option with id {id}"),
            RunnerError::Api(err) => write!(f, "Failed to submit quiz: {err}"),
        }
    }
}

impl std::error::Error for RunnerError {}

impl From<ApiError> for RunnerError {
    fn from(err: ApiError) -> Self {
        RunnerError::Api(err)
    }
}

#[derive(Debug, Clone)]
pub struct QuizRunner {
    quiz: Quiz,
    phase: Phase,
    current: usize,
    answers: Vec<QuizAnswer>,
    countdown: Countdown,
}

impl QuizRunner {
    pub fn new(quiz: Quiz) -> Self {
        let limit = u32::try_from(quiz.time_limit.max(0)).unwrap_or(u32::MAX);
        Self {
            quiz,
            phase: Phase::Intro,
            current: 0,
            answers: Vec::new(),
            countdown: Countdown::new(limit),
        }
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn answers(&self) -> &[QuizAnswer] {
        &self.answers
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.quiz.questions.get(self.current)
    }

    /// `(question number, total)`, 1-based.
    pub fn progress(&self) -> (usize, usize) {
        (self.current + 1, self.quiz.questions.len())
    }

    pub fn can_go_back(&self) -> bool {
        self.phase == Phase::InProgress && self.current > 0
    }

    pub fn is_last_question(&self) -> bool {
        self.current + 1 >= self.quiz.questions.len()
    }

    pub fn answer_for(&self, question_id: &str) -> Option<&QuizAnswer> {
        self.answers.iter().find(|a| a.question_id == question_id)
    }

    fn require(&self, phase: Phase) -> Result<(), RunnerError> {
        if self.phase != phase {
            return Err(RunnerError::WrongPhase(self.phase.clone()));
        }
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), RunnerError> {
        self.require(Phase::Intro)?;
        if self.quiz.questions.is_empty() {
            return Err(RunnerError::NoQuestions);
        }
        self.phase = Phase::InProgress;
        self.current = 0;
        self.countdown.reset();
        Ok(())
    }

    /// Records a choice for the active question, replacing any earlier one.
    pub fn select(&mut self, option_id: &str) -> Result<(), RunnerError> {
        self.require(Phase::InProgress)?;
        let question = self
            .current_question()
            .ok_or(RunnerError::NoQuestions)?;
        let option = question
            .option(option_id)
            .ok_or_else(|| RunnerError::UnknownOption(option_id.to_string()))?;

        let answer = QuizAnswer {
            question_id: question.id.clone(),
            selected_option_id: option.id.clone(),
            correct: option.is_correct,
        };
        self.record(answer);
        Ok(())
    }

    fn record(&mut self, answer: QuizAnswer) {
        match self
            .answers
            .iter_mut()
            .find(|a| a.question_id == answer.question_id)
        {
            Some(existing) => *existing = answer,
            None => self.answers.push(answer),
        }
    }

    /// One second passed. Returns the step taken if the countdown ran out.
    pub fn tick(&mut self) -> Option<Step> {
        if self.phase != Phase::InProgress {
            return None;
        }
        if self.countdown.tick() {
            return Some(self.time_up());
        }
        None
    }

    /// Marks the active question as missed unless it already has an answer, then
    /// moves on exactly like [`QuizRunner::next`].
    fn time_up(&mut self) -> Step {
        if let Some(question) = self.current_question() {
            let question_id = question.id.clone();
            if self.answer_for(&question_id).is_none() {
                self.answers.push(QuizAnswer {
                    question_id,
                    selected_option_id: String::new(),
                    correct: false,
                });
            }
        }
        self.advance()
    }

    pub fn next(&mut self) -> Result<Step, RunnerError> {
        self.require(Phase::InProgress)?;
        Ok(self.advance())
    }

    fn advance(&mut self) -> Step {
        if self.is_last_question() {
            self.phase = Phase::Submitting;
            return Step::Submit(self.answers.clone());
        }
        self.current += 1;
        self.countdown.reset();
        Step::Advanced
    }

    /// Goes back one question. Recorded answers are kept.
    pub fn previous(&mut self) -> Result<(), RunnerError> {
        self.require(Phase::InProgress)?;
        if self.current > 0 {
            self.current -= 1;
            self.countdown.reset();
        }
        Ok(())
    }

    /// The server rejected the submission. Answers stay so the user can retry.
    pub fn submission_failed(&mut self) {
        if self.phase == Phase::Submitting {
            self.phase = Phase::InProgress;
        }
    }

    pub fn finish(&mut self, attempt_id: i64) {
        self.phase = Phase::Finished { attempt_id };
    }

    /// Sends the recorded answers. On success the runner is finished and the new
    /// attempt is returned so the caller can show its results.
    pub async fn submit(&mut self, api: &ApiClient) -> Result<QuizAttempt, RunnerError> {
        self.require(Phase::Submitting)?;
        match api.submit_attempt(self.quiz.id, &self.answers).await {
            Ok(attempt) => {
                tracing::debug!(attempt_id = attempt.id, score = attempt.score, "quiz submitted");
                self.finish(attempt.id);
                Ok(attempt)
            }
            Err(err) => {
                self.submission_failed();
                Err(err.into())
            }
        }
    }
}
