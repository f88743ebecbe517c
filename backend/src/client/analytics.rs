// src/client/analytics.rs

//! Aggregates over the signed-in user's attempts.

use std::collections::BTreeMap;

use crate::models::attempt::{QuizAttempt, round_div};
use crate::models::quiz::Quiz;

/// Inclusive score ranges for the distribution chart.
pub const SCORE_BUCKETS: [(&str, i64, i64); 5] = [
    ("0-20%", 0, 20),
    ("21-40%", 21, 40),
    ("41-60%", 41, 60),
    ("61-80%", 61, 80),
    ("81-100%", 81, 100),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBucket {
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizPerformance {
    pub quiz_id: i64,
    pub title: String,
    pub average_score: i64,
    pub attempts: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analytics {
    pub total_attempts: usize,
    pub average_score: i64,
    pub passed: usize,
    pub failed: usize,
    pub distribution: Vec<ScoreBucket>,
    /// Ordered by quiz id.
    pub per_quiz: Vec<QuizPerformance>,
}

impl Analytics {
    /// `None` when there are no attempts to summarize.
    ///
    /// Titles come from `quizzes` when the quiz still exists, otherwise from the
    /// snapshot stored with the attempt.
    pub fn compute(attempts: &[QuizAttempt], quizzes: &[Quiz]) -> Option<Self> {
        if attempts.is_empty() {
            return None;
        }

        let total = attempts.len();
        let sum: i64 = attempts.iter().map(|a| a.score).sum();
        let passed = attempts.iter().filter(|a| a.passed).count();

        let distribution = SCORE_BUCKETS
            .iter()
            .map(|&(label, low, high)| ScoreBucket {
                label,
                count: attempts
                    .iter()
                    .filter(|a| (low..=high).contains(&a.score))
                    .count(),
            })
            .collect();

        let mut grouped: BTreeMap<i64, (i64, usize, &str)> = BTreeMap::new();
        for attempt in attempts {
            let entry = grouped
                .entry(attempt.quiz_id)
                .or_insert((0, 0, attempt.quiz.title.as_str()));
            entry.0 += attempt.score;
            entry.1 += 1;
        }

        let per_quiz = grouped
            .into_iter()
            .map(|(quiz_id, (sum, count, snapshot_title))| QuizPerformance {
                quiz_id,
                title: quiz_title(quiz_id, quizzes, snapshot_title),
                average_score: round_div(sum, as_i64(count)),
                attempts: count,
            })
            .collect();

        Some(Self {
            total_attempts: total,
            average_score: round_div(sum, as_i64(total)),
            passed,
            failed: total - passed,
            distribution,
            per_quiz,
        })
    }

    /// Share of passed attempts as a rounded percentage.
    pub fn pass_rate(&self) -> i64 {
        round_div(100 * as_i64(self.passed), as_i64(self.total_attempts))
    }
}

fn quiz_title(quiz_id: i64, quizzes: &[Quiz], snapshot_title: &str) -> String {
    if let Some(quiz) = quizzes.iter().find(|q| q.id == quiz_id) {
        return quiz.title.clone();
    }
    if !snapshot_title.is_empty() {
        return snapshot_title.to_string();
    }
    format!("Quiz #{quiz_id}")
}

fn as_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
