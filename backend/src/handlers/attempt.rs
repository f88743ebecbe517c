// src/handlers/attempt.rs

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::AppError,
    handlers::quiz::{QuizId, ensure_owner, find_quiz},
    models::attempt::{NewQuizAttempt, QuizSnapshot, SubmitAttemptRequest, grade},
    store::SharedStorage,
    utils::{session::AuthUser, validation::validate},
};

/// Records a completed run of a quiz.
///
/// * Fails with 404 before looking at the body when the quiz is unknown.
/// * Re-judges every answer against the stored options.
/// * Stores a snapshot of the quiz so the result stays reviewable.
pub async fn submit_attempt(
    State(store): State<SharedStorage>,
    user: AuthUser,
    QuizId(quiz_id): QuizId,
    payload: Result<Json<SubmitAttemptRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = find_quiz(&store, quiz_id).await?;

    let Json(payload) = payload?;
    validate(&payload)?;

    let grade = grade(&quiz, payload.into_answers());

    let attempt = store
        .create_quiz_attempt(NewQuizAttempt {
            quiz_id,
            user_id: user.id,
            score: grade.score,
            passed: grade.passed,
            answers: grade.answers,
            quiz: QuizSnapshot::from(&quiz),
        })
        .await?;

    tracing::info!(
        attempt_id = attempt.id,
        quiz_id,
        user_id = user.id,
        score = attempt.score,
        passed = attempt.passed,
        "quiz attempt recorded"
    );

    Ok((StatusCode::CREATED, Json(attempt)))
}

/// Lists the caller's attempts across all quizzes.
pub async fn list_my_attempts(
    State(store): State<SharedStorage>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(store.get_quiz_attempts_by_user(user.id).await?))
}

/// Lists every user's attempts at one quiz. Creator only.
pub async fn list_quiz_attempts(
    State(store): State<SharedStorage>,
    user: AuthUser,
    QuizId(quiz_id): QuizId,
) -> Result<impl IntoResponse, AppError> {
    let quiz = find_quiz(&store, quiz_id).await?;
    ensure_owner(&quiz, &user, "view all attempts for this quiz")?;

    Ok(Json(store.get_quiz_attempts_by_quiz(quiz_id).await?))
}
