// src/handlers/quiz.rs

use axum::{
    Json,
    extract::{FromRequestParts, Path, State, rejection::JsonRejection},
    http::{StatusCode, request::Parts},
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    error::AppError,
    models::quiz::{CreateQuizRequest, Quiz, UpdateQuizRequest},
    store::SharedStorage,
    utils::{
        session::AuthUser,
        validation::{ValidatedJson, validate},
    },
};

/// Quiz id taken from the `{id}` path segment.
/// A segment that is not an integer names no quiz, so it is a 404 like any unknown id.
#[derive(Debug, Clone, Copy)]
pub struct QuizId(pub i64);

impl<S> FromRequestParts<S> for QuizId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(%rejection, "unparsable quiz id");
                AppError::NotFound("Quiz not found".to_string())
            })?;
        Ok(Self(id))
    }
}

/// Loads a quiz or fails with 404.
pub(crate) async fn find_quiz(store: &SharedStorage, id: i64) -> Result<Quiz, AppError> {
    store
        .get_quiz(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))
}

/// Only the creator may mutate a quiz or see all of its attempts.
pub(crate) fn ensure_owner(quiz: &Quiz, user: &AuthUser, action: &str) -> Result<(), AppError> {
    if quiz.created_by != user.id {
        return Err(AppError::Forbidden(format!(
            "Not authorized to {action}"
        )));
    }
    Ok(())
}

/// Creates a quiz owned by the caller.
///
/// Missing question/option ids are assigned by the store.
pub async fn create_quiz(
    State(store): State<SharedStorage>,
    user: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = store.create_quiz(payload.into_new_quiz(user.id)).await?;
    tracing::info!(quiz_id = quiz.id, user_id = user.id, "quiz created");

    Ok((StatusCode::CREATED, Json(quiz)))
}

/// Lists every quiz. Reading is not restricted.
pub async fn list_quizzes(State(store): State<SharedStorage>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(store.get_all_quizzes().await?))
}

/// Lists quizzes created by the caller.
pub async fn list_my_quizzes(
    State(store): State<SharedStorage>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(store.get_quizzes_by_user(user.id).await?))
}

pub async fn get_quiz(
    State(store): State<SharedStorage>,
    QuizId(id): QuizId,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(find_quiz(&store, id).await?))
}

/// Applies a partial update.
///
/// Checks run in order: existence, ownership, then the body.
pub async fn update_quiz(
    State(store): State<SharedStorage>,
    user: AuthUser,
    QuizId(id): QuizId,
    payload: Result<Json<UpdateQuizRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = find_quiz(&store, id).await?;
    ensure_owner(&quiz, &user, "update this quiz")?;

    let Json(payload) = payload?;
    validate(&payload)?;

    let updated = store
        .update_quiz(id, payload.into_patch())
        .await?
        .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;
    tracing::info!(quiz_id = id, user_id = user.id, "quiz updated");

    Ok(Json(updated))
}

/// Deletes a quiz. Attempts keep their own snapshot of it.
pub async fn delete_quiz(
    State(store): State<SharedStorage>,
    user: AuthUser,
    QuizId(id): QuizId,
) -> Result<impl IntoResponse, AppError> {
    let quiz = find_quiz(&store, id).await?;
    ensure_owner(&quiz, &user, "delete this quiz")?;

    store.delete_quiz(id).await?;
    tracing::info!(quiz_id = id, user_id = user.id, "quiz deleted");

    Ok(Json(json!({ "message": "Quiz deleted successfully" })))
}
