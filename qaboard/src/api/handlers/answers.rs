use crate::{
    AppState,
    api::{
        extract::{Payload, required, required_text},
        models::answers::{AnswerCreate, AnswerResponse},
    },
    db::models::answers::AnswerCreateDBRequest,
    errors::{Error, Result},
    types::QuestionId,
};
use axum::{
    extract::{Path, State, rejection::PathRejection},
    response::Json,
};
use tracing::{debug, instrument};

/// List answers to a question
#[utoipa::path(
    get,
    path = "/questions/{id}/answers",
    tag = "answers",
    summary = "List answers",
    description = "Answers to one question with their author's name, in the order they were given. \
                   An unknown question has no answers.",
    params(
        ("id" = i32, Path, description = "Question ID"),
    ),
    responses(
        (status = 200, description = "Answers", body = [AnswerResponse]),
        (status = 400, description = "The underlying error message", body = String),
    )
)]
#[instrument(skip_all)]
pub async fn list_answers(
    State(state): State<AppState>,
    question_id: std::result::Result<Path<QuestionId>, PathRejection>,
) -> Result<Json<Vec<AnswerResponse>>> {
    let Path(question_id) = question_id.map_err(|rejection| Error::bad_request(rejection.body_text()))?;

    let answers = state.store.list_answers(question_id).await?;

    Ok(Json(answers.into_iter().map(AnswerResponse::from).collect()))
}

/// Answer a question
#[utoipa::path(
    post,
    path = "/answer",
    tag = "answers",
    summary = "Answer a question",
    description = "Create an answer. The response carries the author's name so the client can render it directly.",
    request_body = AnswerCreate,
    responses(
        (status = 200, description = "Created answer", body = AnswerResponse),
        (status = 400, description = "`unable to add answer`", body = String),
    )
)]
#[instrument(skip_all)]
pub async fn post_answer(
    State(state): State<AppState>,
    Payload(request): Payload<AnswerCreate>,
) -> Result<Json<AnswerResponse>> {
    let question_id = required(request.question_id, "unable to add answer")?;
    let user_id = required(request.user_id, "unable to add answer")?;
    let answer_text = required_text(request.answer_text, "unable to add answer")?;

    let answer = state
        .store
        .create_answer(&AnswerCreateDBRequest {
            question_id,
            user_id,
            answer_text,
        })
        .await
        .map_err(Error::unavailable("add answer"))?;

    debug!(answer_id = answer.id, question_id, "Answer posted");
    Ok(Json(AnswerResponse::from(answer)))
}
