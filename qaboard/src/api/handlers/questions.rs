use crate::{
    AppState,
    api::{
        extract::{Payload, required},
        models::questions::{QuestionCreate, QuestionListItem, QuestionResponse},
    },
    errors::{Error, Result},
    ledger,
};
use axum::{extract::State, response::Json};
use tracing::instrument;

/// Post a question
#[utoipa::path(
    post,
    path = "/add-question",
    tag = "questions",
    summary = "Post a question",
    description = "Create a question and charge its author the configured question cost in the same transaction. \
                   The created row is returned as a one-element array.",
    request_body = QuestionCreate,
    responses(
        (status = 200, description = "Created question", body = [QuestionResponse]),
        (status = 400, description = "`bad request` for missing fields, `unable to add question` if the store refused", body = String),
    )
)]
#[instrument(skip_all)]
pub async fn add_question(
    State(state): State<AppState>,
    Payload(request): Payload<QuestionCreate>,
) -> Result<Json<Vec<QuestionResponse>>> {
    let user_id = required(request.user_id, "bad request")?;
    let title = required(request.title, "bad request")?;
    let question_text = required(request.question_text, "bad request")?;

    let question = ledger::post_question(state.store.as_ref(), &state.config.points, user_id, title, question_text).await?;

    Ok(Json(vec![QuestionResponse::from(question)]))
}

/// List questions
#[utoipa::path(
    get,
    path = "/questions",
    tag = "questions",
    summary = "List questions",
    description = "All questions with their author's name, newest first.",
    responses(
        (status = 200, description = "Questions", body = [QuestionListItem]),
        (status = 400, description = "`unable to get questions`", body = String),
    )
)]
#[instrument(skip_all)]
pub async fn list_questions(State(state): State<AppState>) -> Result<Json<Vec<QuestionListItem>>> {
    let questions = state
        .store
        .list_questions()
        .await
        .map_err(Error::unavailable("get questions"))?;

    Ok(Json(questions.into_iter().map(QuestionListItem::from).collect()))
}
