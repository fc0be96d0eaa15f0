//! OpenAPI documentation.
//!
//! [`ApiDoc`] collects every handler's `utoipa::path` annotation. The document is served at
//! `/api-docs/openapi.json` and rendered with Scalar at `/docs`.

use utoipa::{Modify, OpenApi};

use crate::api;

/// Document that every failure is a 400 with a JSON string body.
struct ErrorConventionAddon;

impl Modify for ErrorConventionAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let note = "\n\nEvery failure is answered with status 400 and a JSON string naming the problem, \
                    for example `\"new_user\"` or `\"unable to add answer\"`.";
        let description = openapi.info.description.get_or_insert_with(String::new);
        description.push_str(note);
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "qaboard",
        description = "Q&A board: devices register by hardware address, post questions and answers, and tip each other points."
    ),
    modifiers(&ErrorConventionAddon),
    paths(
        api::handlers::system::root,
        api::handlers::system::healthz,
        api::handlers::auth::auth,
        api::handlers::auth::register,
        api::handlers::questions::add_question,
        api::handlers::questions::list_questions,
        api::handlers::answers::list_answers,
        api::handlers::answers::post_answer,
        api::handlers::tips::tip,
    ),
    components(
        schemas(
            api::models::users::AuthRequest,
            api::models::users::AuthResponse,
            api::models::users::RegisterRequest,
            api::models::questions::QuestionCreate,
            api::models::questions::QuestionResponse,
            api::models::questions::QuestionListItem,
            api::models::answers::AnswerCreate,
            api::models::answers::AnswerResponse,
            api::models::tips::TipCreate,
        )
    ),
    tags(
        (name = "auth", description = "Device login and registration"),
        (name = "questions", description = "Posting and listing questions"),
        (name = "answers", description = "Posting and listing answers"),
        (name = "tips", description = "Rewarding answers with points"),
        (name = "system", description = "Greeting and health check"),
    )
)]
pub struct ApiDoc;
