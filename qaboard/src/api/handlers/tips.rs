use crate::{
    AppState,
    api::{
        extract::{Payload, required},
        models::tips::TipCreate,
    },
    errors::Result,
    ledger::{self, TipTransfer},
};
use axum::{extract::State, response::Json};
use tracing::instrument;

/// Tip an answer
#[utoipa::path(
    post,
    path = "/tip",
    tag = "tips",
    summary = "Tip an answer",
    description = "Move the configured tip amount from `tip_source` to `tip_destination` and bump the answer's tip count, \
                   all in one transaction. Returns the answer's new tip count.",
    request_body = TipCreate,
    responses(
        (status = 200, description = "New tip count of the answer", body = i32),
        (status = 400, description = "`Bad request` for missing fields or a self-tip, otherwise the underlying error message", body = String),
    )
)]
#[instrument(skip_all)]
pub async fn tip(State(state): State<AppState>, Payload(request): Payload<TipCreate>) -> Result<Json<i32>> {
    let source = required(request.tip_source, "Bad request")?;
    let destination = required(request.tip_destination, "Bad request")?;
    let answer_id = required(request.answer_id, "Bad request")?;

    let transfer = TipTransfer::new(source, destination, answer_id, state.config.points.tip_amount)?;
    let receipt = ledger::tip(state.store.as_ref(), transfer).await?;

    Ok(Json(receipt.tips_count))
}
