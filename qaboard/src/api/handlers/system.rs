use tracing::instrument;

/// Greeting
#[utoipa::path(
    get,
    path = "/",
    tag = "system",
    summary = "Greeting",
    responses((status = 200, description = "Greeting text", body = String))
)]
#[instrument]
pub async fn root() -> &'static str {
    "Hi from qaboard!"
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/healthz",
    tag = "system",
    summary = "Health check",
    responses((status = 200, description = "Service is up", body = String))
)]
pub async fn healthz() -> &'static str {
    "OK"
}
