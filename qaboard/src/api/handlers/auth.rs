use crate::{
    AppState,
    api::{
        extract::{Payload, required, required_text},
        models::users::{AuthRequest, AuthResponse, RegisterRequest},
    },
    db::{errors::DbError, models::users::UserCreateDBRequest},
    errors::{Error, Result},
    types::MacAddress,
};
use axum::{extract::State, response::Json};
use tracing::{info, instrument};

/// Log a device in
#[utoipa::path(
    post,
    path = "/auth",
    tag = "auth",
    summary = "Log in by hardware address",
    description = "Look up the user registered for a device. Unknown devices get `new_user` so the client can offer registration.",
    request_body = AuthRequest,
    responses(
        (status = 200, description = "Registered user", body = AuthResponse),
        (status = 400, description = "`new_user` for an unregistered device, `unable to get user` otherwise", body = String),
    )
)]
#[instrument(skip_all)]
pub async fn auth(State(state): State<AppState>, Payload(request): Payload<AuthRequest>) -> Result<Json<AuthResponse>> {
    let address = MacAddress::new(&required(request.mac_address, "unable to get user")?);

    let user = state
        .store
        .find_user_by_address(&address)
        .await
        .map_err(Error::unavailable("get user"))?
        .ok_or(Error::UnregisteredAddress { address })?;

    Ok(Json(AuthResponse::from(user)))
}

/// Register a device
#[utoipa::path(
    post,
    path = "/register",
    tag = "auth",
    summary = "Register a device",
    description = "Create a user for a hardware address with the configured opening balance.",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Username of the new user", body = String),
        (status = 400, description = "`wrong mac address` or `user already exists`", body = String),
    )
)]
#[instrument(skip_all)]
pub async fn register(State(state): State<AppState>, Payload(request): Payload<RegisterRequest>) -> Result<Json<String>> {
    let address = request
        .mac_address
        .map(|raw| MacAddress::new(&raw))
        .filter(MacAddress::is_well_formed)
        .ok_or_else(|| Error::bad_request("wrong mac address"))?;
    let username = required_text(request.username, "bad request")?;

    let user = state
        .store
        .create_user(&UserCreateDBRequest {
            mac_address: address,
            username,
            points: state.config.points.initial_balance,
        })
        .await
        .map_err(|e| match e {
            DbError::UniqueViolation { .. } => Error::Conflict {
                message: "user already exists".to_string(),
            },
            other => Error::unavailable("register user")(other),
        })?;

    info!(user_id = user.id, "Registered new device");
    Ok(Json(user.username))
}

#[cfg(test)]
mod tests {
    use crate::api::models::users::AuthResponse;
    use crate::test_utils::*;
    use serde_json::json;

    #[test_log::test(tokio::test)]
    async fn test_register_then_auth() {
        let (server, _store) = create_test_app();

        let response = server
            .post("/register")
            .json(&json!({"mac_address": "A4:5E:60:D1:22:9F", "username": "alice"}))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<String>(), "alice");

        let response = server.post("/auth").json(&json!({"mac_address": "a4:5e:60:d1:22:9f"})).await;
        response.assert_status_ok();
        let user: AuthResponse = response.json();
        assert_eq!(user.username, "alice");
        assert_eq!(user.points, 100);
    }

    #[tokio::test]
    async fn test_auth_unknown_device_is_new_user() {
        let (server, _store) = create_test_app();

        let response = server.post("/auth").json(&json!({"mac_address": "00:11:22:33:44:55"})).await;
        response.assert_status_bad_request();
        assert_eq!(response.json::<String>(), "new_user");
    }

    #[tokio::test]
    async fn test_auth_without_address() {
        let (server, _store) = create_test_app();

        let response = server.post("/auth").json(&json!({})).await;
        response.assert_status_bad_request();
        assert_eq!(response.json::<String>(), "unable to get user");
    }

    #[tokio::test]
    async fn test_register_rejects_malformed_address() {
        let (server, _store) = create_test_app();

        for body in [
            json!({"mac_address": "a4:5e:60", "username": "bob"}),
            json!({"username": "bob"}),
            json!({"mac_address": "a4:5e:60:d1:22:9f:00", "username": "bob"}),
        ] {
            let response = server.post("/register").json(&body).await;
            response.assert_status_bad_request();
            assert_eq!(response.json::<String>(), "wrong mac address");
        }
    }

    #[tokio::test]
    async fn test_register_twice_is_conflict_and_keeps_first_user() {
        let (server, store) = create_test_app();
        let first = seed_user(&store, "aa:bb:cc:dd:ee:ff", "first").await;

        let response = server
            .post("/register")
            .json(&json!({"mac_address": "AA:BB:CC:DD:EE:FF", "username": "second"}))
            .await;
        response.assert_status_bad_request();
        assert_eq!(response.json::<String>(), "user already exists");

        let response = server.post("/auth").json(&json!({"mac_address": "aa:bb:cc:dd:ee:ff"})).await;
        let user: AuthResponse = response.json();
        assert_eq!(user.id, first.id);
        assert_eq!(user.username, "first");
    }

    #[tokio::test]
    async fn test_register_uses_configured_opening_balance() {
        let mut config = create_test_config();
        config.points.initial_balance = 250;
        let (server, _store) = create_test_app_with_config(config);

        server
            .post("/register")
            .json(&json!({"mac_address": "12:34:56:78:9a:bc", "username": "rich"}))
            .await
            .assert_status_ok();

        let user: AuthResponse = server
            .post("/auth")
            .json(&json!({"mac_address": "12:34:56:78:9a:bc"}))
            .await
            .json();
        assert_eq!(user.points, 250);
    }
}
