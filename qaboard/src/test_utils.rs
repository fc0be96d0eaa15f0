//! Test utilities: an in-memory app and seed helpers.

use crate::config::{Config, DatabaseConfig};
use crate::db::models::{
    answers::{AnswerCreateDBRequest, AnswerWithAuthor},
    questions::{QuestionCreateDBRequest, QuestionDBResponse},
    users::{UserCreateDBRequest, UserDBResponse},
};
use crate::store::{ForumStore, InMemoryStore};
use crate::types::{MacAddress, QuestionId, UserId};
use crate::{AppState, build_router};
use axum_test::TestServer;
use std::sync::Arc;

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database: DatabaseConfig::Memory,
        // The Prometheus recorder is process global; only the metrics test turns this on
        enable_metrics: false,
        enable_otel_export: false,
        ..Config::default()
    }
}

/// Router over a fresh in-memory store. The store is returned for seeding and inspection.
pub fn create_test_app() -> (TestServer, InMemoryStore) {
    create_test_app_with_config(create_test_config())
}

pub fn create_test_app_with_config(config: Config) -> (TestServer, InMemoryStore) {
    let store = InMemoryStore::new();
    let state = AppState::builder()
        .store(Arc::new(store.clone()))
        .config(config)
        .build();
    let router = build_router(state).expect("Failed to build router");
    let server = TestServer::new(router).expect("Failed to create test server");
    (server, store)
}

pub async fn seed_user(store: &dyn ForumStore, mac: &str, username: &str) -> UserDBResponse {
    store
        .create_user(&UserCreateDBRequest {
            mac_address: MacAddress::new(mac),
            username: username.to_string(),
            points: 100,
        })
        .await
        .expect("Failed to seed user")
}

/// Posts a question at the default cost of 10 points.
pub async fn seed_question(store: &dyn ForumStore, user_id: UserId, title: &str) -> QuestionDBResponse {
    store
        .create_question(
            &QuestionCreateDBRequest {
                user_id,
                title: title.to_string(),
                question_text: format!("{title}?"),
            },
            10,
        )
        .await
        .expect("Failed to seed question")
}

pub async fn seed_answer(store: &dyn ForumStore, question_id: QuestionId, user_id: UserId, text: &str) -> AnswerWithAuthor {
    store
        .create_answer(&AnswerCreateDBRequest {
            question_id,
            user_id,
            answer_text: text.to_string(),
        })
        .await
        .expect("Failed to seed answer")
}
