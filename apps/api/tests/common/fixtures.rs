//! Test fixtures for API integration tests
//!
//! Provides a seeded in-memory store and token builders.

#![allow(dead_code)]

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;
use std::sync::Arc;

use taskboard_api::models::{Task, TaskStatus, Todo, User};

use super::fakes::RecordingStore;

/// Shared secret used by HS256 test tokens
pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-chars";

/// Key id of the RSA key published in `fixtures/jwks.json`
pub const TEST_KID: &str = "test-key";

/// Private half of the key in `fixtures/jwks.json`
pub const TEST_RSA_PEM: &str = include_str!("../fixtures/test_rsa.pem");

/// Published key set matching [`TEST_RSA_PEM`]
pub const TEST_JWKS: &str = include_str!("../fixtures/jwks.json");

pub const ALL_SCOPES: &str = "read:tasks write:tasks read:user write:user";

pub fn user(id: &str, name: &str) -> User {
    User::new(id, name)
}

pub fn task(id: &str, text: &str, user_id: &str) -> Task {
    Task {
        id: id.to_string(),
        ..Task::new(text, user_id)
    }
}

pub fn todo(id: &str, text: &str, task_id: &str) -> Todo {
    Todo {
        id: id.to_string(),
        ..Todo::new(text, task_id)
    }
}

/// Two users with tasks and todos:
///
/// - `u1` (Ann): `t1` (todos `d1`, `d2`), `t2` (no todos), `t3` in progress (todo `d3`)
/// - `u2` (Bob): `t4` (todo `d4`)
pub fn seeded_store() -> Arc<RecordingStore> {
    let store = RecordingStore::new();
    store.add_user(user("u1", "Ann"));
    store.add_user(user("u2", "Bob"));

    store.add_task(task("t1", "write docs", "u1"));
    store.add_task(task("t2", "review PR", "u1"));
    store.add_task(Task {
        status: TaskStatus::InProgress,
        ..task("t3", "ship release", "u1")
    });
    store.add_task(task("t4", "plan sprint", "u2"));

    store.add_todo(todo("d1", "outline", "t1"));
    store.add_todo(todo("d2", "draft", "t1"));
    store.add_todo(todo("d3", "tag", "t3"));
    store.add_todo(todo("d4", "invite team", "t4"));

    store
}

fn expires_in_one_hour() -> i64 {
    chrono::Utc::now().timestamp() + 3600
}

/// HS256 token signed with [`TEST_SECRET`]
pub fn hs256_token(sub: &str, scope: &str) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        &json!({ "sub": sub, "scope": scope, "exp": expires_in_one_hour() }),
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap()
}

/// RS256 token signed with the fixture RSA key
pub fn rs256_token(kid: &str, issuer: &str, audience: &str, sub: &str, scope: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    encode(
        &header,
        &json!({
            "sub": sub,
            "scope": scope,
            "iss": issuer,
            "aud": audience,
            "exp": expires_in_one_hour(),
        }),
        &EncodingKey::from_rsa_pem(TEST_RSA_PEM.as_bytes()).unwrap(),
    )
    .unwrap()
}
