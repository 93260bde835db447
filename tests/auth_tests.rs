// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use axum::{routing::post, Router};
use carteira::auth::{self, AuthError, IdentityClient, SignUp};
use carteira::config::Config;
use carteira::db;
use rusqlite::Connection;
use tempfile::TempDir;

fn store() -> (TempDir, Connection) {
    let dir = tempfile::tempdir().unwrap();
    let conn = db::open_at(&dir.path().join("carteira.sqlite")).unwrap();
    (dir, conn)
}

fn config(auth_url: &str, key: &str) -> Config {
    Config {
        api_base_url: "http://localhost:5000/api".into(),
        auth_url: Some(auth_url.into()),
        auth_anon_key: Some(key.into()),
    }
}

#[test]
fn sign_in_persists_session_and_sign_out_clears_it() {
    let (_dir, conn) = store();
    let state = common::shared();
    let base = common::spawn(common::identity_backend(state.clone()));
    let id = IdentityClient::new(&config(&base, common::ANON_KEY), &conn).unwrap();

    assert_eq!(id.auth_token().unwrap(), None);
    let session = id.sign_in("ana@example.com", common::PASSWORD).unwrap();
    assert_eq!(session.user.email.as_deref(), Some("ana@example.com"));
    assert_eq!(id.auth_token().unwrap().as_deref(), Some("tok-123"));
    assert_eq!(auth::auth_token(&conn).unwrap().as_deref(), Some("tok-123"));

    let user = id.current_user().unwrap().unwrap();
    assert_eq!(user.id, "user-1");

    id.sign_out().unwrap();
    assert_eq!(auth::auth_token(&conn).unwrap(), None);

    let seen = common::seen(&state);
    let logout = seen.iter().find(|s| s.path == "/auth/v1/logout").unwrap();
    assert_eq!(logout.auth.as_deref(), Some("Bearer tok-123"));
    let token = seen.iter().find(|s| s.path == "/auth/v1/token").unwrap();
    assert_eq!(token.query.get("grant_type").map(String::as_str), Some("password"));
}

#[test]
fn invalid_credentials_surface_backend_message() {
    let (_dir, conn) = store();
    let base = common::spawn(common::identity_backend(common::shared()));
    let id = IdentityClient::new(&config(&base, common::ANON_KEY), &conn).unwrap();
    let err = id.sign_in("ana@example.com", "wrong").unwrap_err();
    assert!(matches!(err, AuthError::Backend { status: 400, .. }));
    assert_eq!(err.to_string(), "Invalid login credentials");
    assert_eq!(id.auth_token().unwrap(), None);
}

#[test]
fn missing_api_key_is_reported() {
    let (_dir, conn) = store();
    let base = common::spawn(common::identity_backend(common::shared()));
    let id = IdentityClient::new(&config(&base, "wrong-key"), &conn).unwrap();
    let err = id.sign_in("ana@example.com", common::PASSWORD).unwrap_err();
    assert_eq!(err.to_string(), "No API key found in request");
}

#[test]
fn sign_up_pending_confirmation_stores_nothing() {
    let (_dir, conn) = store();
    let base = common::spawn(common::identity_backend(common::shared()));
    let id = IdentityClient::new(&config(&base, common::ANON_KEY), &conn).unwrap();

    let err = id.sign_up("bia@example.com", "123").unwrap_err();
    assert_eq!(err.to_string(), "Password should be at least 6 characters");

    match id.sign_up("bia@example.com", "longer-password").unwrap() {
        SignUp::PendingConfirmation(u) => assert_eq!(u.email.as_deref(), Some("bia@example.com")),
        other => panic!("expected pending confirmation, got {:?}", other),
    }
    assert_eq!(id.auth_token().unwrap(), None);
}

#[test]
fn signed_out_needs_no_network() {
    let (_dir, conn) = store();
    // nothing listens here; any request would fail
    let id = IdentityClient::new(&config("http://127.0.0.1:9", common::ANON_KEY), &conn).unwrap();
    assert_eq!(id.current_user().unwrap(), None);
    id.sign_out().unwrap();
}

#[test]
fn remote_sign_out_failure_still_clears_locally() {
    let (_dir, conn) = store();
    let base = common::spawn(common::identity_backend(common::shared()));
    let id = IdentityClient::new(&config(&base, common::ANON_KEY), &conn).unwrap();
    id.sign_in("ana@example.com", common::PASSWORD).unwrap();

    let offline = IdentityClient::new(&config("http://127.0.0.1:9", common::ANON_KEY), &conn).unwrap();
    assert!(matches!(offline.sign_out(), Err(AuthError::Transport { .. })));
    assert_eq!(auth::auth_token(&conn).unwrap(), None);
}

#[test]
fn transport_and_decode_failures_are_logged() {
    let (_dir, conn) = store();
    let offline = IdentityClient::new(&config("http://127.0.0.1:9", common::ANON_KEY), &conn).unwrap();
    let (res, logs) = common::capture_logs(|| offline.sign_in("ana@example.com", common::PASSWORD));
    assert!(matches!(res, Err(AuthError::Transport { .. })));
    assert!(logs.contains("identity request failed"), "{logs}");

    let garbled = Router::new().route("/auth/v1/token", post(|| async { "not json" }));
    let base = common::spawn(garbled);
    let id = IdentityClient::new(&config(&base, common::ANON_KEY), &conn).unwrap();
    let (res, logs) = common::capture_logs(|| id.sign_in("ana@example.com", common::PASSWORD));
    assert!(matches!(res, Err(AuthError::Decode(_))));
    assert!(logs.contains("identity request failed"), "{logs}");
    assert_eq!(auth::auth_token(&conn).unwrap(), None);
}

#[test]
fn identity_needs_configuration() {
    let (_dir, conn) = store();
    let cfg = Config {
        api_base_url: "http://localhost:5000/api".into(),
        auth_url: None,
        auth_anon_key: Some("k".into()),
    };
    assert!(matches!(
        IdentityClient::new(&cfg, &conn),
        Err(AuthError::NotConfigured)
    ));
}
