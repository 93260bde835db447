// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Email/password identity over a GoTrue-style REST endpoint.
//!
//! The adapter only delegates: credentials are checked by the backend, and its
//! error message is surfaced unchanged. The session returned by a sign-in is
//! kept in the local store so later invocations can authenticate API calls.
//! There is no refresh, no token rotation and no multi-factor flow.

use reqwest::blocking::{Client, RequestBuilder};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::config::Config;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("identity backend not configured (set auth-url and auth-key)")]
    NotConfigured,
    /// The backend refused the call, e.g. invalid credentials or a weak password.
    #[error("{message}")]
    Backend { status: u16, message: String },
    #[error("identity request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected identity response: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("session store error: {0}")]
    Store(#[from] rusqlite::Error),
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: User,
}

/// Sign-up answers with a session, or only the user while email
/// confirmation is pending.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SignUp {
    Session(Session),
    PendingConfirmation(User),
}

pub struct SessionStore<'c> {
    conn: &'c Connection,
}

impl<'c> SessionStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn load(&self) -> Result<Option<Session>, AuthError> {
        let s = self
            .conn
            .query_row(
                "SELECT access_token, refresh_token, expires_at, user_id, email FROM session WHERE id=1",
                [],
                |r| {
                    Ok(Session {
                        access_token: r.get(0)?,
                        refresh_token: r.get(1)?,
                        expires_at: r.get(2)?,
                        user: User {
                            id: r.get(3)?,
                            email: r.get(4)?,
                        },
                    })
                },
            )
            .optional()?;
        Ok(s)
    }

    pub fn save(&self, s: &Session) -> Result<(), AuthError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO session(id, access_token, refresh_token, expires_at, user_id, email)
             VALUES (1, ?1, ?2, ?3, ?4, ?5)",
            params![
                s.access_token,
                s.refresh_token,
                s.expires_at,
                s.user.id,
                s.user.email
            ],
        )?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), AuthError> {
        self.conn.execute("DELETE FROM session", [])?;
        Ok(())
    }
}

pub struct IdentityClient<'c> {
    http: Client,
    auth_url: String,
    anon_key: String,
    store: SessionStore<'c>,
}

impl<'c> IdentityClient<'c> {
    pub fn new(cfg: &Config, conn: &'c Connection) -> Result<Self, AuthError> {
        let (Some(url), Some(key)) = (&cfg.auth_url, &cfg.auth_anon_key) else {
            return Err(AuthError::NotConfigured);
        };
        Ok(Self {
            http: crate::utils::http_client().map_err(AuthError::Client)?,
            auth_url: url.trim_end_matches('/').to_string(),
            anon_key: key.clone(),
            store: SessionStore::new(conn),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.auth_url, path)
    }

    fn call<T: serde::de::DeserializeOwned>(&self, url: String, rb: RequestBuilder) -> Result<T, AuthError> {
        let result = (|| {
            let resp = rb
                .header("apikey", &self.anon_key)
                .send()
                .map_err(|source| AuthError::Transport {
                    url: url.clone(),
                    source,
                })?;
            let status = resp.status();
            let text = resp.text().map_err(|source| AuthError::Transport {
                url: url.clone(),
                source,
            })?;
            if !status.is_success() {
                return Err(backend_error(status.as_u16(), &text));
            }
            let body = if text.trim().is_empty() { "null" } else { text.as_str() };
            serde_json::from_str(body).map_err(AuthError::Decode)
        })();
        if let Err(e) = &result {
            error!(%url, error = %e, "identity request failed");
        }
        result
    }

    pub fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let url = self.endpoint("token?grant_type=password");
        let body = serde_json::json!({ "email": email, "password": password });
        let session: Session = self.call(url.clone(), self.http.post(&url).json(&body))?;
        self.store.save(&session)?;
        info!(user = %session.user.id, "signed in");
        Ok(session)
    }

    pub fn sign_up(&self, email: &str, password: &str) -> Result<SignUp, AuthError> {
        let url = self.endpoint("signup");
        let body = serde_json::json!({ "email": email, "password": password });
        let outcome: SignUp = self.call(url.clone(), self.http.post(&url).json(&body))?;
        if let SignUp::Session(s) = &outcome {
            self.store.save(s)?;
        }
        Ok(outcome)
    }

    /// Clears the local session first, then tells the backend. A remote
    /// failure is still reported.
    pub fn sign_out(&self) -> Result<(), AuthError> {
        let Some(session) = self.store.load()? else {
            return Ok(());
        };
        self.store.clear()?;
        let url = self.endpoint("logout");
        let rb = self.http.post(&url).bearer_auth(&session.access_token);
        let _: serde_json::Value = self.call(url, rb)?;
        info!("signed out");
        Ok(())
    }

    /// `None` when signed out; no network call in that case.
    pub fn current_user(&self) -> Result<Option<User>, AuthError> {
        let Some(session) = self.store.load()? else {
            return Ok(None);
        };
        let url = self.endpoint("user");
        let rb = self.http.get(&url).bearer_auth(&session.access_token);
        Ok(Some(self.call(url, rb)?))
    }

    pub fn auth_token(&self) -> Result<Option<String>, AuthError> {
        auth_token(self.store.conn)
    }
}

/// Stored access token, readable without identity configuration.
pub fn auth_token(conn: &Connection) -> Result<Option<String>, AuthError> {
    Ok(SessionStore::new(conn).load()?.map(|s| s.access_token))
}

fn backend_error(status: u16, body: &str) -> AuthError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["error_description", "msg", "message", "error"]
                .iter()
                .find_map(|k| v.get(*k).and_then(|m| m.as_str()).map(str::to_string))
        })
        .unwrap_or_else(|| format!("HTTP error! status: {}", status));
    AuthError::Backend { status, message }
}
