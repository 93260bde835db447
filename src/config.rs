// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Backend connection settings: environment first, then the local settings
//! table, then built-in defaults.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::api::DEFAULT_API_URL;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    ApiUrl,
    AuthUrl,
    AuthKey,
}

impl Setting {
    pub const ALL: [Setting; 3] = [Setting::ApiUrl, Setting::AuthUrl, Setting::AuthKey];

    pub fn key(&self) -> &'static str {
        match self {
            Setting::ApiUrl => "api_base_url",
            Setting::AuthUrl => "auth_url",
            Setting::AuthKey => "auth_anon_key",
        }
    }

    pub fn env_var(&self) -> &'static str {
        match self {
            Setting::ApiUrl => "CARTEIRA_API_URL",
            Setting::AuthUrl => "CARTEIRA_AUTH_URL",
            Setting::AuthKey => "CARTEIRA_AUTH_KEY",
        }
    }

    /// Accepts the CLI spelling (`api-url`) as well as the stored key.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "api-url" | "api_base_url" => Some(Setting::ApiUrl),
            "auth-url" | "auth_url" => Some(Setting::AuthUrl),
            "auth-key" | "auth_anon_key" => Some(Setting::AuthKey),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    pub api_base_url: String,
    pub auth_url: Option<String>,
    pub auth_anon_key: Option<String>,
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )
    .with_context(|| format!("Failed to store setting '{}'", key))?;
    Ok(())
}

pub fn load(conn: &Connection) -> Result<Config> {
    resolve(conn, |name| std::env::var(name).ok())
}

/// Resolution with an injectable environment lookup.
pub fn resolve<F>(conn: &Connection, env: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |s: Setting| -> Result<Option<String>> {
        if let Some(v) = env(s.env_var()).filter(|v| !v.trim().is_empty()) {
            return Ok(Some(v));
        }
        get_setting(conn, s.key())
    };
    Ok(Config {
        api_base_url: lookup(Setting::ApiUrl)?.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        auth_url: lookup(Setting::AuthUrl)?,
        auth_anon_key: lookup(Setting::AuthKey)?,
    })
}
