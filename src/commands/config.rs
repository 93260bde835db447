// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::config::{self, Setting};
use crate::utils::{maybe_print_json, output_flags, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(conn, sub)?,
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap();
            let value = sub.get_one::<String>("value").unwrap().trim();
            let setting =
                Setting::parse(key).with_context(|| format!("Unknown setting '{}'", key))?;
            if matches!(setting, Setting::ApiUrl | Setting::AuthUrl) {
                reqwest::Url::parse(value)
                    .with_context(|| format!("Invalid URL '{}'", value))?;
            }
            config::set_setting(conn, setting.key(), value)?;
            println!("Set {} = {}", setting.key(), value);
        }
        _ => {}
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(sub);
    let cfg = config::load(conn)?;
    if maybe_print_json(json_flag, jsonl_flag, &cfg)? {
        return Ok(());
    }
    let mut data = Vec::new();
    for s in Setting::ALL {
        let source = if std::env::var(s.env_var()).is_ok_and(|v| !v.trim().is_empty()) {
            s.env_var().to_string()
        } else if config::get_setting(conn, s.key())?.is_some() {
            "local".to_string()
        } else {
            "default".to_string()
        };
        let value = match s {
            Setting::ApiUrl => cfg.api_base_url.clone(),
            Setting::AuthUrl => cfg.auth_url.clone().unwrap_or_else(|| "(unset)".into()),
            Setting::AuthKey => cfg
                .auth_anon_key
                .as_deref()
                .map(mask)
                .unwrap_or_else(|| "(unset)".into()),
        };
        data.push(vec![s.key().to_string(), value, source]);
    }
    println!("{}", pretty_table(&["Setting", "Value", "Source"], data));
    Ok(())
}

fn mask(key: &str) -> String {
    let head: String = key.chars().take(6).collect();
    format!("{}…", head)
}
