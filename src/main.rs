// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::debug;

use carteira::api::ApiClient;
use carteira::config::{self, Config};
use carteira::{auth, cli, commands, db, logging};

fn api_client(conn: &Connection, cfg: &Config) -> Result<ApiClient> {
    let token = auth::auth_token(conn)?;
    let api = ApiClient::new(cfg.api_base_url.as_str())
        .context("Failed to set up the HTTP client")?
        .with_token(token);
    debug!(base = %api.base_url(), signed_in = api.has_token(), "api client");
    Ok(api)
}

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();
    logging::init(matches.get_flag("verbose"));

    let conn = db::open_or_init()?;
    let cfg = config::load(&conn)?;

    match matches.subcommand() {
        Some((name @ ("login" | "signup" | "logout" | "whoami" | "token"), sub)) => {
            commands::auth::handle(&conn, &cfg, name, sub)?
        }
        Some(("config", sub)) => commands::config::handle(&conn, sub)?,
        Some(("accounts", sub)) => commands::accounts::handle(&api_client(&conn, &cfg)?, sub)?,
        Some(("item", sub)) => commands::items::handle(&api_client(&conn, &cfg)?, sub)?,
        Some(("ledger", sub)) => commands::ledger::handle(&api_client(&conn, &cfg)?, sub)?,
        Some(("calendar", sub)) => commands::calendar::handle(&api_client(&conn, &cfg)?, sub)?,
        Some(("dashboard", sub)) => commands::dashboard::handle(&api_client(&conn, &cfg)?, sub)?,
        Some(("panel", sub)) => commands::panel::handle(&api_client(&conn, &cfg)?, sub)?,
        Some(("installments", sub)) => {
            commands::installments::handle(&api_client(&conn, &cfg)?, sub)?
        }
        Some(("goals", sub)) => commands::goals::handle(&api_client(&conn, &cfg)?, sub)?,
        Some(("seed", _)) => commands::seed::handle(&api_client(&conn, &cfg)?)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
