// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::auth::{self, IdentityClient, SignUp};
use crate::config::Config;
use crate::utils::{maybe_print_json, output_flags, pretty_table};

fn credentials(m: &clap::ArgMatches) -> (&str, &str) {
    let email = m.get_one::<String>("email").unwrap();
    let password = m.get_one::<String>("password").unwrap();
    (email.as_str(), password.as_str())
}

pub fn handle(conn: &Connection, cfg: &Config, cmd: &str, m: &clap::ArgMatches) -> Result<()> {
    match cmd {
        "login" => {
            let (email, password) = credentials(m);
            let session = IdentityClient::new(cfg, conn)?
                .sign_in(email, password)
                .context("Sign-in failed")?;
            println!(
                "Signed in as {}",
                session.user.email.as_deref().unwrap_or(&session.user.id)
            );
        }
        "signup" => {
            let (email, password) = credentials(m);
            match IdentityClient::new(cfg, conn)?
                .sign_up(email, password)
                .context("Sign-up failed")?
            {
                SignUp::Session(s) => println!(
                    "Account created, signed in as {}",
                    s.user.email.as_deref().unwrap_or(email)
                ),
                SignUp::PendingConfirmation(_) => {
                    println!("Account created. Check {} to confirm it, then log in.", email)
                }
            }
        }
        "logout" => {
            IdentityClient::new(cfg, conn)?
                .sign_out()
                .context("Sign-out failed remotely (local session was cleared)")?;
            println!("Signed out");
        }
        "whoami" => {
            let (json_flag, jsonl_flag) = output_flags(m);
            let user = IdentityClient::new(cfg, conn)?
                .current_user()
                .context("Failed to fetch the current user")?;
            let Some(user) = user else {
                println!("Not signed in");
                return Ok(());
            };
            if maybe_print_json(json_flag, jsonl_flag, &user)? {
                return Ok(());
            }
            let rows = vec![vec![
                user.id.clone(),
                user.email.clone().unwrap_or_default(),
            ]];
            println!("{}", pretty_table(&["User", "Email"], rows));
        }
        "token" => match auth::auth_token(conn)? {
            Some(t) => println!("{}", t),
            None => anyhow::bail!("Not signed in"),
        },
        _ => {}
    }
    Ok(())
}
