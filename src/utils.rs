// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rust_decimal::Decimal;

use crate::models::Period;

const UA: &str = concat!(
    "carteira/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/carteira)"
);

// No timeout: a request either answers or fails at the transport level.
pub fn http_client() -> reqwest::Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder().user_agent(UA).build()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Month/year from CLI flags, falling back to the current month.
pub fn period_from_args(sub: &clap::ArgMatches) -> Result<Period> {
    let now = today();
    let month = sub.get_one::<u32>("month").copied().unwrap_or(now.month());
    let year = sub.get_one::<i32>("year").copied().unwrap_or(now.year());
    if !(1..=12).contains(&month) {
        return Err(anyhow::anyhow!("Invalid month number {}", month));
    }
    Ok(Period::new(month, year))
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("R$ {:.2}", d.round_dp(2))
}

pub fn fmt_signed(d: &Decimal) -> String {
    if d.is_sign_positive() && !d.is_zero() {
        format!("+{}", fmt_money(d))
    } else if d.is_sign_negative() {
        format!("-{}", fmt_money(&d.abs()))
    } else {
        fmt_money(d)
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

/// `--json` / `--jsonl` flags, tolerating subcommands that do not define them.
pub fn output_flags(sub: &clap::ArgMatches) -> (bool, bool) {
    let flag = |name: &str| {
        sub.try_get_one::<bool>(name)
            .ok()
            .flatten()
            .copied()
            .unwrap_or(false)
    };
    (flag("json"), flag("jsonl"))
}
