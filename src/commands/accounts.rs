// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rust_decimal::Decimal;

use crate::api::ApiClient;
use crate::utils::{fmt_money, maybe_print_json, output_flags, pretty_table};

pub fn handle(api: &ApiClient, m: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(m);
    let accounts = api.accounts().context("Failed to load accounts")?;
    if maybe_print_json(json_flag, jsonl_flag, &accounts)? {
        return Ok(());
    }
    let total: Decimal = accounts.iter().map(|a| a.saldo).sum();
    let mut data = Vec::new();
    for a in &accounts {
        data.push(vec![
            a.id.to_string(),
            a.nome.clone(),
            a.cor.clone().unwrap_or_default(),
            fmt_money(&a.saldo),
        ]);
    }
    data.push(vec![
        String::new(),
        "Total".to_string(),
        String::new(),
        fmt_money(&total),
    ]);
    println!("{}", pretty_table(&["Id", "Account", "Color", "Balance"], data));
    Ok(())
}
