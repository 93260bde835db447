// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use comfy_table::{Cell, Color};

use crate::api::ApiClient;
use crate::metrics::{self, CalendarDay};
use crate::models::{Transaction, TransactionKind};
use crate::utils::{fmt_money, fmt_signed, maybe_print_json, output_flags, period_from_args, pretty_table};
use crate::views::Slot;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub fn handle(api: &ApiClient, m: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(m);
    let period = period_from_args(m)?;
    let (year, month) = (period.year.unwrap_or_default(), period.month.unwrap_or_default());

    let mut txs: Slot<Vec<Transaction>> = Slot::new("transactions");
    txs.load(|| api.transactions(period));

    if let Some(day) = m.get_one::<u32>("day") {
        let date = NaiveDate::from_ymd_opt(year, month, *day)
            .with_context(|| format!("{:02}/{} has no day {}", month, year, day))?;
        return show_day(txs.items(), date, json_flag, jsonl_flag);
    }

    let days = metrics::month_calendar(txs.items(), year, month);
    if maybe_print_json(json_flag, jsonl_flag, &days)? {
        return Ok(());
    }
    println!("{:02}/{}", month, year);
    println!("{}", grid(&days));
    let totals = metrics::totals(txs.items());
    println!(
        "in {}  out {}  balance {}",
        fmt_money(&totals.inflow),
        fmt_money(&totals.outflow),
        fmt_signed(&totals.balance())
    );
    Ok(())
}

/// Month laid out Sunday to Saturday; each day shows its balance when it has
/// transactions.
fn grid(days: &[CalendarDay]) -> comfy_table::Table {
    let mut t = pretty_table(&WEEKDAYS, Vec::new());
    let Some(first) = days.first() else {
        return t;
    };
    let mut row: Vec<Cell> = (0..metrics::week_offset(first.date))
        .map(|_| Cell::new(""))
        .collect();
    for d in days {
        let cell = if d.count == 0 {
            Cell::new(d.date.day())
        } else {
            let bal = d.totals.balance();
            let color = if bal.is_sign_negative() { Color::Red } else { Color::Green };
            Cell::new(format!("{}\n{}", d.date.day(), fmt_signed(&bal))).fg(color)
        };
        row.push(cell);
        if row.len() == 7 {
            t.add_row(std::mem::take(&mut row));
        }
    }
    if !row.is_empty() {
        t.add_row(row);
    }
    t
}

fn show_day(txs: &[Transaction], date: NaiveDate, json_flag: bool, jsonl_flag: bool) -> Result<()> {
    let by_day = metrics::group_by_day(txs);
    let day = by_day.get(&date).cloned().unwrap_or_default();
    if maybe_print_json(json_flag, jsonl_flag, &day)? {
        return Ok(());
    }
    let mut data = Vec::new();
    for t in &day {
        let amount = match t.tipo {
            TransactionKind::Inflow => fmt_signed(&t.valor),
            TransactionKind::Outflow => fmt_signed(&-t.valor),
        };
        data.push(vec![t.id.to_string(), t.tipo.to_string(), t.descricao.clone(), amount]);
    }
    println!("{}", date.format("%d/%m/%Y"));
    println!(
        "{}",
        pretty_table(&["Id", "Kind", "Description", "Amount"], data)
    );
    println!("Balance: {}", fmt_signed(&metrics::daily_balance(txs, date)));
    Ok(())
}
