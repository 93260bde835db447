// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::thread;

use super::dashboard::{balance_table, summary_table};
use crate::api::ApiClient;
use crate::metrics::{self, BalancePoint, SummaryRow};
use crate::models::{
    Account, ExpenseTypeSummary, MonthlyBalanceReport, PaymentMethodSummary, PeriodicitySummary,
};
use crate::utils::{fmt_money, maybe_print_json, output_flags, period_from_args, pretty_table};
use crate::views::{join, Slot};

#[derive(Debug, Serialize)]
struct PanelOut<'a> {
    month: u32,
    year: i32,
    accounts: &'a [Account],
    monthly_balance: Vec<BalancePoint>,
    by_payment_method: Vec<SummaryRow>,
    by_expense_type: Vec<SummaryRow>,
    by_periodicity: Vec<SummaryRow>,
}

pub fn handle(api: &ApiClient, m: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(m);
    let period = period_from_args(m)?;
    let (year, month) = (period.year.unwrap_or_default(), period.month.unwrap_or_default());

    let mut accounts: Slot<Vec<Account>> = Slot::new("accounts");
    let mut balance: Slot<MonthlyBalanceReport> = Slot::new("monthly_balance");
    let mut payments: Slot<Vec<PaymentMethodSummary>> = Slot::new("payment_method_summary");
    let mut expense_types: Slot<Vec<ExpenseTypeSummary>> = Slot::new("expense_type_summary");
    let mut periodicities: Slot<Vec<PeriodicitySummary>> = Slot::new("periodicity_summary");

    let tickets = (
        accounts.begin(),
        balance.begin(),
        payments.begin(),
        expense_types.begin(),
        periodicities.begin(),
    );
    let (a, b, p, e, r) = thread::scope(|s| {
        let a = s.spawn(|| api.accounts());
        let b = s.spawn(|| api.monthly_balance(Some(year)));
        let p = s.spawn(|| api.payment_method_summary(period));
        let e = s.spawn(|| api.expense_type_summary(period));
        let r = s.spawn(|| api.periodicity_summary(period));
        (join(a), join(b), join(p), join(e), join(r))
    });
    accounts.apply(tickets.0, a);
    balance.apply(tickets.1, b);
    payments.apply(tickets.2, p);
    expense_types.apply(tickets.3, e);
    periodicities.apply(tickets.4, r);

    let out = PanelOut {
        month,
        year,
        accounts: accounts.items(),
        monthly_balance: balance
            .get()
            .map(|r| metrics::monthly_series(r, year))
            .unwrap_or_default(),
        by_payment_method: metrics::payment_method_rows(payments.items()),
        by_expense_type: metrics::expense_type_rows(expense_types.items()),
        by_periodicity: metrics::periodicity_rows(periodicities.items()),
    };
    if maybe_print_json(json_flag, jsonl_flag, &out)? {
        return Ok(());
    }

    println!("Panel {:02}/{}", month, year);
    if !out.accounts.is_empty() {
        let total: Decimal = out.accounts.iter().map(|a| a.saldo).sum();
        let mut rows: Vec<Vec<String>> = out
            .accounts
            .iter()
            .map(|a| vec![a.nome.clone(), fmt_money(&a.saldo)])
            .collect();
        rows.push(vec!["Total".to_string(), fmt_money(&total)]);
        println!("{}", pretty_table(&["Account", "Balance"], rows));
    }
    if !out.monthly_balance.is_empty() {
        println!("{}", balance_table(&out.monthly_balance));
    }
    for (title, rows) in [
        ("By payment method", &out.by_payment_method),
        ("By expense type", &out.by_expense_type),
        ("By periodicity", &out.by_periodicity),
    ] {
        if rows.is_empty() {
            continue;
        }
        println!("{}", title);
        println!("{}", summary_table(rows));
    }
    Ok(())
}
