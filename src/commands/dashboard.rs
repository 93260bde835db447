// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde::Serialize;
use std::thread;

use crate::api::ApiClient;
use crate::metrics::{self, BalancePoint, SummaryRow};
use crate::models::{CategorySummary, DashboardData, MonthlyBalanceReport, TransactionKind};
use crate::utils::{fmt_money, fmt_signed, maybe_print_json, output_flags, period_from_args, pretty_table};
use crate::views::{join, Slot};

#[derive(Debug, Serialize)]
struct DashboardOut<'a> {
    month: u32,
    year: i32,
    summary: Option<&'a DashboardData>,
    monthly_balance: Vec<BalancePoint>,
    outflow_by_category: Vec<SummaryRow>,
    inflow_by_category: Vec<SummaryRow>,
}

pub fn handle(api: &ApiClient, m: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(m);
    let period = period_from_args(m)?;
    let (year, month) = (period.year.unwrap_or_default(), period.month.unwrap_or_default());

    let mut summary: Slot<DashboardData> = Slot::new("dashboard");
    let mut balance: Slot<MonthlyBalanceReport> = Slot::new("monthly_balance");
    let mut outflows: Slot<Vec<CategorySummary>> = Slot::new("outflow_categories");
    let mut inflows: Slot<Vec<CategorySummary>> = Slot::new("inflow_categories");

    let (ts, tb, to, ti) = (summary.begin(), balance.begin(), outflows.begin(), inflows.begin());
    let (s, b, o, i) = thread::scope(|sc| {
        let s = sc.spawn(|| api.dashboard(period));
        let b = sc.spawn(|| api.monthly_balance(Some(year)));
        let o = sc.spawn(|| api.category_summary(period, Some(TransactionKind::Outflow)));
        let i = sc.spawn(|| api.category_summary(period, Some(TransactionKind::Inflow)));
        (join(s), join(b), join(o), join(i))
    });
    summary.apply(ts, s);
    balance.apply(tb, b);
    outflows.apply(to, o);
    inflows.apply(ti, i);

    let out = DashboardOut {
        month,
        year,
        summary: summary.get(),
        monthly_balance: balance
            .get()
            .map(|r| metrics::monthly_series(r, year))
            .unwrap_or_default(),
        outflow_by_category: metrics::category_rows(outflows.items()),
        inflow_by_category: metrics::category_rows(inflows.items()),
    };
    if maybe_print_json(json_flag, jsonl_flag, &out)? {
        return Ok(());
    }

    println!("Dashboard {:02}/{}", month, year);
    if let Some(d) = out.summary {
        let rows = vec![
            vec!["Total balance".to_string(), fmt_money(&d.saldo_total)],
            vec!["Inflows this month".to_string(), fmt_money(&d.entradas_mes)],
            vec!["Outflows this month".to_string(), fmt_money(&d.saidas_mes)],
            vec!["Monthly result".to_string(), fmt_signed(&d.resultado_mensal)],
            vec!["Transactions".to_string(), d.total_transacoes.to_string()],
        ];
        println!("{}", pretty_table(&["", "Value"], rows));
    }
    if !out.monthly_balance.is_empty() {
        println!("{}", balance_table(&out.monthly_balance));
    }
    for (title, rows) in [
        ("Outflows by category", &out.outflow_by_category),
        ("Inflows by category", &out.inflow_by_category),
    ] {
        if rows.is_empty() {
            continue;
        }
        println!("{}", title);
        println!("{}", summary_table(rows));
    }
    if let Some(d) = out.summary.filter(|d| !d.transacoes_recentes.is_empty()) {
        println!("Recent transactions");
        let rows = d
            .transacoes_recentes
            .iter()
            .map(|t| {
                let signed = match t.tipo {
                    TransactionKind::Inflow => t.valor,
                    TransactionKind::Outflow => -t.valor,
                };
                vec![t.data_transacao.to_string(), t.descricao.clone(), fmt_signed(&signed)]
            })
            .collect();
        println!("{}", pretty_table(&["Date", "Description", "Amount"], rows));
    }
    Ok(())
}

pub(crate) fn balance_table(points: &[BalancePoint]) -> comfy_table::Table {
    let rows = points
        .iter()
        .map(|p| {
            vec![
                p.label.clone(),
                fmt_money(&p.entradas),
                fmt_money(&p.saidas),
                fmt_signed(&p.resultado),
            ]
        })
        .collect();
    pretty_table(&["Month", "Inflows", "Outflows", "Result"], rows)
}

pub(crate) fn summary_table(rows: &[SummaryRow]) -> comfy_table::Table {
    let data = rows
        .iter()
        .map(|r| vec![r.label.clone(), fmt_money(&r.total)])
        .collect();
    pretty_table(&["", "Total"], data)
}
