// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use comfy_table::Cell;
use std::thread;

use super::name_of;
use crate::api::ApiClient;
use crate::forms::InstallmentForm;
use crate::metrics::{self, ProgressTone};
use crate::models::{Account, Category, InstallmentPlan, PlanStatus, TransactionKind};
use crate::utils::{fmt_money, maybe_print_json, output_flags, parse_date, pretty_table, today};
use crate::views::{join, Slot};

pub struct InstallmentsView {
    pub categories: Slot<Vec<Category>>,
    pub accounts: Slot<Vec<Account>>,
    pub plans: Slot<Vec<InstallmentPlan>>,
}

impl InstallmentsView {
    pub fn new() -> Self {
        Self {
            categories: Slot::new("outflow_categories"),
            accounts: Slot::new("accounts"),
            plans: Slot::new("installment_plans"),
        }
    }

    /// Form options: outflow categories and accounts, fetched together.
    pub fn load_options(&mut self, api: &ApiClient) {
        let (tc, ta) = (self.categories.begin(), self.accounts.begin());
        let (c, a) = thread::scope(|s| {
            let c = s.spawn(|| api.categories(Some(TransactionKind::Outflow)));
            let a = s.spawn(|| api.accounts());
            (join(c), join(a))
        });
        self.categories.apply(tc, c);
        self.accounts.apply(ta, a);
    }

    pub fn load_plans(&mut self, api: &ApiClient) {
        self.plans.load(|| api.installment_plans());
    }
}

impl Default for InstallmentsView {
    fn default() -> Self {
        Self::new()
    }
}

pub fn handle(api: &ApiClient, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(api, sub)?,
        Some(("add", sub)) => add(api, sub)?,
        _ => {}
    }
    Ok(())
}

fn list(api: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(sub);
    let mut view = InstallmentsView::new();
    view.load_plans(api);
    if maybe_print_json(json_flag, jsonl_flag, &view.plans.items())? {
        return Ok(());
    }
    view.load_options(api);

    let mut t = pretty_table(
        &["Id", "Description", "Total", "Installment", "Paid", "Left", "Progress", "Status", "Category", "Account"],
        Vec::new(),
    );
    for p in view.plans.items() {
        let pct = metrics::installment_progress(p.parcelas_pagas, p.parcelas_total);
        t.add_row(vec![
            Cell::new(p.id),
            Cell::new(&p.descricao),
            Cell::new(fmt_money(&p.valor_total)),
            Cell::new(fmt_money(&p.valor_parcela)),
            Cell::new(format!("{}/{}", p.parcelas_pagas, p.parcelas_total)),
            Cell::new(metrics::installments_remaining(p)),
            Cell::new(format!("{} {}%", metrics::progress_bar(pct, 10), pct.round_dp(1)))
                .fg(ProgressTone::of(pct).color()),
            Cell::new(p.status.as_str()),
            Cell::new(name_of(view.categories.items(), p.categoria_id, |c| (c.id, c.nome.as_str()))),
            Cell::new(name_of(view.accounts.items(), p.conta_id, |a| (a.id, a.nome.as_str()))),
        ]);
    }
    println!("{}", t);
    Ok(())
}

fn add(api: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let mut form = InstallmentForm::blank(today());
    form.descricao = sub.get_one::<String>("description").unwrap().clone();
    form.valor_total = sub.get_one::<String>("total").unwrap().clone();
    form.parcelas_total = sub.get_one::<String>("count").unwrap().clone();
    if let Some(d) = sub.get_one::<String>("first-date") {
        form.data_primeira_parcela = parse_date(d)?;
    }
    form.categoria_id = sub.get_one::<i64>("category").copied();
    form.conta_id = sub.get_one::<i64>("account").copied();

    let mut view = InstallmentsView::new();
    view.load_options(api);
    if let (true, Some(id)) = (view.categories.is_loaded(), form.categoria_id) {
        if !view.categories.items().iter().any(|c| c.id == id) {
            anyhow::bail!("Category {} is not an outflow category", id);
        }
    }
    if let (true, Some(id)) = (view.accounts.is_loaded(), form.conta_id) {
        if !view.accounts.items().iter().any(|a| a.id == id) {
            anyhow::bail!("Unknown account id {}", id);
        }
    }

    let plan = form.to_plan()?;
    let created = api
        .create_installment_plan(&plan)
        .context("Failed to save installment plan")?;
    let each = form.preview_amount().unwrap_or(plan.valor_parcela);
    println!(
        "Added installment plan {}: {} x {} (total {}), first on {}",
        created.id,
        created.parcelas_total,
        fmt_money(&each),
        fmt_money(&created.valor_total),
        created.data_primeira_parcela
    );
    view.load_plans(api);
    let active = view
        .plans
        .items()
        .iter()
        .filter(|p| p.status == PlanStatus::Active)
        .count();
    println!("{} active installment plans", active);
    Ok(())
}
