// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::thread;
use tracing::debug;

use super::name_of;
use crate::api::ApiClient;
use crate::forms::TransactionForm;
use crate::metrics;
use crate::models::{
    Account, Category, ExpenseType, PaymentMethod, Period, Periodicity, Transaction,
    TransactionKind,
};
use crate::utils::{
    fmt_money, fmt_signed, maybe_print_json, output_flags, parse_date, period_from_args,
    pretty_table, today,
};
use crate::views::{join, Slot};

/// Collections behind the ledger screens.
pub struct LedgerView {
    pub accounts: Slot<Vec<Account>>,
    pub payment_methods: Slot<Vec<PaymentMethod>>,
    pub expense_types: Slot<Vec<ExpenseType>>,
    pub periodicities: Slot<Vec<Periodicity>>,
    pub categories: Slot<Vec<Category>>,
    pub transactions: Slot<Vec<Transaction>>,
}

impl Default for LedgerView {
    fn default() -> Self {
        Self {
            accounts: Slot::new("accounts"),
            payment_methods: Slot::new("payment_methods"),
            expense_types: Slot::new("expense_types"),
            periodicities: Slot::new("periodicities"),
            categories: Slot::new("categories"),
            transactions: Slot::new("transactions"),
        }
    }
}

impl LedgerView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reference data for the form, fetched together. A failed fetch leaves
    /// only its own slot empty.
    pub fn load_options(&mut self, api: &ApiClient) {
        let ta = self.accounts.begin();
        let tp = self.payment_methods.begin();
        let te = self.expense_types.begin();
        let tr = self.periodicities.begin();
        let (a, p, e, r) = thread::scope(|s| {
            let a = s.spawn(|| api.accounts());
            let p = s.spawn(|| api.payment_methods());
            let e = s.spawn(|| api.expense_types());
            let r = s.spawn(|| api.periodicities());
            (join(a), join(p), join(e), join(r))
        });
        self.accounts.apply(ta, a);
        self.payment_methods.apply(tp, p);
        self.expense_types.apply(te, e);
        self.periodicities.apply(tr, r);
    }

    /// Runs once the kind is known.
    pub fn load_categories(&mut self, api: &ApiClient, kind: Option<TransactionKind>) {
        self.categories.load(|| api.categories(kind));
    }

    pub fn load_month(&mut self, api: &ApiClient, period: Period) {
        self.transactions.load(|| api.transactions(period));
    }
}

pub fn handle(api: &ApiClient, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(api, sub)?,
        Some(("add", sub)) => add(api, sub)?,
        Some(("edit", sub)) => edit(api, sub)?,
        Some(("rm", sub)) => remove(api, sub)?,
        Some(("options", sub)) => options(api, sub)?,
        _ => {}
    }
    Ok(())
}

fn list(api: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(sub);
    let period = period_from_args(sub)?;
    let mut view = LedgerView::new();
    view.load_month(api, period);
    if maybe_print_json(json_flag, jsonl_flag, &view.transactions.items())? {
        return Ok(());
    }
    view.load_options(api);
    view.load_categories(api, None);

    let mut data = Vec::new();
    for t in view.transactions.items() {
        let signed = match t.tipo {
            TransactionKind::Inflow => t.valor,
            TransactionKind::Outflow => -t.valor,
        };
        data.push(vec![
            t.id.to_string(),
            t.data_transacao.to_string(),
            t.tipo.to_string(),
            t.descricao.clone(),
            name_of(view.categories.items(), t.categoria_id, |c| (c.id, c.nome.as_str())),
            name_of(view.accounts.items(), t.conta_id, |a| (a.id, a.nome.as_str())),
            name_of(view.payment_methods.items(), t.forma_pagamento_id, |p| (p.id, p.nome.as_str())),
            fmt_signed(&signed),
        ]);
    }
    println!(
        "{}",
        pretty_table(
            &["Id", "Date", "Kind", "Description", "Category", "Account", "Payment", "Amount"],
            data
        )
    );
    let totals = metrics::totals(view.transactions.items());
    println!(
        "{:02}/{}  in {}  out {}  balance {}",
        period.month.unwrap_or_default(),
        period.year.unwrap_or_default(),
        fmt_money(&totals.inflow),
        fmt_money(&totals.outflow),
        fmt_signed(&totals.balance())
    );
    Ok(())
}

fn fill_form(form: &mut TransactionForm, sub: &clap::ArgMatches) -> Result<()> {
    if let Some(k) = sub.get_one::<String>("kind") {
        let kind = TransactionKind::parse(k)
            .with_context(|| format!("Invalid kind '{}', expected entrada or saida", k))?;
        form.set_kind(kind);
    }
    if let Some(d) = sub.get_one::<String>("description") {
        form.descricao = d.clone();
    }
    if let Some(v) = sub.get_one::<String>("amount") {
        form.valor = v.clone();
    }
    if let Some(d) = sub.get_one::<String>("date") {
        form.data_transacao = parse_date(d)?;
    }
    if let Some(id) = sub.get_one::<i64>("account") {
        form.conta_id = Some(*id);
    }
    if let Some(id) = sub.get_one::<i64>("category") {
        form.categoria_id = Some(*id);
    }
    if let Some(id) = sub.get_one::<i64>("payment") {
        form.forma_pagamento_id = Some(*id);
    }
    if let Some(id) = sub.get_one::<i64>("expense-type") {
        form.tipo_gasto_id = Some(*id);
    }
    if let Some(id) = sub.get_one::<i64>("periodicity") {
        form.periodicidade_id = Some(*id);
    }
    if let Some(n) = sub.get_one::<String>("note") {
        form.observacoes = n.clone();
    }
    Ok(())
}

fn ensure_known<T>(
    slot: &Slot<Vec<T>>,
    id: Option<i64>,
    what: &str,
    key: impl Fn(&T) -> i64,
) -> Result<()> {
    if let (true, Some(id)) = (slot.is_loaded(), id) {
        if !slot.items().iter().any(|x| key(x) == id) {
            anyhow::bail!("Unknown {} id {}", what, id);
        }
    }
    Ok(())
}

/// Loads what the form refers to and checks the chosen ids against it.
fn check_refs(view: &mut LedgerView, api: &ApiClient, form: &TransactionForm) -> Result<()> {
    view.load_options(api);
    view.load_categories(api, form.tipo);
    form.check_category(view.categories.items())?;
    ensure_known(&view.accounts, form.conta_id, "account", |a| a.id)?;
    ensure_known(&view.categories, form.categoria_id, "category", |c| c.id)?;
    ensure_known(&view.payment_methods, form.forma_pagamento_id, "payment method", |p| p.id)?;
    ensure_known(&view.periodicities, form.periodicidade_id, "periodicity", |p| p.id)?;
    if form.tipo == Some(TransactionKind::Outflow) {
        ensure_known(&view.expense_types, form.tipo_gasto_id, "expense type", |e| e.id)?;
    }
    Ok(())
}

/// Reloads the month of `date` and prints its summary.
fn reload_month(view: &mut LedgerView, api: &ApiClient, date: NaiveDate) {
    let period = Period::of(date);
    view.load_month(api, period);
    let totals = metrics::totals(view.transactions.items());
    println!(
        "{:02}/{}: {} transactions, balance {}",
        period.month.unwrap_or_default(),
        period.year.unwrap_or_default(),
        view.transactions.items().len(),
        fmt_signed(&totals.balance())
    );
}

fn report_month(view: &mut LedgerView, api: &ApiClient, t: &Transaction) {
    reload_month(view, api, t.data_transacao);
    let listed = view.transactions.items().iter().any(|x| x.id == t.id);
    debug!(id = t.id, listed, "month reloaded");
}

fn add(api: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let mut form = TransactionForm::blank(today());
    fill_form(&mut form, sub)?;
    let mut view = LedgerView::new();
    check_refs(&mut view, api, &form)?;
    let input = form.to_input()?;
    let created = api
        .create_transaction(&input)
        .context("Failed to save transaction")?;
    println!(
        "Added transaction {}: {} {} on {}",
        created.id,
        created.descricao,
        fmt_money(&created.valor),
        created.data_transacao
    );
    report_month(&mut view, api, &created);
    Ok(())
}

fn edit(api: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let mut view = LedgerView::new();
    view.load_month(api, Period::default());
    if !view.transactions.is_loaded() {
        anyhow::bail!("Could not load transactions");
    }
    let mut form = view
        .transactions
        .items()
        .iter()
        .find(|t| t.id == id)
        .map(TransactionForm::from_transaction)
        .with_context(|| format!("Transaction {} not found", id))?;
    fill_form(&mut form, sub)?;
    check_refs(&mut view, api, &form)?;
    let input = form.to_input()?;
    let updated = api
        .update_transaction(id, &input)
        .with_context(|| format!("Failed to update transaction {}", id))?;
    println!("Updated transaction {}", updated.id);
    report_month(&mut view, api, &updated);
    Ok(())
}

fn remove(api: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let mut view = LedgerView::new();
    view.load_month(api, Period::default());
    let date = view
        .transactions
        .items()
        .iter()
        .find(|t| t.id == id)
        .map(|t| t.data_transacao);
    api.delete_transaction(id)
        .with_context(|| format!("Failed to delete transaction {}", id))?;
    println!("Removed transaction {}", id);
    if let Some(date) = date {
        reload_month(&mut view, api, date);
    }
    Ok(())
}

fn options(api: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let kind = match sub.get_one::<String>("kind") {
        Some(k) => Some(
            TransactionKind::parse(k)
                .with_context(|| format!("Invalid kind '{}', expected entrada or saida", k))?,
        ),
        None => None,
    };
    let mut view = LedgerView::new();
    view.load_options(api);
    view.load_categories(api, kind);

    let named = |rows: Vec<(i64, String, String)>| {
        rows.into_iter()
            .map(|(id, name, extra)| vec![id.to_string(), name, extra])
            .collect::<Vec<_>>()
    };
    println!("Accounts");
    println!(
        "{}",
        pretty_table(
            &["Id", "Name", "Balance"],
            named(
                view.accounts
                    .items()
                    .iter()
                    .map(|a| (a.id, a.nome.clone(), fmt_money(&a.saldo)))
                    .collect()
            )
        )
    );
    println!("Categories");
    println!(
        "{}",
        pretty_table(
            &["Id", "Name", "Kind"],
            named(
                view.categories
                    .items()
                    .iter()
                    .map(|c| {
                        let label = format!("{} {}", c.icone.as_deref().unwrap_or(""), c.nome);
                        (c.id, label.trim().to_string(), c.tipo.to_string())
                    })
                    .collect()
            )
        )
    );
    println!("Payment methods");
    println!(
        "{}",
        pretty_table(
            &["Id", "Name", "Icon"],
            named(
                view.payment_methods
                    .items()
                    .iter()
                    .map(|p| (p.id, p.nome.clone(), p.icone.clone().unwrap_or_default()))
                    .collect()
            )
        )
    );
    println!("Expense types");
    println!(
        "{}",
        pretty_table(
            &["Id", "Name", "Color"],
            named(
                view.expense_types
                    .items()
                    .iter()
                    .map(|e| (e.id, e.nome.clone(), e.cor.clone().unwrap_or_default()))
                    .collect()
            )
        )
    );
    println!("Periodicities");
    println!(
        "{}",
        pretty_table(
            &["Id", "Name", ""],
            named(
                view.periodicities
                    .items()
                    .iter()
                    .map(|p| (p.id, p.nome.clone(), String::new()))
                    .collect()
            )
        )
    );
    Ok(())
}
