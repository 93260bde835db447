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
use crate::forms::GoalForm;
use crate::metrics::{self, ProgressTone};
use crate::models::{Category, Goal};
use crate::utils::{fmt_money, maybe_print_json, output_flags, parse_date, pretty_table, today};
use crate::views::{join, Slot};

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
    let mut goals: Slot<Vec<Goal>> = Slot::new("goals");
    let mut categories: Slot<Vec<Category>> = Slot::new("categories");
    let (tg, tc) = (goals.begin(), categories.begin());
    let (g, c) = thread::scope(|s| {
        let g = s.spawn(|| api.goals());
        let c = s.spawn(|| api.categories(None));
        (join(g), join(c))
    });
    goals.apply(tg, g);
    categories.apply(tc, c);

    if maybe_print_json(json_flag, jsonl_flag, &goals.items())? {
        return Ok(());
    }

    let overview = metrics::goal_overview(goals.items());
    println!(
        "{} active, {} completed, total target {}",
        overview.active,
        overview.completed,
        fmt_money(&overview.total_target)
    );
    let mut t = pretty_table(
        &["Id", "Goal", "Current", "Target", "Remaining", "Progress", "Until", "Status", "Category"],
        Vec::new(),
    );
    for g in goals.items() {
        let pct = metrics::goal_progress(g);
        t.add_row(vec![
            Cell::new(g.id),
            Cell::new(&g.nome),
            Cell::new(fmt_money(&g.valor_atual)),
            Cell::new(fmt_money(&g.valor_objetivo)),
            Cell::new(fmt_money(&metrics::goal_remaining(g))),
            Cell::new(format!("{} {}%", metrics::progress_bar(pct, 10), pct.round_dp(1)))
                .fg(ProgressTone::of(pct).color()),
            Cell::new(g.data_fim.format("%d/%m/%Y")),
            Cell::new(g.status.as_str()),
            Cell::new(name_of(categories.items(), g.categoria_id, |c| (c.id, c.nome.as_str()))),
        ]);
    }
    println!("{}", t);
    Ok(())
}

fn add(api: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let mut form = GoalForm::blank(today());
    form.nome = sub.get_one::<String>("name").unwrap().clone();
    form.valor_objetivo = sub.get_one::<String>("target").unwrap().clone();
    if let Some(d) = sub.get_one::<String>("description") {
        form.descricao = d.clone();
    }
    if let Some(v) = sub.get_one::<String>("current") {
        form.valor_atual = v.clone();
    }
    if let Some(d) = sub.get_one::<String>("start") {
        form.data_inicio = parse_date(d)?;
    }
    if let Some(d) = sub.get_one::<String>("end") {
        form.data_fim = parse_date(d)?;
    }
    form.categoria_id = sub.get_one::<i64>("category").copied();

    if let Some(id) = form.categoria_id {
        let mut categories: Slot<Vec<Category>> = Slot::new("categories");
        categories.load(|| api.categories(None));
        if categories.is_loaded() && !categories.items().iter().any(|c| c.id == id) {
            anyhow::bail!("Unknown category id {}", id);
        }
    }

    let goal = form.to_goal()?;
    let created = api.create_goal(&goal).context("Failed to save goal")?;
    println!(
        "Added goal {} '{}': {} of {} by {}",
        created.id,
        created.nome,
        fmt_money(&created.valor_atual),
        fmt_money(&created.valor_objetivo),
        created.data_fim
    );
    let mut goals: Slot<Vec<Goal>> = Slot::new("goals");
    goals.load(|| api.goals());
    if goals.is_loaded() {
        let overview = metrics::goal_overview(goals.items());
        println!(
            "{} active, {} completed, total target {}",
            overview.active,
            overview.completed,
            fmt_money(&overview.total_target)
        );
    }
    Ok(())
}
