// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Display aggregates derived from collections the backend already returned.
//! Pure functions; nothing here is stored.

use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{
    CategorySummary, ExpenseTypeSummary, Goal, GoalStatus, InstallmentPlan, MonthlyBalance,
    MonthlyBalanceReport, PaymentMethodSummary, PeriodicitySummary, Transaction, TransactionKind,
};

/// Buckets transactions by date. Each transaction appears in exactly one bucket.
pub fn group_by_day(txs: &[Transaction]) -> BTreeMap<NaiveDate, Vec<&Transaction>> {
    let mut map: BTreeMap<NaiveDate, Vec<&Transaction>> = BTreeMap::new();
    for t in txs {
        map.entry(t.data_transacao).or_default().push(t);
    }
    map
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DayTotals {
    pub inflow: Decimal,
    pub outflow: Decimal,
}

impl DayTotals {
    pub fn balance(&self) -> Decimal {
        self.inflow.saturating_sub(self.outflow)
    }
}

pub fn totals<'a, I>(txs: I) -> DayTotals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    txs.into_iter().fold(DayTotals::default(), |mut acc, t| {
        match t.tipo {
            TransactionKind::Inflow => acc.inflow = acc.inflow.saturating_add(t.valor),
            TransactionKind::Outflow => acc.outflow = acc.outflow.saturating_add(t.valor),
        }
        acc
    })
}

/// Inflows minus outflows of the transactions dated `day`.
pub fn daily_balance(txs: &[Transaction], day: NaiveDate) -> Decimal {
    totals(txs.iter().filter(|t| t.data_transacao == day)).balance()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub count: usize,
    pub totals: DayTotals,
}

pub fn month_days(year: i32, month: u32) -> Vec<NaiveDate> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    first
        .iter_days()
        .take_while(|d| d.month() == month)
        .collect()
}

/// Blank cells before `date` in a week that starts on Sunday.
pub fn week_offset(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

/// Every day of the month with its transactions' totals, grouped once.
pub fn month_calendar(txs: &[Transaction], year: i32, month: u32) -> Vec<CalendarDay> {
    let by_day = group_by_day(txs);
    month_days(year, month)
        .into_iter()
        .map(|date| {
            let day = by_day.get(&date).map(Vec::as_slice).unwrap_or(&[]);
            CalendarDay {
                date,
                count: day.len(),
                totals: totals(day.iter().copied()),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalancePoint {
    pub month: u32,
    pub label: String,
    pub entradas: Decimal,
    pub saidas: Decimal,
    pub resultado: Decimal,
}

/// Orders the monthly balance by month number and labels it `MM/YYYY`.
pub fn monthly_series(report: &MonthlyBalanceReport, year: i32) -> Vec<BalancePoint> {
    let mut rows: Vec<(u32, &MonthlyBalance)> = match report {
        MonthlyBalanceReport::List(v) => v.iter().map(|m| (m.mes, m)).collect(),
        MonthlyBalanceReport::ByMonth(map) => map
            .iter()
            .map(|(k, m)| (k.trim().parse::<u32>().unwrap_or(m.mes), m))
            .collect(),
    };
    rows.sort_by_key(|(month, _)| *month);
    rows.into_iter()
        .map(|(month, m)| BalancePoint {
            month,
            label: format!("{:02}/{}", month, year),
            entradas: m.entradas,
            saidas: m.saidas,
            resultado: m.resultado,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub label: String,
    pub total: Decimal,
}

fn relabel(label: &Option<String>, fallback: &str, total: Decimal) -> SummaryRow {
    SummaryRow {
        label: label
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(fallback)
            .to_string(),
        total,
    }
}

pub fn category_rows(rows: &[CategorySummary]) -> Vec<SummaryRow> {
    rows.iter()
        .map(|r| relabel(&r.categoria, "Sem categoria", r.total))
        .collect()
}

pub fn payment_method_rows(rows: &[PaymentMethodSummary]) -> Vec<SummaryRow> {
    rows.iter()
        .map(|r| relabel(&r.forma_pagamento, "Sem forma", r.total))
        .collect()
}

pub fn expense_type_rows(rows: &[ExpenseTypeSummary]) -> Vec<SummaryRow> {
    rows.iter()
        .map(|r| relabel(&r.tipo_gasto, "Sem tipo", r.total))
        .collect()
}

pub fn periodicity_rows(rows: &[PeriodicitySummary]) -> Vec<SummaryRow> {
    rows.iter()
        .map(|r| relabel(&r.periodicidade, "Sem periodicidade", r.total))
        .collect()
}

fn clamp_percent(p: Decimal) -> Decimal {
    p.max(Decimal::ZERO).min(Decimal::ONE_HUNDRED)
}

/// `paid / total * 100`, clamped to [0, 100]; 0 for an empty plan.
pub fn installment_progress(paid: u32, total: u32) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    clamp_percent(Decimal::from(paid) / Decimal::from(total) * Decimal::ONE_HUNDRED)
}

/// Per-installment amount shown while filling the form. The server's value wins.
pub fn installment_amount(total: Decimal, count: u32) -> Option<Decimal> {
    if count == 0 {
        return None;
    }
    Some((total / Decimal::from(count)).round_dp(2))
}

pub fn installments_remaining(plan: &InstallmentPlan) -> u32 {
    plan.parcelas_restantes
        .unwrap_or_else(|| plan.parcelas_total.saturating_sub(plan.parcelas_pagas))
}

/// Server percentage when present, else derived from the amounts. Clamped.
pub fn goal_progress(goal: &Goal) -> Decimal {
    let raw = match goal.progresso {
        Some(p) => p,
        None if goal.valor_objetivo.is_zero() => Decimal::ZERO,
        None => goal
            .valor_atual
            .checked_div(goal.valor_objetivo)
            .and_then(|q| q.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or_else(|| {
                // Out of range either way; the clamp only needs the sign.
                if goal.valor_atual.is_sign_negative() == goal.valor_objetivo.is_sign_negative() {
                    Decimal::ONE_HUNDRED
                } else {
                    Decimal::ZERO
                }
            }),
    };
    clamp_percent(raw)
}

/// `target - current`, never below zero.
pub fn goal_remaining(goal: &Goal) -> Decimal {
    goal.valor_objetivo
        .saturating_sub(goal.valor_atual)
        .max(Decimal::ZERO)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GoalOverview {
    pub active: usize,
    pub completed: usize,
    pub total_target: Decimal,
}

pub fn goal_overview(goals: &[Goal]) -> GoalOverview {
    goals.iter().fold(GoalOverview::default(), |mut acc, g| {
        match g.status {
            GoalStatus::Active => acc.active += 1,
            GoalStatus::Completed => acc.completed += 1,
            GoalStatus::Cancelled => {}
        }
        acc.total_target = acc.total_target.saturating_add(g.valor_objetivo);
        acc
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProgressTone {
    Done,
    High,
    Medium,
    Low,
}

impl ProgressTone {
    pub fn of(percent: Decimal) -> Self {
        if percent >= Decimal::ONE_HUNDRED {
            ProgressTone::Done
        } else if percent >= Decimal::from(75) {
            ProgressTone::High
        } else if percent >= Decimal::from(50) {
            ProgressTone::Medium
        } else {
            ProgressTone::Low
        }
    }

    pub fn color(&self) -> comfy_table::Color {
        match self {
            ProgressTone::Done => comfy_table::Color::Green,
            ProgressTone::High => comfy_table::Color::Blue,
            ProgressTone::Medium => comfy_table::Color::Yellow,
            ProgressTone::Low => comfy_table::Color::Red,
        }
    }
}

/// Text progress bar, `width` cells wide.
pub fn progress_bar(percent: Decimal, width: usize) -> String {
    let p = clamp_percent(percent);
    let filled = (p * Decimal::from(width) / Decimal::ONE_HUNDRED)
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
