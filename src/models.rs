// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Wire types for the finance backend. Field names follow the backend's JSON.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    #[serde(rename = "entrada")]
    Inflow,
    #[serde(rename = "saida")]
    Outflow,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Inflow => "entrada",
            TransactionKind::Outflow => "saida",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "entrada" | "in" | "inflow" | "income" | "receita" => Some(TransactionKind::Inflow),
            "saida" | "saída" | "out" | "outflow" | "expense" | "despesa" => {
                Some(TransactionKind::Outflow)
            }
            _ => None,
        }
    }

    pub fn category_kind(&self) -> CategoryKind {
        match self {
            TransactionKind::Inflow => CategoryKind::Income,
            TransactionKind::Outflow => CategoryKind::Expense,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryKind {
    #[serde(rename = "Receita", alias = "entrada", alias = "receita")]
    Income,
    #[serde(rename = "Despesa", alias = "saida", alias = "despesa")]
    Expense,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Income => "Receita",
            CategoryKind::Expense => "Despesa",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        TransactionKind::parse(s).map(|k| k.category_kind())
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub nome: String,
    #[serde(default)]
    pub cor: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub saldo: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub nome: String,
    #[serde(default)]
    pub icone: Option<String>,
    pub tipo: CategoryKind,
    #[serde(default)]
    pub cor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: i64,
    pub nome: String,
    #[serde(default)]
    pub icone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseType {
    pub id: i64,
    pub nome: String,
    #[serde(default)]
    pub cor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Periodicity {
    pub id: i64,
    pub nome: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub tipo: TransactionKind,
    pub descricao: String,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub valor: Decimal,
    #[serde(deserialize_with = "date_prefix")]
    pub data_transacao: NaiveDate,
    #[serde(default)]
    pub conta_id: Option<i64>,
    #[serde(default)]
    pub categoria_id: Option<i64>,
    #[serde(default)]
    pub forma_pagamento_id: Option<i64>,
    #[serde(default)]
    pub tipo_gasto_id: Option<i64>,
    #[serde(default)]
    pub periodicidade_id: Option<i64>,
    #[serde(default)]
    pub observacoes: Option<String>,
}

/// Body for creating or updating a transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionInput {
    pub tipo: TransactionKind,
    pub descricao: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub valor: Decimal,
    pub data_transacao: NaiveDate,
    pub conta_id: i64,
    pub categoria_id: i64,
    pub forma_pagamento_id: i64,
    pub tipo_gasto_id: Option<i64>,
    pub periodicidade_id: Option<i64>,
    pub observacoes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanStatus {
    #[serde(rename = "ativo")]
    Active,
    #[serde(rename = "concluido")]
    Completed,
    #[serde(rename = "cancelado")]
    Cancelled,
}

impl PlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Active => "ativo",
            PlanStatus::Completed => "concluido",
            PlanStatus::Cancelled => "cancelado",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentPlan {
    pub id: i64,
    pub descricao: String,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub valor_total: Decimal,
    pub parcelas_total: u32,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub valor_parcela: Decimal,
    #[serde(deserialize_with = "date_prefix")]
    pub data_primeira_parcela: NaiveDate,
    #[serde(default)]
    pub parcelas_pagas: u32,
    #[serde(default)]
    pub parcelas_restantes: Option<u32>,
    pub status: PlanStatus,
    #[serde(default)]
    pub categoria_id: Option<i64>,
    #[serde(default)]
    pub conta_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewInstallmentPlan {
    pub descricao: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub valor_total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub valor_parcela: Decimal,
    pub parcelas_total: u32,
    pub data_primeira_parcela: NaiveDate,
    pub categoria_id: i64,
    pub conta_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalStatus {
    #[serde(rename = "ativa")]
    Active,
    #[serde(rename = "concluida")]
    Completed,
    #[serde(rename = "cancelada")]
    Cancelled,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => "ativa",
            GoalStatus::Completed => "concluida",
            GoalStatus::Cancelled => "cancelada",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub nome: String,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub valor_objetivo: Decimal,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub valor_atual: Decimal,
    #[serde(deserialize_with = "date_prefix")]
    pub data_inicio: NaiveDate,
    #[serde(deserialize_with = "date_prefix")]
    pub data_fim: NaiveDate,
    pub status: GoalStatus,
    #[serde(default)]
    pub progresso: Option<Decimal>,
    #[serde(default)]
    pub categoria_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewGoal {
    pub nome: String,
    pub descricao: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub valor_objetivo: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub valor_atual: Decimal,
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
    pub categoria_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    #[serde(default, alias = "saldo_acumulado", deserialize_with = "decimal_or_zero")]
    pub saldo_total: Decimal,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub entradas_mes: Decimal,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub saidas_mes: Decimal,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub resultado_mensal: Decimal,
    #[serde(default)]
    pub transacoes_recentes: Vec<Transaction>,
    #[serde(default)]
    pub total_transacoes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBalance {
    #[serde(default)]
    pub mes: u32,
    #[serde(default)]
    pub mes_nome: Option<String>,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub entradas: Decimal,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub saidas: Decimal,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub resultado: Decimal,
}

/// The backend answers `balanco-mensal` either as a list or keyed by month number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MonthlyBalanceReport {
    List(Vec<MonthlyBalance>),
    ByMonth(BTreeMap<String, MonthlyBalance>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    #[serde(default)]
    pub categoria: Option<String>,
    #[serde(alias = "valor", deserialize_with = "decimal_or_zero")]
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethodSummary {
    #[serde(default)]
    pub forma_pagamento: Option<String>,
    #[serde(alias = "valor", deserialize_with = "decimal_or_zero")]
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseTypeSummary {
    #[serde(default)]
    pub tipo_gasto: Option<String>,
    #[serde(alias = "valor", deserialize_with = "decimal_or_zero")]
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodicitySummary {
    #[serde(default)]
    pub periodicidade: Option<String>,
    #[serde(alias = "valor", deserialize_with = "decimal_or_zero")]
    pub total: Decimal,
}

/// Month/year filter shared by the list and summary endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Period {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl Period {
    pub fn new(month: u32, year: i32) -> Self {
        Self {
            month: Some(month),
            year: Some(year),
        }
    }

    pub fn of(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Self::new(date.month(), date.year())
    }

    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut q = Vec::new();
        if let Some(m) = self.month {
            q.push(("mes", m.to_string()));
        }
        if let Some(y) = self.year {
            q.push(("ano", y.to_string()));
        }
        q
    }
}

fn decimal_or_zero<'de, D>(d: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Decimal>::deserialize(d)?.unwrap_or(Decimal::ZERO))
}

// Accepts "YYYY-MM-DD" as well as timestamps starting with it.
fn date_prefix<'de, D>(d: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(d)?;
    let head = s.get(..10).unwrap_or(&s);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").map_err(serde::de::Error::custom)
}
