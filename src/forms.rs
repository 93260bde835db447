// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Form state for the ledger, installment and goal views. Each form has one
//! `blank` factory used both when it opens and whenever it is reset.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{
    Category, NewGoal, NewInstallmentPlan, Transaction, TransactionInput, TransactionKind,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("invalid amount '{0}'")]
    InvalidAmount(String),
    #[error("amount must not be negative")]
    NegativeAmount,
    #[error("total amount must be greater than zero")]
    ZeroTotal,
    #[error("invalid installment count '{0}'")]
    InvalidCount(String),
    #[error("an installment plan needs at least 2 installments, got {0}")]
    TooFewInstallments(u32),
    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("category {0} is not a {1} category")]
    CategoryKindMismatch(i64, TransactionKind),
}

fn parse_amount(s: &str) -> Result<Decimal, FormError> {
    let d = s
        .trim()
        .replace(',', ".")
        .parse::<Decimal>()
        .map_err(|_| FormError::InvalidAmount(s.to_string()))?;
    if d.is_sign_negative() && !d.is_zero() {
        return Err(FormError::NegativeAmount);
    }
    Ok(d)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionForm {
    pub tipo: Option<TransactionKind>,
    pub descricao: String,
    pub valor: String,
    pub data_transacao: NaiveDate,
    pub conta_id: Option<i64>,
    pub categoria_id: Option<i64>,
    pub forma_pagamento_id: Option<i64>,
    pub tipo_gasto_id: Option<i64>,
    pub periodicidade_id: Option<i64>,
    pub observacoes: String,
}

impl TransactionForm {
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            tipo: None,
            descricao: String::new(),
            valor: String::new(),
            data_transacao: today,
            conta_id: None,
            categoria_id: None,
            forma_pagamento_id: None,
            tipo_gasto_id: None,
            periodicidade_id: None,
            observacoes: String::new(),
        }
    }

    /// Pre-filled form for editing an existing transaction.
    pub fn from_transaction(t: &Transaction) -> Self {
        Self {
            tipo: Some(t.tipo),
            descricao: t.descricao.clone(),
            valor: t.valor.to_string(),
            data_transacao: t.data_transacao,
            conta_id: t.conta_id,
            categoria_id: t.categoria_id,
            forma_pagamento_id: t.forma_pagamento_id,
            tipo_gasto_id: t.tipo_gasto_id,
            periodicidade_id: t.periodicidade_id,
            observacoes: t.observacoes.clone().unwrap_or_default(),
        }
    }

    /// Changing the kind invalidates the chosen category.
    pub fn set_kind(&mut self, kind: TransactionKind) {
        if self.tipo != Some(kind) {
            self.categoria_id = None;
        }
        self.tipo = Some(kind);
    }

    /// Checks the chosen category against the categories loaded for the kind.
    pub fn check_category(&self, categories: &[Category]) -> Result<(), FormError> {
        let (Some(kind), Some(id)) = (self.tipo, self.categoria_id) else {
            return Ok(());
        };
        match categories.iter().find(|c| c.id == id) {
            Some(c) if c.tipo != kind.category_kind() => {
                Err(FormError::CategoryKindMismatch(id, kind))
            }
            _ => Ok(()),
        }
    }

    pub fn to_input(&self) -> Result<TransactionInput, FormError> {
        let tipo = self.tipo.ok_or(FormError::Missing("kind"))?;
        let descricao = self.descricao.trim().to_string();
        if descricao.is_empty() {
            return Err(FormError::Missing("description"));
        }
        if self.valor.trim().is_empty() {
            return Err(FormError::Missing("amount"));
        }
        let valor = parse_amount(&self.valor)?;
        Ok(TransactionInput {
            tipo,
            descricao,
            valor,
            data_transacao: self.data_transacao,
            conta_id: self.conta_id.ok_or(FormError::Missing("account"))?,
            categoria_id: self.categoria_id.ok_or(FormError::Missing("category"))?,
            forma_pagamento_id: self
                .forma_pagamento_id
                .ok_or(FormError::Missing("payment method"))?,
            // expense types only apply to outflows
            tipo_gasto_id: match tipo {
                TransactionKind::Outflow => self.tipo_gasto_id,
                TransactionKind::Inflow => None,
            },
            periodicidade_id: self.periodicidade_id,
            observacoes: self.observacoes.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallmentForm {
    pub descricao: String,
    pub valor_total: String,
    pub parcelas_total: String,
    pub data_primeira_parcela: NaiveDate,
    pub categoria_id: Option<i64>,
    pub conta_id: Option<i64>,
}

impl InstallmentForm {
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            descricao: String::new(),
            valor_total: String::new(),
            parcelas_total: String::new(),
            data_primeira_parcela: today,
            categoria_id: None,
            conta_id: None,
        }
    }

    fn count(&self) -> Result<u32, FormError> {
        let raw = self.parcelas_total.trim();
        if raw.is_empty() {
            return Err(FormError::Missing("installment count"));
        }
        let n = raw
            .parse::<u32>()
            .map_err(|_| FormError::InvalidCount(raw.to_string()))?;
        if n < 2 {
            return Err(FormError::TooFewInstallments(n));
        }
        Ok(n)
    }

    /// Per-installment amount while the form is being filled, if computable.
    pub fn preview_amount(&self) -> Option<Decimal> {
        let total = parse_amount(&self.valor_total).ok()?;
        let count = self.parcelas_total.trim().parse::<u32>().ok()?;
        crate::metrics::installment_amount(total, count)
    }

    pub fn to_plan(&self) -> Result<NewInstallmentPlan, FormError> {
        let descricao = self.descricao.trim().to_string();
        if descricao.is_empty() {
            return Err(FormError::Missing("description"));
        }
        if self.valor_total.trim().is_empty() {
            return Err(FormError::Missing("total amount"));
        }
        let valor_total = parse_amount(&self.valor_total)?;
        if valor_total.is_zero() {
            return Err(FormError::ZeroTotal);
        }
        let parcelas_total = self.count()?;
        Ok(NewInstallmentPlan {
            descricao,
            valor_total,
            valor_parcela: valor_total / Decimal::from(parcelas_total),
            parcelas_total,
            data_primeira_parcela: self.data_primeira_parcela,
            categoria_id: self.categoria_id.ok_or(FormError::Missing("category"))?,
            conta_id: self.conta_id.ok_or(FormError::Missing("account"))?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalForm {
    pub nome: String,
    pub descricao: String,
    pub valor_objetivo: String,
    pub valor_atual: String,
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
    pub categoria_id: Option<i64>,
}

impl GoalForm {
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            nome: String::new(),
            descricao: String::new(),
            valor_objetivo: String::new(),
            valor_atual: String::new(),
            data_inicio: today,
            data_fim: today,
            categoria_id: None,
        }
    }

    pub fn to_goal(&self) -> Result<NewGoal, FormError> {
        let nome = self.nome.trim().to_string();
        if nome.is_empty() {
            return Err(FormError::Missing("name"));
        }
        if self.valor_objetivo.trim().is_empty() {
            return Err(FormError::Missing("target amount"));
        }
        let valor_objetivo = parse_amount(&self.valor_objetivo)?;
        let valor_atual = if self.valor_atual.trim().is_empty() {
            Decimal::ZERO
        } else {
            parse_amount(&self.valor_atual)?
        };
        if self.data_fim < self.data_inicio {
            return Err(FormError::EndBeforeStart {
                start: self.data_inicio,
                end: self.data_fim,
            });
        }
        Ok(NewGoal {
            nome,
            descricao: self.descricao.trim().to_string(),
            valor_objetivo,
            valor_atual,
            data_inicio: self.data_inicio,
            data_fim: self.data_fim,
            categoria_id: self.categoria_id,
        })
    }
}
