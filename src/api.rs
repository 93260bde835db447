// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Blocking client for the finance REST backend.
//!
//! One method per resource/action. Every call is a single attempt: no retry,
//! no backoff, no deduplication. Non-2xx answers become [`RequestError::Status`]
//! carrying the server's `error` message when it sent one.

use crate::models::{
    Account, Category, CategorySummary, DashboardData, ExpenseType, ExpenseTypeSummary, Goal,
    InstallmentPlan, MonthlyBalanceReport, NewGoal, NewInstallmentPlan, PaymentMethod,
    PaymentMethodSummary, Period, Periodicity, PeriodicitySummary, Transaction, TransactionInput,
    TransactionKind,
};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Error)]
pub enum RequestError {
    /// Non-success HTTP status. `message` is the server's `error` field or a
    /// generic status line.
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl RequestError {
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Builds the error for a non-success response body.
pub fn status_error(status: u16, body: &str) -> RequestError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| format!("HTTP error! status: {}", status));
    RequestError::Status { status, message }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, RequestError> {
        let http = crate::utils::http_client().map_err(RequestError::Client)?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Sends `Authorization: Bearer <token>` on every request when set.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn builder(&self, method: Method, path: &str) -> (String, RequestBuilder) {
        let url = self.url(path);
        let mut rb = self.http.request(method, &url);
        if let Some(t) = &self.token {
            rb = rb.bearer_auth(t);
        }
        (url, rb)
    }

    fn execute<T: DeserializeOwned>(&self, url: String, rb: RequestBuilder) -> Result<T, RequestError> {
        let result = (|| {
            let resp = rb.send().map_err(|source| RequestError::Transport {
                url: url.clone(),
                source,
            })?;
            let status = resp.status();
            let text = resp.text().map_err(|source| RequestError::Transport {
                url: url.clone(),
                source,
            })?;
            debug!(%url, status = status.as_u16(), "response");
            if !status.is_success() {
                return Err(status_error(status.as_u16(), &text));
            }
            let body = if text.trim().is_empty() { "null" } else { text.as_str() };
            serde_json::from_str(body).map_err(|source| RequestError::Decode {
                url: url.clone(),
                source,
            })
        })();
        if let Err(e) = &result {
            error!(%url, error = %e, "API request failed");
        }
        result
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, RequestError> {
        let (url, rb) = self.builder(Method::GET, path);
        let rb = if query.is_empty() { rb } else { rb.query(query) };
        self.execute(url, rb)
    }

    fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, RequestError> {
        let (url, rb) = self.builder(method, path);
        self.execute(url, rb.json(body))
    }

    fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, RequestError> {
        self.send_json(Method::POST, path, body)
    }

    // Accounts
    pub fn accounts(&self) -> Result<Vec<Account>, RequestError> {
        self.get("/contas", &[])
    }

    pub fn create_account<B: Serialize + ?Sized>(&self, body: &B) -> Result<Account, RequestError> {
        self.post("/contas", body)
    }

    // Categories
    pub fn categories(&self, kind: Option<TransactionKind>) -> Result<Vec<Category>, RequestError> {
        let q: Vec<(&str, String)> = kind
            .map(|k| vec![("tipo", k.as_str().to_string())])
            .unwrap_or_default();
        self.get("/categorias", &q)
    }

    pub fn create_category<B: Serialize + ?Sized>(&self, body: &B) -> Result<Category, RequestError> {
        self.post("/categorias", body)
    }

    // Payment methods
    pub fn payment_methods(&self) -> Result<Vec<PaymentMethod>, RequestError> {
        self.get("/formas-pagamento", &[])
    }

    pub fn create_payment_method<B: Serialize + ?Sized>(
        &self,
        body: &B,
    ) -> Result<PaymentMethod, RequestError> {
        self.post("/formas-pagamento", body)
    }

    // Expense types
    pub fn expense_types(&self) -> Result<Vec<ExpenseType>, RequestError> {
        self.get("/tipos-gasto", &[])
    }

    pub fn create_expense_type<B: Serialize + ?Sized>(&self, body: &B) -> Result<ExpenseType, RequestError> {
        self.post("/tipos-gasto", body)
    }

    // Periodicities
    pub fn periodicities(&self) -> Result<Vec<Periodicity>, RequestError> {
        self.get("/periodicidades", &[])
    }

    pub fn create_periodicity<B: Serialize + ?Sized>(&self, body: &B) -> Result<Periodicity, RequestError> {
        self.post("/periodicidades", body)
    }

    // Transactions
    pub fn transactions(&self, period: Period) -> Result<Vec<Transaction>, RequestError> {
        self.get("/transacoes", &period.query())
    }

    pub fn create_transaction(&self, tx: &TransactionInput) -> Result<Transaction, RequestError> {
        self.post("/transacoes", tx)
    }

    pub fn update_transaction(&self, id: i64, tx: &TransactionInput) -> Result<Transaction, RequestError> {
        self.send_json(Method::PUT, &format!("/transacoes/{}", id), tx)
    }

    pub fn delete_transaction(&self, id: i64) -> Result<serde_json::Value, RequestError> {
        let (url, rb) = self.builder(Method::DELETE, &format!("/transacoes/{}", id));
        self.execute(url, rb)
    }

    // Reports
    pub fn monthly_balance(&self, year: Option<i32>) -> Result<MonthlyBalanceReport, RequestError> {
        let q: Vec<(&str, String)> = year.map(|y| vec![("ano", y.to_string())]).unwrap_or_default();
        self.get("/balanco-mensal", &q)
    }

    pub fn payment_method_summary(&self, period: Period) -> Result<Vec<PaymentMethodSummary>, RequestError> {
        self.get("/forma-pagamento-resumo", &period.query())
    }

    pub fn category_summary(
        &self,
        period: Period,
        kind: Option<TransactionKind>,
    ) -> Result<Vec<CategorySummary>, RequestError> {
        let mut q = period.query();
        if let Some(k) = kind {
            q.push(("tipo", k.as_str().to_string()));
        }
        self.get("/categorias-resumo", &q)
    }

    pub fn expense_type_summary(&self, period: Period) -> Result<Vec<ExpenseTypeSummary>, RequestError> {
        self.get("/tipo-gasto-resumo", &period.query())
    }

    pub fn periodicity_summary(&self, period: Period) -> Result<Vec<PeriodicitySummary>, RequestError> {
        self.get("/periodicidade-resumo", &period.query())
    }

    pub fn dashboard(&self, period: Period) -> Result<DashboardData, RequestError> {
        self.get("/dashboard", &period.query())
    }

    // Installment plans
    pub fn installment_plans(&self) -> Result<Vec<InstallmentPlan>, RequestError> {
        self.get("/parcelamentos", &[])
    }

    pub fn create_installment_plan(&self, plan: &NewInstallmentPlan) -> Result<InstallmentPlan, RequestError> {
        self.post("/parcelamentos", plan)
    }

    // Goals
    pub fn goals(&self) -> Result<Vec<Goal>, RequestError> {
        self.get("/metas", &[])
    }

    pub fn create_goal(&self, goal: &NewGoal) -> Result<Goal, RequestError> {
        self.post("/metas", goal)
    }

    pub fn seed_data(&self) -> Result<serde_json::Value, RequestError> {
        let (url, rb) = self.builder(Method::POST, "/seed-data");
        self.execute(url, rb)
    }
}
