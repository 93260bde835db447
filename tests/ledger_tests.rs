// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use carteira::api::ApiClient;
use carteira::commands::ledger::LedgerView;
use carteira::forms::TransactionForm;
use carteira::models::{Period, TransactionKind};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

fn setup() -> (common::Shared, ApiClient) {
    let state = common::shared();
    let base = common::spawn(common::finance_backend(state.clone()));
    let api = ApiClient::new(format!("{}/api", base)).unwrap();
    (state, api)
}

fn grocery_form() -> TransactionForm {
    let mut form = TransactionForm::blank(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap());
    form.set_kind(TransactionKind::Outflow);
    form.descricao = "Feira da semana".into();
    form.valor = "42,50".into();
    form.conta_id = Some(1);
    form.categoria_id = Some(2);
    form.forma_pagamento_id = Some(1);
    form.tipo_gasto_id = Some(2);
    form.periodicidade_id = Some(1);
    form
}

#[test]
fn created_transaction_comes_back_with_the_month() {
    let (_state, api) = setup();
    let input = grocery_form().to_input().unwrap();
    let created = api.create_transaction(&input).unwrap();

    let month = api.transactions(Period::of(input.data_transacao)).unwrap();
    let found = month.iter().find(|t| t.id == created.id).unwrap();
    assert_eq!(found.descricao, "Feira da semana");
    assert_eq!(found.valor, Decimal::from_str("42.50").unwrap());
    assert_eq!(found.data_transacao, NaiveDate::from_ymd_opt(2025, 3, 15).unwrap());
    assert_eq!(found.tipo, TransactionKind::Outflow);

    let other = api.transactions(Period::new(4, 2025)).unwrap();
    assert!(other.is_empty());
}

#[test]
fn amount_goes_out_as_a_json_number() {
    let (state, api) = setup();
    api.create_transaction(&grocery_form().to_input().unwrap())
        .unwrap();
    let body = &common::seen(&state)[0].body;
    assert_eq!(body["valor"], serde_json::json!(42.5));
    assert_eq!(body["tipo"], "saida");
    assert_eq!(body["data_transacao"], "2025-03-15");
    assert_eq!(body["tipo_gasto_id"], 2);
}

#[test]
fn edit_and_delete_round_trip() {
    let (_state, api) = setup();
    let created = api
        .create_transaction(&grocery_form().to_input().unwrap())
        .unwrap();

    let mut form = TransactionForm::from_transaction(&created);
    form.valor = "50".into();
    form.set_kind(TransactionKind::Inflow);
    form.categoria_id = Some(1);
    let updated = api.update_transaction(created.id, &form.to_input().unwrap()).unwrap();
    assert_eq!(updated.valor, Decimal::from(50));
    assert_eq!(updated.tipo, TransactionKind::Inflow);
    assert_eq!(updated.tipo_gasto_id, None);

    api.delete_transaction(created.id).unwrap();
    assert!(api.transactions(Period::new(3, 2025)).unwrap().is_empty());
    let err = api.delete_transaction(created.id).unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[test]
fn view_loads_options_together_and_categories_by_kind() {
    let (state, api) = setup();
    let mut view = LedgerView::new();
    view.load_options(&api);
    assert_eq!(view.accounts.items().len(), 2);
    assert_eq!(view.payment_methods.items().len(), 2);
    assert_eq!(view.expense_types.items().len(), 2);
    assert_eq!(view.periodicities.items().len(), 2);
    assert!(!view.categories.is_loaded());

    view.load_categories(&api, Some(TransactionKind::Inflow));
    let names: Vec<&str> = view.categories.items().iter().map(|c| c.nome.as_str()).collect();
    assert_eq!(names, ["Salário"]);

    let form = grocery_form();
    let outflow_form_with_income_category = {
        let mut f = form.clone();
        f.categoria_id = Some(1);
        f
    };
    view.load_categories(&api, None);
    assert!(form.check_category(view.categories.items()).is_ok());
    assert!(outflow_form_with_income_category
        .check_category(view.categories.items())
        .is_err());

    let paths: Vec<String> = common::seen(&state).into_iter().map(|s| s.path).collect();
    for p in ["/contas", "/formas-pagamento", "/tipos-gasto", "/periodicidades"] {
        assert!(paths.iter().any(|x| x == p), "missing {}", p);
    }
}

#[test]
fn failed_loads_leave_slots_empty() {
    let base = common::spawn(common::failing_backend());
    let api = ApiClient::new(format!("{}/api", base)).unwrap();
    let mut view = LedgerView::new();
    view.load_options(&api);
    assert!(!view.accounts.is_loaded());
    // unknown routes answer 404 with an empty body
    assert!(!view.payment_methods.is_loaded());
    assert!(view.accounts.items().is_empty());
}
