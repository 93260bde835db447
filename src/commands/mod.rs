// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod auth;
pub mod calendar;
pub mod config;
pub mod dashboard;
pub mod goals;
pub mod installments;
pub mod items;
pub mod ledger;
pub mod panel;
pub mod seed;

/// Display name of the entity with `id`, or a dash.
pub(crate) fn name_of<T>(items: &[T], id: Option<i64>, key: impl Fn(&T) -> (i64, &str)) -> String {
    id.and_then(|id| items.iter().map(&key).find(|(i, _)| *i == id))
        .map(|(_, n)| n.to_string())
        .unwrap_or_else(|| "-".to_string())
}
