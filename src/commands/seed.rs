// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use crate::api::ApiClient;

pub fn handle(api: &ApiClient) -> Result<()> {
    let resp = api
        .seed_data()
        .context("Failed to create the default data (are you signed in?)")?;
    let msg = resp
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or("Default accounts, categories and tags created");
    println!("{}", msg);
    Ok(())
}
