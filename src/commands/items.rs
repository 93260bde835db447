// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use crate::api::ApiClient;
use crate::items::{CreatedItem, ItemDialog, ItemError, ItemKind, FAILURE_NOTICE};
use crate::models::CategoryKind;
use crate::utils::{maybe_print_json, output_flags, pretty_table};

pub fn handle(api: &ApiClient, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(api, sub)?,
        Some(("kinds", _)) => kinds(),
        _ => {}
    }
    Ok(())
}

fn add(api: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(sub);
    let tag = sub.get_one::<String>("type").unwrap();
    let quiet = json_flag || jsonl_flag;
    let mut dialog = ItemDialog::new(tag.as_str(), move |item: &CreatedItem| {
        if !quiet {
            println!("Added '{}' (id {})", item.name(), item.id());
        }
    });

    dialog.form.nome = sub.get_one::<String>("name").unwrap().clone();
    if let Some(icon) = sub.get_one::<String>("icon") {
        dialog.form.icone = icon.clone();
    }
    if let Some(kind) = sub.get_one::<String>("kind") {
        let k = CategoryKind::parse(kind)
            .with_context(|| format!("Invalid kind '{}', expected Receita or Despesa", kind))?;
        dialog.form.tipo = Some(k);
    }
    if let Some(color) = sub.get_one::<String>("color") {
        dialog.form.cor = color.clone();
    }
    if let Some(url) = sub.get_one::<String>("logo-url") {
        dialog.form.imagem_url = url.clone();
    }

    match dialog.submit(api) {
        Ok(item) => {
            maybe_print_json(json_flag, jsonl_flag, &item)?;
            Ok(())
        }
        Err(e @ ItemError::Request(_)) => {
            eprintln!("{}", FAILURE_NOTICE);
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}

fn kinds() {
    let mut data = Vec::new();
    for k in ItemKind::ALL {
        let spec = k.spec();
        let fields: Vec<&str> = spec.fields.iter().map(|f| f.label()).collect();
        data.push(vec![
            spec.tag.to_string(),
            spec.title.to_string(),
            spec.path.to_string(),
            fields.join(", "),
            spec.icons.join(" "),
        ]);
    }
    println!(
        "{}",
        pretty_table(&["Type", "Title", "Endpoint", "Fields", "Icons"], data)
    );
}
