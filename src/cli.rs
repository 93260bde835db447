// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn period_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("month")
            .long("month")
            .short('m')
            .value_parser(value_parser!(u32).range(1..=12))
            .help("Month number (default: current)"),
    )
    .arg(
        Arg::new("year")
            .long("year")
            .short('y')
            .value_parser(value_parser!(i32))
            .help("Year (default: current)"),
    )
}

fn credentials(cmd: Command) -> Command {
    cmd.arg(Arg::new("email").long("email").required(true))
        .arg(
            Arg::new("password")
                .long("password")
                .env("CARTEIRA_PASSWORD")
                .hide_env_values(true)
                .required(true),
        )
}

fn id_arg() -> Arg {
    Arg::new("id")
        .required(true)
        .value_parser(value_parser!(i64))
}

fn ref_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_parser(value_parser!(i64))
        .help(help)
}

fn transaction_args(cmd: Command, required: bool) -> Command {
    cmd.arg(
        Arg::new("kind")
            .long("kind")
            .required(required)
            .help("entrada (inflow) or saida (outflow)"),
    )
    .arg(Arg::new("description").long("description").required(required))
    .arg(Arg::new("amount").long("amount").required(required))
    .arg(
        Arg::new("date")
            .long("date")
            .help("YYYY-MM-DD (default: today)"),
    )
    .arg(ref_arg("account", "Account id").required(required))
    .arg(ref_arg("category", "Category id").required(required))
    .arg(ref_arg("payment", "Payment method id").required(required))
    .arg(ref_arg("expense-type", "Expense type id (outflows only)"))
    .arg(ref_arg("periodicity", "Periodicity id"))
    .arg(Arg::new("note").long("note"))
}

pub fn build_cli() -> Command {
    Command::new("carteira")
        .about("Personal finance ledger, dashboards, installments and goals")
        .version(clap::crate_version!())
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging on stderr"),
        )
        .subcommand(credentials(Command::new("login").about("Sign in with email and password")))
        .subcommand(credentials(Command::new("signup").about("Create an account")))
        .subcommand(Command::new("logout").about("Sign out and forget the session"))
        .subcommand(json_args(Command::new("whoami").about("Show the signed-in user")))
        .subcommand(Command::new("token").about("Print the stored access token"))
        .subcommand(
            Command::new("config")
                .about("Backend connection settings")
                .subcommand_required(true)
                .subcommand(json_args(Command::new("show")))
                .subcommand(
                    Command::new("set")
                        .arg(
                            Arg::new("key")
                                .required(true)
                                .value_parser(["api-url", "auth-url", "auth-key"]),
                        )
                        .arg(Arg::new("value").required(true)),
                ),
        )
        .subcommand(json_args(Command::new("accounts").about("Bank accounts and balances")))
        .subcommand(
            Command::new("item")
                .about("Create accounts, categories, payment methods, expense types, periodicities")
                .subcommand_required(true)
                .subcommand(
                    json_args(Command::new("add"))
                        .arg(
                            Arg::new("type")
                                .required(true)
                                .help("conta | categoria | forma-pagamento | tipo-gasto | periodicidade"),
                        )
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("icon").long("icon"))
                        .arg(Arg::new("kind").long("kind").help("Receita or Despesa (categories)"))
                        .arg(Arg::new("color").long("color").help("#RRGGBB (accounts)"))
                        .arg(Arg::new("logo-url").long("logo-url").help("Logo image URL (accounts)")),
                )
                .subcommand(Command::new("kinds").about("Item kinds and their fields")),
        )
        .subcommand(
            Command::new("ledger")
                .about("Record, edit and list transactions")
                .subcommand_required(true)
                .subcommand(json_args(period_args(Command::new("list"))))
                .subcommand(transaction_args(Command::new("add"), true))
                .subcommand(transaction_args(Command::new("edit").arg(id_arg()), false))
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(
                    Command::new("options")
                        .about("Accounts, categories, payment methods, expense types, periodicities")
                        .arg(Arg::new("kind").long("kind").help("Only categories of this kind")),
                ),
        )
        .subcommand(json_args(period_args(
            Command::new("calendar").about("Daily balances of a month").arg(
                Arg::new("day")
                    .long("day")
                    .short('d')
                    .value_parser(value_parser!(u32).range(1..=31))
                    .help("Show the transactions of one day"),
            ),
        )))
        .subcommand(json_args(period_args(
            Command::new("dashboard").about("Month totals, yearly balance and category breakdown"),
        )))
        .subcommand(json_args(period_args(
            Command::new("panel").about("Accounts, yearly balance and summaries"),
        )))
        .subcommand(
            Command::new("installments")
                .about("Installment purchases")
                .subcommand_required(true)
                .subcommand(json_args(Command::new("list")))
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(Arg::new("total").long("total").required(true))
                        .arg(Arg::new("count").long("count").required(true))
                        .arg(Arg::new("first-date").long("first-date").help("YYYY-MM-DD (default: today)"))
                        .arg(ref_arg("category", "Outflow category id").required(true))
                        .arg(ref_arg("account", "Account id").required(true)),
                ),
        )
        .subcommand(
            Command::new("goals")
                .about("Savings goals")
                .subcommand_required(true)
                .subcommand(json_args(Command::new("list")))
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("target").long("target").required(true))
                        .arg(Arg::new("current").long("current"))
                        .arg(Arg::new("start").long("start").help("YYYY-MM-DD (default: today)"))
                        .arg(Arg::new("end").long("end").help("YYYY-MM-DD (default: today)"))
                        .arg(ref_arg("category", "Category id")),
                ),
        )
        .subcommand(Command::new("seed").about("Create the default accounts, categories and tags"))
}
