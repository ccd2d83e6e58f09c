// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON instead of a table"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn range_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("from")
            .long("from")
            .value_name("YYYY-MM-DD")
            .help("First day of the period (inclusive)"),
    )
    .arg(
        Arg::new("to")
            .long("to")
            .value_name("YYYY-MM-DD")
            .help("Last day of the period (inclusive)"),
    )
}

fn required(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).required(true).help(help)
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(value_parser!(i64))
}

pub fn build_cli() -> Command {
    Command::new("tillbook")
        .about("Point-of-sale back office: sales, expenses, credits and profit reports")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(Command::new("init").about("Create the database if missing"))
        .subcommand(
            Command::new("product")
                .about("Manage the product catalogue")
                .subcommand(
                    Command::new("add")
                        .about("Add or update a product")
                        .arg(required("code", "Unique product code"))
                        .arg(required("name", "Display name"))
                        .arg(required("cost", "Cost price per unit"))
                        .arg(required("price", "Sale price per unit"))
                        .arg(Arg::new("stock").long("stock").default_value("0")),
                )
                .subcommand(json_args(Command::new("list").about("List products")))
                .subcommand(json_args(
                    Command::new("inventory").about("Stock valuation at cost and sale price"),
                )),
        )
        .subcommand(
            Command::new("sale")
                .about("Record and review sales")
                .subcommand(
                    Command::new("add")
                        .about("Record a sale")
                        .arg(required("date", "YYYY-MM-DD"))
                        .arg(required("total", "Amount charged"))
                        .arg(required("method", "cash|card|transfer"))
                        .arg(Arg::new("commission").long("commission"))
                        .arg(Arg::new("note").long("note"))
                        .arg(
                            Arg::new("item")
                                .long("item")
                                .value_name("CODE:QTY")
                                .action(ArgAction::Append),
                        ),
                )
                .subcommand(json_args(range_args(
                    Command::new("list").about("List sales grouped by day"),
                )))
                .subcommand(
                    Command::new("cancel")
                        .about("Cancel a sale")
                        .arg(id_arg())
                        .arg(required("reason", "Why the sale was cancelled")),
                ),
        )
        .subcommand(
            Command::new("expense")
                .about("Record and review expenses")
                .subcommand(
                    Command::new("add")
                        .arg(required("date", "YYYY-MM-DD"))
                        .arg(required("amount", "Amount paid out"))
                        .arg(required("description", "What it was for")),
                )
                .subcommand(json_args(range_args(Command::new("list"))))
                .subcommand(Command::new("cancel").arg(id_arg())),
        )
        .subcommand(
            Command::new("credit")
                .about("Customer credit accounts")
                .subcommand(
                    Command::new("add")
                        .arg(required("customer", "Customer name"))
                        .arg(required("due", "Due date YYYY-MM-DD"))
                        .arg(required("amount", "Total owed")),
                )
                .subcommand(
                    Command::new("pay")
                        .arg(id_arg())
                        .arg(required("amount", "Amount received"))
                        .arg(Arg::new("date").long("date").help("Defaults to today")),
                )
                .subcommand(
                    Command::new("cancel-payment")
                        .about("Cancel a credit payment by payment id")
                        .arg(id_arg()),
                )
                .subcommand(json_args(Command::new("list"))),
        )
        .subcommand(
            Command::new("petty-cash")
                .about("Petty cash balance added to cash in register")
                .subcommand(Command::new("set").arg(required("amount", "New balance")))
                .subcommand(Command::new("show")),
        )
        .subcommand(
            Command::new("config")
                .about("Display settings")
                .subcommand(Command::new("currency").arg(required("code", "e.g. USD, EUR")))
                .subcommand(Command::new("show")),
        )
        .subcommand(
            Command::new("report")
                .about("Profit and cash reports")
                .subcommand(json_args(range_args(
                    Command::new("summary").about("Sales, profit, credits and cash in register"),
                )))
                .subcommand(json_args(range_args(
                    Command::new("monthly")
                        .about("Per-month sales, cost of sales and profit")
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .value_parser(value_parser!(usize))
                                .default_value("3"),
                        ),
                )))
                .subcommand(json_args(range_args(
                    Command::new("daily").about("Sales totals per day"),
                ))),
        )
        .subcommand(
            Command::new("import")
                .about("Bulk import from CSV")
                .subcommand(Command::new("products").arg(required("path", "CSV file")))
                .subcommand(Command::new("sales").arg(required("path", "CSV file"))),
        )
        .subcommand(
            Command::new("export").about("Export reports").subcommand(range_args(
                Command::new("summary")
                    .arg(required("format", "csv|json"))
                    .arg(required("out", "Output file")),
            )),
        )
        .subcommand(Command::new("doctor").about("Check the ledger for inconsistencies"))
}
