// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};
use std::path::PathBuf;

fn with_output_flags(cmd: Command) -> Command {
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
            .help("Print as JSON lines"),
    )
}

fn id_arg() -> Arg {
    Arg::new("id").required(true).help("Record identifier")
}

fn status_arg() -> Arg {
    Arg::new("status")
        .required(true)
        .value_parser(["pending", "paid"])
}

fn kind_opt(required: bool) -> Arg {
    Arg::new("kind")
        .long("kind")
        .required(required)
        .value_parser(["income", "expense", "savings"])
}

/// Transaction fields; `add` requires the core ones, `edit` keeps stored
/// values for anything omitted.
fn tx_fields(cmd: Command, required: bool) -> Command {
    cmd.arg(Arg::new("date").long("date").required(required).help("YYYY-MM-DD"))
        .arg(Arg::new("description").long("description").short('d'))
        .arg(Arg::new("category").long("category").required(required))
        .arg(kind_opt(required))
        .arg(Arg::new("amount").long("amount").required(required))
        .arg(
            Arg::new("debtor")
                .long("debtor")
                .help("Name of the person who owes this expense"),
        )
        .arg(Arg::new("debt-amount").long("debt-amount"))
        .arg(
            Arg::new("debt-status")
                .long("debt-status")
                .value_parser(["pending", "paid"]),
        )
        .arg(
            Arg::new("budget")
                .long("budget")
                .help("Savings goal this deposit counts toward"),
        )
}

/// Lets `tx edit` drop a debtor or a savings goal carried over from the
/// stored entry.
fn clear_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("no-debtor")
            .long("no-debtor")
            .action(ArgAction::SetTrue)
            .conflicts_with_all(["debtor", "debt-amount", "debt-status"])
            .help("Remove the debtor from this entry"),
    )
    .arg(
        Arg::new("no-budget")
            .long("no-budget")
            .action(ArgAction::SetTrue)
            .conflicts_with("budget")
            .help("Detach this entry from its savings goal"),
    )
}

fn budget_fields(cmd: Command, required: bool) -> Command {
    cmd.arg(Arg::new("name").long("name").required(required))
        .arg(Arg::new("target").long("target").required(required))
        .arg(
            Arg::new("start")
                .long("start")
                .required(required)
                .help("YYYY-MM-DD"),
        )
        .arg(Arg::new("end").long("end").help("YYYY-MM-DD"))
        .arg(Arg::new("description").long("description").short('d'))
        .arg(Arg::new("category").long("category"))
}

fn debtor_fields(cmd: Command, required: bool) -> Command {
    cmd.arg(Arg::new("name").long("name").required(required))
        .arg(Arg::new("amount").long("amount").required(required))
        .arg(
            Arg::new("date")
                .long("date")
                .required(required)
                .help("YYYY-MM-DD"),
        )
        .arg(Arg::new("description").long("description").short('d'))
        .arg(
            Arg::new("status")
                .long("status")
                .value_parser(["pending", "paid"]),
        )
}

pub fn build_cli() -> Command {
    Command::new("tallybook")
        .about("Personal finance ledger with savings goals and debt tracking")
        .version(clap::crate_version!())
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Path to the data file (defaults to $TALLYBOOK_DB or the platform data dir)"),
        )
        .subcommand(Command::new("init").about("Create the data file and seed categories"))
        .subcommand(
            Command::new("tx")
                .about("Income, expense and savings entries")
                .subcommand(tx_fields(Command::new("add"), true))
                .subcommand(clear_flags(tx_fields(
                    Command::new("edit").arg(id_arg()),
                    false,
                )))
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(with_output_flags(
                    Command::new("list")
                        .arg(
                            Arg::new("period")
                                .long("period")
                                .default_value("all")
                                .help("current|previous|last3|last6|year|all"),
                        )
                        .arg(kind_opt(false))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(Command::new("debt-status").arg(id_arg()).arg(status_arg())),
        )
        .subcommand(
            Command::new("category")
                .about("Transaction categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(kind_opt(true)),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg())
                        .arg(Arg::new("name").long("name"))
                        .arg(kind_opt(false)),
                )
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(Command::new("list").arg(kind_opt(false))),
        )
        .subcommand(
            Command::new("budget")
                .about("Savings goals")
                .subcommand(budget_fields(Command::new("add"), true))
                .subcommand(budget_fields(Command::new("edit").arg(id_arg()), false))
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(with_output_flags(Command::new("list")))
                .subcommand(
                    Command::new("deposit")
                        .about("Record a deposit without a ledger entry")
                        .arg(id_arg())
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("description").long("description").short('d')),
                )
                .subcommand(with_output_flags(Command::new("deposits").arg(id_arg()))),
        )
        .subcommand(
            Command::new("debtor")
                .about("People who owe you money")
                .subcommand(debtor_fields(Command::new("add"), true))
                .subcommand(debtor_fields(Command::new("edit").arg(id_arg()), false))
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(with_output_flags(Command::new("list")))
                .subcommand(Command::new("status").arg(id_arg()).arg(status_arg())),
        )
        .subcommand(
            Command::new("report")
                .about("Summaries computed from the ledger")
                .subcommand(with_output_flags(Command::new("summary")))
                .subcommand(with_output_flags(
                    Command::new("monthly").arg(
                        Arg::new("months")
                            .long("months")
                            .value_parser(value_parser!(usize))
                            .default_value("6"),
                    ),
                ))
                .subcommand(with_output_flags(
                    Command::new("categories")
                        .arg(Arg::new("period").long("period").default_value("all"))
                        .arg(kind_opt(false)),
                ))
                .subcommand(with_output_flags(Command::new("budgets"))),
        )
        .subcommand(
            Command::new("reset")
                .about("Delete all data and restore default categories")
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .action(ArgAction::SetTrue)
                        .help("Confirm the reset"),
                ),
        )
}
