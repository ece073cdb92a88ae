// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use tallybook::{FinanceStore, cli, commands, db};

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("TALLYBOOK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let db_arg = matches.get_one::<PathBuf>("db").cloned();
    let slots = db::open_or_init(db_arg.as_deref())?;
    let mut store = FinanceStore::open(slots);

    match matches.subcommand() {
        Some(("init", _)) => {
            println!(
                "Data file ready at {} ({} categories)",
                db::db_path(db_arg.as_deref())?.display(),
                store.categories().len()
            );
        }
        Some(("tx", sub)) => commands::transactions::handle(&mut store, sub)?,
        Some(("category", sub)) => commands::categories::handle(&mut store, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&mut store, sub)?,
        Some(("debtor", sub)) => commands::debtors::handle(&mut store, sub)?,
        Some(("report", sub)) => commands::reports::handle(&store, sub)?,
        Some(("reset", sub)) => commands::reset::handle(&mut store, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
