// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;

use pocketledger::session::LocalIdentityProvider;
use pocketledger::store::SqliteStore;
use pocketledger::{Ledger, cli, commands, config, db, logging};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    logging::init(matches.get_flag("verbose"));

    let cfg = config::Config::load_from(&config::config_path()?)?;
    let path = match matches.get_one::<String>("db") {
        Some(p) => PathBuf::from(p),
        None => match &cfg.db_path {
            Some(p) => p.clone(),
            None => db::db_path()?,
        },
    };
    let conn = db::open_or_init(&path)?;

    let mut ledger = Ledger::start(
        LocalIdentityProvider::new(&conn),
        SqliteStore::new(&conn),
        &cfg.app_id,
    );

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", path.display());
            println!("{}", commands::session::status_line(&ledger));
        }
        Some(("session", sub)) => commands::session::handle(&mut ledger, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&mut ledger, &cfg, sub)?,
        Some(("summary", sub)) => commands::summary::handle(&mut ledger, &cfg, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&mut ledger, sub)?,
        Some(("shell", _)) => {
            let stdin = std::io::stdin();
            commands::shell::run(&mut ledger, &cfg, &mut stdin.lock(), &mut std::io::stdout())?;
        }
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
