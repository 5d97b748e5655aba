// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

const CATEGORIES: [&str; 5] = ["income", "expense", "savings", "lend", "owe"];

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

pub fn build_cli() -> Command {
    Command::new("pocketledger")
        .version(clap::crate_version!())
        .about("Live personal ledger: income, spending, savings and loans")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .value_name("PATH")
                .help("SQLite database to use instead of the default location"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging"),
        )
        .subcommand(Command::new("init").about("Create the database and sign in"))
        .subcommand(
            Command::new("session")
                .about("Anonymous session")
                .subcommand(Command::new("signin").about("Sign in anonymously"))
                .subcommand(Command::new("signout").about("Forget the anonymous identity"))
                .subcommand(Command::new("status").about("Show identity and sync status")),
        )
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction")
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .short('t')
                                .required(true)
                                .value_parser(CATEGORIES),
                        )
                        .arg(Arg::new("amount").long("amount").short('a').required(true))
                        .arg(Arg::new("label").long("label").short('l').required(true)),
                )
                .subcommand(json_flags(
                    Command::new("list").about("Recent activity, newest first").arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_parser(value_parser!(usize)),
                    ),
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction")
                        .arg(Arg::new("id").required(true))
                        .arg(
                            Arg::new("yes")
                                .long("yes")
                                .short('y')
                                .action(ArgAction::SetTrue)
                                .help("Skip the confirmation prompt"),
                        ),
                ),
        )
        .subcommand(json_flags(
            Command::new("summary").about("Balance, savings, debts and totals"),
        ))
        .subcommand(
            Command::new("export")
                .about("Export transactions")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("csv")
                        .value_parser(["csv", "json"]),
                )
                .arg(Arg::new("out").long("out").required(true)),
        )
        .subcommand(Command::new("shell").about("Interactive ledger"))
}
