// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};

use crate::ledger::Ledger;
use crate::session::IdentityProvider;
use crate::store::RemoteStore;

pub fn handle<P, S>(ledger: &mut Ledger<P, S>, m: &clap::ArgMatches) -> Result<()>
where
    P: IdentityProvider,
    S: RemoteStore,
{
    match m.subcommand() {
        Some(("signin", _)) => {
            let identity = ledger.sign_in().ok_or_else(|| match ledger.last_error() {
                Some(e) => anyhow!("Sign-in failed: {}", e),
                None => anyhow!("Sign-in failed"),
            })?;
            println!("Signed in as {}", identity);
        }
        Some(("signout", _)) => {
            if !ledger.sign_out() {
                let msg = ledger.last_error().map(|e| e.to_string()).unwrap_or_default();
                return Err(anyhow!("Sign-out failed: {}", msg));
            }
            println!("Signed out");
        }
        Some(("status", _)) => println!("{}", status_line(ledger)),
        _ => {}
    }
    Ok(())
}

pub fn status_line<P, S>(ledger: &Ledger<P, S>) -> String
where
    P: IdentityProvider,
    S: RemoteStore,
{
    let who = ledger
        .identity()
        .map(|i| i.to_string())
        .unwrap_or_else(|| "(signed out)".into());
    let mut line = format!(
        "{} | {} | {} transactions",
        who,
        ledger.status().indicator(),
        ledger.transactions().len()
    );
    if let Some(e) = ledger.last_error() {
        line.push_str(&format!(" | last error: {}", e));
    }
    line
}
