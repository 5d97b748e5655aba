// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use serde_json::json;
use std::path::Path;

use crate::ledger::Ledger;
use crate::models::Transaction;
use crate::session::IdentityProvider;
use crate::store::RemoteStore;

pub fn handle<P, S>(ledger: &mut Ledger<P, S>, m: &clap::ArgMatches) -> Result<()>
where
    P: IdentityProvider,
    S: RemoteStore,
{
    let fmt = m.get_one::<String>("format").unwrap().to_lowercase();
    let out = m.get_one::<String>("out").unwrap();
    ledger.pump();
    let n = export_transactions(ledger.transactions(), &fmt, Path::new(out))?;
    println!("Exported {} transactions to {}", n, out);
    Ok(())
}

/// Write `transactions` as csv or json. Amounts keep full precision.
pub fn export_transactions(transactions: &[Transaction], fmt: &str, out: &Path) -> Result<usize> {
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["id", "created_at", "type", "label", "amount"])?;
            for tx in transactions {
                wtr.write_record([
                    tx.id.to_string(),
                    tx.created_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
                    tx.category.to_string(),
                    tx.label.clone(),
                    tx.amount.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = transactions
                .iter()
                .map(|tx| {
                    json!({
                        "id": tx.id, "created_at": tx.created_at, "type": tx.category,
                        "label": tx.label, "amount": tx.amount.to_string()
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    Ok(transactions.len())
}
