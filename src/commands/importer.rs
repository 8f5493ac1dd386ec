// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::TransactionKind;
use crate::store::{self, NewTransaction};
use crate::utils::{parse_date, parse_decimal, resolve_user};
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use rusqlite::Connection;
use tracing::info;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let n = import_transactions(conn, sub)?;
            println!("Imported {} transactions", n);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// CSV columns: date,type,amount,category,note. All-or-nothing.
pub fn import_transactions(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<usize> {
    let user = resolve_user(conn, sub.get_one::<String>("user"))?;
    let path = sub.get_one::<String>("path").unwrap().trim();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let tx = conn.transaction()?;
    let mut count = 0usize;
    for (idx, result) in rdr.records().enumerate() {
        let line = idx + 2;
        let rec = result.with_context(|| format!("Malformed CSV at line {}", line))?;
        let date_raw = rec.get(0).context("date missing")?.trim();
        let kind_raw = rec.get(1).context("type missing")?.trim();
        let amount_raw = rec.get(2).context("amount missing")?.trim();
        let category = rec.get(3).map(|s| s.trim()).filter(|s| !s.is_empty());
        let note = rec.get(4).map(|s| s.trim()).filter(|s| !s.is_empty());

        let date = parse_date(date_raw).with_context(|| format!("line {}", line))?;
        let kind = kind_raw
            .parse::<TransactionKind>()
            .with_context(|| format!("line {}", line))?;
        let amount = parse_decimal(amount_raw).with_context(|| format!("line {}", line))?;

        store::insert_transaction(
            &tx,
            &NewTransaction {
                user_id: user.id,
                date,
                kind,
                amount,
                category,
                note,
            },
        )
        .with_context(|| format!("line {}", line))?;
        count += 1;
    }
    tx.commit()?;
    info!(user = %user.name, count, path, "imported transactions");
    Ok(count)
}
