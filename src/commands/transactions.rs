// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{TransactionKind, UNCATEGORIZED};
use crate::store::{self, NewTransaction};
use crate::utils::{
    maybe_print_json, parse_date, parse_decimal, parse_month, pretty_table, resolve_user,
};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;
use tracing::debug;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub.get_one::<String>("user"))?;
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let kind: TransactionKind = sub.get_one::<String>("type").unwrap().parse()?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let category = sub.get_one::<String>("category").map(|s| s.trim());
    let note = sub
        .get_one::<String>("note")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty());

    let id = store::insert_transaction(
        conn,
        &NewTransaction {
            user_id: user.id,
            date,
            kind,
            amount,
            category,
            note,
        },
    )?;
    debug!(id, user = %user.name, "transaction recorded");
    println!(
        "Recorded {} of {:.2} on {} ({}) for {}",
        kind,
        amount,
        date,
        category.unwrap_or(UNCATEGORIZED),
        user.name
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.kind.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.note.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Type", "Amount", "Category", "Note"], rows)
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub date: String,
    pub kind: String,
    pub amount: String,
    pub category: String,
    pub note: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let user = resolve_user(conn, sub.get_one::<String>("user"))?;
    let mut sql = String::from(
        "SELECT t.date, t.kind, t.amount, c.name, t.note FROM transactions t LEFT JOIN categories c ON t.category_id=c.id WHERE t.user_id=?",
    );
    let mut params_vec: Vec<String> = vec![user.id.to_string()];

    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(t.date,1,7)=?");
        params_vec.push(parse_month(month)?);
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        sql.push_str(" AND c.name=?");
        params_vec.push(cat.trim().into());
    }
    if let Some(kind) = sub.get_one::<String>("type") {
        let kind: TransactionKind = kind.parse()?;
        sql.push_str(" AND t.kind=?");
        params_vec.push(kind.as_str().into());
    }
    sql.push_str(" ORDER BY t.date DESC, t.id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let date: String = r.get(0)?;
        let kind: String = r.get(1)?;
        let amount: String = r.get(2)?;
        let category: Option<String> = r.get(3)?;
        let note: Option<String> = r.get(4)?;
        data.push(TransactionRow {
            date,
            kind,
            amount,
            category: category.unwrap_or_else(|| UNCATEGORIZED.to_string()),
            note: note.unwrap_or_default(),
        });
    }
    Ok(data)
}
