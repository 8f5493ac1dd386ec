// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{TransactionKind, UNCATEGORIZED};
use crate::utils::{maybe_print_json, parse_month, pretty_table, resolve_user};
use anyhow::{Context, Result};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("cashflow", sub)) => cashflow(conn, sub)?,
        Some(("spend-by-category", sub)) => spend_by_category(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct CashflowRow {
    pub month: String,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

/// Newest `months` calendar months that have activity, newest first.
pub fn cashflow_rows(conn: &Connection, user_id: i64, months: usize) -> Result<Vec<CashflowRow>> {
    let mut stmt = conn.prepare(
        "SELECT substr(date,1,7) AS month, kind, amount FROM transactions WHERE user_id=?1",
    )?;
    let rows = stmt.query_map(params![user_id], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;

    let mut map: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for row in rows {
        let (m, kind, amt_s) = row?;
        let amt = amt_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid amount '{}' in {}", amt_s, m))?;
        let entry = map.entry(m).or_insert((Decimal::ZERO, Decimal::ZERO));
        match kind.parse::<TransactionKind>()? {
            TransactionKind::Income => entry.0 += amt,
            TransactionKind::Expense => entry.1 += amt,
        }
    }
    Ok(map
        .into_iter()
        .rev()
        .take(months)
        .map(|(month, (income, expense))| CashflowRow {
            month,
            income,
            expense,
            net: income - expense,
        })
        .collect())
}

fn cashflow(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let months: usize = *sub.get_one::<usize>("months").unwrap_or(&12);
    let user = resolve_user(conn, sub.get_one::<String>("user"))?;

    let rows = cashflow_rows(conn, user.id, months)?;
    if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
        let data = rows
            .iter()
            .map(|r| {
                vec![
                    r.month.clone(),
                    format!("{:.2}", r.income),
                    format!("{:.2}", r.expense),
                    format!("{:.2}", r.net),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Net"], data)
        );
    }
    Ok(())
}

pub fn spend_by_category_rows(
    conn: &Connection,
    user_id: i64,
    month: &str,
) -> Result<Vec<(String, Decimal)>> {
    let mut stmt = conn.prepare(
        "SELECT c.name, t.amount FROM transactions t LEFT JOIN categories c ON t.category_id=c.id
         WHERE t.user_id=?1 AND t.kind='expense' AND substr(t.date,1,7)=?2",
    )?;
    let rows = stmt.query_map(params![user_id, month], |r| {
        Ok((r.get::<_, Option<String>>(0)?, r.get::<_, String>(1)?))
    })?;
    let mut agg: HashMap<String, Decimal> = HashMap::new();
    for row in rows {
        let (cat_opt, amt_s) = row?;
        let cat = cat_opt.unwrap_or_else(|| UNCATEGORIZED.into());
        let amt = amt_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid amount '{}' for {}", amt_s, cat))?;
        *agg.entry(cat).or_insert(Decimal::ZERO) += amt;
    }
    let mut items: Vec<_> = agg.into_iter().collect();
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Ok(items)
}

fn spend_by_category(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let user = resolve_user(conn, sub.get_one::<String>("user"))?;

    let items = spend_by_category_rows(conn, user.id, &month)?;
    let data: Vec<Vec<String>> = items
        .into_iter()
        .map(|(cat, amt)| vec![cat, format!("{:.2}", amt)])
        .collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("{}", pretty_table(&["Category", "Spent"], data));
    }
    Ok(())
}
