// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store;
use crate::utils::{
    maybe_print_json, parse_decimal, parse_month, pretty_table, resolve_user,
};
use anyhow::{Context, Result, bail};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("report", sub)) => report(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub.get_one::<String>("user"))?;
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let cat = sub.get_one::<String>("category").unwrap().trim();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    if amount < Decimal::ZERO {
        bail!("Budget amount must not be negative, got {}", amount);
    }
    let cat_id = store::category_id_or_create(conn, cat)?;
    conn.execute(
        "INSERT INTO budgets(user_id, month, category_id, amount) VALUES (?1,?2,?3,?4)
         ON CONFLICT(user_id, month, category_id) DO UPDATE SET amount=excluded.amount",
        params![user.id, month, cat_id, amount.to_string()],
    )?;
    println!("Budget set for {} / {} = {}", month, cat, amount);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub.get_one::<String>("user"))?;
    let month = match sub.get_one::<String>("month") {
        Some(m) => Some(parse_month(m)?),
        None => None,
    };
    let names: HashMap<i64, String> = store::list_categories(conn)?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    let mut budgets = store::list_budgets(conn, user.id, month.as_deref())?;
    budgets.sort_by(|a, b| {
        b.month
            .cmp(&a.month)
            .then_with(|| names.get(&a.category_id).cmp(&names.get(&b.category_id)))
    });
    let data = budgets
        .into_iter()
        .map(|b| {
            vec![
                b.month,
                names.get(&b.category_id).cloned().unwrap_or_default(),
                format!("{:.2}", b.amount),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Month", "Category", "Budget"], data));
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct BudgetLine {
    pub category: String,
    pub budget: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
}

/// Budget against expense spend for one month, per category.
pub fn budget_vs_actual(conn: &Connection, user_id: i64, month: &str) -> Result<Vec<BudgetLine>> {
    let mut lines: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();

    let mut bstmt = conn.prepare(
        "SELECT c.name, b.amount FROM budgets b JOIN categories c ON b.category_id=c.id
         WHERE b.user_id=?1 AND b.month=?2",
    )?;
    let mut brows = bstmt.query(params![user_id, month])?;
    while let Some(r) = brows.next()? {
        let name: String = r.get(0)?;
        let amt_s: String = r.get(1)?;
        let amt = amt_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid budget amount '{}' for {}", amt_s, name))?;
        lines.entry(name).or_default().0 += amt;
    }

    let mut tstmt = conn.prepare(
        "SELECT c.name, t.amount FROM transactions t LEFT JOIN categories c ON t.category_id=c.id
         WHERE t.user_id=?1 AND t.kind='expense' AND substr(t.date,1,7)=?2",
    )?;
    let mut trows = tstmt.query(params![user_id, month])?;
    while let Some(r) = trows.next()? {
        let name: Option<String> = r.get(0)?;
        let amt_s: String = r.get(1)?;
        let amt = amt_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid amount '{}' in transactions", amt_s))?;
        let name = name.unwrap_or_else(|| crate::models::UNCATEGORIZED.to_string());
        lines.entry(name).or_default().1 += amt;
    }

    Ok(lines
        .into_iter()
        .map(|(category, (budget, spent))| BudgetLine {
            category,
            budget,
            spent,
            remaining: budget - spent,
        })
        .collect())
}

fn report(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = resolve_user(conn, sub.get_one::<String>("user"))?;
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;

    let lines = budget_vs_actual(conn, user.id, &month)?;
    if !maybe_print_json(json_flag, jsonl_flag, &lines)? {
        let data = lines
            .iter()
            .map(|l| {
                vec![
                    l.category.clone(),
                    format!("{:.2}", l.budget),
                    format!("{:.2}", l.spent),
                    format!("{:.2}", l.remaining),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Budget", "Spent", "Remaining"], data)
        );
    }
    Ok(())
}
