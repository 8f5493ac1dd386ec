// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analysis::{self, GoalAnalysis, HISTORY_LIMIT};
use crate::clock::{Clock, FixedClock, SystemClock};
use crate::store::{self, NewGoal};
use crate::utils::{
    fmt_money, get_currency, maybe_print_json, parse_date, parse_decimal, pretty_table,
    resolve_user,
};
use anyhow::{Context, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde_json::json;
use tracing::info;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            add(conn, sub, &SystemClock)?;
        }
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("contribute", sub)) => contribute(conn, sub, &SystemClock)?,
        Some(("analyze", sub)) => analyze(conn, sub)?,
        Some(("rm", sub)) => {
            let id = parse_id(sub)?;
            store::delete_goal(conn, id)?;
            println!("Removed goal #{}", id);
        }
        _ => {}
    }
    Ok(())
}

fn parse_id(sub: &clap::ArgMatches) -> Result<i64> {
    let raw = sub.get_one::<String>("id").unwrap();
    raw.trim()
        .parse::<i64>()
        .with_context(|| format!("Invalid goal id '{}'", raw))
}

pub fn add(conn: &mut Connection, sub: &clap::ArgMatches, clock: &dyn Clock) -> Result<i64> {
    let user = resolve_user(conn, sub.get_one::<String>("user"))?;
    let name = sub.get_one::<String>("name").unwrap().trim();
    let target_amount = parse_decimal(sub.get_one::<String>("target").unwrap())?;
    let target_date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let monthly_contribution = match sub.get_one::<String>("contribution") {
        Some(raw) => parse_decimal(raw)?,
        None => Decimal::ZERO,
    };
    let id = store::insert_goal(
        conn,
        &NewGoal {
            user_id: user.id,
            name,
            target_amount,
            target_date,
            monthly_contribution,
        },
        clock.today(),
    )
    .with_context(|| format!("Could not create goal '{}'", name))?;
    println!(
        "Created goal #{} '{}': {} by {}",
        id,
        name,
        fmt_money(&target_amount, &get_currency(conn)?),
        target_date
    );
    Ok(id)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub.get_one::<String>("user"))?;
    let goals = store::list_goals(conn, user.id)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &goals)? {
        let data = goals
            .iter()
            .map(|g| {
                vec![
                    g.id.to_string(),
                    g.name.clone(),
                    format!("{:.2}", g.current_amount),
                    format!("{:.2}", g.target_amount),
                    g.target_date.to_string(),
                    g.status.as_str().to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Name", "Saved", "Target", "Due", "Status"], data)
        );
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub)?;
    let goal = store::get_goal(conn, id)?;
    let contributions = store::list_contributions(conn, id)?;
    let payload = json!({ "goal": goal, "contributions": contributions });
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &payload)? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    println!(
        "#{} {} [{}]: {} of {} by {}",
        goal.id,
        goal.name,
        goal.status.as_str(),
        fmt_money(&goal.current_amount, &ccy),
        fmt_money(&goal.target_amount, &ccy),
        goal.target_date
    );
    let ms = goal
        .milestones
        .iter()
        .map(|m| {
            vec![
                format!("{}%", m.percentage),
                format!("{:.2}", m.amount),
                if m.achieved { "yes" } else { "no" }.to_string(),
                m.achieved_on.map(|d| d.to_string()).unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Milestone", "Amount", "Achieved", "On"], ms)
    );
    let cs = contributions
        .iter()
        .map(|c| {
            vec![
                c.date.to_string(),
                format!("{:.2}", c.amount),
                c.note.clone().unwrap_or_default(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Date", "Contribution", "Note"], cs));
    Ok(())
}

pub fn contribute(conn: &mut Connection, sub: &clap::ArgMatches, clock: &dyn Clock) -> Result<()> {
    let id = parse_id(sub)?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let date = match sub.get_one::<String>("date") {
        Some(raw) => parse_date(raw)?,
        None => clock.today(),
    };
    let note = sub
        .get_one::<String>("note")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty());
    let goal = store::record_contribution(conn, id, date, amount, note)
        .with_context(|| format!("Could not record contribution to goal #{}", id))?;
    let ccy = get_currency(conn)?;
    println!(
        "Added {} to '{}': now {} of {} ({})",
        fmt_money(&amount, &ccy),
        goal.name,
        fmt_money(&goal.current_amount, &ccy),
        fmt_money(&goal.target_amount, &ccy),
        goal.status.as_str()
    );
    Ok(())
}

/// Fetch the goal, its owner and recent history, then run the engine. Nothing is stored.
pub fn run_analysis(conn: &Connection, goal_id: i64, clock: &dyn Clock) -> Result<GoalAnalysis> {
    let goal = store::get_goal(conn, goal_id)?;
    let user = store::get_user(conn, goal.user_id)?;
    let txs = store::recent_transactions(conn, user.id, HISTORY_LIMIT)?;
    let report = analysis::analyze_goal(&user, &goal, &txs, clock)?;
    info!(goal_id, transactions = txs.len(), "analysis complete");
    Ok(report)
}

fn analyze(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub)?;
    let report = match sub.get_one::<String>("today") {
        Some(raw) => run_analysis(conn, id, &FixedClock(parse_date(raw)?))?,
        None => run_analysis(conn, id, &SystemClock)?,
    };
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    print_report(&report, &get_currency(conn)?);
    Ok(())
}

fn print_report(a: &GoalAnalysis, ccy: &str) {
    let s = &a.goal_summary;
    let f = &a.financial_snapshot;
    let fe = &a.feasibility_analysis;
    let r = &a.risk_assessment;

    println!(
        "{}",
        pretty_table(
            &["Goal", "Value"],
            vec![
                vec!["Name".into(), s.name.clone()],
                vec!["Target".into(), fmt_money(&s.target_amount, ccy)],
                vec![
                    "Saved".into(),
                    format!(
                        "{} ({:.2}%)",
                        fmt_money(&s.current_amount, ccy),
                        s.progress_percentage
                    ),
                ],
                vec!["Target date".into(), s.target_date.to_string()],
                vec!["Months left".into(), s.months_to_goal.to_string()],
                vec![
                    "Required / month".into(),
                    fmt_money(&s.required_monthly_saving, ccy),
                ],
                vec!["Monthly income".into(), fmt_money(&f.monthly_income, ccy)],
                vec!["Monthly expenses".into(), fmt_money(&f.monthly_expenses, ccy)],
                vec![
                    "Savings capacity".into(),
                    fmt_money(&f.current_savings_capacity, ccy),
                ],
                vec![
                    "Feasibility".into(),
                    format!(
                        "{:.2} ({}, {})",
                        fe.feasibility_score,
                        fe.status.as_str(),
                        fe.difficulty.as_str()
                    ),
                ],
                vec!["Shortfall / month".into(), fmt_money(&fe.shortfall, ccy)],
                vec![
                    "Success probability".into(),
                    format!("{:.2}%", r.success_probability),
                ],
                vec!["Overall risk".into(), r.overall_risk.to_string()],
            ],
        )
    );

    let strategies = a
        .savings_strategy
        .iter()
        .map(|st| {
            vec![
                st.title.clone(),
                st.description.clone(),
                st.impact.to_string(),
                st.effort.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Strategy", "Detail", "Impact", "Effort"], strategies)
    );

    if !a.budget_recommendations.is_empty() {
        let recs = a
            .budget_recommendations
            .iter()
            .map(|b| {
                vec![
                    b.category.clone(),
                    format!("{:.2}", b.current_monthly_spend),
                    format!("{}%", b.reduction_percentage),
                    format!("{:.2}", b.reduction_target),
                    b.priority.to_string(),
                    b.rationale.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Category", "Monthly", "Cut", "Saves", "Priority", "How"],
                recs
            )
        );
    }

    let plan = a
        .milestones_plan
        .iter()
        .map(|m| {
            vec![
                format!("{}%", m.percentage),
                format!("{:.2}", m.amount),
                format!("month {}", m.target_month),
                m.target_date.to_string(),
                m.celebration.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Milestone", "Amount", "When", "By", "Celebrate"], plan)
    );

    let risks = r
        .risks
        .iter()
        .map(|k| {
            vec![
                k.level.to_string(),
                k.description.clone(),
                k.mitigation.clone(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Risk", "Why", "Mitigation"], risks));
}
