// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analysis::snapshot::window_start;
use crate::clock::{Clock, FixedClock, SystemClock};
use crate::models::GoalStatus;
use crate::store;
use crate::utils::{parse_date, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let clock: Box<dyn Clock> = match m.get_one::<String>("today") {
        Some(raw) => Box::new(FixedClock(parse_date(raw)?)),
        None => Box::new(SystemClock),
    };
    let rows = find_issues(conn, clock.today())?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

pub fn find_issues(conn: &Connection, today: NaiveDate) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    for user in store::list_users(conn)? {
        // 1) Goals that can no longer be analysed meaningfully
        for goal in store::list_goals(conn, user.id)? {
            if goal.status != GoalStatus::Active {
                continue;
            }
            if goal.current_amount >= goal.target_amount {
                rows.push(vec![
                    "goal_funded_not_completed".into(),
                    format!("#{} {} ({})", goal.id, goal.name, user.name),
                ]);
            } else if goal.target_date <= today {
                rows.push(vec![
                    "goal_overdue".into(),
                    format!(
                        "#{} {} was due {} ({})",
                        goal.id, goal.name, goal.target_date, user.name
                    ),
                ]);
            }
        }

        // 2) Nothing to base a savings capacity on
        if user.monthly_salary.is_zero() {
            let income: i64 = conn.query_row(
                "SELECT COUNT(*) FROM transactions WHERE user_id=?1 AND kind='income' AND date>=?2",
                params![user.id, window_start(today)],
                |r| r.get(0),
            )?;
            if income == 0 {
                rows.push(vec!["no_income_signal".into(), user.name.clone()]);
            }
        }
    }

    // 3) Amounts must be non-negative; direction lives in `kind`
    let mut stmt = conn.prepare("SELECT id, amount FROM transactions ORDER BY id")?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let amt: String = r.get(1)?;
        match amt.parse::<Decimal>() {
            Ok(d) if d >= Decimal::ZERO => {}
            _ => rows.push(vec!["bad_amount".into(), format!("tx #{}: {}", id, amt)]),
        }
    }

    Ok(rows)
}
