// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Record access for users, transactions and goals.
//!
//! This is the layer that validates input and hands fully-formed records to
//! the analysis engine. Money is stored as decimal TEXT.

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::analysis::milestones::MILESTONE_PERCENTAGES;
use crate::error::{Error, Result};
use crate::models::{
    Budget, Category, Contribution, Goal, GoalMilestone, GoalStatus, Transaction,
    MAX_AMOUNT, TransactionKind, UNCATEGORIZED, User,
};

fn check_amount(what: &str, amount: Decimal) -> Result<()> {
    if amount.abs() > MAX_AMOUNT {
        return Err(Error::Validation(format!(
            "{} {} exceeds the maximum of {}",
            what, amount, MAX_AMOUNT
        )));
    }
    Ok(())
}

fn dec(raw: &str, what: &str) -> Result<Decimal> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|e| Error::InvalidData(format!("{} '{}': {}", what, raw, e)))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

pub fn insert_user(conn: &Connection, name: &str, monthly_salary: Decimal) -> Result<i64> {
    check_amount("monthly salary", monthly_salary)?;
    if monthly_salary < Decimal::ZERO {
        return Err(Error::Validation(format!(
            "monthly salary must not be negative, got {}",
            monthly_salary
        )));
    }
    conn.execute(
        "INSERT INTO users(name, monthly_salary) VALUES (?1, ?2)",
        params![name, monthly_salary.to_string()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn set_salary(conn: &Connection, name: &str, monthly_salary: Decimal) -> Result<()> {
    check_amount("monthly salary", monthly_salary)?;
    if monthly_salary < Decimal::ZERO {
        return Err(Error::Validation(format!(
            "monthly salary must not be negative, got {}",
            monthly_salary
        )));
    }
    let n = conn.execute(
        "UPDATE users SET monthly_salary=?1 WHERE name=?2",
        params![monthly_salary.to_string(), name],
    )?;
    if n == 0 {
        return Err(Error::NotFound(format!("user '{}'", name)));
    }
    Ok(())
}

fn user_from_row(id: i64, name: String, salary: String) -> Result<User> {
    Ok(User {
        id,
        monthly_salary: dec(&salary, "monthly salary")?,
        name,
    })
}

pub fn get_user(conn: &Connection, id: i64) -> Result<User> {
    let row: Option<(i64, String, String)> = conn
        .query_row(
            "SELECT id, name, monthly_salary FROM users WHERE id=?1",
            params![id],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .optional()?;
    let (id, name, salary) = row.ok_or_else(|| Error::NotFound(format!("user #{}", id)))?;
    user_from_row(id, name, salary)
}

pub fn user_by_name(conn: &Connection, name: &str) -> Result<User> {
    let row: Option<(i64, String, String)> = conn
        .query_row(
            "SELECT id, name, monthly_salary FROM users WHERE name=?1",
            params![name],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .optional()?;
    let (id, name, salary) = row.ok_or_else(|| Error::NotFound(format!("user '{}'", name)))?;
    user_from_row(id, name, salary)
}

pub fn list_users(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt = conn.prepare("SELECT id, name, monthly_salary FROM users ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, name, salary) = row?;
        out.push(user_from_row(id, name, salary)?);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Categories & transactions
// ---------------------------------------------------------------------------

pub fn category_id_or_create(conn: &Connection, name: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO categories(name) VALUES (?1) ON CONFLICT(name) DO NOTHING",
        params![name],
    )?;
    let id = conn.query_row(
        "SELECT id FROM categories WHERE name=?1",
        params![name],
        |r| r.get(0),
    )?;
    Ok(id)
}

pub fn list_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare("SELECT id, name FROM categories ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        Ok(Category {
            id: r.get(0)?,
            name: r.get(1)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<_>>()?)
}

/// Budgets for a user, newest month first; `month` narrows to one `YYYY-MM`.
pub fn list_budgets(conn: &Connection, user_id: i64, month: Option<&str>) -> Result<Vec<Budget>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, month, category_id, amount FROM budgets
         WHERE user_id=?1 AND (?2 IS NULL OR month=?2)
         ORDER BY month DESC, id",
    )?;
    let rows = stmt.query_map(params![user_id, month], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, i64>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, i64>(3)?,
            r.get::<_, String>(4)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, user_id, month, category_id, amount) = row?;
        out.push(Budget {
            id,
            user_id,
            month,
            category_id,
            amount: dec(&amount, "budget amount")?,
        });
    }
    Ok(out)
}

pub struct NewTransaction<'a> {
    pub user_id: i64,
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub category: Option<&'a str>,
    pub note: Option<&'a str>,
}

pub fn insert_transaction(conn: &Connection, t: &NewTransaction<'_>) -> Result<i64> {
    check_amount("amount", t.amount)?;
    if t.amount < Decimal::ZERO {
        return Err(Error::Validation(format!(
            "amount must not be negative, got {} (use --type to record direction)",
            t.amount
        )));
    }
    let category_id = match t.category.map(str::trim).filter(|c| !c.is_empty()) {
        Some(c) => Some(category_id_or_create(conn, c)?),
        None => None,
    };
    conn.execute(
        "INSERT INTO transactions(user_id, date, kind, amount, category_id, note)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            t.user_id,
            t.date,
            t.kind.as_str(),
            t.amount.to_string(),
            category_id,
            t.note
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Newest first, at most `limit` rows.
pub fn recent_transactions(conn: &Connection, user_id: i64, limit: usize) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.user_id, t.date, t.kind, t.amount, c.name, t.note
         FROM transactions t LEFT JOIN categories c ON t.category_id=c.id
         WHERE t.user_id=?1
         ORDER BY t.date DESC, t.id DESC
         LIMIT ?2",
    )?;
    let rows = stmt.query_map(params![user_id, limit as i64], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, i64>(1)?,
            r.get::<_, NaiveDate>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, Option<String>>(5)?,
            r.get::<_, Option<String>>(6)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, user_id, date, kind, amount, category, note) = row?;
        out.push(Transaction {
            id,
            user_id,
            date,
            kind: kind.parse()?,
            amount: dec(&amount, "transaction amount")?,
            category: category.unwrap_or_else(|| UNCATEGORIZED.to_string()),
            note,
        });
    }
    debug!(user_id, count = out.len(), "loaded recent transactions");
    Ok(out)
}

// ---------------------------------------------------------------------------
// Goals
// ---------------------------------------------------------------------------

pub struct NewGoal<'a> {
    pub user_id: i64,
    pub name: &'a str,
    pub target_amount: Decimal,
    pub target_date: NaiveDate,
    pub monthly_contribution: Decimal,
}

pub fn validate_new_goal(g: &NewGoal<'_>, today: NaiveDate) -> Result<()> {
    if g.name.trim().is_empty() {
        return Err(Error::Validation("goal name must not be empty".into()));
    }
    if g.target_amount <= Decimal::ZERO {
        return Err(Error::Validation(format!(
            "target amount must be positive, got {}",
            g.target_amount
        )));
    }
    if g.target_date <= today {
        return Err(Error::Validation(format!(
            "target date {} must be after {}",
            g.target_date, today
        )));
    }
    check_amount("target amount", g.target_amount)?;
    check_amount("monthly contribution", g.monthly_contribution)?;
    if g.monthly_contribution < Decimal::ZERO {
        return Err(Error::Validation(format!(
            "monthly contribution must not be negative, got {}",
            g.monthly_contribution
        )));
    }
    Ok(())
}

/// Creates an active goal with its 25/50/75/100% milestone rows.
pub fn insert_goal(conn: &mut Connection, g: &NewGoal<'_>, today: NaiveDate) -> Result<i64> {
    validate_new_goal(g, today)?;
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO goals(user_id, name, target_amount, target_date, monthly_contribution, created_on)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            g.user_id,
            g.name.trim(),
            g.target_amount.to_string(),
            g.target_date,
            g.monthly_contribution.to_string(),
            today
        ],
    )?;
    let goal_id = tx.last_insert_rowid();
    for pct in MILESTONE_PERCENTAGES {
        let amount = g.target_amount * Decimal::from(pct) / Decimal::ONE_HUNDRED;
        tx.execute(
            "INSERT INTO goal_milestones(goal_id, percentage, amount) VALUES (?1, ?2, ?3)",
            params![goal_id, pct, amount.to_string()],
        )?;
    }
    tx.commit()?;
    info!(goal_id, name = g.name.trim(), "goal created");
    Ok(goal_id)
}

fn milestones_for(conn: &Connection, goal_id: i64) -> Result<Vec<GoalMilestone>> {
    let mut stmt = conn.prepare(
        "SELECT percentage, amount, achieved, achieved_on FROM goal_milestones
         WHERE goal_id=?1 ORDER BY percentage",
    )?;
    let rows = stmt.query_map(params![goal_id], |r| {
        Ok((
            r.get::<_, u32>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, bool>(2)?,
            r.get::<_, Option<NaiveDate>>(3)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (percentage, amount, achieved, achieved_on) = row?;
        out.push(GoalMilestone {
            percentage,
            amount: dec(&amount, "milestone amount")?,
            achieved,
            achieved_on,
        });
    }
    Ok(out)
}

type GoalRow = (i64, i64, String, String, String, NaiveDate, String, String, NaiveDate);

const GOAL_COLUMNS: &str = "id, user_id, name, target_amount, current_amount, target_date, \
                            monthly_contribution, status, created_on";

fn goal_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<GoalRow> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
        r.get(6)?,
        r.get(7)?,
        r.get(8)?,
    ))
}

fn goal_from_row(conn: &Connection, row: GoalRow) -> Result<Goal> {
    let (id, user_id, name, target, current, target_date, contribution, status, created_on) = row;
    Ok(Goal {
        id,
        user_id,
        name,
        target_amount: dec(&target, "target amount")?,
        current_amount: dec(&current, "current amount")?,
        target_date,
        monthly_contribution: dec(&contribution, "monthly contribution")?,
        status: status.parse()?,
        created_on,
        milestones: milestones_for(conn, id)?,
    })
}

pub fn get_goal(conn: &Connection, goal_id: i64) -> Result<Goal> {
    let row = conn
        .query_row(
            &format!("SELECT {} FROM goals WHERE id=?1", GOAL_COLUMNS),
            params![goal_id],
            goal_row,
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("goal #{}", goal_id)))?;
    goal_from_row(conn, row)
}

pub fn list_goals(conn: &Connection, user_id: i64) -> Result<Vec<Goal>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM goals WHERE user_id=?1 ORDER BY target_date, id",
        GOAL_COLUMNS
    ))?;
    let rows: Vec<GoalRow> = stmt
        .query_map(params![user_id], goal_row)?
        .collect::<rusqlite::Result<_>>()?;
    rows.into_iter().map(|r| goal_from_row(conn, r)).collect()
}

pub fn delete_goal(conn: &Connection, goal_id: i64) -> Result<()> {
    let n = conn.execute("DELETE FROM goals WHERE id=?1", params![goal_id])?;
    if n == 0 {
        return Err(Error::NotFound(format!("goal #{}", goal_id)));
    }
    Ok(())
}

/// Appends a contribution and advances the goal.
///
/// Runs in one transaction: raises `current_amount`, marks every milestone
/// it now covers as achieved, and completes the goal once the target is met.
pub fn record_contribution(
    conn: &mut Connection,
    goal_id: i64,
    date: NaiveDate,
    amount: Decimal,
    note: Option<&str>,
) -> Result<Goal> {
    if amount <= Decimal::ZERO {
        return Err(Error::Validation(format!(
            "contribution must be positive, got {}",
            amount
        )));
    }
    let tx = conn.transaction()?;
    let goal = get_goal(&tx, goal_id)?;
    if goal.status == GoalStatus::Completed {
        return Err(Error::Validation(format!(
            "goal #{} is already completed",
            goal_id
        )));
    }

    check_amount("contribution", amount)?;
    let current = goal
        .current_amount
        .checked_add(amount)
        .filter(|c| *c <= MAX_AMOUNT)
        .ok_or_else(|| {
            Error::Validation(format!(
                "goal #{} would exceed the maximum amount of {}",
                goal_id, MAX_AMOUNT
            ))
        })?;
    tx.execute(
        "INSERT INTO goal_contributions(goal_id, date, amount, note) VALUES (?1, ?2, ?3, ?4)",
        params![goal_id, date, amount.to_string(), note],
    )?;
    tx.execute(
        "UPDATE goals SET current_amount=?1 WHERE id=?2",
        params![current.to_string(), goal_id],
    )?;
    for m in goal.milestones.iter().filter(|m| !m.achieved && m.amount <= current) {
        tx.execute(
            "UPDATE goal_milestones SET achieved=1, achieved_on=?1 WHERE goal_id=?2 AND percentage=?3",
            params![date, goal_id, m.percentage],
        )?;
        info!(goal_id, percentage = m.percentage, "milestone reached");
    }
    if current >= goal.target_amount {
        tx.execute(
            "UPDATE goals SET status=?1 WHERE id=?2",
            params![GoalStatus::Completed.as_str(), goal_id],
        )?;
        info!(goal_id, "goal completed");
    }
    tx.commit()?;
    get_goal(conn, goal_id)
}

pub fn list_contributions(conn: &Connection, goal_id: i64) -> Result<Vec<Contribution>> {
    let mut stmt = conn.prepare(
        "SELECT id, goal_id, date, amount, note FROM goal_contributions
         WHERE goal_id=?1 ORDER BY date, id",
    )?;
    let rows = stmt.query_map(params![goal_id], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, i64>(1)?,
            r.get::<_, NaiveDate>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, Option<String>>(4)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, goal_id, date, amount, note) = row?;
        out.push(Contribution {
            id,
            goal_id,
            date,
            amount: dec(&amount, "contribution amount")?,
            note,
        });
    }
    Ok(out)
}
