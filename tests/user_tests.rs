// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use nestegg::commands::{config, doctor, users};
use nestegg::models::TransactionKind;
use nestegg::store::{self, NewGoal, NewTransaction};
use nestegg::{cli, db, utils};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn run_users(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["nestegg", "user"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let Some(("user", m)) = matches.subcommand() else {
        panic!("no user subcommand");
    };
    users::handle(conn, m)
}

fn run_config(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["nestegg", "config"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let Some(("config", m)) = matches.subcommand() else {
        panic!("no config subcommand");
    };
    config::handle(conn, m)
}

#[test]
fn first_user_becomes_active() {
    let conn = setup();
    run_users(&conn, &["add", "--name", " ana ", "--salary", "4200"]).unwrap();
    run_users(&conn, &["add", "--name", "ben"]).unwrap();
    assert_eq!(
        utils::get_setting(&conn, utils::ACTIVE_USER_KEY).unwrap().as_deref(),
        Some("ana")
    );
    let ana = store::user_by_name(&conn, "ana").unwrap();
    assert_eq!(ana.monthly_salary, Decimal::from(4200));
    assert!(store::user_by_name(&conn, "ben").unwrap().monthly_salary.is_zero());

    run_users(&conn, &["use", "--name", "ben"]).unwrap();
    let active = utils::resolve_user(&conn, None).unwrap();
    assert_eq!(active.name, "ben");
    assert!(run_users(&conn, &["use", "--name", "nobody"]).is_err());
}

#[test]
fn salary_must_not_be_negative() {
    let conn = setup();
    assert!(run_users(&conn, &["add", "--name", "ana", "--salary=-1"]).is_err());
    run_users(&conn, &["add", "--name", "ana"]).unwrap();
    assert!(run_users(&conn, &["set-salary", "--name", "ana", "--salary=-1"]).is_err());
    run_users(&conn, &["set-salary", "--name", "ana", "--salary", "3100.25"]).unwrap();
    let ana = store::user_by_name(&conn, "ana").unwrap();
    assert_eq!(ana.monthly_salary, Decimal::new(310025, 2));
}

#[test]
fn resolve_user_without_selection_fails() {
    let conn = setup();
    assert!(utils::resolve_user(&conn, None).is_err());
}

#[test]
fn config_accepts_known_keys_only() {
    let conn = setup();
    run_config(&conn, &["set", "--key", "currency", "--value", " eur "]).unwrap();
    assert_eq!(utils::get_currency(&conn).unwrap(), "EUR");
    assert!(run_config(&conn, &["set", "--key", "colour", "--value", "red"]).is_err());
    assert!(run_config(&conn, &["set", "--key", "active_user", "--value", "ghost"]).is_err());
}

#[test]
fn doctor_reports_goal_and_data_problems() {
    let mut conn = setup();
    store::insert_user(&conn, "ana", Decimal::ZERO).unwrap();
    store::insert_user(&conn, "ben", Decimal::from(1000)).unwrap();
    let today = date("2025-06-15");

    let overdue = store::insert_goal(
        &mut conn,
        &NewGoal {
            user_id: 2,
            name: "Bike",
            target_amount: Decimal::from(500),
            target_date: date("2025-07-01"),
            monthly_contribution: Decimal::ZERO,
        },
        today,
    )
    .unwrap();
    store::insert_transaction(
        &conn,
        &NewTransaction {
            user_id: 2,
            date: today,
            kind: TransactionKind::Expense,
            amount: Decimal::from(10),
            category: None,
            note: None,
        },
    )
    .unwrap();
    conn.execute(
        "INSERT INTO transactions(user_id, date, kind, amount) VALUES (2, '2025-06-01', 'expense', '-3')",
        [],
    )
    .unwrap();

    let issues = doctor::find_issues(&conn, date("2025-08-01")).unwrap();
    let codes: Vec<&str> = issues.iter().map(|r| r[0].as_str()).collect();
    assert!(codes.contains(&"no_income_signal"));
    assert!(codes.contains(&"goal_overdue"));
    assert!(codes.contains(&"bad_amount"));
    assert!(issues.iter().any(|r| r[1].starts_with(&format!("#{} ", overdue))));
    // ben has a salary
    assert!(!issues.iter().any(|r| r[0] == "no_income_signal" && r[1] == "ben"));
}

#[test]
fn doctor_is_quiet_on_clean_data() {
    let conn = setup();
    store::insert_user(&conn, "ana", Decimal::from(1000)).unwrap();
    assert!(doctor::find_issues(&conn, date("2025-06-15")).unwrap().is_empty());
}
