// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use nestegg::{cli, commands::transactions, db, store, utils};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    store::insert_user(&conn, "ana", Decimal::from(3000)).unwrap();
    store::insert_user(&conn, "ben", Decimal::ZERO).unwrap();
    utils::set_setting(&conn, utils::ACTIVE_USER_KEY, "ana").unwrap();
    conn
}

fn run(conn: &Connection, args: &[&str]) {
    let mut argv = vec!["nestegg", "tx"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(conn, tx_m).unwrap();
    } else {
        panic!("no tx subcommand");
    }
}

fn list(conn: &Connection, args: &[&str]) -> Vec<transactions::TransactionRow> {
    let mut argv = vec!["nestegg", "tx", "list"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let Some(("list", list_m)) = tx_m.subcommand() else {
        panic!("no list subcommand");
    };
    transactions::query_rows(conn, list_m).unwrap()
}

#[test]
fn add_records_for_active_user_and_trims() {
    let conn = setup();
    run(
        &conn,
        &[
            "add", "--date", " 2025-03-01 ", "--type", " Expense ", "--amount", " 12.50 ",
            "--category", " Food ", "--note", "  lunch  ",
        ],
    );
    let rows = list(&conn, &[]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].date, "2025-03-01");
    assert_eq!(rows[0].kind, "expense");
    assert_eq!(rows[0].amount, "12.50");
    assert_eq!(rows[0].category, "Food");
    assert_eq!(rows[0].note, "lunch");
    assert!(list(&conn, &["--user", "ben"]).is_empty());
}

#[test]
fn negative_amount_is_rejected() {
    let conn = setup();
    let matches = cli::build_cli().get_matches_from([
        "nestegg", "tx", "add", "--date", "2025-03-01", "--type", "expense", "--amount=-5",
    ]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    assert!(transactions::handle(&conn, tx_m).is_err());
    assert!(list(&conn, &[]).is_empty());
}

#[test]
fn list_limit_respected() {
    let conn = setup();
    for day in 1..=5 {
        let date = format!("2025-03-0{}", day);
        run(&conn, &["add", "--date", &date, "--type", "income", "--amount", "10"]);
    }
    let rows = list(&conn, &["--limit", "2"]);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "2025-03-05");
    assert_eq!(rows[1].date, "2025-03-04");
}

#[test]
fn list_filters_by_month_category_and_type() {
    let conn = setup();
    run(&conn, &["add", "--date", "2025-03-01", "--type", "expense", "--amount", "10", "--category", "Food"]);
    run(&conn, &["add", "--date", "2025-03-02", "--type", "expense", "--amount", "20", "--category", "Rent"]);
    run(&conn, &["add", "--date", "2025-04-01", "--type", "expense", "--amount", "30", "--category", "Food"]);
    run(&conn, &["add", "--date", "2025-03-03", "--type", "income", "--amount", "99"]);

    assert_eq!(list(&conn, &["--month", "2025-03"]).len(), 3);
    assert_eq!(list(&conn, &["--category", "Food"]).len(), 2);
    let march_food = list(&conn, &["--month", "2025-03", "--category", "Food"]);
    assert_eq!(march_food.len(), 1);
    assert_eq!(march_food[0].amount, "10");

    let income = list(&conn, &["--type", "income"]);
    assert_eq!(income.len(), 1);
    assert_eq!(income[0].category, nestegg::models::UNCATEGORIZED);
}
