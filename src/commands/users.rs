// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store;
use crate::utils::{ACTIVE_USER_KEY, get_currency, get_setting, parse_decimal, pretty_table, set_setting};
use anyhow::{Context, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let salary = match sub.get_one::<String>("salary") {
                Some(raw) => parse_decimal(raw)?,
                None => Decimal::ZERO,
            };
            store::insert_user(conn, name, salary)
                .with_context(|| format!("Could not add user '{}'", name))?;
            if get_setting(conn, ACTIVE_USER_KEY)?.is_none() {
                set_setting(conn, ACTIVE_USER_KEY, name)?;
            }
            println!("Added user '{}' (monthly salary {:.2})", name, salary);
        }
        Some(("list", _)) => {
            let active = get_setting(conn, ACTIVE_USER_KEY)?;
            let ccy = get_currency(conn)?;
            let data = store::list_users(conn)?
                .into_iter()
                .map(|u| {
                    let marker = if active.as_deref() == Some(u.name.as_str()) {
                        "*".to_string()
                    } else {
                        String::new()
                    };
                    vec![marker, u.name, format!("{} {:.2}", ccy, u.monthly_salary)]
                })
                .collect();
            println!("{}", pretty_table(&["", "Name", "Monthly Salary"], data));
        }
        Some(("set-salary", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let salary = parse_decimal(sub.get_one::<String>("salary").unwrap())?;
            store::set_salary(conn, name, salary)?;
            println!("Monthly salary for '{}' set to {:.2}", name, salary);
        }
        Some(("use", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            store::user_by_name(conn, name)?;
            set_setting(conn, ACTIVE_USER_KEY, name)?;
            println!("Active user is now '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
