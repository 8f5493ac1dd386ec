// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{ACTIVE_USER_KEY, CURRENCY_KEY, get_setting, set_setting};
use anyhow::{Result, bail};
use rusqlite::Connection;

const KNOWN_KEYS: [&str; 2] = [ACTIVE_USER_KEY, CURRENCY_KEY];

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().trim();
            let value = sub.get_one::<String>("value").unwrap().trim();
            if !KNOWN_KEYS.contains(&key) {
                bail!("Unknown setting '{}' (known: {})", key, KNOWN_KEYS.join(", "));
            }
            if key == ACTIVE_USER_KEY {
                crate::store::user_by_name(conn, value)?;
            }
            let value = if key == CURRENCY_KEY {
                value.to_uppercase()
            } else {
                value.to_string()
            };
            set_setting(conn, key, &value)?;
            println!("{} = {}", key, value);
        }
        Some(("get", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().trim();
            match get_setting(conn, key)? {
                Some(v) => println!("{}", v),
                None => println!("{} is not set", key),
            }
        }
        _ => {}
    }
    Ok(())
}
