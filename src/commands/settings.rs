// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{get_currency, get_petty_cash, pretty_table, set_currency};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("currency", sub)) => {
            let code = sub.get_one::<String>("code").unwrap().trim();
            if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                bail!("Invalid currency code '{}', expected three letters", code);
            }
            set_currency(conn, code)?;
            println!("Display currency set to {}", code.to_uppercase());
        }
        Some(("show", _)) => {
            let rows = vec![
                vec!["database".into(), crate::db::db_path()?.display().to_string()],
                vec!["currency".into(), get_currency(conn)?],
                vec!["petty_cash".into(), format!("{:.2}", get_petty_cash(conn)?)],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
        _ => {}
    }
    Ok(())
}
