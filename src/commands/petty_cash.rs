// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{fmt_money, get_currency, get_petty_cash, parse_decimal, set_petty_cash};
use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let balance = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            set_petty_cash(conn, balance)?;
            info!(%balance, "petty cash updated");
            println!("Petty cash set to {}", fmt_money(&balance, &get_currency(conn)?));
        }
        Some(("show", _)) => {
            println!(
                "Petty cash: {}",
                fmt_money(&get_petty_cash(conn)?, &get_currency(conn)?)
            );
        }
        _ => {}
    }
    Ok(())
}
