// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::reports::{query_summary, summary_lines};
use crate::utils::get_petty_cash;
use anyhow::{Result, bail};
use rusqlite::Connection;
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => export_summary(conn, sub),
        _ => Ok(()),
    }
}

fn export_summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }

    let metrics = query_summary(conn, sub)?;
    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["metric", "value"])?;
            for (label, value) in summary_lines(&metrics, get_petty_cash(conn)?) {
                wtr.write_record([label.trim(), value.as_str()])?;
            }
            wtr.flush()?;
        }
        _ => {
            std::fs::write(out, serde_json::to_string_pretty(&metrics)?)?;
        }
    }
    info!(format = %fmt, out = %out, "summary exported");
    println!("Exported summary to {}", out);
    Ok(())
}
