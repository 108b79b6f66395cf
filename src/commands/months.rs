// Copyright (c) 2025 Hogar contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::ledger::aggregate::totals_by_type;
use crate::models::MonthStatus;
use crate::store;
use crate::utils::{active_household, current_period, fmt_eur, month_label, parse_month, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("open", sub)) => open(conn, sub)?,
        Some(("close", sub)) => set_status(conn, sub, MonthStatus::Closed)?,
        Some(("reopen", sub)) => set_status(conn, sub, MonthStatus::Open)?,
        Some(("list", _)) => list(conn)?,
        _ => {}
    }
    Ok(())
}

fn period_arg(sub: &clap::ArgMatches) -> Result<(i32, u32)> {
    match sub.get_one::<String>("month") {
        Some(s) => parse_month(s),
        None => Ok(current_period()),
    }
}

fn open(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (year, month) = period_arg(sub)?;
    let household = active_household(conn)?;
    if store::create_month(conn, &household, year, month, MonthStatus::Open)? {
        println!("Now tracking {}", month_label(year, month));
    } else {
        let status = store::month_status(conn, &household, year, month)?
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown".into());
        println!(
            "{} is already tracked ({})",
            month_label(year, month),
            status
        );
    }
    Ok(())
}

fn set_status(conn: &Connection, sub: &clap::ArgMatches, status: MonthStatus) -> Result<()> {
    let (year, month) = period_arg(sub)?;
    let household = active_household(conn)?;
    store::set_month_status(conn, &household, year, month, status)?;
    match status {
        MonthStatus::Closed => println!(
            "Closed {}. Dated writes into it are rejected until it is reopened.",
            month_label(year, month)
        ),
        MonthStatus::Open => println!("Reopened {}", month_label(year, month)),
    }
    Ok(())
}

fn list(conn: &Connection) -> Result<()> {
    let household = active_household(conn)?;
    let months = store::months(conn, &household)?;
    if months.is_empty() {
        println!("No months tracked yet. Start with 'hogar month open'.");
        return Ok(());
    }
    let txs = store::transactions(conn, &household)?;
    let rows = months
        .iter()
        .map(|m| {
            let t = totals_by_type(&txs, m.year, m.month);
            vec![
                m.label(),
                m.status.to_string(),
                fmt_eur(&t.income),
                fmt_eur(&t.expense),
                fmt_eur(&t.investment),
                fmt_eur(&t.saving),
                fmt_eur(&t.net),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Month", "Status", "Income", "Expense", "Investment", "Saving", "Net"],
            rows,
        )
    );
    Ok(())
}
