// Copyright (c) 2025 Hogar contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

use crate::ledger::aggregate::{category_breakdown, monthly_series, totals_by_type, MonthFlow};
use crate::store;
use crate::utils::{
    active_household, current_period, fmt_eur, maybe_print_json, month_label, parse_month,
    pretty_table,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("month", sub)) => month(conn, sub)?,
        Some(("categories", sub)) => categories(conn, sub)?,
        Some(("cashflow", sub)) => cashflow(conn, sub)?,
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

fn month(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (year, mon) = period_arg(sub)?;
    let household = active_household(conn)?;
    let txs = store::transactions(conn, &household)?;
    let totals = totals_by_type(&txs, year, mon);

    if maybe_print_json(sub.get_flag("json"), false, &totals)? {
        return Ok(());
    }
    let rows = vec![
        vec!["Income".into(), fmt_eur(&totals.income)],
        vec!["Expense".into(), fmt_eur(&totals.expense)],
        vec!["Investment".into(), fmt_eur(&totals.investment)],
        vec!["Saving".into(), fmt_eur(&totals.saving)],
        vec!["Net".into(), fmt_eur(&totals.net)],
    ];
    println!("{}", pretty_table(&[&month_label(year, mon), "Amount"], rows));
    Ok(())
}

#[derive(Serialize)]
struct CategoryRow {
    category: String,
    spent: String,
}

fn categories(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (year, mon) = period_arg(sub)?;
    let household = active_household(conn)?;
    let txs = store::transactions(conn, &household)?;

    let breakdown = category_breakdown(&txs, year, mon);
    if breakdown.is_empty() {
        println!("No expenses recorded in {}", month_label(year, mon));
        return Ok(());
    }
    let data: Vec<CategoryRow> = breakdown
        .iter()
        .map(|(cat, spent)| CategoryRow {
            category: cat.to_string(),
            spent: spent.to_string(),
        })
        .collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = breakdown
            .iter()
            .map(|(cat, spent)| vec![cat.to_string(), fmt_eur(spent)])
            .collect();
        println!("{}", pretty_table(&["Category", "Spent"], rows));
    }
    Ok(())
}

fn cashflow(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let window = *sub.get_one::<usize>("window").unwrap() as u32;
    let (year, mon) = current_period();
    let household = active_household(conn)?;
    let txs = store::transactions(conn, &household)?;

    let flows: Vec<MonthFlow> = monthly_series(&txs, year, mon, window).collect();
    if !maybe_print_json(json_flag, jsonl_flag, &flows)? {
        let rows = flows
            .iter()
            .map(|f| {
                vec![
                    f.label(),
                    fmt_eur(&f.income),
                    fmt_eur(&f.expense),
                    fmt_eur(&(f.income - f.expense)),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Balance"], rows)
        );
    }
    Ok(())
}
