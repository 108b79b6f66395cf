// Copyright (c) 2025 Hogar contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

use crate::ledger::aggregate::{budget_status, spend_by_category};
use crate::models::{Category, NewBudget};
use crate::store;
use crate::utils::{
    active_household, current_period, fmt_eur, maybe_print_json, parse_decimal, parse_month,
    pretty_table,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        Some(("status", sub)) => status(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let category: Category = sub.get_one::<String>("category").unwrap().parse()?;
    let limit = parse_decimal(sub.get_one::<String>("limit").unwrap())?;
    let household = active_household(conn)?;
    let budget = NewBudget::new(category, limit)?;
    store::upsert_budget(conn, &household, &budget)?;
    println!("Budget for {} set to {} per month", category, fmt_eur(&limit));
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let category: Category = sub.get_one::<String>("category").unwrap().parse()?;
    let household = active_household(conn)?;
    store::delete_budget(conn, &household, category)?;
    println!("Removed the budget for {}", category);
    Ok(())
}

#[derive(Serialize)]
struct BudgetStatusRow {
    category: String,
    limit: String,
    spent: String,
    remaining: String,
    used_pct: String,
    status: &'static str,
}

fn status(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (year, month) = match sub.get_one::<String>("month") {
        Some(s) => parse_month(s)?,
        None => current_period(),
    };

    let household = active_household(conn)?;
    let budgets = store::budgets(conn, &household)?;
    if budgets.is_empty() {
        println!("No budgets yet. Set one with 'hogar budget set'.");
        return Ok(());
    }
    let txs = store::transactions(conn, &household)?;

    let data: Vec<BudgetStatusRow> = budgets
        .iter()
        .map(|b| {
            let spent = spend_by_category(&txs, b.category, year, month);
            let s = budget_status(b, spent);
            BudgetStatusRow {
                category: s.category.to_string(),
                limit: s.limit.to_string(),
                spent: s.spent.to_string(),
                remaining: s.remaining.to_string(),
                used_pct: format!("{:.1}", s.percentage),
                status: s.tier.label(),
            }
        })
        .collect();

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.category.clone(),
                    r.limit.clone(),
                    r.spent.clone(),
                    r.remaining.clone(),
                    format!("{}%", r.used_pct),
                    r.status.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Category", "Limit", "Spent", "Remaining", "Used", "Status"],
                rows,
            )
        );
    }
    Ok(())
}
