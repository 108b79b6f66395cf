// Copyright (c) 2025 Hogar contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Datelike;
use rusqlite::Connection;
use serde::Serialize;

use crate::gemini;
use crate::ledger::aggregate::in_period;
use crate::models::{Category, NewTransaction, Transaction, TxKind};
use crate::store;
use crate::utils::{
    active_household, fmt_eur, http_client, maybe_print_json, parse_date, parse_decimal,
    parse_month, pretty_table, today,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("quick", sub)) => quick(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let kind: TxKind = sub.get_one::<String>("kind").unwrap().parse()?;
    let concept = sub.get_one::<String>("concept").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let category: Category = sub.get_one::<String>("category").unwrap().parse()?;
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => today(),
    };

    let household = active_household(conn)?;
    store::ensure_month_open(conn, &household, date.year(), date.month())?;
    let tx = NewTransaction::new(kind, concept, amount, category, date, None)?;
    let id = store::insert_transaction(conn, &household, &tx)?;
    println!(
        "Recorded {} '{}' for {} on {} (id {})",
        kind,
        tx.concept,
        fmt_eur(&amount),
        date,
        id
    );
    Ok(())
}

fn quick(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let text = sub.get_one::<String>("text").unwrap();
    let client = http_client()?;
    let Some(candidate) = gemini::extract_from_text(&client, text)? else {
        println!("Could not turn that into a transaction. Try 'hogar tx add' instead.");
        return Ok(());
    };
    println!(
        "Suggestion: {} '{}' for {} ({})",
        candidate.kind,
        candidate.concept,
        fmt_eur(&candidate.amount),
        candidate.category
    );
    if sub.get_flag("save") {
        let date = today();
        let household = active_household(conn)?;
        store::ensure_month_open(conn, &household, date.year(), date.month())?;
        let tx = NewTransaction::new(
            candidate.kind,
            &candidate.concept,
            candidate.amount,
            candidate.category,
            date,
            None,
        )?;
        let id = store::insert_transaction(conn, &household, &tx)?;
        println!("Saved as transaction {}", id);
    } else {
        println!("Re-run with --save to record it.");
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub kind: String,
    pub concept: String,
    pub amount: String,
    pub category: String,
    pub recurring_id: Option<i64>,
}

fn row_from_tx(tx: &Transaction) -> TransactionRow {
    TransactionRow {
        id: tx.id,
        date: tx.date.to_string(),
        kind: tx.kind.to_string(),
        concept: tx.concept.clone(),
        amount: tx.amount.to_string(),
        category: tx.category.to_string(),
        recurring_id: tx.recurring_id,
    }
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let household = active_household(conn)?;
    let mut txs = store::transactions(conn, &household)?;

    if let Some(month) = sub.get_one::<String>("month") {
        let (y, m) = parse_month(month)?;
        txs.retain(|tx| in_period(tx.date, y, m));
    }
    if let Some(kind) = sub.get_one::<String>("kind") {
        let kind: TxKind = kind.parse()?;
        txs.retain(|tx| tx.kind == kind);
    }
    if let Some(category) = sub.get_one::<String>("category") {
        let category: Category = category.parse()?;
        txs.retain(|tx| tx.category == category);
    }
    if let Some(&limit) = sub.get_one::<usize>("limit") {
        txs.truncate(limit);
    }

    let data: Vec<TransactionRow> = txs.iter().map(row_from_tx).collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = txs
            .iter()
            .map(|tx| {
                vec![
                    tx.id.to_string(),
                    tx.date.to_string(),
                    tx.kind.to_string(),
                    tx.concept.clone(),
                    fmt_eur(&tx.amount),
                    tx.category.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Date", "Kind", "Concept", "Amount", "Category"], rows)
        );
    }
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let household = active_household(conn)?;
    let current = store::get_transaction(conn, &household, id)?;

    let kind = match sub.get_one::<String>("kind") {
        Some(s) => s.parse()?,
        None => current.kind,
    };
    let concept = sub
        .get_one::<String>("concept")
        .cloned()
        .unwrap_or_else(|| current.concept.clone());
    let amount = match sub.get_one::<String>("amount") {
        Some(s) => parse_decimal(s)?,
        None => current.amount,
    };
    let category = match sub.get_one::<String>("category") {
        Some(s) => s.parse()?,
        None => current.category,
    };
    let date = match sub.get_one::<String>("date") {
        Some(s) => {
            let new_date = parse_date(s)?;
            // Moving a transaction into a closed month is the same as
            // writing into it.
            store::ensure_month_open(conn, &household, new_date.year(), new_date.month())?;
            new_date
        }
        None => current.date,
    };

    let tx = NewTransaction::new(kind, &concept, amount, category, date, current.recurring_id)?;
    store::update_transaction(conn, &household, id, &tx)?;
    println!("Updated transaction {}", id);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let household = active_household(conn)?;
    store::delete_transaction(conn, &household, id)?;
    println!("Removed transaction {}", id);
    Ok(())
}
