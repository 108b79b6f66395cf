// Copyright (c) 2025 Hogar contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Datelike;
use rusqlite::Connection;
use tracing::warn;

use crate::errors::Error;
use crate::ledger::recurring::{materialize, pending_templates};
use crate::models::{Category, NewTemplate, TxKind};
use crate::store;
use crate::utils::{active_household, fmt_eur, parse_decimal, pretty_table, today};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", _)) => list(conn)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        Some(("pending", _)) => pending(conn)?,
        Some(("apply", sub)) => apply(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let kind: TxKind = sub.get_one::<String>("kind").unwrap().parse()?;
    let concept = sub.get_one::<String>("concept").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let category: Category = sub.get_one::<String>("category").unwrap().parse()?;

    let household = active_household(conn)?;
    let template = NewTemplate::new(kind, concept, amount, category)?;
    let id = store::insert_recurring(conn, &household, &template)?;
    println!(
        "Added template {} '{}' for {} each month (id {})",
        kind,
        template.concept,
        fmt_eur(&amount),
        id
    );
    Ok(())
}

fn list(conn: &Connection) -> Result<()> {
    let household = active_household(conn)?;
    let templates = store::recurring_templates(conn, &household)?;
    let rows = templates
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.kind.to_string(),
                t.concept.clone(),
                fmt_eur(&t.amount),
                t.category.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Id", "Kind", "Concept", "Amount", "Category"], rows)
    );
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let household = active_household(conn)?;
    store::delete_recurring(conn, &household, id)?;
    println!("Removed template {}", id);
    Ok(())
}

fn pending(conn: &Connection) -> Result<()> {
    let household = active_household(conn)?;
    let templates = store::recurring_templates(conn, &household)?;
    let txs = store::transactions(conn, &household)?;
    let t = today();
    let due = pending_templates(&templates, &txs, t.year(), t.month());
    if due.is_empty() {
        println!("Nothing pending: every template is applied this month.");
        return Ok(());
    }
    let rows = due
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.kind.to_string(),
                t.concept.clone(),
                fmt_eur(&t.amount),
                t.category.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Id", "Kind", "Concept", "Amount", "Category"], rows)
    );
    Ok(())
}

fn apply(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let household = active_household(conn)?;
    let day = today();
    let (year, month) = (day.year(), day.month());
    store::ensure_month_open(conn, &household, year, month)?;

    let templates = store::recurring_templates(conn, &household)?;
    let txs = store::transactions(conn, &household)?;
    let due = pending_templates(&templates, &txs, year, month);

    let selected: Vec<_> = match sub.get_one::<i64>("id") {
        Some(&id) => {
            if !templates.iter().any(|t| t.id == id) {
                return Err(Error::not_found("recurring template", id).into());
            }
            let one: Vec<_> = due.into_iter().filter(|t| t.id == id).collect();
            if one.is_empty() {
                println!("Template {} is already applied this month.", id);
                return Ok(());
            }
            one
        }
        None => due,
    };

    if selected.is_empty() {
        println!("Nothing pending: every template is applied this month.");
        return Ok(());
    }

    // Best effort: one failing template must not block the rest.
    let mut applied = 0usize;
    let mut failed = 0usize;
    for template in selected {
        let result = materialize(template, day)
            .and_then(|tx| store::insert_transaction(conn, &household, &tx).map(|_| ()));
        match result {
            Ok(()) => {
                applied += 1;
                println!("Applied '{}' ({})", template.concept, fmt_eur(&template.amount));
            }
            Err(e) => {
                failed += 1;
                warn!(template = template.id, error = %e, "failed to apply template");
                eprintln!("Failed to apply '{}': {}", template.concept, e);
            }
        }
    }
    if failed > 0 {
        println!("Applied {} template(s), {} failed.", applied, failed);
    } else {
        println!("Applied {} template(s).", applied);
    }
    Ok(())
}
