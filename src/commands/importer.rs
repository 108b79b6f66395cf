// Copyright (c) 2025 Hogar contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::gemini;
use crate::ledger::reconcile::{plan_import, DedupPolicy, ImportOutcome, ImportPlan};
use crate::models::{MonthStatus, NewTransaction, TxCandidate};
use crate::store;
use crate::utils::{
    active_household, fmt_eur, http_client, maybe_print_json, month_label, parse_date,
    parse_decimal, pretty_table, today,
};
use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tracing::warn;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("statement", sub)) => import_statement(conn, sub),
        Some(("csv", sub)) => import_csv(conn, sub),
        _ => Ok(()),
    }
}

fn mime_for(path: &str) -> Result<&'static str> {
    let ext = std::path::Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "png" => Ok("image/png"),
        "webp" => Ok("image/webp"),
        "pdf" => Ok("application/pdf"),
        _ => bail!("Cannot tell the file type of '{}'; pass it with --mime", path),
    }
}

fn import_statement(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let mime = match sub.get_one::<String>("mime") {
        Some(m) => m.clone(),
        None => mime_for(path)?.to_string(),
    };
    let bytes = std::fs::read(path).with_context(|| format!("Read {}", path))?;

    let client = http_client()?;
    let candidates = match gemini::extract_from_document(&client, &bytes, &mime)? {
        Some(c) => c,
        // Nothing was written yet, so a failed call is a clean abort.
        None => bail!("The model could not read the statement; nothing was imported"),
    };
    if candidates.is_empty() {
        println!("No transactions found in {}", path);
        return Ok(());
    }
    run_import(conn, sub, candidates)
}

fn import_csv(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    // A hand-written CSV gets no leniency: one bad row aborts the whole
    // file before anything is written, with the row number in the error.
    let mut candidates = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let row = i + 2;
        let rec = result.with_context(|| format!("Read CSV row {}", row))?;
        let date_raw = rec.get(0).map(str::trim).unwrap_or_default();
        let kind_raw = rec
            .get(1)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .with_context(|| format!("Missing kind in row {}", row))?;
        let concept = rec
            .get(2)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .with_context(|| format!("Missing concept in row {}", row))?;
        let amount_raw = rec
            .get(3)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .with_context(|| format!("Missing amount in row {}", row))?;
        let category_raw = rec
            .get(4)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .with_context(|| format!("Missing category in row {}", row))?;

        let date = if date_raw.is_empty() {
            None
        } else {
            Some(parse_date(date_raw).with_context(|| format!("Invalid date in row {}", row))?)
        };
        let kind = kind_raw
            .parse()
            .with_context(|| format!("Invalid kind '{}' in row {}", kind_raw, row))?;
        let amount = parse_decimal(amount_raw)
            .with_context(|| format!("Invalid amount '{}' in row {}", amount_raw, row))?;
        if amount <= Decimal::ZERO {
            bail!("Amount must be positive in row {}", row);
        }
        let category = category_raw
            .parse()
            .with_context(|| format!("Invalid category '{}' in row {}", category_raw, row))?;

        candidates.push(TxCandidate {
            kind,
            concept: concept.to_string(),
            amount,
            category,
            date,
        });
    }

    if candidates.is_empty() {
        println!("No transactions found in {}", path);
        return Ok(());
    }
    run_import(conn, sub, candidates)
}

fn run_import(conn: &Connection, sub: &clap::ArgMatches, candidates: Vec<TxCandidate>) -> Result<()> {
    let policy: DedupPolicy = sub.get_one::<String>("dedup").unwrap().parse()?;
    let json = sub.get_flag("json");
    let household = active_household(conn)?;

    let existing = store::transactions(conn, &household)?;
    let months = store::months(conn, &household)?;
    let plan = plan_import(&existing, &months, candidates, today(), policy);

    if sub.get_flag("dry-run") {
        return print_plan(&plan, json);
    }

    // Months first: the backfilled periods must exist before their rows do.
    // They are created closed so the import cannot reopen history.
    for (year, month) in &plan.months_to_create {
        store::create_month(conn, &household, *year, *month, MonthStatus::Closed)?;
        println!("Now tracking {} (closed)", month_label(*year, *month));
    }

    let mut outcome = ImportOutcome {
        duplicates: plan.duplicates,
        ..Default::default()
    };
    for planned in plan.new {
        let c = planned.candidate;
        let persisted =
            NewTransaction::new(c.kind, &c.concept, c.amount, c.category, planned.date, None)
                .and_then(|tx| store::insert_transaction(conn, &household, &tx));
        match persisted {
            Ok(_) => outcome.imported += 1,
            Err(e) => {
                outcome.failed += 1;
                warn!(concept = c.concept.as_str(), error = %e, "candidate not persisted");
                eprintln!("Skipping '{}': {}", c.concept, e);
            }
        }
    }

    if maybe_print_json(json, false, &outcome)? {
        return Ok(());
    }
    println!(
        "Imported {} transaction(s), skipped {} duplicate(s), {} failed",
        outcome.imported, outcome.duplicates, outcome.failed
    );
    if outcome.duplicates > 0 {
        println!(
            "Duplicates match on concept and amount; pass --dedup monthly to only match within one month."
        );
    }
    Ok(())
}

fn print_plan(plan: &ImportPlan, json: bool) -> Result<()> {
    let projected = ImportOutcome {
        imported: plan.new.len(),
        duplicates: plan.duplicates,
        failed: 0,
    };
    if maybe_print_json(json, false, &projected)? {
        return Ok(());
    }

    if plan.new.is_empty() {
        println!("Nothing to import ({} duplicate(s) skipped).", plan.duplicates);
        return Ok(());
    }
    let rows = plan
        .new
        .iter()
        .map(|p| {
            vec![
                p.date.to_string(),
                p.candidate.kind.to_string(),
                p.candidate.concept.clone(),
                fmt_eur(&p.candidate.amount),
                p.candidate.category.to_string(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Date", "Kind", "Concept", "Amount", "Category"], rows));
    for (year, month) in &plan.months_to_create {
        println!("Would start tracking {} (closed)", month_label(*year, *month));
    }
    println!(
        "Would import {} transaction(s) and skip {} duplicate(s). Re-run without --dry-run to write.",
        plan.new.len(),
        plan.duplicates
    );
    Ok(())
}
