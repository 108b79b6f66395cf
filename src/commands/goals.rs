// Copyright (c) 2025 Hogar contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::models::NewGoal;
use crate::store;
use crate::utils::{active_household, fmt_eur, parse_decimal, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", _)) => list(conn)?,
        Some(("contribute", sub)) => contribute(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let target = parse_decimal(sub.get_one::<String>("target").unwrap())?;
    let saved = match sub.get_one::<String>("saved") {
        Some(s) => parse_decimal(s)?,
        None => Decimal::ZERO,
    };
    let emoji = sub
        .get_one::<String>("emoji")
        .map(String::as_str)
        .unwrap_or("🎯");

    let household = active_household(conn)?;
    let goal = NewGoal::new(name, target, saved, emoji)?;
    let id = store::insert_goal(conn, &household, &goal)?;
    println!(
        "Added goal '{}' with target {} (id {})",
        goal.name,
        fmt_eur(&target),
        id
    );
    Ok(())
}

fn list(conn: &Connection) -> Result<()> {
    let household = active_household(conn)?;
    let goals = store::goals(conn, &household)?;
    let rows = goals
        .iter()
        .map(|g| {
            let pct = (g.saved / g.target * Decimal::ONE_HUNDRED).min(Decimal::ONE_HUNDRED);
            vec![
                g.id.to_string(),
                format!("{} {}", g.emoji, g.name),
                fmt_eur(&g.saved),
                fmt_eur(&g.target),
                format!("{:.0}%", pct),
                if g.reached() { "reached".into() } else { String::new() },
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Id", "Goal", "Saved", "Target", "Progress", ""], rows)
    );
    Ok(())
}

fn contribute(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let household = active_household(conn)?;
    let goal = store::get_goal(conn, &household, id)?;
    let saved = goal.contribute(amount)?;
    store::set_goal_saved(conn, &household, id, saved)?;
    if saved >= goal.target {
        println!(
            "'{}' is fully funded at {} 🎉",
            goal.name,
            fmt_eur(&goal.target)
        );
    } else {
        println!(
            "'{}' is now at {} of {}",
            goal.name,
            fmt_eur(&saved),
            fmt_eur(&goal.target)
        );
    }
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let household = active_household(conn)?;
    store::delete_goal(conn, &household, id)?;
    println!("Removed goal {}", id);
    Ok(())
}
