// Copyright (c) 2025 Hogar contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::models::NewHucha;
use crate::store;
use crate::utils::{active_household, fmt_eur, parse_decimal, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", _)) => list(conn)?,
        Some(("deposit", sub)) => deposit(conn, sub)?,
        Some(("withdraw", sub)) => withdraw(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let balance = match sub.get_one::<String>("balance") {
        Some(s) => parse_decimal(s)?,
        None => Decimal::ZERO,
    };
    let emoji = sub
        .get_one::<String>("emoji")
        .map(String::as_str)
        .unwrap_or("🐷");

    let household = active_household(conn)?;
    let hucha = NewHucha::new(name, balance, emoji)?;
    let id = store::insert_hucha(conn, &household, &hucha)?;
    println!("Added hucha '{}' (id {})", hucha.name, id);
    Ok(())
}

fn list(conn: &Connection) -> Result<()> {
    let household = active_household(conn)?;
    let huchas = store::huchas(conn, &household)?;
    let total: Decimal = huchas.iter().map(|h| h.balance).sum();
    let mut rows: Vec<Vec<String>> = huchas
        .iter()
        .map(|h| {
            vec![
                h.id.to_string(),
                format!("{} {}", h.emoji, h.name),
                fmt_eur(&h.balance),
            ]
        })
        .collect();
    rows.push(vec![String::new(), "Total".into(), fmt_eur(&total)]);
    println!("{}", pretty_table(&["Id", "Hucha", "Balance"], rows));
    Ok(())
}

fn deposit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let household = active_household(conn)?;
    let hucha = store::get_hucha(conn, &household, id)?;
    let balance = hucha.deposit(amount)?;
    store::set_hucha_balance(conn, &household, id, balance)?;
    println!(
        "Deposited {} into '{}', balance {}",
        fmt_eur(&amount),
        hucha.name,
        fmt_eur(&balance)
    );
    Ok(())
}

fn withdraw(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let household = active_household(conn)?;
    let hucha = store::get_hucha(conn, &household, id)?;
    let balance = hucha.withdraw(amount)?;
    store::set_hucha_balance(conn, &household, id, balance)?;
    if amount > hucha.balance {
        println!(
            "'{}' only held {}, it is now empty",
            hucha.name,
            fmt_eur(&hucha.balance)
        );
    } else {
        println!(
            "Withdrew {} from '{}', balance {}",
            fmt_eur(&amount),
            hucha.name,
            fmt_eur(&balance)
        );
    }
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let household = active_household(conn)?;
    store::delete_hucha(conn, &household, id)?;
    println!("Removed hucha {}", id);
    Ok(())
}
