// Copyright (c) 2025 Hogar contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::commands::positions::fetch_quotes;
use crate::ledger::aggregate::net_worth;
use crate::store;
use crate::utils::{active_household, fmt_eur, fmt_eur_signed, maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let household = active_household(conn)?;
    let txs = store::transactions(conn, &household)?;
    let positions = store::positions(conn, &household)?;
    let huchas = store::huchas(conn, &household)?;

    let prices = if m.get_flag("live") {
        let tickers: Vec<String> = positions.iter().map(|p| p.ticker.clone()).collect();
        fetch_quotes(&tickers)
    } else {
        HashMap::new()
    };

    let nw = net_worth(&txs, &positions, &prices, &huchas);
    if maybe_print_json(m.get_flag("json"), false, &nw)? {
        return Ok(());
    }

    let share = |part: &Decimal| -> String {
        if nw.total.is_zero() {
            "-".into()
        } else {
            format!("{:.1}%", part / nw.total * Decimal::ONE_HUNDRED)
        }
    };
    let rows = vec![
        vec!["Savings".into(), fmt_eur(&nw.savings), share(&nw.savings)],
        vec![
            "Investments".into(),
            fmt_eur(&nw.investments),
            share(&nw.investments),
        ],
        vec!["Huchas".into(), fmt_eur(&nw.huchas), share(&nw.huchas)],
        vec!["Total".into(), fmt_eur(&nw.total), share(&nw.total)],
    ];
    println!("{}", pretty_table(&["Component", "Amount", "Share"], rows));
    println!(
        "Invested {} now worth {} ({})",
        fmt_eur(&nw.invested),
        fmt_eur(&nw.investments),
        fmt_eur_signed(&nw.gain)
    );
    Ok(())
}
