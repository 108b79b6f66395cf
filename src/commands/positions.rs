// Copyright (c) 2025 Hogar contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::warn;

use crate::models::NewPosition;
use crate::store;
use crate::utils::{active_household, fmt_eur, fmt_eur_signed, http_client, parse_decimal, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ticker = sub.get_one::<String>("ticker").unwrap();
    let name = sub.get_one::<String>("name").unwrap();
    let shares = parse_decimal(sub.get_one::<String>("shares").unwrap())?;
    let buy_price = parse_decimal(sub.get_one::<String>("buy-price").unwrap())?;

    let household = active_household(conn)?;
    let position = NewPosition::new(ticker, name, shares, buy_price)?;
    let id = store::insert_position(conn, &household, &position)?;
    println!(
        "Added {} x {} bought at {} (id {})",
        position.shares,
        position.ticker,
        fmt_eur(&buy_price),
        id
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let household = active_household(conn)?;
    let positions = store::positions(conn, &household)?;
    if positions.is_empty() {
        println!("No positions yet. Add one with 'hogar pos add'.");
        return Ok(());
    }

    let prices = if sub.get_flag("live") {
        let tickers: Vec<String> = positions.iter().map(|p| p.ticker.clone()).collect();
        fetch_quotes(&tickers)
    } else {
        HashMap::new()
    };

    let rows = positions
        .iter()
        .map(|p| {
            let quote = prices.get(&p.ticker).copied();
            let value = p.value_at(quote);
            let gain = value - p.cost();
            vec![
                p.id.to_string(),
                p.ticker.clone(),
                p.name.clone(),
                p.shares.to_string(),
                fmt_eur(&p.buy_price),
                quote.map(|q| fmt_eur(&q)).unwrap_or_else(|| "-".into()),
                fmt_eur(&value),
                fmt_eur_signed(&gain),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Id", "Ticker", "Name", "Shares", "Buy", "Quote", "Value", "Gain"],
            rows,
        )
    );
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let household = active_household(conn)?;
    store::delete_position(conn, &household, id)?;
    println!("Removed position {}", id);
    Ok(())
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct YahooResponse {
    quoteResponse: QuoteResponse,
}
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    result: Vec<YahooQuote>,
}
#[derive(Debug, Deserialize)]
struct YahooQuote {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
    symbol: Option<String>,
}

/// Current price per ticker. Quotes are best effort: when the fetch
/// fails, the map comes back empty and every caller falls back to buy
/// prices instead of erroring.
pub fn fetch_quotes(tickers: &[String]) -> HashMap<String, Decimal> {
    if tickers.is_empty() {
        return HashMap::new();
    }
    match try_fetch_quotes(tickers) {
        Ok(prices) => prices,
        Err(e) => {
            warn!(error = %e, "quote fetch failed, valuing positions at buy price");
            HashMap::new()
        }
    }
}

fn try_fetch_quotes(tickers: &[String]) -> Result<HashMap<String, Decimal>> {
    let symbols = tickers
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(",");
    let url = format!(
        "https://query1.finance.yahoo.com/v7/finance/quote?symbols={}",
        symbols
    );
    let client = http_client()?;
    let resp = client.get(url).send()?.error_for_status()?;
    let yr: YahooResponse = resp.json()?;

    let mut prices = HashMap::with_capacity(yr.quoteResponse.result.len());
    for q in yr.quoteResponse.result {
        if let (Some(symbol), Some(px)) = (q.symbol, q.regular_market_price) {
            if let Some(price) = Decimal::from_f64_retain(px) {
                prices.insert(symbol, price);
            }
        }
    }
    Ok(prices)
}
