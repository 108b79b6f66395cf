// Copyright (c) 2025 Hogar contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, Utc};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use regex::Regex;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::sync::Once;

const UA: &str = concat!(
    "hogar/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/hogar-app/hogar)"
);

static TRACING_INIT: Once = Once::new();

/// Log to stderr so tables and JSON on stdout stay pipeable.
/// Level defaults to warn, override with RUST_LOG.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::filter::LevelFilter;
        use tracing_subscriber::{fmt, EnvFilter};
        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy();
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    });
}

pub fn http_client() -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<(i32, u32)> {
    let d = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok((d.year(), d.month()))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn current_period() -> (i32, u32) {
    let t = today();
    (t.year(), t.month())
}

pub fn month_label(year: i32, month: u32) -> String {
    format!("{:04}-{:02}", year, month)
}

pub fn fmt_eur(d: &Decimal) -> String {
    format!("{:.2} €", d)
}

/// Signed form for gains and deltas, e.g. "+12.50 €".
pub fn fmt_eur_signed(d: &Decimal) -> String {
    if d.is_sign_negative() {
        format!("{:.2} €", d)
    } else {
        format!("+{:.2} €", d)
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

// Active household settings
pub fn active_household(conn: &Connection) -> Result<String> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key='active_household'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    v.context(
        "No active household. Create one with 'hogar household create' or join one with 'hogar household join'",
    )
}

pub fn set_active_household(conn: &Connection, id: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('active_household', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![id],
    )?;
    Ok(())
}

/// Six characters from A-Z0-9, drawn from a v4 uuid's random bits.
pub fn generate_join_code() -> String {
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut bits = uuid::Uuid::new_v4().as_u128();
    (0..6)
        .map(|_| {
            let idx = (bits % ALPHABET.len() as u128) as usize;
            bits /= ALPHABET.len() as u128;
            ALPHABET[idx] as char
        })
        .collect()
}

pub fn is_valid_join_code(code: &str) -> bool {
    match Regex::new("^[A-Z0-9]{6}$") {
        Ok(re) => re.is_match(code),
        Err(_) => false,
    }
}

/// Member name recorded when creating or joining a household.
pub fn member_name() -> String {
    std::env::var("USER")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "local".to_string())
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_codes_have_the_expected_shape() {
        for _ in 0..20 {
            let code = generate_join_code();
            assert!(is_valid_join_code(&code), "bad code: {}", code);
        }
        assert!(!is_valid_join_code("abc123"));
        assert!(!is_valid_join_code("ABC12"));
        assert!(!is_valid_join_code("ABC-12"));
    }

    #[test]
    fn month_parsing() {
        assert_eq!(parse_month("2024-03").unwrap(), (2024, 3));
        assert_eq!(parse_month("2024-12").unwrap(), (2024, 12));
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("marzo").is_err());
    }

    #[test]
    fn money_formatting() {
        let d: Decimal = "1754.7".parse().unwrap();
        assert_eq!(fmt_eur(&d), "1754.70 €");
        let neg: Decimal = "-3.5".parse().unwrap();
        assert_eq!(fmt_eur_signed(&neg), "-3.50 €");
        let pos: Decimal = "3.5".parse().unwrap();
        assert_eq!(fmt_eur_signed(&pos), "+3.50 €");
    }
}
