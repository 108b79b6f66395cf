// Copyright (c) 2025 Hogar contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("es.hogar", "Hogar", "hogar"));

pub fn db_path() -> Result<PathBuf> {
    // HOGAR_DB overrides the platform dir, mainly for scripting and tests.
    if let Ok(path) = std::env::var("HOGAR_DB") {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("hogar.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS households(
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        code TEXT NOT NULL UNIQUE,
        members TEXT NOT NULL DEFAULT '[]', -- JSON array of member names
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        household TEXT NOT NULL,
        kind TEXT NOT NULL,
        concept TEXT NOT NULL,
        amount TEXT NOT NULL,
        category TEXT NOT NULL,
        date TEXT NOT NULL,
        recurring_id INTEGER,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(household) REFERENCES households(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_household_date
        ON transactions(household, date);

    CREATE TABLE IF NOT EXISTS recurring(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        household TEXT NOT NULL,
        kind TEXT NOT NULL,
        concept TEXT NOT NULL,
        amount TEXT NOT NULL,
        category TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(household) REFERENCES households(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS budgets(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        household TEXT NOT NULL,
        category TEXT NOT NULL,
        limit_amount TEXT NOT NULL,
        UNIQUE(household, category),
        FOREIGN KEY(household) REFERENCES households(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS goals(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        household TEXT NOT NULL,
        name TEXT NOT NULL,
        target TEXT NOT NULL,
        saved TEXT NOT NULL DEFAULT '0',
        emoji TEXT NOT NULL DEFAULT '🎯',
        FOREIGN KEY(household) REFERENCES households(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS months(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        household TEXT NOT NULL,
        year INTEGER NOT NULL,
        month INTEGER NOT NULL,
        status TEXT NOT NULL CHECK(status IN ('open','closed')),
        UNIQUE(household, year, month),
        FOREIGN KEY(household) REFERENCES households(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS huchas(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        household TEXT NOT NULL,
        name TEXT NOT NULL,
        balance TEXT NOT NULL DEFAULT '0',
        emoji TEXT NOT NULL DEFAULT '🐷',
        FOREIGN KEY(household) REFERENCES households(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS positions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        household TEXT NOT NULL,
        ticker TEXT NOT NULL,
        name TEXT NOT NULL,
        shares TEXT NOT NULL,
        buy_price TEXT NOT NULL,
        FOREIGN KEY(household) REFERENCES households(id) ON DELETE CASCADE
    );
    "#,
    )?;
    Ok(())
}
