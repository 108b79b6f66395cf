// Copyright (c) 2025 Hogar contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use hogar::commands::{importer, transactions};
use hogar::{cli, db, utils};
use rusqlite::Connection;
use std::io::Write;
use tempfile::NamedTempFile;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute(
        "INSERT INTO households(id, name, code, members) VALUES ('hogar_TEST01', 'Casa', 'TEST01', '[\"ana\"]')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO settings(key, value) VALUES ('active_household', 'hogar_TEST01')",
        [],
    )
    .unwrap();
    conn
}

fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(args);
    match matches.subcommand() {
        Some(("import", sub)) => importer::handle(conn, sub),
        Some(("tx", sub)) => transactions::handle(conn, sub),
        _ => panic!("unexpected subcommand"),
    }
}

fn csv_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file.flush().unwrap();
    file
}

fn tx_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap()
}

fn month_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM months", [], |r| r.get(0))
        .unwrap()
}

#[test]
fn csv_import_writes_rows_and_backfills_closed_months() {
    let conn = setup();
    let file = csv_file(
        "date,kind,concept,amount,category\n\
         2024-03-14,expense,Mercadona,45.30,Alimentación\n\
         2024-03-01,income,Nómina,1800,Otros\n",
    );
    let path = file.path().to_str().unwrap().to_string();

    run(&conn, &["hogar", "import", "csv", "--path", &path]).unwrap();

    assert_eq!(tx_count(&conn), 2);
    let (amount, category): (String, String) = conn
        .query_row(
            "SELECT amount, category FROM transactions WHERE concept='Mercadona'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(amount, "45.30");
    assert_eq!(category, "Alimentación");

    let status: String = conn
        .query_row(
            "SELECT status FROM months WHERE year=2024 AND month=3",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(status, "closed");
}

#[test]
fn reimporting_the_same_file_adds_nothing() {
    let conn = setup();
    let file = csv_file(
        "date,kind,concept,amount,category\n\
         2024-03-14,expense,Mercadona,45.30,Alimentación\n\
         2024-03-22,expense,Luz,60.12,Hogar\n",
    );
    let path = file.path().to_str().unwrap().to_string();

    run(&conn, &["hogar", "import", "csv", "--path", &path]).unwrap();
    run(&conn, &["hogar", "import", "csv", "--path", &path]).unwrap();

    assert_eq!(tx_count(&conn), 2);
    assert_eq!(month_count(&conn), 1);
}

#[test]
fn duplicate_rows_within_one_file_are_written_once() {
    let conn = setup();
    let file = csv_file(
        "date,kind,concept,amount,category\n\
         2024-03-14,expense,Mercadona,45.30,Alimentación\n\
         2024-03-21,expense,Mercadona,45.30,Alimentación\n",
    );
    let path = file.path().to_str().unwrap().to_string();

    run(&conn, &["hogar", "import", "csv", "--path", &path]).unwrap();
    assert_eq!(tx_count(&conn), 1);
}

#[test]
fn monthly_dedup_lets_recurring_charges_through() {
    let conn = setup();
    run(
        &conn,
        &[
            "hogar", "tx", "add", "--kind", "expense", "--concept", "Alquiler", "--amount", "800",
            "--category", "Hogar", "--date", "2024-03-01",
        ],
    )
    .unwrap();

    let file = csv_file(
        "date,kind,concept,amount,category\n\
         2024-04-01,expense,Alquiler,800,Hogar\n",
    );
    let path = file.path().to_str().unwrap().to_string();

    // The default policy treats the April charge as a duplicate of March.
    run(&conn, &["hogar", "import", "csv", "--path", &path]).unwrap();
    assert_eq!(tx_count(&conn), 1);

    run(
        &conn,
        &["hogar", "import", "csv", "--path", &path, "--dedup", "monthly"],
    )
    .unwrap();
    assert_eq!(tx_count(&conn), 2);
}

#[test]
fn a_malformed_row_aborts_the_whole_file() {
    let conn = setup();
    let file = csv_file(
        "date,kind,concept,amount,category\n\
         2024-03-14,expense,Mercadona,45.30,Alimentación\n\
         2024-03-15,expense,Luz,abc,Hogar\n",
    );
    let path = file.path().to_str().unwrap().to_string();

    let err = run(&conn, &["hogar", "import", "csv", "--path", &path]).unwrap_err();
    assert!(err.to_string().contains("Invalid amount"));
    assert_eq!(tx_count(&conn), 0);
    assert_eq!(month_count(&conn), 0);
}

#[test]
fn an_unknown_kind_aborts_the_whole_file() {
    let conn = setup();
    let file = csv_file(
        "date,kind,concept,amount,category\n\
         2024-03-14,transfer,Bizum,20,Otros\n",
    );
    let path = file.path().to_str().unwrap().to_string();

    let err = run(&conn, &["hogar", "import", "csv", "--path", &path]).unwrap_err();
    assert!(err.to_string().contains("Invalid kind"));
    assert_eq!(tx_count(&conn), 0);
}

#[test]
fn rows_without_a_date_land_on_the_import_day() {
    let conn = setup();
    let file = csv_file(
        "date,kind,concept,amount,category\n\
         ,expense,Farmacia,12.40,Salud\n",
    );
    let path = file.path().to_str().unwrap().to_string();

    run(&conn, &["hogar", "import", "csv", "--path", &path]).unwrap();

    let date: String = conn
        .query_row("SELECT date FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(date, utils::today().to_string());
}

#[test]
fn dry_run_writes_nothing() {
    let conn = setup();
    let file = csv_file(
        "date,kind,concept,amount,category\n\
         2024-03-14,expense,Mercadona,45.30,Alimentación\n",
    );
    let path = file.path().to_str().unwrap().to_string();

    run(&conn, &["hogar", "import", "csv", "--path", &path, "--dry-run"]).unwrap();
    assert_eq!(tx_count(&conn), 0);
    assert_eq!(month_count(&conn), 0);
}

#[test]
fn tracked_open_months_are_left_open() {
    let conn = setup();
    conn.execute(
        "INSERT INTO months(household, year, month, status) VALUES ('hogar_TEST01', 2024, 3, 'open')",
        [],
    )
    .unwrap();
    let file = csv_file(
        "date,kind,concept,amount,category\n\
         2024-03-14,expense,Mercadona,45.30,Alimentación\n",
    );
    let path = file.path().to_str().unwrap().to_string();

    run(&conn, &["hogar", "import", "csv", "--path", &path]).unwrap();

    let status: String = conn
        .query_row(
            "SELECT status FROM months WHERE year=2024 AND month=3",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(status, "open");
    assert_eq!(tx_count(&conn), 1);
}

#[test]
fn statement_import_needs_a_recognizable_file_type() {
    let conn = setup();
    let err = run(
        &conn,
        &["hogar", "import", "statement", "--path", "extracto.txt"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("--mime"));
}
