// Copyright (c) 2025 Hogar contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::Datelike;
use hogar::commands::{months, recurring, transactions};
use hogar::{cli, db, utils};
use rusqlite::Connection;

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
        Some(("recurring", sub)) => recurring::handle(conn, sub),
        Some(("month", sub)) => months::handle(conn, sub),
        Some(("tx", sub)) => transactions::handle(conn, sub),
        _ => panic!("unexpected subcommand"),
    }
}

fn add_template(conn: &Connection, concept: &str, amount: &str) {
    run(
        conn,
        &[
            "hogar", "recurring", "add", "--kind", "expense", "--concept", concept, "--amount",
            amount, "--category", "Hogar",
        ],
    )
    .unwrap();
}

fn tx_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap()
}

#[test]
fn apply_materializes_every_pending_template() {
    let conn = setup();
    add_template(&conn, "Alquiler", "800");
    add_template(&conn, "Netflix", "12.99");

    run(&conn, &["hogar", "recurring", "apply"]).unwrap();

    assert_eq!(tx_count(&conn), 2);
    let (date, recurring_id): (String, Option<i64>) = conn
        .query_row(
            "SELECT date, recurring_id FROM transactions WHERE concept='Alquiler'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(date, utils::today().to_string());
    assert!(recurring_id.is_some());
}

#[test]
fn applying_twice_in_one_month_adds_nothing() {
    let conn = setup();
    add_template(&conn, "Alquiler", "800");

    run(&conn, &["hogar", "recurring", "apply"]).unwrap();
    run(&conn, &["hogar", "recurring", "apply"]).unwrap();

    assert_eq!(tx_count(&conn), 1);
}

#[test]
fn apply_by_id_leaves_other_templates_pending() {
    let conn = setup();
    add_template(&conn, "Alquiler", "800");
    add_template(&conn, "Netflix", "12.99");
    let id: i64 = conn
        .query_row("SELECT id FROM recurring WHERE concept='Alquiler'", [], |r| r.get(0))
        .unwrap();

    let id_s = id.to_string();
    run(&conn, &["hogar", "recurring", "apply", "--id", &id_s]).unwrap();
    assert_eq!(tx_count(&conn), 1);

    run(&conn, &["hogar", "recurring", "apply"]).unwrap();
    assert_eq!(tx_count(&conn), 2);
}

#[test]
fn apply_with_an_unknown_id_errors() {
    let conn = setup();
    let err = run(&conn, &["hogar", "recurring", "apply", "--id", "99"]).unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn apply_is_blocked_while_the_current_month_is_closed() {
    let conn = setup();
    add_template(&conn, "Alquiler", "800");

    let t = utils::today();
    let label = format!("{:04}-{:02}", t.year(), t.month());
    run(&conn, &["hogar", "month", "open", "--month", &label]).unwrap();
    run(&conn, &["hogar", "month", "close", "--month", &label]).unwrap();

    let err = run(&conn, &["hogar", "recurring", "apply"]).unwrap_err();
    assert!(err.to_string().contains("is closed"));
    assert_eq!(tx_count(&conn), 0);
}

#[test]
fn manual_transactions_do_not_count_as_applied() {
    let conn = setup();
    add_template(&conn, "Alquiler", "800");
    // Same concept and amount, but typed by hand: no template id on it.
    run(
        &conn,
        &[
            "hogar", "tx", "add", "--kind", "expense", "--concept", "Alquiler", "--amount", "800",
            "--category", "Hogar",
        ],
    )
    .unwrap();

    run(&conn, &["hogar", "recurring", "apply"]).unwrap();

    assert_eq!(tx_count(&conn), 2);
    let stamped: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM transactions WHERE recurring_id IS NOT NULL",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(stamped, 1);
}

#[test]
fn removing_a_template_keeps_its_transactions() {
    let conn = setup();
    add_template(&conn, "Netflix", "12.99");
    run(&conn, &["hogar", "recurring", "apply"]).unwrap();

    let id: i64 = conn
        .query_row("SELECT id FROM recurring", [], |r| r.get(0))
        .unwrap();
    let id_s = id.to_string();
    run(&conn, &["hogar", "recurring", "rm", &id_s]).unwrap();

    let templates: i64 = conn
        .query_row("SELECT COUNT(*) FROM recurring", [], |r| r.get(0))
        .unwrap();
    assert_eq!(templates, 0);
    assert_eq!(tx_count(&conn), 1);
}
