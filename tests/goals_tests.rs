// Copyright (c) 2025 Hogar contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use hogar::commands::goals;
use hogar::{cli, db};
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
        Some(("goal", sub)) => goals::handle(conn, sub),
        _ => panic!("unexpected subcommand"),
    }
}

fn goal_id(conn: &Connection) -> i64 {
    conn.query_row("SELECT id FROM goals", [], |r| r.get(0)).unwrap()
}

#[test]
fn add_defaults_saved_and_emoji() {
    let conn = setup();
    run(&conn, &["hogar", "goal", "add", "--name", "Vacaciones", "--target", "500"]).unwrap();

    let (saved, emoji): (String, String) = conn
        .query_row("SELECT saved, emoji FROM goals", [], |r| {
            Ok((r.get(0)?, r.get(1)?))
        })
        .unwrap();
    assert_eq!(saved, "0");
    assert_eq!(emoji, "🎯");
}

#[test]
fn contribute_caps_at_the_target() {
    let conn = setup();
    run(
        &conn,
        &[
            "hogar", "goal", "add", "--name", "Vacaciones", "--target", "500", "--saved", "450",
        ],
    )
    .unwrap();
    let id_s = goal_id(&conn).to_string();

    run(&conn, &["hogar", "goal", "contribute", &id_s, "--amount", "100"]).unwrap();

    let saved: String = conn
        .query_row("SELECT saved FROM goals", [], |r| r.get(0))
        .unwrap();
    assert_eq!(saved, "500");
}

#[test]
fn contribute_rejects_a_non_positive_amount() {
    let conn = setup();
    run(
        &conn,
        &[
            "hogar", "goal", "add", "--name", "Vacaciones", "--target", "500", "--saved", "450",
        ],
    )
    .unwrap();
    let id_s = goal_id(&conn).to_string();

    let err = run(&conn, &["hogar", "goal", "contribute", &id_s, "--amount", "0"]).unwrap_err();
    assert!(err.to_string().contains("positive"));

    let saved: String = conn
        .query_row("SELECT saved FROM goals", [], |r| r.get(0))
        .unwrap();
    assert_eq!(saved, "450");
}

#[test]
fn add_rejects_saved_above_the_target() {
    let conn = setup();
    let err = run(
        &conn,
        &[
            "hogar", "goal", "add", "--name", "Moto", "--target", "100", "--saved", "150",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("between 0 and the target"));

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM goals", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn contribute_to_an_unknown_goal_errors() {
    let conn = setup();
    let err = run(&conn, &["hogar", "goal", "contribute", "99", "--amount", "5"]).unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn rm_deletes_the_goal() {
    let conn = setup();
    run(&conn, &["hogar", "goal", "add", "--name", "Vacaciones", "--target", "500"]).unwrap();
    let id_s = goal_id(&conn).to_string();

    run(&conn, &["hogar", "goal", "rm", &id_s]).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM goals", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}
