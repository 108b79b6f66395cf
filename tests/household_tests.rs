// Copyright (c) 2025 Hogar contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use hogar::commands::household;
use hogar::{cli, db, utils};
use rusqlite::Connection;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute(
        "INSERT INTO households(id, name, code, members) VALUES ('hogar_TEST01', 'Casa', 'TEST01', '[\"seed-owner\"]')",
        [],
    )
    .unwrap();
    conn
}

fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(args);
    match matches.subcommand() {
        Some(("household", sub)) => household::handle(conn, sub),
        _ => panic!("unexpected subcommand"),
    }
}

fn active(conn: &Connection) -> Option<String> {
    conn.query_row(
        "SELECT value FROM settings WHERE key='active_household'",
        [],
        |r| r.get(0),
    )
    .ok()
}

#[test]
fn create_makes_the_household_active_with_a_valid_code() {
    let conn = setup();
    run(&conn, &["hogar", "household", "create", "--name", "Piso compartido"]).unwrap();

    let (id, code): (String, String) = conn
        .query_row(
            "SELECT id, code FROM households WHERE name='Piso compartido'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert!(utils::is_valid_join_code(&code));
    assert_eq!(id, format!("hogar_{}", code));
    assert_eq!(active(&conn).as_deref(), Some(id.as_str()));
}

#[test]
fn create_rejects_a_blank_name() {
    let conn = setup();
    let err = run(&conn, &["hogar", "household", "create", "--name", "   "]).unwrap_err();
    assert!(err.to_string().contains("must not be empty"));
    assert!(active(&conn).is_none());
}

#[test]
fn join_is_case_insensitive_and_adds_the_member() {
    let conn = setup();
    run(&conn, &["hogar", "household", "join", "--code", "test01"]).unwrap();

    assert_eq!(active(&conn).as_deref(), Some("hogar_TEST01"));
    let members_raw: String = conn
        .query_row(
            "SELECT members FROM households WHERE id='hogar_TEST01'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    let members: Vec<String> = serde_json::from_str(&members_raw).unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0], "seed-owner");
}

#[test]
fn joining_twice_does_not_duplicate_the_member() {
    let conn = setup();
    run(&conn, &["hogar", "household", "join", "--code", "TEST01"]).unwrap();
    run(&conn, &["hogar", "household", "join", "--code", "TEST01"]).unwrap();

    let members_raw: String = conn
        .query_row(
            "SELECT members FROM households WHERE id='hogar_TEST01'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    let members: Vec<String> = serde_json::from_str(&members_raw).unwrap();
    assert_eq!(members.len(), 2);
}

#[test]
fn join_rejects_malformed_codes() {
    let conn = setup();
    let err = run(&conn, &["hogar", "household", "join", "--code", "abc"]).unwrap_err();
    assert!(err.to_string().contains("not a join code"));
}

#[test]
fn join_with_an_unknown_code_errors() {
    let conn = setup();
    let err = run(&conn, &["hogar", "household", "join", "--code", "ZZZZZZ"]).unwrap_err();
    assert!(err.to_string().contains("not found"));
    assert!(active(&conn).is_none());
}
