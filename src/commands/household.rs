// Copyright (c) 2025 Hogar contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::errors::Error;
use crate::models::Household;
use crate::store;
use crate::utils::{
    active_household, generate_join_code, is_valid_join_code, member_name, pretty_table,
    set_active_household,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("create", sub)) => create(conn, sub)?,
        Some(("join", sub)) => join(conn, sub)?,
        Some(("show", _)) => show(conn)?,
        _ => {}
    }
    Ok(())
}

fn create(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    if name.is_empty() {
        return Err(Error::validation("household name must not be empty").into());
    }
    let code = generate_join_code();
    let household = Household {
        id: format!("hogar_{}", code),
        name,
        code: code.clone(),
        members: vec![member_name()],
    };
    store::insert_household(conn, &household)?;
    set_active_household(conn, &household.id)?;
    println!(
        "Created household '{}'. Share the join code {} with the others.",
        household.name, code
    );
    Ok(())
}

fn join(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    // Codes are stored uppercase; accept whatever casing the invite
    // arrived in.
    let code = sub.get_one::<String>("code").unwrap().trim().to_uppercase();
    if !is_valid_join_code(&code) {
        return Err(Error::validation(format!(
            "'{}' is not a join code (6 letters or digits)",
            code
        ))
        .into());
    }
    let Some(mut household) = store::household_by_code(conn, &code)? else {
        return Err(Error::not_found("household with code", &code).into());
    };
    let me = member_name();
    if !household.members.contains(&me) {
        household.members.push(me);
        store::set_household_members(conn, &household.id, &household.members)?;
    }
    set_active_household(conn, &household.id)?;
    println!("Joined household '{}' ({})", household.name, code);
    Ok(())
}

fn show(conn: &Connection) -> Result<()> {
    let id = active_household(conn)?;
    let household = store::get_household(conn, &id)?;
    println!("Household: {}", household.name);
    println!("Join code: {}", household.code);
    println!("Members:   {}", household.members.join(", "));
    let counts = store::collection_counts(conn, &id)?;
    let rows = counts
        .into_iter()
        .map(|(label, n)| vec![label.to_string(), n.to_string()])
        .collect();
    println!("{}", pretty_table(&["Collection", "Rows"], rows));
    Ok(())
}
