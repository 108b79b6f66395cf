// Copyright (c) 2025 Hogar contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use tracing::warn;

use crate::errors::{Error, Result};
use crate::models::{
    Budget, Category, Goal, Household, Hucha, Month, MonthStatus, NewBudget, NewGoal, NewHucha,
    NewPosition, NewTemplate, NewTransaction, Position, RecurringTemplate, Transaction, TxKind,
};

// Rows are normalized on the way out: a row another writer managed to
// corrupt is skipped (or coerced) with a warning instead of poisoning
// every aggregate downstream. Writes always go through the validated
// New* types, so well-formed data stays well-formed.

fn tx_from_parts(
    id: i64,
    household: &str,
    kind_s: &str,
    concept: String,
    amount_s: &str,
    category_s: &str,
    date_s: &str,
    recurring_id: Option<i64>,
) -> Option<Transaction> {
    let kind = match kind_s.parse::<TxKind>() {
        Ok(k) => k,
        Err(_) => {
            warn!(id, kind = kind_s, "skipping transaction with unknown kind");
            return None;
        }
    };
    let category = match category_s.parse::<Category>() {
        Ok(c) => c,
        Err(_) => {
            warn!(id, category = category_s, "unknown category, counting as Otros");
            Category::Otros
        }
    };
    let amount = match amount_s.parse::<Decimal>() {
        Ok(a) if a > Decimal::ZERO => a,
        _ => {
            warn!(id, amount = amount_s, "skipping transaction with unusable amount");
            return None;
        }
    };
    let date = match NaiveDate::parse_from_str(date_s, "%Y-%m-%d") {
        Ok(d) => d,
        Err(_) => {
            warn!(
                id,
                date = date_s,
                "skipping transaction with unreadable date, it is excluded from totals"
            );
            return None;
        }
    };
    Some(Transaction {
        id,
        household: household.to_string(),
        kind,
        concept,
        amount,
        category,
        date,
        recurring_id,
    })
}

type TxParts = (i64, String, String, String, String, String, Option<i64>);

fn tx_row(r: &rusqlite::Row) -> rusqlite::Result<TxParts> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
        r.get(6)?,
    ))
}

pub fn transactions(conn: &Connection, household: &str) -> Result<Vec<Transaction>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, kind, concept, amount, category, date, recurring_id
             FROM transactions WHERE household=?1 ORDER BY date DESC, id DESC",
        )
        .map_err(Error::Read)?;
    let rows = stmt
        .query_map(params![household], tx_row)
        .map_err(Error::Read)?;
    let mut out = Vec::new();
    for row in rows {
        let (id, kind_s, concept, amount_s, category_s, date_s, recurring_id) =
            row.map_err(Error::Read)?;
        if let Some(tx) = tx_from_parts(
            id,
            household,
            &kind_s,
            concept,
            &amount_s,
            &category_s,
            &date_s,
            recurring_id,
        ) {
            out.push(tx);
        }
    }
    Ok(out)
}

pub fn get_transaction(conn: &Connection, household: &str, id: i64) -> Result<Transaction> {
    let row = conn
        .query_row(
            "SELECT id, kind, concept, amount, category, date, recurring_id
             FROM transactions WHERE household=?1 AND id=?2",
            params![household, id],
            tx_row,
        )
        .optional()
        .map_err(Error::Read)?;
    let (id, kind_s, concept, amount_s, category_s, date_s, recurring_id) =
        row.ok_or_else(|| Error::not_found("transaction", id))?;
    tx_from_parts(
        id,
        household,
        &kind_s,
        concept,
        &amount_s,
        &category_s,
        &date_s,
        recurring_id,
    )
    .ok_or_else(|| Error::validation(format!("transaction {} is malformed and cannot be used", id)))
}

pub fn insert_transaction(conn: &Connection, household: &str, tx: &NewTransaction) -> Result<i64> {
    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO transactions(household, kind, concept, amount, category, date, recurring_id)
             VALUES (?1,?2,?3,?4,?5,?6,?7)",
        )
        .map_err(Error::Write)?;
    stmt.execute(params![
        household,
        tx.kind.as_str(),
        tx.concept,
        tx.amount.to_string(),
        tx.category.as_str(),
        tx.date.to_string(),
        tx.recurring_id,
    ])
    .map_err(Error::Write)?;
    Ok(conn.last_insert_rowid())
}

pub fn update_transaction(
    conn: &Connection,
    household: &str,
    id: i64,
    tx: &NewTransaction,
) -> Result<()> {
    let n = conn
        .execute(
            "UPDATE transactions SET kind=?1, concept=?2, amount=?3, category=?4, date=?5, recurring_id=?6
             WHERE household=?7 AND id=?8",
            params![
                tx.kind.as_str(),
                tx.concept,
                tx.amount.to_string(),
                tx.category.as_str(),
                tx.date.to_string(),
                tx.recurring_id,
                household,
                id,
            ],
        )
        .map_err(Error::Write)?;
    if n == 0 {
        return Err(Error::not_found("transaction", id));
    }
    Ok(())
}

pub fn delete_transaction(conn: &Connection, household: &str, id: i64) -> Result<()> {
    let n = conn
        .execute(
            "DELETE FROM transactions WHERE household=?1 AND id=?2",
            params![household, id],
        )
        .map_err(Error::Write)?;
    if n == 0 {
        return Err(Error::not_found("transaction", id));
    }
    Ok(())
}

fn template_from_parts(
    id: i64,
    household: &str,
    kind_s: &str,
    concept: String,
    amount_s: &str,
    category_s: &str,
) -> Option<RecurringTemplate> {
    let kind = match kind_s.parse::<TxKind>() {
        Ok(k) => k,
        Err(_) => {
            warn!(id, kind = kind_s, "skipping template with unknown kind");
            return None;
        }
    };
    let category = match category_s.parse::<Category>() {
        Ok(c) => c,
        Err(_) => {
            warn!(id, category = category_s, "unknown category, counting as Otros");
            Category::Otros
        }
    };
    let amount = match amount_s.parse::<Decimal>() {
        Ok(a) if a > Decimal::ZERO => a,
        _ => {
            warn!(id, amount = amount_s, "skipping template with unusable amount");
            return None;
        }
    };
    Some(RecurringTemplate {
        id,
        household: household.to_string(),
        kind,
        concept,
        amount,
        category,
    })
}

pub fn recurring_templates(conn: &Connection, household: &str) -> Result<Vec<RecurringTemplate>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, kind, concept, amount, category
             FROM recurring WHERE household=?1 ORDER BY id",
        )
        .map_err(Error::Read)?;
    let rows = stmt
        .query_map(params![household], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, String>(3)?,
                r.get::<_, String>(4)?,
            ))
        })
        .map_err(Error::Read)?;
    let mut out = Vec::new();
    for row in rows {
        let (id, kind_s, concept, amount_s, category_s) = row.map_err(Error::Read)?;
        if let Some(t) = template_from_parts(id, household, &kind_s, concept, &amount_s, &category_s)
        {
            out.push(t);
        }
    }
    Ok(out)
}

pub fn insert_recurring(conn: &Connection, household: &str, t: &NewTemplate) -> Result<i64> {
    conn.execute(
        "INSERT INTO recurring(household, kind, concept, amount, category) VALUES (?1,?2,?3,?4,?5)",
        params![
            household,
            t.kind.as_str(),
            t.concept,
            t.amount.to_string(),
            t.category.as_str(),
        ],
    )
    .map_err(Error::Write)?;
    Ok(conn.last_insert_rowid())
}

pub fn delete_recurring(conn: &Connection, household: &str, id: i64) -> Result<()> {
    let n = conn
        .execute(
            "DELETE FROM recurring WHERE household=?1 AND id=?2",
            params![household, id],
        )
        .map_err(Error::Write)?;
    if n == 0 {
        return Err(Error::not_found("recurring template", id));
    }
    Ok(())
}

pub fn budgets(conn: &Connection, household: &str) -> Result<Vec<Budget>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, category, limit_amount FROM budgets WHERE household=?1 ORDER BY category",
        )
        .map_err(Error::Read)?;
    let rows = stmt
        .query_map(params![household], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
            ))
        })
        .map_err(Error::Read)?;
    let mut out = Vec::new();
    for row in rows {
        let (id, category_s, limit_s) = row.map_err(Error::Read)?;
        let category = match category_s.parse::<Category>() {
            Ok(c) => c,
            Err(_) => {
                warn!(id, category = category_s, "skipping budget with unknown category");
                continue;
            }
        };
        let limit = match limit_s.parse::<Decimal>() {
            Ok(l) if l > Decimal::ZERO => l,
            _ => {
                warn!(id, limit = limit_s, "skipping budget with unusable limit");
                continue;
            }
        };
        out.push(Budget {
            id,
            household: household.to_string(),
            category,
            limit,
        });
    }
    Ok(out)
}

pub fn upsert_budget(conn: &Connection, household: &str, b: &NewBudget) -> Result<()> {
    conn.execute(
        "INSERT INTO budgets(household, category, limit_amount) VALUES (?1,?2,?3)
         ON CONFLICT(household, category) DO UPDATE SET limit_amount=excluded.limit_amount",
        params![household, b.category.as_str(), b.limit.to_string()],
    )
    .map_err(Error::Write)?;
    Ok(())
}

pub fn delete_budget(conn: &Connection, household: &str, category: Category) -> Result<()> {
    let n = conn
        .execute(
            "DELETE FROM budgets WHERE household=?1 AND category=?2",
            params![household, category.as_str()],
        )
        .map_err(Error::Write)?;
    if n == 0 {
        return Err(Error::not_found("budget", category));
    }
    Ok(())
}

fn goal_from_parts(
    id: i64,
    household: &str,
    name: String,
    target_s: &str,
    saved_s: &str,
    emoji: String,
) -> Option<Goal> {
    let target = match target_s.parse::<Decimal>() {
        Ok(t) if t > Decimal::ZERO => t,
        _ => {
            warn!(id, target = target_s, "skipping goal with unusable target");
            return None;
        }
    };
    let mut saved = match saved_s.parse::<Decimal>() {
        Ok(s) => s,
        Err(_) => {
            warn!(id, saved = saved_s, "unreadable saved amount, treating as 0");
            Decimal::ZERO
        }
    };
    if saved < Decimal::ZERO || saved > target {
        warn!(id, %saved, %target, "saved amount out of range, clamping");
        saved = saved.clamp(Decimal::ZERO, target);
    }
    Some(Goal {
        id,
        household: household.to_string(),
        name,
        target,
        saved,
        emoji,
    })
}

pub fn goals(conn: &Connection, household: &str) -> Result<Vec<Goal>> {
    let mut stmt = conn
        .prepare("SELECT id, name, target, saved, emoji FROM goals WHERE household=?1 ORDER BY id")
        .map_err(Error::Read)?;
    let rows = stmt
        .query_map(params![household], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, String>(3)?,
                r.get::<_, String>(4)?,
            ))
        })
        .map_err(Error::Read)?;
    let mut out = Vec::new();
    for row in rows {
        let (id, name, target_s, saved_s, emoji) = row.map_err(Error::Read)?;
        if let Some(g) = goal_from_parts(id, household, name, &target_s, &saved_s, emoji) {
            out.push(g);
        }
    }
    Ok(out)
}

pub fn get_goal(conn: &Connection, household: &str, id: i64) -> Result<Goal> {
    let row = conn
        .query_row(
            "SELECT id, name, target, saved, emoji FROM goals WHERE household=?1 AND id=?2",
            params![household, id],
            |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                    r.get::<_, String>(4)?,
                ))
            },
        )
        .optional()
        .map_err(Error::Read)?;
    let (id, name, target_s, saved_s, emoji) = row.ok_or_else(|| Error::not_found("goal", id))?;
    goal_from_parts(id, household, name, &target_s, &saved_s, emoji)
        .ok_or_else(|| Error::validation(format!("goal {} is malformed and cannot be used", id)))
}

pub fn insert_goal(conn: &Connection, household: &str, g: &NewGoal) -> Result<i64> {
    conn.execute(
        "INSERT INTO goals(household, name, target, saved, emoji) VALUES (?1,?2,?3,?4,?5)",
        params![
            household,
            g.name,
            g.target.to_string(),
            g.saved.to_string(),
            g.emoji,
        ],
    )
    .map_err(Error::Write)?;
    Ok(conn.last_insert_rowid())
}

pub fn set_goal_saved(conn: &Connection, household: &str, id: i64, saved: Decimal) -> Result<()> {
    let n = conn
        .execute(
            "UPDATE goals SET saved=?1 WHERE household=?2 AND id=?3",
            params![saved.to_string(), household, id],
        )
        .map_err(Error::Write)?;
    if n == 0 {
        return Err(Error::not_found("goal", id));
    }
    Ok(())
}

pub fn delete_goal(conn: &Connection, household: &str, id: i64) -> Result<()> {
    let n = conn
        .execute(
            "DELETE FROM goals WHERE household=?1 AND id=?2",
            params![household, id],
        )
        .map_err(Error::Write)?;
    if n == 0 {
        return Err(Error::not_found("goal", id));
    }
    Ok(())
}

pub fn months(conn: &Connection, household: &str) -> Result<Vec<Month>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, year, month, status FROM months
             WHERE household=?1 ORDER BY year DESC, month DESC",
        )
        .map_err(Error::Read)?;
    let rows = stmt
        .query_map(params![household], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, i32>(1)?,
                r.get::<_, i64>(2)?,
                r.get::<_, String>(3)?,
            ))
        })
        .map_err(Error::Read)?;
    let mut out = Vec::new();
    for row in rows {
        let (id, year, month_raw, status_s) = row.map_err(Error::Read)?;
        if !(1..=12).contains(&month_raw) {
            warn!(id, month = month_raw, "skipping month row with out-of-range month");
            continue;
        }
        let status = match status_s.parse::<MonthStatus>() {
            Ok(s) => s,
            Err(_) => {
                warn!(id, status = status_s, "skipping month row with unknown status");
                continue;
            }
        };
        out.push(Month {
            id,
            household: household.to_string(),
            year,
            month: month_raw as u32,
            status,
        });
    }
    Ok(out)
}

pub fn month_status(
    conn: &Connection,
    household: &str,
    year: i32,
    month: u32,
) -> Result<Option<MonthStatus>> {
    let status: Option<String> = conn
        .query_row(
            "SELECT status FROM months WHERE household=?1 AND year=?2 AND month=?3",
            params![household, year, month],
            |r| r.get(0),
        )
        .optional()
        .map_err(Error::Read)?;
    match status {
        None => Ok(None),
        Some(s) => match s.parse::<MonthStatus>() {
            Ok(st) => Ok(Some(st)),
            Err(_) => {
                warn!(year, month, status = s, "unknown month status, treating as untracked");
                Ok(None)
            }
        },
    }
}

/// Returns true when the row was created, false when it already existed.
pub fn create_month(
    conn: &Connection,
    household: &str,
    year: i32,
    month: u32,
    status: MonthStatus,
) -> Result<bool> {
    let n = conn
        .execute(
            "INSERT INTO months(household, year, month, status) VALUES (?1,?2,?3,?4)
             ON CONFLICT(household, year, month) DO NOTHING",
            params![household, year, month, status.as_str()],
        )
        .map_err(Error::Write)?;
    Ok(n > 0)
}

pub fn set_month_status(
    conn: &Connection,
    household: &str,
    year: i32,
    month: u32,
    status: MonthStatus,
) -> Result<()> {
    let n = conn
        .execute(
            "UPDATE months SET status=?1 WHERE household=?2 AND year=?3 AND month=?4",
            params![status.as_str(), household, year, month],
        )
        .map_err(Error::Write)?;
    if n == 0 {
        return Err(Error::not_found(
            "month",
            format!("{:04}-{:02}", year, month),
        ));
    }
    Ok(())
}

/// Guard for manually dated writes. The statement importer does not call
/// this: backfilling closed months is exactly its job.
pub fn ensure_month_open(conn: &Connection, household: &str, year: i32, month: u32) -> Result<()> {
    match month_status(conn, household, year, month)? {
        Some(MonthStatus::Closed) => Err(Error::ClosedMonth { year, month }),
        _ => Ok(()),
    }
}

fn hucha_from_parts(id: i64, household: &str, name: String, balance_s: &str, emoji: String) -> Hucha {
    let mut balance = match balance_s.parse::<Decimal>() {
        Ok(b) => b,
        Err(_) => {
            warn!(id, balance = balance_s, "unreadable balance, treating as 0");
            Decimal::ZERO
        }
    };
    if balance < Decimal::ZERO {
        warn!(id, %balance, "negative balance, clamping to 0");
        balance = Decimal::ZERO;
    }
    Hucha {
        id,
        household: household.to_string(),
        name,
        balance,
        emoji,
    }
}

pub fn huchas(conn: &Connection, household: &str) -> Result<Vec<Hucha>> {
    let mut stmt = conn
        .prepare("SELECT id, name, balance, emoji FROM huchas WHERE household=?1 ORDER BY id")
        .map_err(Error::Read)?;
    let rows = stmt
        .query_map(params![household], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, String>(3)?,
            ))
        })
        .map_err(Error::Read)?;
    let mut out = Vec::new();
    for row in rows {
        let (id, name, balance_s, emoji) = row.map_err(Error::Read)?;
        out.push(hucha_from_parts(id, household, name, &balance_s, emoji));
    }
    Ok(out)
}

pub fn get_hucha(conn: &Connection, household: &str, id: i64) -> Result<Hucha> {
    let row = conn
        .query_row(
            "SELECT id, name, balance, emoji FROM huchas WHERE household=?1 AND id=?2",
            params![household, id],
            |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                ))
            },
        )
        .optional()
        .map_err(Error::Read)?;
    let (id, name, balance_s, emoji) = row.ok_or_else(|| Error::not_found("hucha", id))?;
    Ok(hucha_from_parts(id, household, name, &balance_s, emoji))
}

pub fn insert_hucha(conn: &Connection, household: &str, h: &NewHucha) -> Result<i64> {
    conn.execute(
        "INSERT INTO huchas(household, name, balance, emoji) VALUES (?1,?2,?3,?4)",
        params![household, h.name, h.balance.to_string(), h.emoji],
    )
    .map_err(Error::Write)?;
    Ok(conn.last_insert_rowid())
}

pub fn set_hucha_balance(
    conn: &Connection,
    household: &str,
    id: i64,
    balance: Decimal,
) -> Result<()> {
    let n = conn
        .execute(
            "UPDATE huchas SET balance=?1 WHERE household=?2 AND id=?3",
            params![balance.to_string(), household, id],
        )
        .map_err(Error::Write)?;
    if n == 0 {
        return Err(Error::not_found("hucha", id));
    }
    Ok(())
}

pub fn delete_hucha(conn: &Connection, household: &str, id: i64) -> Result<()> {
    let n = conn
        .execute(
            "DELETE FROM huchas WHERE household=?1 AND id=?2",
            params![household, id],
        )
        .map_err(Error::Write)?;
    if n == 0 {
        return Err(Error::not_found("hucha", id));
    }
    Ok(())
}

pub fn positions(conn: &Connection, household: &str) -> Result<Vec<Position>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, ticker, name, shares, buy_price FROM positions
             WHERE household=?1 ORDER BY ticker",
        )
        .map_err(Error::Read)?;
    let rows = stmt
        .query_map(params![household], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, String>(3)?,
                r.get::<_, String>(4)?,
            ))
        })
        .map_err(Error::Read)?;
    let mut out = Vec::new();
    for row in rows {
        let (id, ticker, name, shares_s, buy_s) = row.map_err(Error::Read)?;
        let shares = match shares_s.parse::<Decimal>() {
            Ok(s) if s > Decimal::ZERO => s,
            _ => {
                warn!(id, shares = shares_s, "skipping position with unusable shares");
                continue;
            }
        };
        let buy_price = match buy_s.parse::<Decimal>() {
            Ok(p) if p > Decimal::ZERO => p,
            _ => {
                warn!(id, buy_price = buy_s, "skipping position with unusable buy price");
                continue;
            }
        };
        out.push(Position {
            id,
            household: household.to_string(),
            ticker,
            name,
            shares,
            buy_price,
        });
    }
    Ok(out)
}

pub fn insert_position(conn: &Connection, household: &str, p: &NewPosition) -> Result<i64> {
    conn.execute(
        "INSERT INTO positions(household, ticker, name, shares, buy_price) VALUES (?1,?2,?3,?4,?5)",
        params![
            household,
            p.ticker,
            p.name,
            p.shares.to_string(),
            p.buy_price.to_string(),
        ],
    )
    .map_err(Error::Write)?;
    Ok(conn.last_insert_rowid())
}

pub fn delete_position(conn: &Connection, household: &str, id: i64) -> Result<()> {
    let n = conn
        .execute(
            "DELETE FROM positions WHERE household=?1 AND id=?2",
            params![household, id],
        )
        .map_err(Error::Write)?;
    if n == 0 {
        return Err(Error::not_found("position", id));
    }
    Ok(())
}

fn parse_members(id: &str, raw: &str) -> Vec<String> {
    match serde_json::from_str(raw) {
        Ok(m) => m,
        Err(_) => {
            warn!(household = id, "unreadable members list, treating as empty");
            Vec::new()
        }
    }
}

pub fn insert_household(conn: &Connection, h: &Household) -> Result<()> {
    let members = serde_json::to_string(&h.members)?;
    conn.execute(
        "INSERT INTO households(id, name, code, members) VALUES (?1,?2,?3,?4)",
        params![h.id, h.name, h.code, members],
    )
    .map_err(Error::Write)?;
    Ok(())
}

pub fn household_by_code(conn: &Connection, code: &str) -> Result<Option<Household>> {
    let row = conn
        .query_row(
            "SELECT id, name, code, members FROM households WHERE code=?1",
            params![code],
            |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                ))
            },
        )
        .optional()
        .map_err(Error::Read)?;
    Ok(row.map(|(id, name, code, members_raw)| {
        let members = parse_members(&id, &members_raw);
        Household {
            id,
            name,
            code,
            members,
        }
    }))
}

pub fn get_household(conn: &Connection, id: &str) -> Result<Household> {
    let row = conn
        .query_row(
            "SELECT id, name, code, members FROM households WHERE id=?1",
            params![id],
            |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                ))
            },
        )
        .optional()
        .map_err(Error::Read)?;
    let (id, name, code, members_raw) = row.ok_or_else(|| Error::not_found("household", id))?;
    let members = parse_members(&id, &members_raw);
    Ok(Household {
        id,
        name,
        code,
        members,
    })
}

pub fn set_household_members(conn: &Connection, id: &str, members: &[String]) -> Result<()> {
    let raw = serde_json::to_string(members)?;
    let n = conn
        .execute(
            "UPDATE households SET members=?1 WHERE id=?2",
            params![raw, id],
        )
        .map_err(Error::Write)?;
    if n == 0 {
        return Err(Error::not_found("household", id));
    }
    Ok(())
}

pub fn collection_counts(conn: &Connection, household: &str) -> Result<Vec<(&'static str, i64)>> {
    let collections = [
        ("transactions", "transactions"),
        ("recurring templates", "recurring"),
        ("budgets", "budgets"),
        ("goals", "goals"),
        ("huchas", "huchas"),
        ("positions", "positions"),
        ("months", "months"),
    ];
    let mut out = Vec::with_capacity(collections.len());
    for (label, table) in collections {
        let n: i64 = conn
            .query_row(
                &format!("SELECT COUNT(*) FROM {} WHERE household=?1", table),
                params![household],
                |r| r.get(0),
            )
            .map_err(Error::Read)?;
        out.push((label, n));
    }
    Ok(out)
}
