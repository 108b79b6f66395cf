// Copyright (c) 2025 Hogar contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::str::FromStr;

use crate::errors::Error;
use crate::models::{Month, Transaction, TxCandidate};

/// How candidates are matched against what the ledger already holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupPolicy {
    /// Same concept and amount anywhere in the history. Loose on purpose:
    /// bank exports rarely carry stable dates, and a false duplicate is
    /// cheaper to fix than a double-counted rent.
    #[default]
    ConceptAmount,
    /// Same concept and amount within the same calendar month.
    ConceptAmountMonth,
}

impl FromStr for DedupPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.trim().to_lowercase().as_str() {
            "exact" => Ok(DedupPolicy::ConceptAmount),
            "monthly" => Ok(DedupPolicy::ConceptAmountMonth),
            other => Err(Error::validation(format!(
                "unknown dedup policy '{}' (expected exact or monthly)",
                other
            ))),
        }
    }
}

/// A candidate that survived dedup, with its date resolved (candidates
/// without a usable date land on the import day).
#[derive(Debug, Clone)]
pub struct PlannedTx {
    pub candidate: TxCandidate,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default)]
pub struct ImportPlan {
    /// Periods referenced by the batch that the ledger does not track yet.
    /// They are created closed: statement backfill must not reopen history.
    pub months_to_create: Vec<(i32, u32)>,
    pub new: Vec<PlannedTx>,
    pub duplicates: usize,
}

/// What actually happened once the plan was persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportOutcome {
    pub imported: usize,
    pub duplicates: usize,
    pub failed: usize,
}

/// Decide, without writing anything, what an import batch would do.
///
/// Months to create are collected from every candidate, duplicates
/// included, so re-importing an old statement still backfills its months.
/// Candidates accepted earlier in the batch count as existing for the
/// ones after them, which is what makes re-running the same file a no-op.
pub fn plan_import(
    existing: &[Transaction],
    months: &[Month],
    candidates: Vec<TxCandidate>,
    today: NaiveDate,
    policy: DedupPolicy,
) -> ImportPlan {
    let mut plan = ImportPlan::default();
    let mut seen: Vec<(String, Decimal, i32, u32)> = existing
        .iter()
        .map(|t| (t.concept.clone(), t.amount, t.date.year(), t.date.month()))
        .collect();
    let tracked: HashSet<(i32, u32)> = months.iter().map(|m| (m.year, m.month)).collect();
    let mut needed: BTreeSet<(i32, u32)> = BTreeSet::new();

    for candidate in candidates {
        let date = candidate.date.unwrap_or(today);
        let period = (date.year(), date.month());
        if !tracked.contains(&period) {
            needed.insert(period);
        }

        let duplicate = seen.iter().any(|(concept, amount, y, m)| {
            concept == &candidate.concept
                && *amount == candidate.amount
                && match policy {
                    DedupPolicy::ConceptAmount => true,
                    DedupPolicy::ConceptAmountMonth => (*y, *m) == period,
                }
        });
        if duplicate {
            plan.duplicates += 1;
            continue;
        }

        seen.push((candidate.concept.clone(), candidate.amount, period.0, period.1));
        plan.new.push(PlannedTx { candidate, date });
    }

    plan.months_to_create = needed.into_iter().collect();
    plan
}
