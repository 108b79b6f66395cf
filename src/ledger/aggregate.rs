// Copyright (c) 2025 Hogar contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

use crate::models::{Budget, Category, Hucha, Position, Transaction, TxKind};

pub fn in_period(date: NaiveDate, year: i32, month: u32) -> bool {
    date.year() == year && date.month() == month
}

/// Per-kind totals for one calendar month. Net treats everything except
/// income as an outflow: money moved into savings or investments is not
/// available to spend that month.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TypeTotals {
    pub income: Decimal,
    pub expense: Decimal,
    pub investment: Decimal,
    pub saving: Decimal,
    pub net: Decimal,
}

pub fn totals_by_type(transactions: &[Transaction], year: i32, month: u32) -> TypeTotals {
    let mut t = TypeTotals::default();
    for tx in transactions.iter().filter(|tx| in_period(tx.date, year, month)) {
        match tx.kind {
            TxKind::Income => t.income += tx.amount,
            TxKind::Expense => t.expense += tx.amount,
            TxKind::Investment => t.investment += tx.amount,
            TxKind::Saving => t.saving += tx.amount,
        }
    }
    t.net = t.income - t.expense - t.investment - t.saving;
    t
}

/// Expense total for one category in one month. Only expense-kind rows
/// count: an investment tagged "Inversión" never burns budget.
pub fn spend_by_category(
    transactions: &[Transaction],
    category: Category,
    year: i32,
    month: u32,
) -> Decimal {
    transactions
        .iter()
        .filter(|tx| {
            tx.kind == TxKind::Expense && tx.category == category && in_period(tx.date, year, month)
        })
        .map(|tx| tx.amount)
        .sum()
}

/// Expense totals per category for one month, biggest first.
pub fn category_breakdown(
    transactions: &[Transaction],
    year: i32,
    month: u32,
) -> Vec<(Category, Decimal)> {
    let mut by_cat: HashMap<Category, Decimal> = HashMap::new();
    for tx in transactions.iter().filter(|tx| {
        tx.kind == TxKind::Expense && in_period(tx.date, year, month)
    }) {
        *by_cat.entry(tx.category).or_default() += tx.amount;
    }
    let mut out: Vec<(Category, Decimal)> = by_cat.into_iter().collect();
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetTier {
    Nominal,
    Warning,
    OverLimit,
}

impl BudgetTier {
    pub fn label(&self) -> &'static str {
        match self {
            BudgetTier::Nominal => "ok",
            BudgetTier::Warning => "warning",
            BudgetTier::OverLimit => "over limit",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BudgetStatus {
    pub category: Category,
    pub limit: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    /// Consumed share in percent, capped at 100 for display.
    pub percentage: Decimal,
    pub tier: BudgetTier,
}

pub fn budget_status(budget: &Budget, spent: Decimal) -> BudgetStatus {
    let raw_pct = spent / budget.limit * Decimal::ONE_HUNDRED;
    let tier = if raw_pct >= Decimal::ONE_HUNDRED {
        BudgetTier::OverLimit
    } else if raw_pct >= Decimal::from(80) {
        BudgetTier::Warning
    } else {
        BudgetTier::Nominal
    };
    BudgetStatus {
        category: budget.category,
        limit: budget.limit,
        spent,
        remaining: budget.limit - spent,
        percentage: raw_pct.min(Decimal::ONE_HUNDRED),
        tier,
    }
}

/// One bucket of the cashflow series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthFlow {
    pub year: i32,
    pub month: u32,
    pub income: Decimal,
    pub expense: Decimal,
}

impl MonthFlow {
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Lazy walk over `window` consecutive months ending at the reference
/// month, oldest first. Each `next()` folds the snapshot once, so callers
/// that stop early never pay for the rest.
#[derive(Debug, Clone)]
pub struct MonthlySeries<'a> {
    transactions: &'a [Transaction],
    year: i32,
    month: u32,
    remaining: u32,
}

pub fn monthly_series(
    transactions: &[Transaction],
    reference_year: i32,
    reference_month: u32,
    window: u32,
) -> MonthlySeries<'_> {
    let (mut year, mut month) = (reference_year, reference_month);
    for _ in 1..window {
        if month == 1 {
            month = 12;
            year -= 1;
        } else {
            month -= 1;
        }
    }
    MonthlySeries {
        transactions,
        year,
        month,
        remaining: window,
    }
}

impl Iterator for MonthlySeries<'_> {
    type Item = MonthFlow;

    fn next(&mut self) -> Option<MonthFlow> {
        if self.remaining == 0 {
            return None;
        }
        let totals = totals_by_type(self.transactions, self.year, self.month);
        let item = MonthFlow {
            year: self.year,
            month: self.month,
            income: totals.income,
            expense: totals.expense,
        };
        self.remaining -= 1;
        if self.month == 12 {
            self.month = 1;
            self.year += 1;
        } else {
            self.month += 1;
        }
        Some(item)
    }
}

/// Household wealth snapshot. Savings accumulate over the whole history,
/// not just the current month; positions are valued live with a buy-price
/// fallback per ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetWorth {
    pub savings: Decimal,
    /// What the positions cost to acquire.
    pub invested: Decimal,
    /// What the positions are worth at the given prices.
    pub investments: Decimal,
    pub gain: Decimal,
    pub huchas: Decimal,
    pub total: Decimal,
}

pub fn net_worth(
    transactions: &[Transaction],
    positions: &[Position],
    prices: &HashMap<String, Decimal>,
    huchas: &[Hucha],
) -> NetWorth {
    let savings: Decimal = transactions
        .iter()
        .filter(|tx| tx.kind == TxKind::Saving)
        .map(|tx| tx.amount)
        .sum();
    let invested: Decimal = positions.iter().map(Position::cost).sum();
    let investments: Decimal = positions
        .iter()
        .map(|p| p.value_at(prices.get(&p.ticker).copied()))
        .sum();
    let hucha_total: Decimal = huchas.iter().map(|h| h.balance).sum();
    NetWorth {
        savings,
        invested,
        investments,
        gain: investments - invested,
        huchas: hucha_total,
        total: savings + investments + hucha_total,
    }
}
