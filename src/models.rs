// Copyright (c) 2025 Hogar contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::Error;

/// The four flow kinds a transaction can have. `Expense`, `Investment` and
/// `Saving` are outflows from the month's perspective; only `Income` adds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Income,
    Expense,
    Investment,
    Saving,
}

impl TxKind {
    pub const ALL: [TxKind; 4] = [
        TxKind::Income,
        TxKind::Expense,
        TxKind::Investment,
        TxKind::Saving,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Income => "income",
            TxKind::Expense => "expense",
            TxKind::Investment => "investment",
            TxKind::Saving => "saving",
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TxKind::Income),
            "expense" => Ok(TxKind::Expense),
            "investment" => Ok(TxKind::Investment),
            "saving" => Ok(TxKind::Saving),
            other => Err(Error::validation(format!(
                "unknown transaction kind '{}' (expected income, expense, investment or saving)",
                other
            ))),
        }
    }
}

/// Fixed spending categories. The wire and storage form is the exact
/// Spanish label, accents included; parsing is lenient about case and
/// accents so the CLI stays typeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Hogar,
    #[serde(rename = "Alimentación")]
    Alimentacion,
    Transporte,
    Ocio,
    Salud,
    Suscripciones,
    #[serde(rename = "Inversión")]
    Inversion,
    Ahorro,
    Otros,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Hogar,
        Category::Alimentacion,
        Category::Transporte,
        Category::Ocio,
        Category::Salud,
        Category::Suscripciones,
        Category::Inversion,
        Category::Ahorro,
        Category::Otros,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Hogar => "Hogar",
            Category::Alimentacion => "Alimentación",
            Category::Transporte => "Transporte",
            Category::Ocio => "Ocio",
            Category::Salud => "Salud",
            Category::Suscripciones => "Suscripciones",
            Category::Inversion => "Inversión",
            Category::Ahorro => "Ahorro",
            Category::Otros => "Otros",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.trim().to_lowercase().as_str() {
            "hogar" => Ok(Category::Hogar),
            "alimentación" | "alimentacion" => Ok(Category::Alimentacion),
            "transporte" => Ok(Category::Transporte),
            "ocio" => Ok(Category::Ocio),
            "salud" => Ok(Category::Salud),
            "suscripciones" => Ok(Category::Suscripciones),
            "inversión" | "inversion" => Ok(Category::Inversion),
            "ahorro" => Ok(Category::Ahorro),
            "otros" => Ok(Category::Otros),
            other => Err(Error::validation(format!(
                "unknown category '{}' (expected one of: {})",
                other,
                Category::ALL.map(|c| c.as_str()).join(", ")
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthStatus {
    Open,
    Closed,
}

impl MonthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MonthStatus::Open => "open",
            MonthStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for MonthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MonthStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(MonthStatus::Open),
            "closed" => Ok(MonthStatus::Closed),
            other => Err(Error::validation(format!(
                "unknown month status '{}' (expected open or closed)",
                other
            ))),
        }
    }
}

/// A money movement owned by one household. Amounts are always positive;
/// the kind carries the direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub household: String,
    pub kind: TxKind,
    pub concept: String,
    pub amount: Decimal,
    pub category: Category,
    pub date: NaiveDate,
    pub recurring_id: Option<i64>,
}

/// A transaction that passed validation but has no row id yet.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub kind: TxKind,
    pub concept: String,
    pub amount: Decimal,
    pub category: Category,
    pub date: NaiveDate,
    pub recurring_id: Option<i64>,
}

impl NewTransaction {
    pub fn new(
        kind: TxKind,
        concept: &str,
        amount: Decimal,
        category: Category,
        date: NaiveDate,
        recurring_id: Option<i64>,
    ) -> crate::errors::Result<Self> {
        let concept = concept.trim();
        if concept.is_empty() {
            return Err(Error::validation("concept must not be empty"));
        }
        if amount <= Decimal::ZERO {
            return Err(Error::validation(format!(
                "amount must be positive, got {}",
                amount
            )));
        }
        Ok(NewTransaction {
            kind,
            concept: concept.to_string(),
            amount,
            category,
            date,
            recurring_id,
        })
    }
}

/// A monthly template. There is no schedule field: every template is due
/// once per calendar month, and "already applied" is derived from the
/// transactions that carry its id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringTemplate {
    pub id: i64,
    pub household: String,
    pub kind: TxKind,
    pub concept: String,
    pub amount: Decimal,
    pub category: Category,
}

#[derive(Debug, Clone)]
pub struct NewTemplate {
    pub kind: TxKind,
    pub concept: String,
    pub amount: Decimal,
    pub category: Category,
}

impl NewTemplate {
    pub fn new(
        kind: TxKind,
        concept: &str,
        amount: Decimal,
        category: Category,
    ) -> crate::errors::Result<Self> {
        let concept = concept.trim();
        if concept.is_empty() {
            return Err(Error::validation("concept must not be empty"));
        }
        if amount <= Decimal::ZERO {
            return Err(Error::validation(format!(
                "amount must be positive, got {}",
                amount
            )));
        }
        Ok(NewTemplate {
            kind,
            concept: concept.to_string(),
            amount,
            category,
        })
    }
}

/// Monthly spending limit for one category. At most one per household and
/// category; setting it again replaces the limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub household: String,
    pub category: Category,
    pub limit: Decimal,
}

#[derive(Debug, Clone)]
pub struct NewBudget {
    pub category: Category,
    pub limit: Decimal,
}

impl NewBudget {
    pub fn new(category: Category, limit: Decimal) -> crate::errors::Result<Self> {
        if limit <= Decimal::ZERO {
            return Err(Error::validation(format!(
                "budget limit must be positive, got {}",
                limit
            )));
        }
        Ok(NewBudget { category, limit })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub household: String,
    pub name: String,
    pub target: Decimal,
    pub saved: Decimal,
    pub emoji: String,
}

impl Goal {
    /// Funded amount after adding `amount`, capped at the target.
    pub fn contribute(&self, amount: Decimal) -> crate::errors::Result<Decimal> {
        if amount <= Decimal::ZERO {
            return Err(Error::validation(format!(
                "contribution must be positive, got {}",
                amount
            )));
        }
        Ok((self.saved + amount).min(self.target))
    }

    pub fn reached(&self) -> bool {
        self.saved >= self.target
    }
}

#[derive(Debug, Clone)]
pub struct NewGoal {
    pub name: String,
    pub target: Decimal,
    pub saved: Decimal,
    pub emoji: String,
}

impl NewGoal {
    pub fn new(
        name: &str,
        target: Decimal,
        saved: Decimal,
        emoji: &str,
    ) -> crate::errors::Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation("goal name must not be empty"));
        }
        if target <= Decimal::ZERO {
            return Err(Error::validation(format!(
                "goal target must be positive, got {}",
                target
            )));
        }
        if saved < Decimal::ZERO || saved > target {
            return Err(Error::validation(format!(
                "saved amount must be between 0 and the target, got {}",
                saved
            )));
        }
        Ok(NewGoal {
            name: name.to_string(),
            target,
            saved,
            emoji: emoji.to_string(),
        })
    }
}

/// One tracked calendar month. Closed months reject manually dated writes;
/// the statement importer may still backfill them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Month {
    pub id: i64,
    pub household: String,
    pub year: i32,
    pub month: u32,
    pub status: MonthStatus,
}

impl Month {
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// A named cash reserve ("hucha"). Its balance never goes below zero;
/// withdrawals larger than the balance drain it instead of failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hucha {
    pub id: i64,
    pub household: String,
    pub name: String,
    pub balance: Decimal,
    pub emoji: String,
}

impl Hucha {
    pub fn deposit(&self, amount: Decimal) -> crate::errors::Result<Decimal> {
        if amount <= Decimal::ZERO {
            return Err(Error::validation(format!(
                "deposit must be positive, got {}",
                amount
            )));
        }
        Ok(self.balance + amount)
    }

    pub fn withdraw(&self, amount: Decimal) -> crate::errors::Result<Decimal> {
        if amount <= Decimal::ZERO {
            return Err(Error::validation(format!(
                "withdrawal must be positive, got {}",
                amount
            )));
        }
        Ok((self.balance - amount).max(Decimal::ZERO))
    }
}

#[derive(Debug, Clone)]
pub struct NewHucha {
    pub name: String,
    pub balance: Decimal,
    pub emoji: String,
}

impl NewHucha {
    pub fn new(name: &str, balance: Decimal, emoji: &str) -> crate::errors::Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation("hucha name must not be empty"));
        }
        if balance < Decimal::ZERO {
            return Err(Error::validation(format!(
                "starting balance must not be negative, got {}",
                balance
            )));
        }
        Ok(NewHucha {
            name: name.to_string(),
            balance,
            emoji: emoji.to_string(),
        })
    }
}

/// An investment holding priced live when quotes are available and at its
/// buy price otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub id: i64,
    pub household: String,
    pub ticker: String,
    pub name: String,
    pub shares: Decimal,
    pub buy_price: Decimal,
}

impl Position {
    pub fn cost(&self) -> Decimal {
        self.shares * self.buy_price
    }

    pub fn value_at(&self, price: Option<Decimal>) -> Decimal {
        self.shares * price.unwrap_or(self.buy_price)
    }
}

#[derive(Debug, Clone)]
pub struct NewPosition {
    pub ticker: String,
    pub name: String,
    pub shares: Decimal,
    pub buy_price: Decimal,
}

impl NewPosition {
    pub fn new(
        ticker: &str,
        name: &str,
        shares: Decimal,
        buy_price: Decimal,
    ) -> crate::errors::Result<Self> {
        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(Error::validation("ticker must not be empty"));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation("position name must not be empty"));
        }
        if shares <= Decimal::ZERO {
            return Err(Error::validation(format!(
                "shares must be positive, got {}",
                shares
            )));
        }
        if buy_price <= Decimal::ZERO {
            return Err(Error::validation(format!(
                "buy price must be positive, got {}",
                buy_price
            )));
        }
        Ok(NewPosition {
            ticker,
            name: name.to_string(),
            shares,
            buy_price,
        })
    }
}

/// A shared ledger. Anyone holding the join code can become a member; the
/// id is derived from the code so invites stay short.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Household {
    pub id: String,
    pub name: String,
    pub code: String,
    pub members: Vec<String>,
}

/// A transaction proposed by the statement importer or the text analyzer,
/// already coerced into the fixed vocabulary but not yet deduplicated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxCandidate {
    #[serde(rename = "type")]
    pub kind: TxKind,
    pub concept: String,
    pub amount: Decimal,
    pub category: Category,
    pub date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn kind_round_trips_through_text() {
        for kind in TxKind::ALL {
            assert_eq!(kind.as_str().parse::<TxKind>().unwrap(), kind);
        }
        assert!("transfer".parse::<TxKind>().is_err());
    }

    #[test]
    fn category_parse_is_accent_and_case_insensitive() {
        assert_eq!("alimentacion".parse::<Category>().unwrap(), Category::Alimentacion);
        assert_eq!("Alimentación".parse::<Category>().unwrap(), Category::Alimentacion);
        assert_eq!("INVERSION".parse::<Category>().unwrap(), Category::Inversion);
        assert!("viajes".parse::<Category>().is_err());
    }

    #[test]
    fn category_storage_form_keeps_accents() {
        assert_eq!(Category::Alimentacion.as_str(), "Alimentación");
        assert_eq!(Category::Inversion.as_str(), "Inversión");
    }

    #[test]
    fn new_transaction_rejects_bad_input() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let err = NewTransaction::new(TxKind::Expense, "  ", dec("5"), Category::Otros, date, None)
            .unwrap_err();
        assert!(err.to_string().contains("concept"));

        let err = NewTransaction::new(TxKind::Expense, "Pan", dec("0"), Category::Otros, date, None)
            .unwrap_err();
        assert!(err.to_string().contains("positive"));

        let ok = NewTransaction::new(
            TxKind::Expense,
            " Pan ",
            dec("1.20"),
            Category::Alimentacion,
            date,
            None,
        )
        .unwrap();
        assert_eq!(ok.concept, "Pan");
    }

    #[test]
    fn goal_contribution_caps_at_target() {
        let goal = Goal {
            id: 1,
            household: "hogar_TEST01".into(),
            name: "Vacaciones".into(),
            target: dec("500"),
            saved: dec("450"),
            emoji: "🎯".into(),
        };
        assert_eq!(goal.contribute(dec("100")).unwrap(), dec("500"));
        assert_eq!(goal.contribute(dec("25")).unwrap(), dec("475"));
        assert!(goal.contribute(dec("-5")).is_err());
    }

    #[test]
    fn hucha_withdrawal_stops_at_zero() {
        let hucha = Hucha {
            id: 1,
            household: "hogar_TEST01".into(),
            name: "Imprevistos".into(),
            balance: dec("30"),
            emoji: "🐷".into(),
        };
        assert_eq!(hucha.withdraw(dec("50")).unwrap(), Decimal::ZERO);
        assert_eq!(hucha.withdraw(dec("10")).unwrap(), dec("20"));
        assert_eq!(hucha.deposit(dec("5")).unwrap(), dec("35"));
        assert!(hucha.deposit(dec("0")).is_err());
    }

    #[test]
    fn position_falls_back_to_buy_price() {
        let pos = Position {
            id: 1,
            household: "hogar_TEST01".into(),
            ticker: "VWCE.DE".into(),
            name: "FTSE All-World".into(),
            shares: dec("10"),
            buy_price: dec("100"),
        };
        assert_eq!(pos.value_at(Some(dec("110"))), dec("1100"));
        assert_eq!(pos.value_at(None), dec("1000"));
    }

    #[test]
    fn new_goal_validates_saved_range() {
        assert!(NewGoal::new("Coche", dec("1000"), dec("-1"), "🚗").is_err());
        assert!(NewGoal::new("Coche", dec("1000"), dec("1001"), "🚗").is_err());
        assert!(NewGoal::new("Coche", dec("1000"), dec("1000"), "🚗").is_ok());
    }
}
