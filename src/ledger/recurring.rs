// Copyright (c) 2025 Hogar contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;

use crate::errors::Result;
use crate::ledger::aggregate::in_period;
use crate::models::{NewTransaction, RecurringTemplate, Transaction};

/// Templates not yet applied in the given month. A template counts as
/// applied when any transaction in that month carries its id, so applying
/// twice is a no-op even though nothing is locked anywhere.
pub fn pending_templates<'a>(
    templates: &'a [RecurringTemplate],
    transactions: &[Transaction],
    year: i32,
    month: u32,
) -> Vec<&'a RecurringTemplate> {
    templates
        .iter()
        .filter(|t| {
            !transactions
                .iter()
                .any(|tx| tx.recurring_id == Some(t.id) && in_period(tx.date, year, month))
        })
        .collect()
}

/// Turn a template into the transaction that marks it applied. Dated
/// today, so applying mid-month lands in the current month.
pub fn materialize(template: &RecurringTemplate, today: NaiveDate) -> Result<NewTransaction> {
    NewTransaction::new(
        template.kind,
        &template.concept,
        template.amount,
        template.category,
        today,
        Some(template.id),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, TxKind};
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn template(id: i64, concept: &str) -> RecurringTemplate {
        RecurringTemplate {
            id,
            household: "hogar_TEST01".into(),
            kind: TxKind::Expense,
            concept: concept.into(),
            amount: dec("9.99"),
            category: Category::Suscripciones,
        }
    }

    fn applied(recurring_id: i64, y: i32, m: u32) -> Transaction {
        Transaction {
            id: 77,
            household: "hogar_TEST01".into(),
            kind: TxKind::Expense,
            concept: "Netflix".into(),
            amount: dec("9.99"),
            category: Category::Suscripciones,
            date: NaiveDate::from_ymd_opt(y, m, 3).unwrap(),
            recurring_id: Some(recurring_id),
        }
    }

    #[test]
    fn applied_template_is_not_pending() {
        let templates = vec![template(1, "Netflix"), template(2, "Gimnasio")];
        let txs = vec![applied(1, 2024, 3)];
        let pending = pending_templates(&templates, &txs, 2024, 3);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, 2);
    }

    #[test]
    fn last_months_application_does_not_count() {
        let templates = vec![template(1, "Netflix")];
        let txs = vec![applied(1, 2024, 2)];
        assert_eq!(pending_templates(&templates, &txs, 2024, 3).len(), 1);
    }

    #[test]
    fn unrelated_transactions_do_not_count() {
        let templates = vec![template(1, "Netflix")];
        let mut manual = applied(1, 2024, 3);
        manual.recurring_id = None;
        assert_eq!(pending_templates(&templates, &[manual], 2024, 3).len(), 1);
    }

    #[test]
    fn materialize_stamps_template_id_and_today() {
        let t = template(4, "Netflix");
        let today = NaiveDate::from_ymd_opt(2024, 3, 18).unwrap();
        let tx = materialize(&t, today).unwrap();
        assert_eq!(tx.recurring_id, Some(4));
        assert_eq!(tx.date, today);
        assert_eq!(tx.amount, dec("9.99"));
        assert_eq!(tx.kind, TxKind::Expense);
    }

    #[test]
    fn materialize_then_pending_is_stable() {
        let templates = vec![template(1, "Netflix")];
        let today = NaiveDate::from_ymd_opt(2024, 3, 18).unwrap();
        let mut txs: Vec<Transaction> = Vec::new();

        let first = pending_templates(&templates, &txs, 2024, 3);
        assert_eq!(first.len(), 1);
        let new_tx = materialize(first[0], today).unwrap();
        txs.push(Transaction {
            id: 1,
            household: "hogar_TEST01".into(),
            kind: new_tx.kind,
            concept: new_tx.concept.clone(),
            amount: new_tx.amount,
            category: new_tx.category,
            date: new_tx.date,
            recurring_id: new_tx.recurring_id,
        });

        assert!(pending_templates(&templates, &txs, 2024, 3).is_empty());
    }
}
