// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::cents;
use super::types::FinancialSnapshot;
use crate::models::{Transaction, TransactionKind};

pub const LOOKBACK_MONTHS: u32 = 3;

/// First day (inclusive) of the lookback window ending at `today`.
pub fn window_start(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_months(Months::new(LOOKBACK_MONTHS))
        .unwrap_or(NaiveDate::MIN)
}

/// Reduce recent history to a typical month.
///
/// Averages are taken over the calendar months that hold at least one
/// transaction, so a user active in one month of three gets that month's
/// full figures rather than a third of them. No history gives zeros.
/// Averages are rounded to cents before capacity is derived from them.
pub fn build_snapshot(
    monthly_salary: Decimal,
    transactions: &[Transaction],
    today: NaiveDate,
) -> FinancialSnapshot {
    let start = window_start(today);

    let mut months: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    let mut category_spending: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut transaction_count = 0usize;

    for t in transactions.iter().filter(|t| t.date >= start) {
        transaction_count += 1;
        let entry = months
            .entry(t.date.format("%Y-%m").to_string())
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        match t.kind {
            TransactionKind::Income => entry.0 = entry.0.saturating_add(t.amount),
            TransactionKind::Expense => {
                entry.1 = entry.1.saturating_add(t.amount);
                let spent = category_spending
                    .entry(t.category.clone())
                    .or_insert(Decimal::ZERO);
                *spent = spent.saturating_add(t.amount);
            }
        }
    }

    let (avg_monthly_income, avg_monthly_expenses) = if months.is_empty() {
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        let n = Decimal::from(months.len());
        let (inc, exp) = months
            .values()
            .fold((Decimal::ZERO, Decimal::ZERO), |acc, (i, e)| {
                (acc.0.saturating_add(*i), acc.1.saturating_add(*e))
            });
        (cents(inc / n), cents(exp / n))
    };

    let monthly_income = monthly_salary.saturating_add(avg_monthly_income);
    FinancialSnapshot {
        monthly_salary,
        avg_monthly_income,
        avg_monthly_expenses,
        monthly_income,
        monthly_expenses: avg_monthly_expenses,
        current_savings_capacity: monthly_income.saturating_sub(avg_monthly_expenses),
        category_spending,
        transaction_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn tx(date: &str, kind: TransactionKind, amount: &str, category: &str) -> Transaction {
        Transaction {
            id: 0,
            user_id: 1,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            kind,
            amount: d(amount),
            category: category.to_string(),
            note: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn empty_history_is_all_zero() {
        let s = build_snapshot(d("2500"), &[], today());
        assert!(s.avg_monthly_income.is_zero());
        assert!(s.avg_monthly_expenses.is_zero());
        assert_eq!(s.transaction_count, 0);
        assert_eq!(s.monthly_income, d("2500"));
        assert_eq!(s.current_savings_capacity, d("2500"));
    }

    #[test]
    fn averages_skip_empty_months() {
        let txs = vec![
            tx("2025-06-01", TransactionKind::Income, "600", "Freelance"),
            tx("2025-06-03", TransactionKind::Expense, "300", "Food"),
            tx("2025-06-10", TransactionKind::Expense, "150", "Food"),
        ];
        let s = build_snapshot(Decimal::ZERO, &txs, today());
        assert_eq!(s.avg_monthly_income, d("600"));
        assert_eq!(s.avg_monthly_expenses, d("450"));
        assert_eq!(s.category_spending.get("Food"), Some(&d("450")));
    }

    #[test]
    fn averages_across_active_months() {
        let txs = vec![
            tx("2025-06-02", TransactionKind::Expense, "400", "Rent"),
            tx("2025-05-02", TransactionKind::Expense, "200", "Rent"),
            tx("2025-05-20", TransactionKind::Income, "1000", "Bonus"),
        ];
        let s = build_snapshot(d("3000"), &txs, today());
        assert_eq!(s.avg_monthly_income, d("500"));
        assert_eq!(s.avg_monthly_expenses, d("300"));
        assert_eq!(s.monthly_income, d("3500"));
        assert_eq!(s.current_savings_capacity, d("3200"));
    }

    #[test]
    fn averages_are_in_cents_and_capacity_adds_up() {
        let txs = vec![
            tx("2025-06-01", TransactionKind::Expense, "100", "Food"),
            tx("2025-05-01", TransactionKind::Expense, "100", "Food"),
            tx("2025-04-01", TransactionKind::Expense, "100.01", "Food"),
        ];
        let s = build_snapshot(d("1000"), &txs, today());
        assert_eq!(s.avg_monthly_expenses, d("100"));
        assert_eq!(
            s.current_savings_capacity,
            s.monthly_income - s.monthly_expenses
        );
    }

    #[test]
    fn ignores_transactions_before_window() {
        let txs = vec![
            tx("2025-03-15", TransactionKind::Expense, "50", "Food"),
            tx("2025-03-14", TransactionKind::Expense, "9999", "Food"),
        ];
        let s = build_snapshot(Decimal::ZERO, &txs, today());
        assert_eq!(s.transaction_count, 1);
        assert_eq!(s.avg_monthly_expenses, d("50"));
    }
}
