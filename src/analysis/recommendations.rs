// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::cents;
use super::snapshot::LOOKBACK_MONTHS;
use super::types::{BudgetRecommendation, Level};

const CANDIDATE_CATEGORIES: usize = 5;
const MAX_RECOMMENDATIONS: usize = 3;

struct ReductionRule {
    percentage: u32,
    rationale: &'static str,
}

const REDUCTION_RULES: &[(&str, ReductionRule)] = &[
    (
        "food",
        ReductionRule {
            percentage: 20,
            rationale: "Cook at home more often and meal-prep for the week",
        },
    ),
    (
        "dining",
        ReductionRule {
            percentage: 20,
            rationale: "Cook at home more often and meal-prep for the week",
        },
    ),
    (
        "entertainment",
        ReductionRule {
            percentage: 30,
            rationale: "Look for free activities and cancel subscriptions you rarely use",
        },
    ),
    (
        "shopping",
        ReductionRule {
            percentage: 40,
            rationale: "Apply a 24-hour rule before purchases and separate needs from wants",
        },
    ),
    (
        "transportation",
        ReductionRule {
            percentage: 15,
            rationale: "Use public transit or carpool where you can",
        },
    ),
];

const DEFAULT_RULE: ReductionRule = ReductionRule {
    percentage: 10,
    rationale: "Shop around for cheaper alternatives and negotiate recurring bills",
};

fn rule_for(category: &str) -> &'static ReductionRule {
    let key = category.trim().to_lowercase();
    REDUCTION_RULES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, rule)| rule)
        .unwrap_or(&DEFAULT_RULE)
}

/// Category cuts sized against the monthly requirement.
///
/// Considers the five biggest spending categories, drops cuts of 5 or less,
/// and keeps the first three survivors in spend order.
pub fn recommend(
    category_spending: &BTreeMap<String, Decimal>,
    required: Decimal,
) -> Vec<BudgetRecommendation> {
    let mut ranked: Vec<(&String, &Decimal)> = category_spending.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let min_cut = Decimal::from(5);
    let high_priority_floor = required * Decimal::new(3, 1);
    let lookback = Decimal::from(LOOKBACK_MONTHS);

    ranked
        .into_iter()
        .take(CANDIDATE_CATEGORIES)
        .filter_map(|(category, total)| {
            let monthly = cents(*total / lookback);
            let rule = rule_for(category);
            // the cut is tested in the cents it is reported in
            let reduction_target =
                cents(monthly * Decimal::from(rule.percentage) / Decimal::ONE_HUNDRED);
            if reduction_target <= min_cut {
                return None;
            }
            let priority = if reduction_target >= high_priority_floor {
                Level::High
            } else {
                Level::Medium
            };
            Some(BudgetRecommendation {
                category: category.clone(),
                current_monthly_spend: monthly,
                reduction_percentage: rule.percentage,
                reduction_target,
                suggested_budget: monthly - reduction_target,
                priority,
                rationale: rule.rationale.to_string(),
            })
        })
        .take(MAX_RECOMMENDATIONS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn spending(items: &[(&str, &str)]) -> BTreeMap<String, Decimal> {
        items.iter().map(|(c, a)| (c.to_string(), d(a))).collect()
    }

    #[test]
    fn lookup_is_case_insensitive_with_default() {
        assert_eq!(rule_for("SHOPPING").percentage, 40);
        assert_eq!(rule_for(" Dining ").percentage, 20);
        assert_eq!(rule_for("Food").percentage, 20);
        assert_eq!(rule_for("Transportation").percentage, 15);
        assert_eq!(rule_for("Utilities").percentage, 10);
    }

    #[test]
    fn small_cuts_are_dropped() {
        // 45 / 3 = 15 a month, 10% of that is 1.5
        let recs = recommend(&spending(&[("Utilities", "45")]), d("100"));
        assert!(recs.is_empty());
    }

    #[test]
    fn cut_rounding_to_five_is_dropped() {
        // 150.03 / 3 = 50.01 a month, 10% is 5.001 which reports as 5.00
        let recs = recommend(&spending(&[("Utilities", "150.03")]), d("100"));
        assert!(recs.is_empty());

        // 150.18 / 3 = 50.06, 10% is 5.006 which reports as 5.01
        let recs = recommend(&spending(&[("Utilities", "150.18")]), d("100"));
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].reduction_target, d("5.01"));
        assert_eq!(recs[0].suggested_budget, d("45.05"));
    }

    #[test]
    fn keeps_spend_order_and_caps_at_three() {
        let recs = recommend(
            &spending(&[
                ("Rent", "4500"),
                ("Shopping", "900"),
                ("Food", "1200"),
                ("Entertainment", "600"),
                ("Transportation", "300"),
                ("Gifts", "3000"),
            ]),
            d("500"),
        );
        let cats: Vec<_> = recs.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(cats, vec!["Rent", "Gifts", "Food"]);
        assert_eq!(recs[0].current_monthly_spend, d("1500"));
        assert_eq!(recs[0].reduction_target, d("150"));
        assert_eq!(recs[0].priority, Level::High);
        assert_eq!(recs[2].reduction_target, d("80"));
        assert_eq!(recs[2].suggested_budget, d("320"));
        assert_eq!(recs[2].priority, Level::Medium);
    }

    #[test]
    fn only_top_five_are_considered() {
        // Six categories; the smallest has the biggest percentage but is outside the top five.
        let recs = recommend(
            &spending(&[
                ("A", "100"),
                ("B", "100"),
                ("C", "100"),
                ("D", "100"),
                ("E", "100"),
                ("Shopping", "90"),
            ]),
            d("100"),
        );
        assert!(recs.is_empty());
    }
}
