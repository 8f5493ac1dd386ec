// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::cents;
use super::types::{Difficulty, FeasibilityAnalysis, FeasibilityStatus};

const DAYS_PER_MONTH: i64 = 30;

/// Score buckets, highest first. A score falls in the first bucket whose
/// lower edge it reaches.
const STATUS_BUCKETS: [(i64, FeasibilityStatus, Difficulty); 5] = [
    (100, FeasibilityStatus::Excellent, Difficulty::Easy),
    (80, FeasibilityStatus::Good, Difficulty::Moderate),
    (60, FeasibilityStatus::Challenging, Difficulty::Moderate),
    (40, FeasibilityStatus::Difficult, Difficulty::Hard),
    (0, FeasibilityStatus::VeryDifficult, Difficulty::VeryHard),
];

/// Whole 30-day months left until `target_date`, never less than one.
pub fn months_to_goal(today: NaiveDate, target_date: NaiveDate) -> u32 {
    let days = (target_date - today).num_days();
    if days <= 0 {
        return 1;
    }
    let months = (days + DAYS_PER_MONTH - 1) / DAYS_PER_MONTH;
    u32::try_from(months).unwrap_or(u32::MAX).max(1)
}

/// Target spread over the months left, in cents and never below one cent.
pub fn required_monthly_saving(target_amount: Decimal, months: u32) -> Decimal {
    cents(target_amount / Decimal::from(months.max(1))).max(Decimal::new(1, 2))
}

/// Capacity over requirement. `required` is positive for any valid goal.
pub fn capacity_ratio(capacity: Decimal, required: Decimal) -> Decimal {
    if required.is_zero() {
        return Decimal::ZERO;
    }
    capacity.checked_div(required).unwrap_or(if capacity.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    })
}

pub fn classify(score: Decimal) -> (FeasibilityStatus, Difficulty) {
    STATUS_BUCKETS
        .iter()
        .find(|(floor, _, _)| score >= Decimal::from(*floor))
        .map(|(_, status, difficulty)| (*status, *difficulty))
        .unwrap_or((FeasibilityStatus::VeryDifficult, Difficulty::VeryHard))
}

pub fn assess(capacity: Decimal, required: Decimal) -> FeasibilityAnalysis {
    let surplus_percentage = cents(
        capacity_ratio(capacity, required).saturating_mul(Decimal::ONE_HUNDRED),
    );
    // classified on the same rounded value that is returned
    let feasibility_score = surplus_percentage.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    let (status, difficulty) = classify(feasibility_score);
    FeasibilityAnalysis {
        feasibility_score,
        status,
        difficulty,
        shortfall: (required - capacity).max(Decimal::ZERO),
        surplus_percentage,
        is_feasible: capacity >= required,
    }
}
