// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;

use super::types::PlannedMilestone;

pub const MILESTONE_PERCENTAGES: [u32; 4] = [25, 50, 75, 100];

fn celebration(percentage: u32) -> &'static str {
    match percentage {
        25 => "First quarter done! Treat yourself to something small and free.",
        50 => "Halfway there! Share the news with someone who keeps you motivated.",
        75 => "Three quarters funded. The finish line is in sight, keep the momentum.",
        100 => "Goal reached! Celebrate the win and pick your next target.",
        _ => "Take a moment to acknowledge your progress.",
    }
}

/// Projected schedule at fixed checkpoints, independent of progress so far.
pub fn plan(target_amount: Decimal, months_to_goal: u32, today: NaiveDate) -> Vec<PlannedMilestone> {
    MILESTONE_PERCENTAGES
        .iter()
        .map(|&percentage| {
            let target_month = months_to_goal.saturating_mul(percentage).div_ceil(100);
            PlannedMilestone {
                percentage,
                amount: target_amount * Decimal::from(percentage) / Decimal::ONE_HUNDRED,
                target_month,
                target_date: today
                    .checked_add_months(Months::new(target_month))
                    .unwrap_or(NaiveDate::MAX),
                celebration: celebration(percentage).to_string(),
            }
        })
        .collect()
}
