// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

use super::cents;
use super::feasibility::capacity_ratio;
use super::types::{Level, RiskAssessment, RiskFactor, RiskKind};

const SHORT_TIMELINE_MONTHS: u32 = 6;
const SUCCESS_SCALE: i64 = 70;
const SUCCESS_FLOOR: i64 = 30;
const SUCCESS_CEILING: i64 = 95;

pub fn assess(capacity: Decimal, required: Decimal, months_to_goal: u32) -> RiskAssessment {
    let overall_risk = if capacity < required {
        Level::High
    } else {
        Level::Low
    };

    let mut risks = Vec::new();
    if months_to_goal <= SHORT_TIMELINE_MONTHS {
        risks.push(RiskFactor {
            kind: RiskKind::TimelineRisk,
            level: Level::Medium,
            description: format!(
                "Only {} month(s) left leaves little room to recover from a bad month",
                months_to_goal
            ),
            mitigation: "Consider moving the target date out or front-loading contributions"
                .into(),
        });
    }
    if required > capacity.saturating_mul(Decimal::new(15, 1)) {
        risks.push(RiskFactor {
            kind: RiskKind::IncomeRisk,
            level: Level::High,
            description:
                "The required monthly saving is well beyond what your current income supports"
                    .into(),
            mitigation: "Grow your income or scale the target down to a reachable amount".into(),
        });
    }
    risks.push(RiskFactor {
        kind: RiskKind::EmergencyRisk,
        level: Level::Low,
        description: "An unexpected expense could force you to dip into this goal".into(),
        mitigation: "Keep a separate emergency fund of three to six months of expenses".into(),
    });

    // Same ratio as the feasibility score, on a 70 scale inside [30, 95].
    let success_probability =
        cents(capacity_ratio(capacity, required).saturating_mul(Decimal::from(SUCCESS_SCALE)))
            .clamp(Decimal::from(SUCCESS_FLOOR), Decimal::from(SUCCESS_CEILING));

    RiskAssessment {
        overall_risk,
        risks,
        success_probability,
    }
}
