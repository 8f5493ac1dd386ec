// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

use super::types::{Level, SavingsStrategy, StrategyKind};

/// Capacity-dependent suggestions first, the windfall suggestion always last.
pub fn suggest(capacity: Decimal, required: Decimal, shortfall: Decimal) -> Vec<SavingsStrategy> {
    let mut out = Vec::with_capacity(3);

    if capacity >= required {
        out.push(SavingsStrategy {
            kind: StrategyKind::AutomateTransfers,
            title: "Automate your savings".into(),
            description: format!(
                "Set up an automatic transfer of {:.2} every payday so the goal is funded before you can spend it",
                required
            ),
            amount: Some(required),
            impact: Level::High,
            effort: Level::Low,
        });
    } else {
        out.push(SavingsStrategy {
            kind: StrategyKind::ReduceExpenses,
            title: "Reduce monthly expenses".into(),
            description: format!(
                "Cut {:.2} per month from discretionary spending to close the gap",
                shortfall
            ),
            amount: Some(shortfall),
            impact: Level::High,
            effort: Level::Medium,
        });
        out.push(SavingsStrategy {
            kind: StrategyKind::IncreaseIncome,
            title: "Increase monthly income".into(),
            description: format!(
                "Find {:.2} per month of extra income through freelance work, overtime or a side project",
                shortfall
            ),
            amount: Some(shortfall),
            impact: Level::High,
            effort: Level::High,
        });
    }

    out.push(SavingsStrategy {
        kind: StrategyKind::UseWindfalls,
        title: "Put windfalls to work".into(),
        description:
            "Send tax refunds, bonuses and gifts straight to this goal instead of everyday spending"
                .into(),
        amount: None,
        impact: Level::Medium,
        effort: Level::Low,
    });

    out
}
