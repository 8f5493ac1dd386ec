// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Goal analysis engine.
//!
//! Turns a goal, the owner's salary and their recent transactions into a
//! [`GoalAnalysis`]: required saving rate, feasibility score, strategies,
//! category cuts, a milestone schedule and a risk assessment.
//!
//! The engine is pure. It reads "today" from the supplied [`Clock`], holds no
//! state between calls and never caches; callers fetch fresh records and
//! recompute on every request.
//!
//! ```rust,ignore
//! let goal = store::get_goal(&conn, goal_id)?;
//! let user = store::get_user(&conn, goal.user_id)?;
//! let txs = store::recent_transactions(&conn, user.id, analysis::HISTORY_LIMIT)?;
//! let report = analysis::analyze_goal(&user, &goal, &txs, &SystemClock)?;
//! ```

pub mod feasibility;
pub mod milestones;
pub mod recommendations;
pub mod risk;
pub mod snapshot;
pub mod strategy;
pub mod types;

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::models::{Goal, MAX_AMOUNT, Transaction, User};

pub use types::{
    BudgetRecommendation, Difficulty, FeasibilityAnalysis, FeasibilityStatus, FinancialSnapshot,
    GoalAnalysis, GoalSummary, Level, PlannedMilestone, RiskAssessment, RiskFactor, RiskKind,
    SavingsStrategy, StrategyKind,
};

/// Most recent transactions handed to the engine per analysis.
pub const HISTORY_LIMIT: usize = 100;

pub fn analyze_goal(
    user: &User,
    goal: &Goal,
    transactions: &[Transaction],
    clock: &dyn Clock,
) -> Result<GoalAnalysis> {
    if goal.target_amount <= Decimal::ZERO {
        return Err(Error::InvalidGoal(format!(
            "goal {} has non-positive target amount {}",
            goal.id, goal.target_amount
        )));
    }

    check_amount("target amount", goal.target_amount)?;
    check_amount("current amount", goal.current_amount)?;
    check_amount("monthly salary", user.monthly_salary)?;
    for t in transactions {
        check_amount("transaction amount", t.amount)?;
    }

    let today = clock.today();
    let months = feasibility::months_to_goal(today, goal.target_date);
    let required = feasibility::required_monthly_saving(goal.target_amount, months);

    let snapshot = snapshot::build_snapshot(user.monthly_salary, transactions, today);
    let capacity = snapshot.current_savings_capacity;

    let feasibility = feasibility::assess(capacity, required);
    let savings_strategy = strategy::suggest(capacity, required, feasibility.shortfall);
    let budget_recommendations =
        recommendations::recommend(&snapshot.category_spending, required);
    let milestones_plan = milestones::plan(goal.target_amount, months, today);
    let risk_assessment = risk::assess(capacity, required, months);

    debug!(
        goal_id = goal.id,
        months,
        %required,
        %capacity,
        score = %feasibility.feasibility_score,
        "goal analysed"
    );

    let goal_summary = GoalSummary {
        goal_id: goal.id,
        name: goal.name.clone(),
        target_amount: goal.target_amount,
        current_amount: goal.current_amount,
        remaining_amount: (goal.target_amount - goal.current_amount).max(Decimal::ZERO),
        progress_percentage: cents(
            feasibility::capacity_ratio(goal.current_amount, goal.target_amount)
                .saturating_mul(Decimal::ONE_HUNDRED),
        ),
        target_date: goal.target_date,
        months_to_goal: months,
        required_monthly_saving: required,
        monthly_contribution: goal.monthly_contribution,
    };

    Ok(GoalAnalysis {
        goal_summary,
        financial_snapshot: snapshot,
        feasibility_analysis: feasibility,
        savings_strategy,
        budget_recommendations,
        milestones_plan,
        risk_assessment,
    })
}

/// Round to cents, midpoint away from zero.
///
/// Every stage rounds its inputs once and compares and derives from the
/// rounded values, so thresholds and identities hold on the returned record.
pub fn cents(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn check_amount(what: &str, amount: Decimal) -> Result<()> {
    if amount.abs() > MAX_AMOUNT {
        return Err(Error::InvalidData(format!(
            "{} {} is beyond the supported maximum of {}",
            what, amount, MAX_AMOUNT
        )));
    }
    Ok(())
}
