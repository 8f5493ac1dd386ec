// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Duration, NaiveDate};
use nestegg::analysis::{
    FeasibilityStatus, Level, RiskKind, StrategyKind, analyze_goal,
};
use nestegg::clock::FixedClock;
use nestegg::error::Error;
use nestegg::models::{Goal, GoalStatus, Transaction, TransactionKind, User};
use rust_decimal::Decimal;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

fn user(salary: &str) -> User {
    User {
        id: 1,
        name: "ana".into(),
        monthly_salary: d(salary),
    }
}

fn goal(target: &str, days_out: i64) -> Goal {
    Goal {
        id: 7,
        user_id: 1,
        name: "Emergency fund".into(),
        target_amount: d(target),
        current_amount: Decimal::ZERO,
        target_date: today() + Duration::days(days_out),
        monthly_contribution: Decimal::ZERO,
        status: GoalStatus::Active,
        created_on: today(),
        milestones: Vec::new(),
    }
}

fn expense(date: &str, amount: &str, category: &str) -> Transaction {
    Transaction {
        id: 0,
        user_id: 1,
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        kind: TransactionKind::Expense,
        amount: d(amount),
        category: category.into(),
        note: None,
    }
}

#[test]
fn scenario_capacity_matches_requirement() {
    let txs = vec![expense("2025-06-01", "3000", "Rent")];
    let a = analyze_goal(&user("4000"), &goal("12000", 360), &txs, &FixedClock(today())).unwrap();

    assert_eq!(a.goal_summary.months_to_goal, 12);
    assert_eq!(a.goal_summary.required_monthly_saving, d("1000"));
    assert_eq!(a.financial_snapshot.monthly_income, d("4000"));
    assert_eq!(a.financial_snapshot.monthly_expenses, d("3000"));
    assert_eq!(a.financial_snapshot.current_savings_capacity, d("1000"));
    assert_eq!(a.feasibility_analysis.feasibility_score, d("100"));
    assert_eq!(a.feasibility_analysis.status, FeasibilityStatus::Excellent);
    assert!(a.feasibility_analysis.shortfall.is_zero());

    let kinds: Vec<_> = a.savings_strategy.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![StrategyKind::AutomateTransfers, StrategyKind::UseWindfalls]
    );
    assert_eq!(a.risk_assessment.overall_risk, Level::Low);
    assert_eq!(a.risk_assessment.success_probability, d("70"));
}

#[test]
fn scenario_overspending_shows_shortfall() {
    let txs = vec![expense("2025-06-01", "3800", "Rent")];
    let a = analyze_goal(&user("4000"), &goal("12000", 360), &txs, &FixedClock(today())).unwrap();

    assert_eq!(a.financial_snapshot.current_savings_capacity, d("200"));
    assert_eq!(a.feasibility_analysis.feasibility_score, d("20"));
    assert_eq!(a.feasibility_analysis.status, FeasibilityStatus::VeryDifficult);
    assert_eq!(a.feasibility_analysis.shortfall, d("800"));

    let s = &a.savings_strategy;
    assert_eq!(s.len(), 3);
    assert_eq!(s[0].kind, StrategyKind::ReduceExpenses);
    assert_eq!(s[0].amount, Some(d("800")));
    assert_eq!(s[1].kind, StrategyKind::IncreaseIncome);
    assert_eq!(s[1].amount, Some(d("800")));
    assert_eq!(s[2].kind, StrategyKind::UseWindfalls);

    assert_eq!(a.risk_assessment.overall_risk, Level::High);
    let risks: Vec<_> = a.risk_assessment.risks.iter().map(|r| r.kind).collect();
    assert_eq!(risks, vec![RiskKind::IncomeRisk, RiskKind::EmergencyRisk]);
}

#[test]
fn scenario_no_history_no_salary() {
    let a = analyze_goal(&user("0"), &goal("12000", 360), &[], &FixedClock(today())).unwrap();

    assert!(a.financial_snapshot.monthly_income.is_zero());
    assert!(a.financial_snapshot.avg_monthly_expenses.is_zero());
    assert!(a.financial_snapshot.current_savings_capacity <= Decimal::ZERO);
    assert!(a.feasibility_analysis.feasibility_score.is_zero());
    assert_eq!(a.risk_assessment.overall_risk, Level::High);
    assert_eq!(a.risk_assessment.success_probability, d("30"));
    assert!(
        a.risk_assessment
            .risks
            .iter()
            .any(|r| r.kind == RiskKind::EmergencyRisk)
    );
    assert!(a.budget_recommendations.is_empty());
}

#[test]
fn score_and_probability_stay_in_their_bands() {
    let cases = [("0", "5000"), ("2000", "1900"), ("9000", "100"), ("3000", "3000")];
    for (salary, spend) in cases {
        let txs = vec![expense("2025-06-02", spend, "Misc")];
        let a = analyze_goal(&user(salary), &goal("6000", 200), &txs, &FixedClock(today())).unwrap();
        let score = a.feasibility_analysis.feasibility_score;
        let prob = a.risk_assessment.success_probability;
        assert!(score >= Decimal::ZERO && score <= d("100"), "score {}", score);
        assert!(prob >= d("30") && prob <= d("95"), "prob {}", prob);
        assert!(a.feasibility_analysis.shortfall >= Decimal::ZERO);
        assert_ne!(score, prob);
    }
}

#[test]
fn milestone_plan_is_fixed_and_exact() {
    let a = analyze_goal(&user("5000"), &goal("1000.10", 360), &[], &FixedClock(today())).unwrap();
    let plan = &a.milestones_plan;
    assert_eq!(plan.len(), 4);
    let pct: Vec<u32> = plan.iter().map(|m| m.percentage).collect();
    assert_eq!(pct, vec![25, 50, 75, 100]);
    assert_eq!(plan[0].amount, d("250.025"));
    assert_eq!(plan[3].amount, d("1000.10"));
    assert_eq!(plan[0].target_date, NaiveDate::from_ymd_opt(2025, 9, 15).unwrap());
    assert_eq!(plan[3].target_date, NaiveDate::from_ymd_opt(2026, 6, 15).unwrap());
}

#[test]
fn recommendations_are_bounded_and_from_top_spenders() {
    let txs = vec![
        expense("2025-06-01", "1800", "Rent"),
        expense("2025-06-02", "900", "Shopping"),
        expense("2025-05-03", "600", "Food"),
        expense("2025-05-04", "450", "Entertainment"),
        expense("2025-04-05", "300", "Transportation"),
        expense("2025-04-06", "30", "Books"),
    ];
    let a = analyze_goal(&user("4000"), &goal("6000", 360), &txs, &FixedClock(today())).unwrap();
    let recs = &a.budget_recommendations;
    assert!(recs.len() <= 3);
    assert!(recs.iter().all(|r| r.reduction_target > d("5")));
    assert!(recs.iter().all(|r| r.category != "Books"));
    let cats: Vec<_> = recs.iter().map(|r| r.category.as_str()).collect();
    assert_eq!(cats, vec!["Rent", "Shopping", "Food"]);
    // 900 / 3 * 40%
    assert_eq!(recs[1].reduction_target, d("120"));
    // required 500, high priority from 150 up
    assert_eq!(recs[1].priority, Level::Medium);
}

#[test]
fn short_timeline_is_flagged() {
    let a = analyze_goal(&user("9000"), &goal("1000", 90), &[], &FixedClock(today())).unwrap();
    assert_eq!(a.goal_summary.months_to_goal, 3);
    assert_eq!(a.risk_assessment.risks[0].kind, RiskKind::TimelineRisk);
    assert_eq!(a.risk_assessment.success_probability, d("95"));
}

#[test]
fn past_target_date_counts_as_one_month() {
    let a = analyze_goal(&user("100"), &goal("1200", -30), &[], &FixedClock(today())).unwrap();
    assert_eq!(a.goal_summary.months_to_goal, 1);
    assert_eq!(a.goal_summary.required_monthly_saving, d("1200"));
}

#[test]
fn non_positive_target_is_rejected() {
    let err = analyze_goal(&user("100"), &goal("0", 100), &[], &FixedClock(today())).unwrap_err();
    assert!(matches!(err, Error::InvalidGoal(_)));
}

#[test]
fn analysis_serialises_with_camel_case_sections() {
    let a = analyze_goal(&user("4000"), &goal("12000", 360), &[], &FixedClock(today())).unwrap();
    let v = serde_json::to_value(&a).unwrap();
    for key in [
        "goalSummary",
        "financialSnapshot",
        "feasibilityAnalysis",
        "savingsStrategy",
        "budgetRecommendations",
        "milestonesPlan",
        "riskAssessment",
    ] {
        assert!(v.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(v["feasibilityAnalysis"]["status"], "excellent");
    assert_eq!(v["savingsStrategy"][0]["kind"], "automate_transfers");
    assert_eq!(v["riskAssessment"]["risks"][0]["kind"], "emergency_risk");
}

#[test]
fn reported_cuts_stay_above_five_after_rounding() {
    // 150.03 / 3 = 50.01 a month; 10% is 5.001, which would show as 5.00
    let txs = vec![expense("2025-06-01", "150.03", "Utilities")];
    let a = analyze_goal(&user("4000"), &goal("12000", 360), &txs, &FixedClock(today())).unwrap();
    assert!(a.budget_recommendations.is_empty());
    assert!(
        a.budget_recommendations
            .iter()
            .all(|r| r.reduction_target > d("5"))
    );
}

#[test]
fn status_agrees_with_reported_score() {
    // capacity 999.96 against 1000 required scores 99.996, shown as 100.00
    let txs = vec![expense("2025-06-01", "3000.04", "Rent")];
    let a = analyze_goal(&user("4000"), &goal("12000", 360), &txs, &FixedClock(today())).unwrap();
    let fe = &a.feasibility_analysis;
    assert_eq!(fe.feasibility_score, d("100"));
    assert_eq!(fe.status, FeasibilityStatus::Excellent);
    assert_eq!(
        (fe.status, fe.difficulty),
        nestegg::analysis::feasibility::classify(fe.feasibility_score)
    );
}

#[test]
fn shortfall_matches_reported_figures() {
    // 1000 over 3 months against a salary with a half-cent
    let a = analyze_goal(&user("100.005"), &goal("1000", 90), &[], &FixedClock(today())).unwrap();
    let required = a.goal_summary.required_monthly_saving;
    let capacity = a.financial_snapshot.current_savings_capacity;
    assert_eq!(required, d("333.33"));
    assert_eq!(
        a.feasibility_analysis.shortfall,
        (required - capacity).max(Decimal::ZERO)
    );
    assert_eq!(a.savings_strategy[0].amount, Some(a.feasibility_analysis.shortfall));
    assert_eq!(
        capacity,
        a.financial_snapshot.monthly_income - a.financial_snapshot.monthly_expenses
    );
}

#[test]
fn oversized_amounts_are_rejected() {
    let txs = vec![expense("2025-06-01", "79228162514264337593543950335", "Rent")];
    let err = analyze_goal(&user("4000"), &goal("12000", 360), &txs, &FixedClock(today()))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)));
}
