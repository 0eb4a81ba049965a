//! Integration tests for financeplay-core
//!
//! These tests exercise the full record → snapshot → insights → coach workflow
//! against a real on-disk database.

use chrono::NaiveDate;
use financeplay_core::{
    ai::{CoachClient, MockBackend},
    build_weekly_report,
    coach::{Coach, CoachRequest, CoachSource, FALLBACK_REPLY},
    db::Database,
    gamification::xp_for_amount,
    models::{
        BudgetCategoryInput, NewDiaryEntry, NewGoal, NewIncome, NewSavingsTransfer,
        NewTransaction, Persona, Priority,
    },
    HealthCategory, InsightKind, Ledger, LedgerAction,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

fn expense(amount: f64, category: &str, date: u32) -> NewTransaction {
    NewTransaction {
        amount,
        category: category.to_string(),
        kind: None,
        description: String::new(),
        date: Some(day(date)),
        account_id: None,
    }
}

fn goal(name: &str, target: f64, current: f64, priority: Priority) -> NewGoal {
    NewGoal {
        name: name.to_string(),
        target_amount: target,
        current_amount: current,
        deadline: Some(day(31)),
        priority,
    }
}

// =============================================================================
// Snapshot Workflow
// =============================================================================

#[test]
fn test_records_to_dashboard() {
    let db = Database::in_memory().expect("Failed to create test database");
    let user = db.create_user("lerato@example.com", Some("Lerato")).unwrap();
    let today = day(14);

    db.insert_transaction(user.id, &expense(-120.0, "food", 12), today).unwrap();
    db.insert_transaction(user.id, &expense(45.0, "transport", 13), today).unwrap();
    db.insert_transaction(user.id, &expense(1800.0, "income", 1), today).unwrap();
    db.insert_goal(user.id, &goal("Laptop", 5000.0, 2400.0, Priority::Low)).unwrap();
    db.insert_goal(user.id, &goal("Fees", 3000.0, 1600.0, Priority::High)).unwrap();

    let records = db.load_user_records(user.id).unwrap();
    let dashboard = Ledger::new(records).dashboard(today);
    let snapshot = &dashboard.snapshot;

    assert_eq!(snapshot.categories.len(), 2);
    assert_eq!(snapshot.categories["food"], 120.0);
    assert_eq!(snapshot.categories["transport"], 45.0);
    assert_eq!(snapshot.totals.spending, 165.0);
    assert_eq!(snapshot.totals.income, 1800.0);

    let names: Vec<_> = snapshot.goals.iter().map(|g| g.goal.name.as_str()).collect();
    assert_eq!(names, ["Fees", "Laptop"]);
    assert_eq!(snapshot.goals[0].percent_complete, 53);
    assert_eq!(snapshot.goals[1].percent_complete, 48);

    assert!(dashboard.health.score <= 100);
    assert_eq!(dashboard.health.category, HealthCategory::Good);

    assert!(!dashboard.insights.is_empty() && dashboard.insights.len() <= 3);
    assert_eq!(dashboard.insights[0].kind, InsightKind::TopSpending);
    assert!(dashboard.insights[0].description.contains("food"));
}

#[test]
fn test_empty_user_gets_defaults() {
    let db = Database::in_memory().unwrap();
    let user = db.create_user("new@example.com", None).unwrap();

    let dashboard = Ledger::new(db.load_user_records(user.id).unwrap()).dashboard(day(14));

    assert_eq!(dashboard.snapshot.totals.spending, 0.0);
    assert!(dashboard.snapshot.categories.is_empty());
    assert_eq!(dashboard.health.score, 50);
    assert_eq!(dashboard.health.category, HealthCategory::Fair);
    assert_eq!(dashboard.insights.len(), 1);
    assert_eq!(dashboard.insights[0].kind, InsightKind::GettingStarted);
    assert_eq!(dashboard.snapshot.gamification.level, 1);
    assert_eq!(dashboard.snapshot.gamification.streak, 0);
}

// =============================================================================
// Ledger Consistency
// =============================================================================

/// Applying the persisted records as actions must match a fresh load
#[test]
fn test_ledger_matches_database() {
    let db = Database::in_memory().unwrap();
    let user = db.create_user("sipho@example.com", None).unwrap();
    let today = day(14);

    let mut ledger = Ledger::new(db.load_user_records(user.id).unwrap());

    let tx = db.insert_transaction(user.id, &expense(-80.0, "food", 14), today).unwrap();
    ledger = ledger.apply(LedgerAction::TransactionAdded(tx));

    let income = db
        .insert_income(
            user.id,
            &NewIncome {
                source: "Tutoring".into(),
                amount: 900.0,
                date: None,
                note: None,
            },
            today,
        )
        .unwrap();
    ledger = ledger.apply(LedgerAction::IncomeAdded(income));

    let transfer = db
        .insert_savings_transfer(
            user.id,
            &NewSavingsTransfer {
                amount: 500.0,
                from: None,
                to: Some("Emergency Fund".into()),
                date: None,
            },
            today,
        )
        .unwrap();
    let xp = xp_for_amount(transfer.amount);
    db.award_xp(user.id, xp).unwrap();
    ledger = ledger.apply_all([
        LedgerAction::SavingsAdded(transfer),
        LedgerAction::XpAwarded(xp),
    ]);

    let saved = db
        .insert_goal(user.id, &goal("Emergency Fund", 2000.0, 0.0, Priority::High))
        .unwrap();
    let updated = db.update_goal_progress(user.id, saved.id, 500.0).unwrap();
    ledger = ledger.apply_all([
        LedgerAction::GoalAdded(saved),
        LedgerAction::GoalProgressUpdated {
            goal_id: updated.id,
            current_amount: updated.current_amount,
        },
    ]);

    let envelopes = db
        .upsert_budget_categories(
            user.id,
            &[BudgetCategoryInput {
                name: "Food".into(),
                limit: Some(100.0),
                icon: None,
            }],
        )
        .unwrap();
    ledger = ledger.apply(LedgerAction::BudgetCategoriesUpserted(envelopes));

    let entry = db
        .insert_diary_entry(
            user.id,
            &NewDiaryEntry {
                title: None,
                body: "Felt good about saving".into(),
                emotion: Some("proud".into()),
                date: None,
            },
            today,
        )
        .unwrap();
    db.set_persona(user.id, Persona::Humorous).unwrap();
    ledger = ledger.apply_all([
        LedgerAction::DiaryEntryAdded(entry),
        LedgerAction::PersonaChanged(Persona::Humorous),
    ]);

    let reloaded = Ledger::new(db.load_user_records(user.id).unwrap());
    assert_eq!(ledger.snapshot(today), reloaded.snapshot(today));
    assert_eq!(reloaded.records().gamification.xp, 120);
    assert_eq!(reloaded.snapshot(today).gamification.streak, 1);
}

// =============================================================================
// Weekly Report & Coach
// =============================================================================

#[test]
fn test_weekly_report_from_database() {
    let db = Database::in_memory().unwrap();
    let user = db.create_user("amahle@example.com", None).unwrap();
    let today = day(14);

    db.insert_transaction(user.id, &expense(-300.0, "food", 13), today).unwrap();
    db.insert_transaction(user.id, &expense(-700.0, "rent", 2), today).unwrap();
    db.upsert_budget_categories(
        user.id,
        &[BudgetCategoryInput {
            name: "food".into(),
            limit: Some(350.0),
            icon: None,
        }],
    )
    .unwrap();

    let snapshot = Ledger::new(db.load_user_records(user.id).unwrap()).snapshot(today);
    let report = build_weekly_report(&snapshot, today);

    assert_eq!(report.title, "You spent R300 and saved R0 this week.");
    assert_eq!(report.sections[1].points, ["food: R300 / R350"]);
    assert!(report.to_text().starts_with(&report.title));
}

#[tokio::test]
async fn test_coach_with_snapshot() {
    let db = Database::in_memory().unwrap();
    let user = db.create_user("zanele@example.com", None).unwrap();
    let today = day(14);
    db.insert_transaction(user.id, &expense(-120.0, "food", 14), today).unwrap();

    let snapshot = Ledger::new(db.load_user_records(user.id).unwrap()).snapshot(today);
    let request = CoachRequest {
        user_prompt: "How do I save more?",
        persona: snapshot.gamification.persona,
        history: &[],
        snapshot: Some(&snapshot),
        today,
    };

    let coach = Coach::with_client(Some(CoachClient::Mock(MockBackend::with_reply("Cook at home.")))).unwrap();
    let prompt = coach.prompt(&request);
    assert!(prompt.contains("food=120.00"));
    assert!(prompt.contains("How do I save more?"));
    assert!(!prompt.contains("undefined"));

    let reply = coach.reply(&request).await;
    assert_eq!(reply.reply, "Cook at home.");
    assert_eq!(reply.source, CoachSource::Mock);

    let failing = Coach::with_client(Some(CoachClient::Mock(MockBackend::unhealthy()))).unwrap();
    let reply = failing.reply(&request).await;
    assert_eq!(reply.reply, FALLBACK_REPLY);
    assert_eq!(reply.source, CoachSource::Fallback);
}
