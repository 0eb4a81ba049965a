//! Database tests

use super::*;
use crate::error::Error;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn setup() -> (Database, i64) {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("thandi@example.com", Some("Thandi")).unwrap();
        (db, user.id)
    }

    #[test]
    fn test_in_memory_db() {
        let db = Database::in_memory().unwrap();
        assert!(db.list_users().unwrap().is_empty());
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let db = Database::in_memory().unwrap();
        db.run_migrations().unwrap();
        db.run_migrations().unwrap();

        let conn = db.conn().unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN \
                 ('users', 'transactions', 'incomes', 'savings_transfers', 'goals', \
                  'bursaries', 'budget_categories', 'diary_entries', 'gamification')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 9);
    }

    #[test]
    fn test_user_crud() {
        let (db, id) = setup();

        let user = db.get_user(id).unwrap().unwrap();
        assert_eq!(user.email, "thandi@example.com");
        assert_eq!(user.name.as_deref(), Some("Thandi"));

        // Lookup ignores case
        let found = db.get_user_by_email("THANDI@example.com").unwrap().unwrap();
        assert_eq!(found.id, id);

        let same = db.get_or_create_user("thandi@example.com", None).unwrap();
        assert_eq!(same.id, id);
        assert_eq!(db.list_users().unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_and_invalid_email() {
        let (db, _) = setup();
        assert!(matches!(
            db.create_user("Thandi@Example.com", None),
            Err(Error::Conflict(_))
        ));
        assert!(matches!(db.create_user("nope", None), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_transactions_default_date_and_order() {
        let (db, user_id) = setup();

        let first = db
            .insert_transaction(
                user_id,
                &NewTransaction {
                    amount: -120.0,
                    category: " food ".into(),
                    kind: None,
                    description: "groceries".into(),
                    date: Some(day(3)),
                    account_id: None,
                },
                day(10),
            )
            .unwrap();
        assert_eq!(first.category, "food");

        let second = db
            .insert_transaction(
                user_id,
                &NewTransaction {
                    amount: 45.0,
                    category: "transport".into(),
                    kind: Some(TransactionKind::Expense),
                    description: String::new(),
                    date: None,
                    account_id: Some("cheque".into()),
                },
                day(10),
            )
            .unwrap();
        assert_eq!(second.date, day(10));

        let listed = db.list_transactions(user_id, None).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[0].kind, Some(TransactionKind::Expense));
        assert_eq!(listed[1].kind, None);
        assert_eq!(db.list_transactions(user_id, Some(1)).unwrap().len(), 1);
    }

    #[test]
    fn test_transaction_requires_category() {
        let (db, user_id) = setup();
        let result = db.insert_transaction(
            user_id,
            &NewTransaction {
                amount: 10.0,
                category: "  ".into(),
                kind: None,
                description: String::new(),
                date: None,
                account_id: None,
            },
            day(1),
        );
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_income_and_savings_ledgers() {
        let (db, user_id) = setup();

        db.insert_income(
            user_id,
            &NewIncome {
                source: "Part-time job".into(),
                amount: 1800.0,
                date: Some(day(1)),
                note: None,
            },
            day(10),
        )
        .unwrap();
        let transfer = db
            .insert_savings_transfer(
                user_id,
                &NewSavingsTransfer {
                    amount: 200.0,
                    from: Some("cheque".into()),
                    to: Some("Emergency Fund".into()),
                    date: None,
                },
                day(10),
            )
            .unwrap();
        assert_eq!(transfer.date, day(10));

        assert_eq!(db.list_incomes(user_id).unwrap()[0].amount, 1800.0);
        assert_eq!(
            db.list_savings_transfers(user_id).unwrap()[0].to.as_deref(),
            Some("Emergency Fund")
        );

        let zero = db.insert_savings_transfer(
            user_id,
            &NewSavingsTransfer {
                amount: 0.0,
                from: None,
                to: None,
                date: None,
            },
            day(10),
        );
        assert!(matches!(zero, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_goal_lifecycle() {
        let (db, user_id) = setup();

        let goal = db
            .insert_goal(
                user_id,
                &NewGoal {
                    name: "Laptop".into(),
                    target_amount: 8000.0,
                    current_amount: 500.0,
                    deadline: Some(day(30)),
                    priority: Priority::High,
                },
            )
            .unwrap();

        let updated = db.update_goal_progress(user_id, goal.id, 9000.0).unwrap();
        assert_eq!(updated.current_amount, 9000.0);
        assert_eq!(updated.deadline, Some(day(30)));
        assert_eq!(updated.priority, Priority::High);

        assert!(matches!(
            db.update_goal_progress(user_id, 999, 1.0),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            db.update_goal_progress(user_id, goal.id, -5.0),
            Err(Error::InvalidData(_))
        ));

        db.delete_goal(user_id, goal.id).unwrap();
        assert!(db.list_goals(user_id).unwrap().is_empty());
        assert!(matches!(db.delete_goal(user_id, goal.id), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_goal_validation() {
        let (db, user_id) = setup();
        let bad = NewGoal {
            name: "Trip".into(),
            target_amount: 0.0,
            current_amount: 0.0,
            deadline: None,
            priority: Priority::Medium,
        };
        assert!(matches!(db.insert_goal(user_id, &bad), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_goals_are_scoped_to_user() {
        let (db, user_id) = setup();
        let other = db.create_user("sipho@example.com", None).unwrap();
        let goal = db
            .insert_goal(
                user_id,
                &NewGoal {
                    name: "Bike".into(),
                    target_amount: 3000.0,
                    current_amount: 0.0,
                    deadline: None,
                    priority: Priority::Low,
                },
            )
            .unwrap();

        assert!(db.get_goal(other.id, goal.id).unwrap().is_none());
        assert!(matches!(db.delete_goal(other.id, goal.id), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_budget_upsert_ignores_case() {
        let (db, user_id) = setup();

        db.upsert_budget_categories(
            user_id,
            &[BudgetCategoryInput {
                name: "Food".into(),
                limit: Some(1000.0),
                icon: Some("🍔".into()),
            }],
        )
        .unwrap();
        let categories = db
            .upsert_budget_categories(
                user_id,
                &[
                    BudgetCategoryInput {
                        name: "food".into(),
                        limit: Some(800.0),
                        icon: None,
                    },
                    BudgetCategoryInput {
                        name: "transport".into(),
                        limit: None,
                        icon: None,
                    },
                ],
            )
            .unwrap();

        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].name, "Food");
        assert_eq!(categories[0].limit, Some(800.0));
        assert_eq!(categories[0].icon.as_deref(), Some("🍔"));
        assert_eq!(categories[1].limit, None);
    }

    #[test]
    fn test_bursaries_sorted_by_next_payment() {
        let (db, user_id) = setup();
        for (provider, d) in [("Funza", 25), ("NSFAS", 15)] {
            db.insert_bursary(
                user_id,
                &NewBursary {
                    provider: provider.into(),
                    monthly_amount: 1500.0,
                    next_payment_date: day(d),
                    notes: None,
                },
            )
            .unwrap();
        }
        let bursaries = db.list_bursaries(user_id).unwrap();
        assert_eq!(bursaries[0].provider, "NSFAS");
    }

    #[test]
    fn test_diary_entries() {
        let (db, user_id) = setup();
        let entry = db
            .insert_diary_entry(
                user_id,
                &NewDiaryEntry {
                    title: Some(String::new()),
                    body: "Spent too much on takeout".into(),
                    emotion: Some("guilty".into()),
                    date: None,
                },
                day(12),
            )
            .unwrap();
        assert_eq!(entry.title, None);
        assert_eq!(entry.date, day(12));

        let empty = NewDiaryEntry {
            title: None,
            body: " ".into(),
            emotion: None,
            date: None,
        };
        assert!(matches!(
            db.insert_diary_entry(user_id, &empty, day(12)),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_gamification_defaults_and_xp() {
        let (db, user_id) = setup();

        assert_eq!(db.get_gamification(user_id).unwrap(), GamificationState::default());

        assert_eq!(db.award_xp(user_id, 60).unwrap(), 60);
        assert_eq!(db.award_xp(user_id, 120).unwrap(), 180);
        assert_eq!(db.award_xp(user_id, -50).unwrap(), 180);

        db.set_persona(user_id, Persona::Strict).unwrap();
        let state = db.get_gamification(user_id).unwrap();
        assert_eq!(state.xp, 180);
        assert_eq!(state.persona, Persona::Strict);
        assert_eq!(state.daily_challenge, DEFAULT_DAILY_CHALLENGE);
    }

    #[test]
    fn test_load_user_records() {
        let (db, user_id) = setup();
        db.insert_transaction(
            user_id,
            &NewTransaction {
                amount: 50.0,
                category: "food".into(),
                kind: None,
                description: String::new(),
                date: None,
                account_id: None,
            },
            day(5),
        )
        .unwrap();
        db.award_xp(user_id, 20).unwrap();

        let records = db.load_user_records(user_id).unwrap();
        assert_eq!(records.user.as_ref().map(|u| u.id), Some(user_id));
        assert_eq!(records.transactions.len(), 1);
        assert_eq!(records.gamification.xp, 20);

        assert!(matches!(db.load_user_records(999), Err(Error::NotFound(_))));
    }
}
