//! Record command implementations

use anyhow::{Context, Result};
use chrono::NaiveDate;
use financeplay_core::db::Database;
use financeplay_core::gamification::{xp_for_amount, DIARY_XP};
use financeplay_core::models::{
    format_money, BudgetCategory, BudgetCategoryInput, Bursary, DiaryEntry, Goal, Income,
    NewBursary, NewDiaryEntry, NewGoal, NewIncome, NewSavingsTransfer, NewTransaction, Priority,
    SavingsTransfer, Transaction, TransactionKind,
};
use financeplay_core::Ledger;

use super::truncate;

fn print_xp(db: &Database, user_id: i64, awarded: i64) -> Result<i64> {
    let total = db.award_xp(user_id, awarded)?;
    if awarded > 0 {
        println!("   🎮 +{} XP (total {})", awarded, total);
    }
    Ok(total)
}

// ========== Transactions ==========

#[allow(clippy::too_many_arguments)]
pub fn cmd_tx_add(
    db: &Database,
    user_id: i64,
    today: NaiveDate,
    amount: f64,
    category: &str,
    kind: Option<TransactionKind>,
    description: &str,
    date: Option<NaiveDate>,
) -> Result<Transaction> {
    let tx = db.insert_transaction(
        user_id,
        &NewTransaction {
            amount,
            category: category.to_string(),
            kind,
            description: description.to_string(),
            date,
            account_id: None,
        },
        today,
    )?;

    println!(
        "✅ Recorded {} {} in {} on {}",
        tx.resolved_kind().as_str(),
        format_money(tx.amount.abs()),
        tx.category,
        tx.date
    );
    Ok(tx)
}

pub fn cmd_tx_list(db: &Database, user_id: i64, limit: i64) -> Result<()> {
    if limit < 1 {
        anyhow::bail!("--limit must be at least 1");
    }
    let transactions = db.list_transactions(user_id, Some(limit))?;

    if transactions.is_empty() {
        println!("No transactions found. Record one with:");
        println!("  financeplay tx add 120 food");
        return Ok(());
    }

    println!();
    println!("📝 Recent Transactions");
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in transactions {
        let amount_str = match tx.resolved_kind() {
            TransactionKind::Expense => {
                format!("\x1b[31m-{}\x1b[0m", format_money(tx.amount.abs())) // Red for spending
            }
            _ => format!("\x1b[32m+{}\x1b[0m", format_money(tx.amount.abs())),
        };

        println!(
            "   {} │ {:>12} │ {:<12} │ {}",
            tx.date,
            amount_str,
            truncate(&tx.category, 12),
            truncate(&tx.description, 30)
        );
    }

    Ok(())
}

// ========== Income & Savings ==========

pub fn cmd_income_add(
    db: &Database,
    user_id: i64,
    today: NaiveDate,
    source: &str,
    amount: f64,
    date: Option<NaiveDate>,
    note: Option<&str>,
) -> Result<Income> {
    let income = db.insert_income(
        user_id,
        &NewIncome {
            source: source.to_string(),
            amount,
            date,
            note: note.map(str::to_string),
        },
        today,
    )?;

    println!(
        "✅ Recorded income {} from {} on {}",
        format_money(income.amount),
        income.source,
        income.date
    );
    Ok(income)
}

pub fn cmd_savings_add(
    db: &Database,
    user_id: i64,
    today: NaiveDate,
    amount: f64,
    from: Option<&str>,
    to: Option<&str>,
    date: Option<NaiveDate>,
) -> Result<SavingsTransfer> {
    let transfer = db.insert_savings_transfer(
        user_id,
        &NewSavingsTransfer {
            amount,
            from: from.map(str::to_string),
            to: to.map(str::to_string),
            date,
        },
        today,
    )?;

    println!(
        "💰 Saved {}{} on {}",
        format_money(transfer.amount),
        transfer
            .to
            .as_deref()
            .map(|t| format!(" to {}", t))
            .unwrap_or_default(),
        transfer.date
    );
    print_xp(db, user_id, xp_for_amount(transfer.amount))?;
    Ok(transfer)
}

// ========== Goals ==========

pub fn cmd_goals_add(
    db: &Database,
    user_id: i64,
    name: &str,
    target: f64,
    current: f64,
    deadline: Option<NaiveDate>,
    priority: Priority,
) -> Result<Goal> {
    let goal = db.insert_goal(
        user_id,
        &NewGoal {
            name: name.to_string(),
            target_amount: target,
            current_amount: current,
            deadline,
            priority,
        },
    )?;

    println!(
        "🎯 Added goal [{}] {} ({} priority): {} / {}",
        goal.id,
        goal.name,
        goal.priority.as_str(),
        format_money(goal.current_amount),
        format_money(goal.target_amount)
    );
    Ok(goal)
}

pub fn cmd_goals_list(db: &Database, user_id: i64, today: NaiveDate) -> Result<()> {
    let snapshot = Ledger::new(db.load_user_records(user_id)?).snapshot(today);

    if snapshot.goals.is_empty() {
        println!("No goals set yet. Add one with:");
        println!("  financeplay goals add \"Emergency Fund\" 2000 --priority high");
        return Ok(());
    }

    println!();
    println!("🎯 Goals (priority order)");
    println!("   ─────────────────────────────────────────────────────────────");

    for ranked in &snapshot.goals {
        let goal = &ranked.goal;
        let filled = (ranked.percent_complete as usize).min(100) / 10;
        println!(
            "   [{}] {:<20} {:<6} [{}{}] {:>3}%  {} / {}{}",
            goal.id,
            truncate(&goal.name, 20),
            goal.priority.as_str(),
            "█".repeat(filled),
            "░".repeat(10 - filled),
            ranked.percent_complete,
            format_money(goal.current_amount),
            format_money(goal.target_amount),
            goal.deadline
                .map(|d| format!("  (by {})", d))
                .unwrap_or_default()
        );
    }

    Ok(())
}

pub fn cmd_goals_progress(db: &Database, user_id: i64, id: i64, amount: f64) -> Result<Goal> {
    let previous = db
        .get_goal(user_id, id)?
        .with_context(|| format!("Goal {} not found", id))?;
    let goal = db.update_goal_progress(user_id, id, amount)?;

    println!(
        "🎯 {}: {} / {}",
        goal.name,
        format_money(goal.current_amount),
        format_money(goal.target_amount)
    );

    let increase = goal.current_amount - previous.current_amount;
    if increase > 0.0 {
        print_xp(db, user_id, xp_for_amount(increase))?;
    }
    if goal.current_amount >= goal.target_amount && previous.current_amount < goal.target_amount {
        println!("   🏆 Goal reached!");
    }
    Ok(goal)
}

pub fn cmd_goals_remove(db: &Database, user_id: i64, id: i64) -> Result<()> {
    db.delete_goal(user_id, id)?;
    println!("🗑  Removed goal {}", id);
    Ok(())
}

// ========== Diary ==========

pub fn cmd_diary_add(
    db: &Database,
    user_id: i64,
    today: NaiveDate,
    body: &str,
    title: Option<&str>,
    emotion: Option<&str>,
    date: Option<NaiveDate>,
) -> Result<DiaryEntry> {
    let entry = db.insert_diary_entry(
        user_id,
        &NewDiaryEntry {
            title: title.map(str::to_string),
            body: body.to_string(),
            emotion: emotion.map(str::to_string),
            date,
        },
        today,
    )?;

    println!("📔 Diary entry saved for {}", entry.date);
    print_xp(db, user_id, DIARY_XP)?;
    Ok(entry)
}

// ========== Budget & Bursaries ==========

pub fn cmd_budget_set(
    db: &Database,
    user_id: i64,
    name: &str,
    limit: Option<f64>,
    icon: Option<&str>,
) -> Result<Vec<BudgetCategory>> {
    let categories = db.upsert_budget_categories(
        user_id,
        &[BudgetCategoryInput {
            name: name.to_string(),
            limit,
            icon: icon.map(str::to_string),
        }],
    )?;

    println!("✅ Envelope {} saved", name);
    print_envelopes(&categories);
    Ok(categories)
}

pub fn cmd_budget_list(db: &Database, user_id: i64) -> Result<()> {
    let categories = db.list_budget_categories(user_id)?;
    if categories.is_empty() {
        println!("No budget envelopes. Add one with:");
        println!("  financeplay budget set food --limit 1500");
        return Ok(());
    }
    print_envelopes(&categories);
    Ok(())
}

fn print_envelopes(categories: &[BudgetCategory]) {
    println!();
    println!("📊 Budget envelopes");
    println!("   ─────────────────────────────────────────");
    for category in categories {
        println!(
            "   {} {:<20} {}",
            category.icon.as_deref().unwrap_or(" "),
            category.name,
            category
                .limit
                .map(format_money)
                .unwrap_or_else(|| "no limit".to_string())
        );
    }
}

pub fn cmd_bursary_add(
    db: &Database,
    user_id: i64,
    provider: &str,
    amount: f64,
    next_payment: NaiveDate,
    notes: Option<&str>,
) -> Result<Bursary> {
    let bursary = db.insert_bursary(
        user_id,
        &NewBursary {
            provider: provider.to_string(),
            monthly_amount: amount,
            next_payment_date: next_payment,
            notes: notes.map(str::to_string),
        },
    )?;

    println!(
        "🎓 Added {}: {} monthly, next payment {}",
        bursary.provider,
        format_money(bursary.monthly_amount),
        bursary.next_payment_date
    );
    Ok(bursary)
}
