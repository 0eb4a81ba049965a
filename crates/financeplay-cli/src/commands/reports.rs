//! Snapshot, dashboard and weekly report commands

use anyhow::Result;
use chrono::NaiveDate;
use financeplay_core::db::Database;
use financeplay_core::health::HealthCategory;
use financeplay_core::models::format_money;
use financeplay_core::{build_weekly_report, overspent, Ledger};

fn ledger(db: &Database, user_id: i64) -> Result<Ledger> {
    Ok(Ledger::new(db.load_user_records(user_id)?))
}

/// Print the full snapshot as pretty JSON
pub fn cmd_snapshot(db: &Database, user_id: i64, today: NaiveDate) -> Result<()> {
    let snapshot = ledger(db, user_id)?.snapshot(today);
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

pub fn cmd_dashboard(db: &Database, user_id: i64, today: NaiveDate, json: bool) -> Result<()> {
    let dashboard = ledger(db, user_id)?.dashboard(today);

    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
        return Ok(());
    }

    let snapshot = &dashboard.snapshot;
    let game = &snapshot.gamification;

    println!();
    println!("📊 FinancePlay Dashboard ({})", snapshot.as_of);
    println!("   ─────────────────────────────");
    println!("   Spent:   {}", format_money(snapshot.totals.spending));
    println!("   Income:  {}", format_money(snapshot.totals.income));
    println!("   Saved:   {}", format_money(snapshot.totals.savings));

    let health_icon = match dashboard.health.category {
        HealthCategory::Good => "💚",
        HealthCategory::Fair => "🧡",
        HealthCategory::Poor => "❤️",
    };
    println!();
    println!(
        "   {} Health score: {} ({})",
        health_icon,
        dashboard.health.score,
        dashboard.health.category.as_str()
    );
    println!("      {}", dashboard.health.summary);

    if !snapshot.categories.is_empty() {
        println!();
        println!("   Spending by category:");
        let mut categories: Vec<_> = snapshot.categories.iter().collect();
        categories.sort_by(|a, b| b.1.total_cmp(a.1));
        for (category, amount) in categories {
            println!("   {:<20} {:>12}", category, format_money(*amount));
        }
    }

    let flags = overspent(&snapshot.categories, &snapshot.budget_categories);
    if !flags.is_empty() {
        println!();
        println!("   ⚠️  Budget warnings:");
        for flag in flags {
            println!(
                "   {:<20} {} / {} ({}%)",
                flag.category,
                format_money(flag.spent),
                format_money(flag.limit),
                flag.percent_used
            );
        }
    }

    println!();
    println!(
        "   🎮 Level {} · {} XP ({} to next) · 🔥 {} day streak",
        game.level, game.xp, game.xp_to_next_level, game.streak
    );
    if !game.badges.is_empty() {
        println!("      Badges: {}", game.badges.join(", "));
    }
    println!("      Daily challenge: {}", game.daily_challenge);

    println!();
    println!("   💡 Insights:");
    for insight in &dashboard.insights {
        println!("   • {}: {}", insight.title, insight.description);
        if let Some(action) = &insight.action {
            println!("     → {}", action);
        }
    }

    Ok(())
}

pub fn cmd_report(db: &Database, user_id: i64, today: NaiveDate, json: bool) -> Result<()> {
    let snapshot = ledger(db, user_id)?.snapshot(today);
    let report = build_weekly_report(&snapshot, today);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.to_text());
    }
    Ok(())
}
