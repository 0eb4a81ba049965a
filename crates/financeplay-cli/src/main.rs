//! FinancePlay CLI - Gamified budgeting coach
//!
//! Usage:
//!   financeplay init                      Initialize database
//!   financeplay tx add 120 food           Record spending
//!   financeplay goals add "Laptop" 8000   Add a savings goal
//!   financeplay dashboard                 Show totals, health score and insights
//!   financeplay coach "How do I save?"    Ask the coach
//!   financeplay prompts list              Show prompt templates and overrides
//!   financeplay serve --port 3000         Start web server

mod cli;
mod commands;


use anyhow::Result;
use chrono::Local;
use clap::Parser;
use financeplay_core::coach::Coach;
use financeplay_core::config::Settings;
use financeplay_core::prompts::PromptLibrary;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let settings = match cli.config.as_deref() {
        Some(path) => Settings::load_from(Some(path))?,
        None => Settings::load()?,
    };
    let db_path = cli.db.clone().unwrap_or_else(|| settings.database_path());
    let db = commands::open_db(&db_path)?;
    debug!(path = %db_path.display(), "Opened database");
    let today = Local::now().date_naive();

    // Commands that do not act on behalf of a user
    match cli.command {
        Commands::Init => return commands::cmd_init(&db),
        Commands::Users { action } => {
            return match action {
                UsersAction::Add { email, name } => {
                    commands::cmd_users_add(&db, &email, name.as_deref()).map(|_| ())
                }
                UsersAction::List => commands::cmd_users_list(&db),
            }
        }
        Commands::Prompts { action } => {
            let mut library = PromptLibrary::new();
            return match action {
                None | Some(PromptsAction::List) => {
                    commands::cmd_prompts_list(&mut library).map(|_| ())
                }
                Some(PromptsAction::Show { prompt_id }) => {
                    commands::cmd_prompts_show(&mut library, &prompt_id)
                }
                Some(PromptsAction::Path) => commands::cmd_prompts_path(&library),
            };
        }
        Commands::Serve {
            port,
            host,
            no_auth,
        } => return commands::cmd_serve(db, &settings, host.as_deref(), port, no_auth).await,
        _ => {}
    }

    let user = commands::resolve_user(&db, cli.user.as_deref())?;
    let user_id = user.id;
    debug!(user_id, email = %user.email, "Acting as user");

    match cli.command {
        Commands::Tx { action } => match action {
            TxAction::Add {
                amount,
                category,
                kind,
                description,
                date,
            } => commands::cmd_tx_add(
                &db,
                user_id,
                today,
                amount,
                &category,
                kind,
                &description,
                date,
            )
            .map(|_| ()),
            TxAction::List { limit } => commands::cmd_tx_list(&db, user_id, limit),
        },
        Commands::Income { action } => match action {
            IncomeAction::Add {
                source,
                amount,
                date,
                note,
            } => commands::cmd_income_add(
                &db,
                user_id,
                today,
                &source,
                amount,
                date,
                note.as_deref(),
            )
            .map(|_| ()),
        },
        Commands::Savings { action } => match action {
            SavingsAction::Add {
                amount,
                from,
                to,
                date,
            } => commands::cmd_savings_add(
                &db,
                user_id,
                today,
                amount,
                from.as_deref(),
                to.as_deref(),
                date,
            )
            .map(|_| ()),
        },
        Commands::Goals { action } => match action {
            GoalsAction::Add {
                name,
                target,
                current,
                deadline,
                priority,
            } => commands::cmd_goals_add(&db, user_id, &name, target, current, deadline, priority)
                .map(|_| ()),
            GoalsAction::List => commands::cmd_goals_list(&db, user_id, today),
            GoalsAction::Progress { id, amount } => {
                commands::cmd_goals_progress(&db, user_id, id, amount).map(|_| ())
            }
            GoalsAction::Remove { id } => commands::cmd_goals_remove(&db, user_id, id),
        },
        Commands::Diary { action } => match action {
            DiaryAction::Add {
                body,
                title,
                emotion,
                date,
            } => commands::cmd_diary_add(
                &db,
                user_id,
                today,
                &body,
                title.as_deref(),
                emotion.as_deref(),
                date,
            )
            .map(|_| ()),
        },
        Commands::Budget { action } => match action {
            BudgetAction::Set { name, limit, icon } => {
                commands::cmd_budget_set(&db, user_id, &name, limit, icon.as_deref()).map(|_| ())
            }
            BudgetAction::List => commands::cmd_budget_list(&db, user_id),
        },
        Commands::Bursary { action } => match action {
            BursaryAction::Add {
                provider,
                amount,
                next_payment,
                notes,
            } => commands::cmd_bursary_add(
                &db,
                user_id,
                &provider,
                amount,
                next_payment,
                notes.as_deref(),
            )
            .map(|_| ()),
        },
        Commands::Snapshot => commands::cmd_snapshot(&db, user_id, today),
        Commands::Dashboard { json } => commands::cmd_dashboard(&db, user_id, today, json),
        Commands::Report { json } => commands::cmd_report(&db, user_id, today, json),
        Commands::Prompt {
            text,
            persona,
            no_snapshot,
        } => {
            let coach = Coach::from_settings(&settings.coach)?;
            commands::cmd_prompt(&db, user_id, today, &coach, &text, persona, no_snapshot)
                .map(|_| ())
        }
        Commands::Coach {
            text,
            persona,
            no_snapshot,
        } => {
            let coach = Coach::from_settings(&settings.coach)?;
            commands::cmd_coach(&db, user_id, today, &coach, &text, persona, no_snapshot)
                .await
                .map(|_| ())
        }
        Commands::Init
        | Commands::Users { .. }
        | Commands::Prompts { .. }
        | Commands::Serve { .. } => Ok(()),
    }
}
