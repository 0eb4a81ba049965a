//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use financeplay_core::models::{Persona, Priority, TransactionKind};

/// FinancePlay - Budgeting coach with goals, streaks and XP
#[derive(Parser)]
#[command(name = "financeplay")]
#[command(about = "Gamified personal budgeting coach", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path (defaults to the settings file, then the platform data dir)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Act as this user (email); defaults to the local single user
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Settings override file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Manage users
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },

    /// Record or list transactions
    Tx {
        #[command(subcommand)]
        action: TxAction,
    },

    /// Record income
    Income {
        #[command(subcommand)]
        action: IncomeAction,
    },

    /// Record a savings transfer (earns XP)
    Savings {
        #[command(subcommand)]
        action: SavingsAction,
    },

    /// Manage savings goals
    Goals {
        #[command(subcommand)]
        action: GoalsAction,
    },

    /// Write in the money diary (earns XP)
    Diary {
        #[command(subcommand)]
        action: DiaryAction,
    },

    /// Manage budget envelopes
    Budget {
        #[command(subcommand)]
        action: BudgetAction,
    },

    /// Record a bursary or allowance
    Bursary {
        #[command(subcommand)]
        action: BursaryAction,
    },

    /// Print the full snapshot as JSON
    Snapshot,

    /// Show dashboard summary (totals, goals, health score, insights)
    Dashboard {
        /// Output JSON instead of a formatted summary
        #[arg(long)]
        json: bool,
    },

    /// Show the weekly report
    Report {
        /// Output JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the coach prompt that would be sent for a question
    Prompt {
        /// Question for the coach
        text: String,

        /// Persona override (friendly, strict, humorous)
        #[arg(long)]
        persona: Option<Persona>,

        /// Leave the financial snapshot out of the prompt
        #[arg(long)]
        no_snapshot: bool,
    },

    /// Ask the coach a question
    Coach {
        /// Question for the coach
        text: String,

        /// Persona override (friendly, strict, humorous)
        #[arg(long)]
        persona: Option<Persona>,

        /// Leave the financial snapshot out of the prompt
        #[arg(long)]
        no_snapshot: bool,
    },

    /// Inspect the coach prompt templates and their overrides
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },

    /// Start the web server
    Serve {
        /// Port to listen on (defaults to settings)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to settings)
        #[arg(long)]
        host: Option<String>,

        /// Disable authentication (for local single-user use only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a network.
        /// Every request then acts as the local user.
        #[arg(long)]
        no_auth: bool,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// Create a user
    Add {
        /// Email address
        email: String,

        /// Display name
        #[arg(long)]
        name: Option<String>,
    },

    /// List users
    List,
}

#[derive(Subcommand)]
pub enum TxAction {
    /// Record a transaction
    Add {
        /// Amount (sign is ignored for spending)
        #[arg(allow_negative_numbers = true)]
        amount: f64,

        /// Category (the `income` and `savings` categories are special)
        category: String,

        /// Kind: expense, income or savings
        #[arg(long)]
        kind: Option<TransactionKind>,

        /// Description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List recent transactions
    List {
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },
}

#[derive(Subcommand)]
pub enum IncomeAction {
    /// Record income
    Add {
        /// Where the money came from
        source: String,

        amount: f64,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long)]
        note: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum SavingsAction {
    /// Record a transfer into savings
    Add {
        amount: f64,

        /// Source account
        #[arg(long)]
        from: Option<String>,

        /// Destination account or pot
        #[arg(long)]
        to: Option<String>,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Subcommand)]
pub enum GoalsAction {
    /// Add a goal
    Add {
        name: String,

        /// Target amount
        target: f64,

        /// Amount already saved
        #[arg(long, default_value = "0")]
        current: f64,

        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<NaiveDate>,

        /// Priority: high, medium or low
        #[arg(long, default_value = "medium")]
        priority: Priority,
    },

    /// List goals in priority order
    List,

    /// Set the amount saved toward a goal (increases earn XP)
    Progress {
        /// Goal ID
        id: i64,

        /// New saved amount
        amount: f64,
    },

    /// Remove a goal
    Remove {
        /// Goal ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum DiaryAction {
    /// Add a diary entry
    Add {
        /// Entry text
        body: String,

        #[arg(long)]
        title: Option<String>,

        /// How you felt (e.g. proud, anxious)
        #[arg(long)]
        emotion: Option<String>,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Subcommand)]
pub enum BudgetAction {
    /// Create or update an envelope by name
    Set {
        /// Category name (matched ignoring case)
        name: String,

        /// Monthly limit; omit to track without a limit
        #[arg(long)]
        limit: Option<f64>,

        #[arg(long)]
        icon: Option<String>,
    },

    /// List envelopes
    List,
}

#[derive(Subcommand)]
pub enum BursaryAction {
    /// Add a bursary or allowance
    Add {
        provider: String,

        /// Monthly amount
        amount: f64,

        /// Next payment date (YYYY-MM-DD)
        next_payment: NaiveDate,

        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List prompts and their override status
    List,

    /// Show the content of a prompt
    Show {
        /// Prompt ID (e.g. coach)
        prompt_id: String,
    },

    /// Show where prompt overrides are read from
    Path,
}
