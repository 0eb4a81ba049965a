//! Record handlers: transactions, income, savings, goals, diary, budget, bursaries
//!
//! Every write goes through [`AppState::write`]: the record is persisted
//! first and then folded into the cached ledger with the matching action.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use financeplay_core::gamification::{xp_for_amount, DIARY_XP};
use financeplay_core::goals::RankedGoal;
use financeplay_core::ledger::LedgerAction;
use financeplay_core::models::{
    BudgetCategory, BudgetCategoryInput, Bursary, DiaryEntry, Goal, Income, NewBursary,
    NewDiaryEntry, NewGoal, NewIncome, NewSavingsTransfer, NewTransaction, SavingsTransfer,
    Transaction,
};

use crate::{AppError, AppState, AuthContext, SuccessResponse, MAX_PAGE_LIMIT};

/// A created or updated record plus the XP it earned
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Awarded<T> {
    #[serde(flatten)]
    pub record: T,
    pub xp_awarded: i64,
    /// XP total after the award
    pub xp: i64,
}


// ========== Transactions ==========

/// Query parameters for listing transactions
#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    pub limit: Option<i64>,
}

/// GET /api/transactions - Newest first
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<TransactionQuery>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    if let Some(limit) = params.limit {
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(AppError::bad_request(&format!(
                "limit must be between 1 and {}",
                MAX_PAGE_LIMIT
            )));
        }
    }
    Ok(Json(state.db.list_transactions(auth.user_id, params.limit)?))
}

/// POST /api/transactions
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<NewTransaction>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let Json(req) = payload?;
    let today = state.today();
    let tx = state.write(auth.user_id, |db| {
        let tx = db.insert_transaction(auth.user_id, &req, today)?;
        Ok((tx.clone(), vec![LedgerAction::TransactionAdded(tx)]))
    })?;
    Ok((StatusCode::CREATED, Json(tx)))
}

// ========== Income & Savings ==========

/// POST /api/income
pub async fn create_income(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<NewIncome>, JsonRejection>,
) -> Result<(StatusCode, Json<Income>), AppError> {
    let Json(req) = payload?;
    let today = state.today();
    let income = state.write(auth.user_id, |db| {
        let income = db.insert_income(auth.user_id, &req, today)?;
        Ok((income.clone(), vec![LedgerAction::IncomeAdded(income)]))
    })?;
    Ok((StatusCode::CREATED, Json(income)))
}

/// POST /api/savings - Record a transfer and award XP for it
pub async fn create_savings_transfer(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<NewSavingsTransfer>, JsonRejection>,
) -> Result<(StatusCode, Json<Awarded<SavingsTransfer>>), AppError> {
    let Json(req) = payload?;
    let today = state.today();
    let awarded = state.write(auth.user_id, |db| {
        let transfer = db.insert_savings_transfer(auth.user_id, &req, today)?;
        let xp_awarded = xp_for_amount(transfer.amount);
        let xp = db.award_xp(auth.user_id, xp_awarded)?;
        let actions = vec![
            LedgerAction::SavingsAdded(transfer.clone()),
            LedgerAction::XpAwarded(xp_awarded),
        ];
        Ok((
            Awarded {
                record: transfer,
                xp_awarded,
                xp,
            },
            actions,
        ))
    })?;

    Ok((StatusCode::CREATED, Json(awarded)))
}

// ========== Goals ==========

/// GET /api/goals - Goals in priority order with completion percentage
pub async fn list_goals(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<RankedGoal>>, AppError> {
    Ok(Json(state.ledger(auth.user_id)?.snapshot(state.today()).goals))
}

/// POST /api/goals
pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<NewGoal>, JsonRejection>,
) -> Result<(StatusCode, Json<Goal>), AppError> {
    let Json(req) = payload?;
    let goal = state.write(auth.user_id, |db| {
        let goal = db.insert_goal(auth.user_id, &req)?;
        Ok((goal.clone(), vec![LedgerAction::GoalAdded(goal)]))
    })?;
    Ok((StatusCode::CREATED, Json(goal)))
}

/// Request body for updating goal progress
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgressRequest {
    #[serde(deserialize_with = "financeplay_core::models::lenient_amount")]
    pub current_amount: f64,
}

/// PATCH /api/goals/:id/progress - Set the saved amount; increases earn XP
pub async fn update_goal_progress(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    payload: Result<Json<GoalProgressRequest>, JsonRejection>,
) -> Result<Json<Awarded<Goal>>, AppError> {
    let Json(req) = payload?;
    let awarded = state.write(auth.user_id, |db| {
        let previous = db
            .get_goal(auth.user_id, id)?
            .ok_or_else(|| AppError::not_found("Goal not found"))?;
        let goal = db.update_goal_progress(auth.user_id, id, req.current_amount)?;

        let increase = goal.current_amount - previous.current_amount;
        let xp_awarded = if increase > 0.0 {
            xp_for_amount(increase)
        } else {
            0
        };
        let xp = db.award_xp(auth.user_id, xp_awarded)?;

        let actions = vec![
            LedgerAction::GoalProgressUpdated {
                goal_id: goal.id,
                current_amount: goal.current_amount,
            },
            LedgerAction::XpAwarded(xp_awarded),
        ];
        Ok((
            Awarded {
                record: goal,
                xp_awarded,
                xp,
            },
            actions,
        ))
    })?;

    Ok(Json(awarded))
}

/// DELETE /api/goals/:id
pub async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.write(auth.user_id, |db| {
        db.delete_goal(auth.user_id, id)?;
        Ok(((), vec![LedgerAction::GoalRemoved { goal_id: id }]))
    })?;
    Ok(Json(SuccessResponse { success: true }))
}

// ========== Diary ==========

/// GET /api/diary - Newest first
pub async fn list_diary(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<DiaryEntry>>, AppError> {
    Ok(Json(state.db.list_diary_entries(auth.user_id)?))
}

/// POST /api/diary - Entries earn a flat XP bonus
pub async fn create_diary_entry(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<NewDiaryEntry>, JsonRejection>,
) -> Result<(StatusCode, Json<Awarded<DiaryEntry>>), AppError> {
    let Json(req) = payload?;
    let today = state.today();
    let awarded = state.write(auth.user_id, |db| {
        let entry = db.insert_diary_entry(auth.user_id, &req, today)?;
        let xp = db.award_xp(auth.user_id, DIARY_XP)?;
        let actions = vec![
            LedgerAction::DiaryEntryAdded(entry.clone()),
            LedgerAction::XpAwarded(DIARY_XP),
        ];
        Ok((
            Awarded {
                record: entry,
                xp_awarded: DIARY_XP,
                xp,
            },
            actions,
        ))
    })?;

    Ok((StatusCode::CREATED, Json(awarded)))
}

// ========== Budget & Bursaries ==========

/// GET /api/budget/categories
pub async fn list_budget_categories(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<BudgetCategory>>, AppError> {
    Ok(Json(state.db.list_budget_categories(auth.user_id)?))
}

/// PATCH /api/budget/categories - Create or update envelopes by name
pub async fn upsert_budget_categories(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<Vec<BudgetCategoryInput>>, JsonRejection>,
) -> Result<Json<Vec<BudgetCategory>>, AppError> {
    let Json(req) = payload?;
    let categories = state.write(auth.user_id, |db| {
        let categories = db.upsert_budget_categories(auth.user_id, &req)?;
        let actions = vec![LedgerAction::BudgetCategoriesUpserted(categories.clone())];
        Ok((categories, actions))
    })?;
    Ok(Json(categories))
}

/// GET /api/bursaries - Soonest payment first
pub async fn list_bursaries(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<Bursary>>, AppError> {
    Ok(Json(state.db.list_bursaries(auth.user_id)?))
}

/// POST /api/bursaries
pub async fn create_bursary(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<NewBursary>, JsonRejection>,
) -> Result<(StatusCode, Json<Bursary>), AppError> {
    let Json(req) = payload?;
    let bursary = state.write(auth.user_id, |db| {
        let bursary = db.insert_bursary(auth.user_id, &req)?;
        Ok((bursary.clone(), vec![LedgerAction::BursaryAdded(bursary)]))
    })?;
    Ok((StatusCode::CREATED, Json(bursary)))
}
