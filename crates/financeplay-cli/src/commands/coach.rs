//! Coach command implementations

use anyhow::Result;
use chrono::NaiveDate;
use financeplay_core::coach::{Coach, CoachReply, CoachRequest, CoachSource};
use financeplay_core::db::Database;
use financeplay_core::models::Persona;
use financeplay_core::{Ledger, Snapshot};

fn snapshot(db: &Database, user_id: i64, today: NaiveDate) -> Result<Snapshot> {
    Ok(Ledger::new(db.load_user_records(user_id)?).snapshot(today))
}

/// Print the prompt the coach would send, without calling a backend
pub fn cmd_prompt(
    db: &Database,
    user_id: i64,
    today: NaiveDate,
    coach: &Coach,
    text: &str,
    persona: Option<Persona>,
    no_snapshot: bool,
) -> Result<String> {
    let snapshot = snapshot(db, user_id, today)?;
    let request = CoachRequest {
        user_prompt: text.trim(),
        persona: persona.unwrap_or(snapshot.gamification.persona),
        history: &[],
        snapshot: (!no_snapshot).then_some(&snapshot),
        today,
    };

    let prompt = coach.prompt(&request);
    println!("{}", prompt);
    Ok(prompt)
}

pub async fn cmd_coach(
    db: &Database,
    user_id: i64,
    today: NaiveDate,
    coach: &Coach,
    text: &str,
    persona: Option<Persona>,
    no_snapshot: bool,
) -> Result<CoachReply> {
    let text = text.trim();
    if text.is_empty() {
        anyhow::bail!("Ask the coach something, e.g. financeplay coach \"How do I save more?\"");
    }

    let snapshot = snapshot(db, user_id, today)?;
    let request = CoachRequest {
        user_prompt: text,
        persona: persona.unwrap_or(snapshot.gamification.persona),
        history: &[],
        snapshot: (!no_snapshot).then_some(&snapshot),
        today,
    };

    let reply = coach.reply(&request).await;

    println!();
    println!("🤖 Coach ({}):", request.persona.as_str());
    println!("   {}", reply.reply);
    match reply.source {
        CoachSource::Offline => {
            println!();
            println!("   💡 Tip: Set OPENAI_API_KEY or OLLAMA_HOST for personalised coaching");
        }
        CoachSource::Fallback => {
            println!();
            println!("   ⚠️  Coach backend unavailable, showing the default tip");
        }
        _ => {}
    }

    Ok(reply)
}
