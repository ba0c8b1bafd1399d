//! Text views over engine state. Pure reads: nothing here mutates the engine.

use shake_core::{DiceConfiguration, HistoryLog, MotionState, RollRecord};

pub fn banner(dice: DiceConfiguration) -> String {
    format!(
        "Shake to roll {} {} sided dice...",
        dice.dice_count, dice.sides
    )
}

pub fn status_line(tick: u64, state: MotionState, intensity: f64) -> String {
    format!("[{tick:>4}] {} (velocity {intensity:.3})", state.label())
}

pub fn faces(faces: &[u32]) -> String {
    let joined: Vec<String> = faces.iter().map(u32::to_string).collect();
    format!("[{}]", joined.join(", "))
}

pub fn roll_line(record: &RollRecord, committed: &[u32]) -> String {
    format!(
        "rolled {}d{}: {} total {}",
        record.dice_count,
        record.sides,
        faces(committed),
        record.total
    )
}

pub fn history_panel(history: &HistoryLog) -> String {
    if history.is_empty() {
        return "history: (empty)".to_string();
    }
    let mut out = String::from("history:");
    for (i, record) in history.iter().enumerate() {
        out.push_str(&format!("\n  {}. {}", i + 1, record.notation()));
    }
    out
}
