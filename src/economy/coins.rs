use bevy::prelude::*;

use crate::shared::*;

/// Running coin totals for the save file and end-of-run summaries.
#[derive(Resource, Debug, Clone, Default)]
pub struct EconomyStats {
    pub total_coins_earned: u64,
    pub total_coins_spent: u64,
    pub total_transactions: u64,
}

impl EconomyStats {
    pub fn record(&mut self, delta: i64) {
        if delta >= 0 {
            self.total_coins_earned = self.total_coins_earned.saturating_add(delta as u64);
        } else {
            self.total_coins_spent = self.total_coins_spent.saturating_add(delta.unsigned_abs());
        }
        self.total_transactions += 1;
    }
}

/// Folds every `CoinsChangedEvent` into `EconomyStats`. The wallet itself is
/// already updated by whoever sent the event.
pub fn track_coin_changes(
    mut events: EventReader<CoinsChangedEvent>,
    mut stats: ResMut<EconomyStats>,
) {
    for ev in events.read() {
        stats.record(ev.delta);
        if ev.delta >= 0 {
            info!(
                "[Economy] +{}: {}. Balance: {}",
                format_coins(ev.delta as u32),
                ev.reason,
                format_coins(ev.balance)
            );
        } else {
            info!(
                "[Economy] -{}: {}. Balance: {}",
                format_coins(ev.delta.unsigned_abs() as u32),
                ev.reason,
                format_coins(ev.balance)
            );
        }
    }
}

/// Format a coin amount for display (e.g. "1,234c").
pub fn format_coins(amount: u32) -> String {
    let digits: Vec<char> = amount.to_string().chars().collect();
    let groups: Vec<String> = digits
        .rchunks(3)
        .rev()
        .map(|group| group.iter().collect())
        .collect();
    format!("{}c", groups.join(","))
}
