//! Economy domain: coin bookkeeping and selling produce.
//!
//! Land purchases spend coins in the world domain; this domain earns them
//! and keeps the running totals.

use bevy::prelude::*;

use crate::shared::*;

pub mod coins;
pub mod sell;

use coins::{track_coin_changes, EconomyStats};
use sell::handle_sell;

pub struct EconomyPlugin;

impl Plugin for EconomyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EconomyStats>()
            .add_systems(
                Update,
                handle_sell
                    .in_set(SimSet::Actions)
                    .run_if(in_state(SimState::Playing)),
            )
            // Coin changes can arrive from any domain at any time.
            .add_systems(Update, track_coin_changes.after(SimSet::DayReaction));
    }
}
