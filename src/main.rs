mod shared;
mod clock;
mod world;
mod farming;
mod economy;
mod save;
mod data;

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use shared::*;

/// Fixed sim rate for the headless runner.
const TICKS_PER_SECOND: f64 = 60.0;

fn main() {
    App::new()
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / TICKS_PER_SECOND,
            ))),
        )
        .add_plugins((LogPlugin::default(), StatesPlugin))
        // Sim state
        .init_state::<SimState>()
        // Shared resources
        .init_resource::<Clock>()
        .init_resource::<WorldGrid>()
        .init_resource::<PendingResourceGenerator>()
        .init_resource::<ResourceNodes>()
        .init_resource::<Inventory>()
        .init_resource::<Wallet>()
        .init_resource::<ItemRegistry>()
        .init_resource::<CropRegistry>()
        .init_resource::<WorldConfig>()
        // Events
        .add_event::<SunriseEvent>()
        .add_event::<DayChangedEvent>()
        .add_event::<PhaseChangedEvent>()
        .add_event::<ClockTickEvent>()
        .add_event::<SleepRequestEvent>()
        .add_event::<PurchaseTileEvent>()
        .add_event::<TilePurchasedEvent>()
        .add_event::<TileActionEvent>()
        .add_event::<TileChangedEvent>()
        .add_event::<CropPlantedEvent>()
        .add_event::<CropAdvancedEvent>()
        .add_event::<CropHarvestedEvent>()
        .add_event::<ItemPickupEvent>()
        .add_event::<CoinsChangedEvent>()
        .add_event::<SellItemEvent>()
        .add_event::<HitResourceEvent>()
        .add_event::<ResourceDepletedEvent>()
        // Domain plugins
        .add_plugins(clock::ClockPlugin)
        .add_plugins(world::WorldPlugin)
        .add_plugins(farming::FarmingPlugin)
        .add_plugins(economy::EconomyPlugin)
        .add_plugins(save::SavePlugin)
        // Data loading
        .add_plugins(data::DataPlugin)
        .run();
}
