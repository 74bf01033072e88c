//! Data layer: world config plus the item and crop registries.
//!
//! Runs once in OnEnter(SimState::Loading). Reads the RON world config,
//! fills every registry, builds the starting world from the config, then
//! moves the sim into SimState::Playing.

pub mod config;
mod crops;
mod items;

use std::path::PathBuf;

use bevy::prelude::*;

use crate::shared::*;
use crate::world::rng::fresh_world_seed;

/// Where the world config lives. `None` keeps whatever `WorldConfig` is
/// already inserted.
#[derive(Resource, Debug, Clone)]
pub struct ConfigFile(pub Option<PathBuf>);

impl Default for ConfigFile {
    fn default() -> Self {
        Self(Some(PathBuf::from(config::DEFAULT_CONFIG_PATH)))
    }
}

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ConfigFile>()
            .init_resource::<WorldConfig>()
            .init_resource::<ItemRegistry>()
            .init_resource::<CropRegistry>()
            .add_systems(
                OnEnter(SimState::Loading),
                (load_world_config, load_registries, build_world).chain(),
            );
    }
}

fn load_world_config(file: Res<ConfigFile>, mut world_config: ResMut<WorldConfig>) {
    if let Some(path) = &file.0 {
        match config::load_config(path) {
            Ok(loaded) => {
                info!("[Data] World config loaded from {}", path.display());
                *world_config = loaded;
            }
            Err(e) => {
                warn!("[Data] {}. Using defaults.", e);
                *world_config = WorldConfig::default();
            }
        }
    }

    for fix in config::sanitize(&mut world_config) {
        warn!("[Data] Config: {}", fix);
    }
}

fn load_registries(
    mut item_registry: ResMut<ItemRegistry>,
    mut crop_registry: ResMut<CropRegistry>,
) {
    items::populate_items(&mut item_registry);
    info!("[Data] Items loaded: {}", item_registry.items.len());

    crops::populate_crops(&mut crop_registry);
    info!("[Data] Crops loaded: {}", crop_registry.crops.len());
}

/// Fresh world from the config: clock, starting plot, pending rolls, purse.
fn build_world(
    mut commands: Commands,
    world_config: Res<WorldConfig>,
    mut next_state: ResMut<NextState<SimState>>,
) {
    let seed = world_config.world_seed.unwrap_or_else(fresh_world_seed);

    let mut grid = WorldGrid::new(seed, world_config.economy.expansion_base_cost);
    grid.bootstrap(world_config.start_plot_radius, &world_config.house);

    let mut inventory = Inventory::default();
    for (item_id, quantity) in &world_config.starting_items {
        inventory.grant(item_id, *quantity);
    }

    info!(
        "[Data] World {} ready: {} owned tiles, {} coins",
        seed,
        grid.owned_count(),
        world_config.economy.starting_coins
    );

    commands.insert_resource(Clock::new(&world_config.clock));
    commands.insert_resource(PendingResourceGenerator::new(
        seed,
        world_config.spawn.clone(),
    ));
    commands.insert_resource(grid);
    commands.insert_resource(ResourceNodes::default());
    commands.insert_resource(inventory);
    commands.insert_resource(Wallet {
        coins: world_config.economy.starting_coins,
    });

    next_state.set(SimState::Playing);
}
