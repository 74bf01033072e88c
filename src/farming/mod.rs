//! Farming domain: tilling, watering, planting, overnight growth and harvest.
//!
//! The state machine itself lives on `OwnedTile` (see `tile`). The systems
//! here route `TileActionEvent`s to it and run the overnight pass on every
//! `SunriseEvent`.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::shared::*;
use crate::world::rng::planting_rotation;

pub mod tile;

pub struct FarmingPlugin;

impl Plugin for FarmingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            handle_tile_actions
                .in_set(SimSet::Actions)
                .run_if(in_state(SimState::Playing)),
        )
        // Sunrise can fire from the fast-forward too, so this runs after the clock.
        .add_systems(
            Update,
            on_sunrise
                .in_set(SimSet::DayReaction)
                .run_if(in_state(SimState::Playing)),
        );
    }
}

/// Notifications produced by player actions on tiles.
#[derive(SystemParam)]
pub struct FarmingWriters<'w> {
    pub tile_changed: EventWriter<'w, TileChangedEvent>,
    pub planted: EventWriter<'w, CropPlantedEvent>,
    pub harvested: EventWriter<'w, CropHarvestedEvent>,
    pub pickup: EventWriter<'w, ItemPickupEvent>,
}

pub fn handle_tile_actions(
    mut actions: EventReader<TileActionEvent>,
    mut grid: ResMut<WorldGrid>,
    mut inventory: ResMut<Inventory>,
    clock: Res<Clock>,
    crops: Res<CropRegistry>,
    mut writers: FarmingWriters,
) {
    let day = clock.day_number;
    let world_seed = grid.world_seed;
    let mut rng = rand::thread_rng();

    for event in actions.read() {
        let coord = event.coord;
        let Some(tile) = grid.tile_mut(coord) else {
            debug!("[Farming] {:?} on unowned tile {:?}", event.action, coord);
            continue;
        };

        let changed = match &event.action {
            TileAction::Till => tile.till(day),
            TileAction::Water => tile.water(day),
            TileAction::Plant(crop_id) => {
                let Some(def) = crops.get(crop_id) else {
                    warn!("[Farming] Unknown crop '{}', nothing planted", crop_id);
                    continue;
                };
                if def.stage_count == 0 {
                    warn!("[Farming] Crop '{}' has no growth stages", crop_id);
                    continue;
                }
                let rotation = planting_rotation(world_seed, coord, day);
                let planted = tile.plant(def, day, rotation, &mut *inventory);
                if planted {
                    info!("[Farming] Planted {} at {:?}", def.name, coord);
                    writers.planted.send(CropPlantedEvent {
                        coord,
                        crop_id: def.id.clone(),
                    });
                }
                planted
            }
            TileAction::Harvest => {
                let Some(crop_id) = tile.crop.as_ref().map(|c| c.crop_id.clone()) else {
                    debug!("[Farming] Nothing to harvest at {:?}", coord);
                    continue;
                };
                let Some(def) = crops.get(&crop_id) else {
                    warn!("[Farming] Crop '{}' at {:?} has no definition", crop_id, coord);
                    continue;
                };
                match tile.harvest(def, day, &mut *inventory, &mut rng) {
                    Some(outcome) => {
                        info!(
                            "[Farming] Harvested {} at {:?}: {:?}",
                            def.name, coord, outcome.yields
                        );
                        for (item_id, quantity) in &outcome.yields {
                            writers.pickup.send(ItemPickupEvent {
                                item_id: item_id.clone(),
                                quantity: *quantity,
                            });
                        }
                        writers.harvested.send(CropHarvestedEvent {
                            coord,
                            crop_id,
                            yields: outcome.yields,
                            regrew: outcome.regrew,
                        });
                        true
                    }
                    None => false,
                }
            }
        };

        if changed {
            writers.tile_changed.send(TileChangedEvent {
                coord,
                visual: tile.visual(),
            });
        } else {
            debug!("[Farming] {:?} had no effect at {:?}", event.action, coord);
        }
    }
}

/// Overnight pass: wet crops grow one stage, soil dries, disused soil
/// returns to grass.
pub fn on_sunrise(
    mut sunrise: EventReader<SunriseEvent>,
    clock: Res<Clock>,
    mut grid: ResMut<WorldGrid>,
    crops: Res<CropRegistry>,
    mut tile_writer: EventWriter<TileChangedEvent>,
    mut advanced_writer: EventWriter<CropAdvancedEvent>,
) {
    for _ in sunrise.read() {
        let day = clock.day_number;
        let mut grown = 0usize;

        for tile in grid.tiles_mut() {
            let def = match &tile.crop {
                Some(crop) => {
                    let def = crops.get(&crop.crop_id);
                    if def.is_none() {
                        warn!(
                            "[Farming] Crop '{}' at {:?} has no definition; it will not grow",
                            crop.crop_id, tile.coord
                        );
                    }
                    def
                }
                None => None,
            };

            let outcome = tile.on_sunrise(def, day);
            if let (Some(stage), Some(crop)) = (outcome.grew_to, &tile.crop) {
                grown += 1;
                advanced_writer.send(CropAdvancedEvent {
                    coord: tile.coord,
                    crop_id: crop.crop_id.clone(),
                    stage,
                });
            }
            if outcome.visual_changed {
                tile_writer.send(TileChangedEvent {
                    coord: tile.coord,
                    visual: tile.visual(),
                });
            }
        }

        info!("[Farming] Sunrise on day {}: {} crops grew", day, grown);
    }
}
