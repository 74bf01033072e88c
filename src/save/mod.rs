//! Save / load for the farm.
//!
//! One JSON file per slot. Everything needed to rebuild the simulation is in
//! `FarmSave`, including the pending-cell table so ghost previews of unowned
//! land look the same after a reload.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// PUBLIC TYPES
// ═══════════════════════════════════════════════════════════════════════

pub const SAVE_VERSION: u32 = 1;

/// Sent by UI (pause menu) to trigger a manual save.
#[derive(Event, Debug, Clone)]
pub struct SaveRequestEvent {
    pub slot: u8,
}

/// Sent by UI to trigger loading a specific slot.
#[derive(Event, Debug, Clone)]
pub struct LoadRequestEvent {
    pub slot: u8,
}

/// Sent by SavePlugin after a save completes (success or failure).
#[derive(Event, Debug, Clone)]
pub struct SaveCompleteEvent {
    pub slot: u8,
    pub success: bool,
    pub error_message: Option<String>,
}

/// Sent by SavePlugin after a load completes.
#[derive(Event, Debug, Clone)]
pub struct LoadCompleteEvent {
    pub slot: u8,
    pub success: bool,
    pub error_message: Option<String>,
}

#[derive(Resource, Debug, Clone)]
pub struct SaveSettings {
    pub directory: PathBuf,
    pub active_slot: u8,
    /// Save to the active slot at the start of every day.
    pub autosave: bool,
}

impl Default for SaveSettings {
    fn default() -> Self {
        Self {
            directory: saves_directory(),
            active_slot: 0,
            autosave: true,
        }
    }
}

impl SaveSettings {
    pub fn slot_path(&self, slot: u8) -> PathBuf {
        self.directory.join(format!("slot_{}.json", slot))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SAVE FILE LAYOUT
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedTile {
    pub coord: CellCoord,
    pub terrain: TerrainState,
    pub crop_id: Option<ItemId>,
    pub growth_stage: u8,
    pub rotation_seed: f32,
    pub planted_day: u32,
    pub last_growth_day: u32,
    pub last_tilled_day: u32,
    pub last_water_day: u32,
}

impl From<&OwnedTile> for SavedTile {
    fn from(tile: &OwnedTile) -> Self {
        let crop = tile.crop.as_ref();
        Self {
            coord: tile.coord,
            terrain: tile.terrain,
            crop_id: crop.map(|c| c.crop_id.clone()),
            growth_stage: crop.map_or(0, |c| c.growth_stage),
            rotation_seed: crop.map_or(0.0, |c| c.rotation_seed),
            planted_day: crop.map_or(0, |c| c.planted_day),
            last_growth_day: crop.map_or(0, |c| c.last_growth_day),
            last_tilled_day: tile.last_tilled_day,
            last_water_day: tile.last_water_day,
        }
    }
}

impl SavedTile {
    pub fn into_tile(self) -> OwnedTile {
        let crop = self.crop_id.map(|crop_id| PlantedCrop {
            crop_id,
            growth_stage: self.growth_stage,
            rotation_seed: self.rotation_seed,
            planted_day: self.planted_day,
            last_growth_day: self.last_growth_day,
            last_water_day: self.last_water_day,
        });
        OwnedTile {
            coord: self.coord,
            terrain: self.terrain,
            crop,
            last_tilled_day: self.last_tilled_day,
            last_water_day: self.last_water_day,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmSave {
    pub version: u32,
    pub save_timestamp: u64,
    pub world_seed: i32,
    pub day_number: u32,
    pub current_time: f32,
    pub coins: u32,
    pub inventory: Vec<(ItemId, u32)>,
    pub tiles: Vec<SavedTile>,
    pub pending: Vec<(CellCoord, PendingCell)>,
    pub resource_nodes: Vec<(CellCoord, ResourceNode)>,
}

impl FarmSave {
    pub fn capture(
        clock: &Clock,
        grid: &WorldGrid,
        pending: &PendingResourceGenerator,
        nodes: &ResourceNodes,
        inventory: &Inventory,
        wallet: &Wallet,
    ) -> Self {
        Self {
            version: SAVE_VERSION,
            save_timestamp: current_timestamp(),
            world_seed: grid.world_seed,
            day_number: clock.day_number,
            current_time: clock.current_time,
            coins: wallet.coins,
            inventory: inventory.export_counts(),
            tiles: grid.sorted_tiles().into_iter().map(SavedTile::from).collect(),
            pending: pending.export(),
            resource_nodes: nodes.export(),
        }
    }

    /// Overwrite live state with this save. Tuning (clock lengths, spawn
    /// odds, base cost) stays as configured.
    pub fn apply(
        self,
        clock: &mut Clock,
        grid: &mut WorldGrid,
        pending: &mut PendingResourceGenerator,
        nodes: &mut ResourceNodes,
        inventory: &mut Inventory,
        wallet: &mut Wallet,
    ) {
        clock.fast_forward = None;
        clock.day_number = self.day_number.max(1);
        clock.current_time = self.current_time.rem_euclid(HOURS_PER_DAY);

        grid.world_seed = self.world_seed;
        grid.clear();
        for saved in self.tiles {
            grid.restore_tile(saved.into_tile());
        }

        pending.world_seed = self.world_seed;
        pending.import(self.pending);
        nodes.import(self.resource_nodes);
        inventory.import_counts(&self.inventory);
        wallet.coins = self.coins;
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| format!("Serialization failed: {}", e))
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Deserialization failed: {}", e))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// FILESYSTEM HELPERS
// ═══════════════════════════════════════════════════════════════════════

fn saves_directory() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));
    exe_dir.join("saves")
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub fn write_save(path: &Path, save: &FarmSave) -> Result<(), String> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .map_err(|e| format!("Could not create {}: {}", dir.display(), e))?;
    }
    let json = save.to_json()?;

    // Write to a temp file first, then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, &json)
        .map_err(|e| format!("Write failed for {}: {}", tmp_path.display(), e))?;
    fs::rename(&tmp_path, path).map_err(|e| format!("Rename failed: {}", e))?;
    Ok(())
}

pub fn read_save(path: &Path) -> Result<FarmSave, String> {
    if !path.exists() {
        return Err(format!("{} does not exist", path.display()));
    }
    let json = fs::read_to_string(path)
        .map_err(|e| format!("Read failed for {}: {}", path.display(), e))?;
    let save = FarmSave::from_json(&json)?;

    if save.version != SAVE_VERSION {
        warn!(
            "[Save] {} has version {} but current version is {}. Attempting to load anyway.",
            path.display(),
            save.version,
            SAVE_VERSION
        );
    }
    Ok(save)
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SaveSettings>()
            .add_event::<SaveRequestEvent>()
            .add_event::<LoadRequestEvent>()
            .add_event::<SaveCompleteEvent>()
            .add_event::<LoadCompleteEvent>()
            // Autosave sees the farm after the overnight pass.
            .add_systems(
                Update,
                (autosave_on_day_change, handle_save_request, handle_load_request)
                    .chain()
                    .after(SimSet::DayReaction)
                    .run_if(in_state(SimState::Playing).or(in_state(SimState::Paused))),
            );
    }
}

/// Every resource a save touches.
#[derive(SystemParam)]
pub struct FarmState<'w> {
    pub clock: ResMut<'w, Clock>,
    pub grid: ResMut<'w, WorldGrid>,
    pub pending: ResMut<'w, PendingResourceGenerator>,
    pub nodes: ResMut<'w, ResourceNodes>,
    pub inventory: ResMut<'w, Inventory>,
    pub wallet: ResMut<'w, Wallet>,
}

impl FarmState<'_> {
    fn capture(&self) -> FarmSave {
        FarmSave::capture(
            &self.clock,
            &self.grid,
            &self.pending,
            &self.nodes,
            &self.inventory,
            &self.wallet,
        )
    }

    fn apply(&mut self, save: FarmSave) {
        save.apply(
            &mut self.clock,
            &mut self.grid,
            &mut self.pending,
            &mut self.nodes,
            &mut self.inventory,
            &mut self.wallet,
        );
    }
}

fn handle_save_request(
    mut save_events: EventReader<SaveRequestEvent>,
    mut complete_events: EventWriter<SaveCompleteEvent>,
    mut settings: ResMut<SaveSettings>,
    state: FarmState,
) {
    for ev in save_events.read() {
        let slot = ev.slot;
        settings.active_slot = slot;
        let path = settings.slot_path(slot);

        match write_save(&path, &state.capture()) {
            Ok(()) => {
                info!(
                    "[Save] Saved day {} to slot {} ({} tiles)",
                    state.clock.day_number,
                    slot,
                    state.grid.owned_count()
                );
                complete_events.send(SaveCompleteEvent {
                    slot,
                    success: true,
                    error_message: None,
                });
            }
            Err(e) => {
                warn!("[Save] Save to slot {} FAILED: {}", slot, e);
                complete_events.send(SaveCompleteEvent {
                    slot,
                    success: false,
                    error_message: Some(e),
                });
            }
        }
    }
}

fn handle_load_request(
    mut load_events: EventReader<LoadRequestEvent>,
    mut complete_events: EventWriter<LoadCompleteEvent>,
    mut settings: ResMut<SaveSettings>,
    mut state: FarmState,
) {
    for ev in load_events.read() {
        let slot = ev.slot;
        match read_save(&settings.slot_path(slot)) {
            Ok(save) => {
                settings.active_slot = slot;
                state.apply(save);
                info!(
                    "[Save] Loaded slot {}: day {}, {} tiles, {} pending cells",
                    slot,
                    state.clock.day_number,
                    state.grid.owned_count(),
                    state.pending.len()
                );
                complete_events.send(LoadCompleteEvent {
                    slot,
                    success: true,
                    error_message: None,
                });
            }
            Err(e) => {
                warn!("[Save] Load from slot {} FAILED: {}", slot, e);
                complete_events.send(LoadCompleteEvent {
                    slot,
                    success: false,
                    error_message: Some(e),
                });
            }
        }
    }
}

fn autosave_on_day_change(
    mut day_events: EventReader<DayChangedEvent>,
    mut save_writer: EventWriter<SaveRequestEvent>,
    settings: Res<SaveSettings>,
) {
    for ev in day_events.read() {
        if !settings.autosave {
            continue;
        }
        info!("[Save] Autosaving at the start of day {}", ev.day);
        save_writer.send(SaveRequestEvent {
            slot: settings.active_slot,
        });
    }
}
