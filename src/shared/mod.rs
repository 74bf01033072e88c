//! Shared components, resources, events, and states for Islandstead.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ═══════════════════════════════════════════════════════════════════════
// SIM STATE: top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum SimState {
    #[default]
    Loading,
    Playing,
    Paused,
}

/// Frame ordering inside `Update`: player requests first, then the clock,
/// then everything that reacts to a sunrise.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    Actions,
    Clock,
    DayReaction,
}

// ═══════════════════════════════════════════════════════════════════════
// CLOCK
// ═══════════════════════════════════════════════════════════════════════

pub const HOURS_PER_DAY: f32 = 24.0;

/// Continuous in-game clock. `current_time` is an hour in [0, 24).
#[derive(Resource, Debug, Clone)]
pub struct Clock {
    pub current_time: f32,
    pub day_number: u32,
    pub paused: bool,
    pub sunrise_hour: f32,
    pub sunset_hour: f32,
    /// Real seconds for one full 24h in-game day.
    pub day_length_seconds: f32,
    /// Default base length of a sleep fast-forward, in real seconds.
    pub sleep_base_seconds: f32,
    pub(crate) fast_forward: Option<FastForwardRun>,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(&ClockConfig::default())
    }
}

impl Clock {
    pub fn new(config: &ClockConfig) -> Self {
        Self {
            current_time: config.start_hour.rem_euclid(HOURS_PER_DAY),
            day_number: 1,
            paused: false,
            sunrise_hour: config.sunrise_hour,
            sunset_hour: config.sunset_hour,
            day_length_seconds: config.day_length_seconds,
            sleep_base_seconds: config.sleep_base_seconds,
            fast_forward: None,
        }
    }

    /// In-game hours that pass per real second.
    pub fn hours_per_second(&self) -> f32 {
        HOURS_PER_DAY / self.day_length_seconds.max(1.0)
    }

    pub fn is_daytime(&self) -> bool {
        self.is_daytime_at(self.current_time)
    }

    pub fn is_daytime_at(&self, hour: f32) -> bool {
        hour >= self.sunrise_hour && hour < self.sunset_hour
    }

    pub fn is_fast_forwarding(&self) -> bool {
        self.fast_forward.is_some()
    }

    /// "08:30 AM" style display string.
    pub fn formatted_time(&self) -> String {
        let hours = self.current_time.floor() as u32;
        let minutes = ((self.current_time - hours as f32) * 60.0).floor() as u32;
        let is_pm = hours >= 12;
        let display_hour = match hours % 12 {
            0 => 12,
            h => h,
        };
        format!(
            "{:02}:{:02} {}",
            display_hour,
            minutes.min(59),
            if is_pm { "PM" } else { "AM" }
        )
    }
}

/// Bookkeeping for an in-flight sleep fast-forward.
#[derive(Debug, Clone, PartialEq)]
pub struct FastForwardRun {
    pub start_time: f32,
    pub hours_to_target: f32,
    pub duration: f32,
    pub elapsed: f32,
    pub crossed_sunrise: bool,
}

/// One notification produced by a clock operation, in emission order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockSignal {
    Sunrise,
    DayChanged(u32),
    PhaseChanged(bool),
    Tick(f32),
}

// ═══════════════════════════════════════════════════════════════════════
// GRID COORDINATES
// ═══════════════════════════════════════════════════════════════════════

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Wraps at the `i32` edges like `coord_seed` does.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.wrapping_add(dx), self.y.wrapping_add(dy))
    }

    /// Cardinal neighbours in E, W, N, S order.
    pub const fn neighbors(self) -> [CellCoord; 4] {
        [
            self.offset(1, 0),
            self.offset(-1, 0),
            self.offset(0, 1),
            self.offset(0, -1),
        ]
    }
}

impl From<(i32, i32)> for CellCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ITEMS & INVENTORY
// ═══════════════════════════════════════════════════════════════════════

/// Unique identifier for every item type in the game.
pub type ItemId = String;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: ItemId,
    pub name: String,
    pub sell_price: u32,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct ItemRegistry {
    pub items: HashMap<ItemId, ItemDef>,
}

impl ItemRegistry {
    pub fn get(&self, id: &str) -> Option<&ItemDef> {
        self.items.get(id)
    }
}

/// Inventory capability the farming core consumes. Slot layout and stacking
/// belong to the inventory UI; the core only needs counts.
pub trait ItemStore {
    fn can_afford(&self, item_id: &str, quantity: u32) -> bool;
    /// Removes `quantity` if available. Returns false (and removes nothing) otherwise.
    fn spend(&mut self, item_id: &str, quantity: u32) -> bool;
    fn grant(&mut self, item_id: &str, quantity: u32);
}

/// Coin balance capability used by land purchases.
pub trait CoinPurse {
    fn coins(&self) -> u32;
    fn spend_coins(&mut self, amount: u32) -> bool;
    fn add_coins(&mut self, amount: u32);
}

/// Flat item-count inventory.
#[derive(Resource, Debug, Clone, Default)]
pub struct Inventory {
    pub counts: HashMap<ItemId, u32>,
}

impl Inventory {
    pub fn count(&self, item_id: &str) -> u32 {
        self.counts.get(item_id).copied().unwrap_or(0)
    }

    /// Flat export, sorted by item id so saves diff cleanly.
    pub fn export_counts(&self) -> Vec<(ItemId, u32)> {
        let mut out: Vec<(ItemId, u32)> = self
            .counts
            .iter()
            .filter(|(_, q)| **q > 0)
            .map(|(id, q)| (id.clone(), *q))
            .collect();
        out.sort();
        out
    }

    pub fn import_counts(&mut self, entries: &[(ItemId, u32)]) {
        self.counts.clear();
        for (id, quantity) in entries {
            if *quantity > 0 {
                *self.counts.entry(id.clone()).or_insert(0) += quantity;
            }
        }
    }
}

impl ItemStore for Inventory {
    fn can_afford(&self, item_id: &str, quantity: u32) -> bool {
        self.count(item_id) >= quantity
    }

    fn spend(&mut self, item_id: &str, quantity: u32) -> bool {
        if !self.can_afford(item_id, quantity) {
            return false;
        }
        if let Some(have) = self.counts.get_mut(item_id) {
            *have -= quantity;
            if *have == 0 {
                self.counts.remove(item_id);
            }
        }
        true
    }

    fn grant(&mut self, item_id: &str, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let entry = self.counts.entry(item_id.to_string()).or_insert(0);
        *entry = entry.saturating_add(quantity);
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct Wallet {
    pub coins: u32,
}

impl CoinPurse for Wallet {
    fn coins(&self) -> u32 {
        self.coins
    }

    fn spend_coins(&mut self, amount: u32) -> bool {
        if amount == 0 {
            return true;
        }
        if self.coins < amount {
            return false;
        }
        self.coins -= amount;
        true
    }

    fn add_coins(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CROPS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RareYield {
    pub item_id: ItemId,
    /// Percent chance per harvest, 0..=100.
    pub chance_percent: f32,
    /// true = replaces the normal output, false = added on top of it.
    pub replaces: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropDef {
    pub id: ItemId,
    pub name: String,
    pub seed_id: ItemId,
    /// Growth stages, 0..stage_count. One stage per sunrise on wet soil.
    pub stage_count: u8,
    pub regrows: bool,
    pub output_item: ItemId,
    pub output_quantity: u32,
    pub rare: Option<RareYield>,
}

impl CropDef {
    pub fn mature_stage(&self) -> u8 {
        self.stage_count.saturating_sub(1)
    }

    /// Stage a regrowing crop falls back to after harvest.
    pub fn regrow_stage(&self) -> u8 {
        self.stage_count.saturating_sub(2)
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct CropRegistry {
    pub crops: HashMap<ItemId, CropDef>,
}

impl CropRegistry {
    pub fn get(&self, id: &str) -> Option<&CropDef> {
        self.crops.get(id)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// OWNED LAND
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TerrainState {
    #[default]
    Grass,
    Soil,
    WetSoil,
    /// Footprint under a structure. Inert to every tile action.
    Decor,
}

/// What a renderer should draw for a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileVisual {
    Grass,
    Soil,
    WetSoil,
    SeededDry,
    SeededWet,
    Decor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantedCrop {
    pub crop_id: ItemId,
    pub growth_stage: u8,
    /// Yaw in degrees, fixed at planting time.
    pub rotation_seed: f32,
    pub planted_day: u32,
    pub last_growth_day: u32,
    pub last_water_day: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnedTile {
    pub coord: CellCoord,
    pub terrain: TerrainState,
    pub crop: Option<PlantedCrop>,
    pub last_tilled_day: u32,
    pub last_water_day: u32,
}

impl OwnedTile {
    /// Fresh grass tile.
    pub fn new(coord: CellCoord) -> Self {
        Self {
            coord,
            terrain: TerrainState::Grass,
            crop: None,
            last_tilled_day: 0,
            last_water_day: 0,
        }
    }
}

/// All purchased land. Tiles are created by bootstrap or purchase and never removed.
#[derive(Resource, Debug, Clone, Default)]
pub struct WorldGrid {
    pub world_seed: i32,
    pub base_cost: u32,
    pub(crate) tiles: HashMap<CellCoord, OwnedTile>,
}

// ═══════════════════════════════════════════════════════════════════════
// PROCEDURAL RESOURCES
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResourceKind {
    #[default]
    Tree,
    Rock,
}

/// Pre-rolled outcome for a not-yet-owned coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCell {
    pub has_resource: bool,
    /// Meaningful only when `has_resource`.
    pub kind: ResourceKind,
    pub hit_points: u32,
    /// Selected visual variant, -1 when there is none.
    pub variant_index: i32,
}

impl PendingCell {
    pub const EMPTY: PendingCell = PendingCell {
        has_resource: false,
        kind: ResourceKind::Tree,
        hit_points: 0,
        variant_index: -1,
    };

    pub fn resource(&self) -> Option<ResourceKind> {
        self.has_resource.then_some(self.kind)
    }
}

/// Lazily rolled, memoized pending cells for unowned land.
#[derive(Resource, Debug, Clone, Default)]
pub struct PendingResourceGenerator {
    pub world_seed: i32,
    pub tuning: SpawnTuning,
    pub(crate) cells: HashMap<CellCoord, PendingCell>,
}

/// A materialized tree or rock standing on owned land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceNode {
    pub kind: ResourceKind,
    pub hit_points: u32,
    pub variant_index: i32,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct ResourceNodes {
    pub nodes: HashMap<CellCoord, ResourceNode>,
}

// ═══════════════════════════════════════════════════════════════════════
// CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    pub day_length_seconds: f32,
    pub start_hour: f32,
    pub sunrise_hour: f32,
    pub sunset_hour: f32,
    pub sleep_base_seconds: f32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            day_length_seconds: 600.0,
            start_hour: 8.0,
            sunrise_hour: 8.0,
            sunset_hour: 20.0,
            sleep_base_seconds: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Chance an unowned cell rolls a resource at all.
    pub spawn_chance: f64,
    /// Share of resources that are trees; the rest are rocks.
    pub tree_weight: f64,
    pub tree_hp: u32,
    pub rock_hp: u32,
    pub tree_variants: usize,
    pub rock_variants: usize,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            spawn_chance: 0.25,
            tree_weight: 0.66,
            tree_hp: 3,
            rock_hp: 3,
            tree_variants: 3,
            rock_variants: 3,
        }
    }
}

impl SpawnTuning {
    pub fn hit_points(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Tree => self.tree_hp,
            ResourceKind::Rock => self.rock_hp,
        }
    }

    pub fn variant_count(&self, kind: ResourceKind) -> usize {
        match kind {
            ResourceKind::Tree => self.tree_variants,
            ResourceKind::Rock => self.rock_variants,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub expansion_base_cost: u32,
    pub starting_coins: u32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            expansion_base_cost: 5,
            starting_coins: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseConfig {
    /// Bottom-left tile of the footprint.
    pub origin: (i32, i32),
    pub size: (i32, i32),
}

impl Default for HouseConfig {
    fn default() -> Self {
        Self {
            origin: (2, -1),
            size: (3, 3),
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Fixed seed for the world; a fresh one is drawn when absent.
    pub world_seed: Option<i32>,
    /// Starting plot is a (2r+1)² square centred on the origin.
    pub start_plot_radius: i32,
    /// Inventory a new world starts with.
    pub starting_items: Vec<(ItemId, u32)>,
    pub clock: ClockConfig,
    pub spawn: SpawnTuning,
    pub economy: EconomyConfig,
    pub house: HouseConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            world_seed: None,
            start_plot_radius: 1,
            starting_items: vec![("carrot_seeds".into(), 10), ("strawberry_seeds".into(), 3)],
            clock: ClockConfig::default(),
            spawn: SpawnTuning::default(),
            economy: EconomyConfig::default(),
            house: HouseConfig::default(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS: cross-domain communication
// ═══════════════════════════════════════════════════════════════════════

/// The clock crossed the sunrise hour. Crops grow, soil dries.
#[derive(Event, Debug, Clone)]
pub struct SunriseEvent;

#[derive(Event, Debug, Clone)]
pub struct DayChangedEvent {
    pub day: u32,
}

#[derive(Event, Debug, Clone)]
pub struct PhaseChangedEvent {
    pub is_daytime: bool,
}

/// Fired once per clock update, even while paused.
#[derive(Event, Debug, Clone)]
pub struct ClockTickEvent {
    pub time: f32,
}

/// Fast-forward to the next sunrise. `None` uses the clock's configured length.
#[derive(Event, Debug, Clone, Default)]
pub struct SleepRequestEvent {
    pub base_duration_secs: Option<f32>,
}

#[derive(Event, Debug, Clone)]
pub struct PurchaseTileEvent {
    pub coord: CellCoord,
}

#[derive(Event, Debug, Clone)]
pub struct TilePurchasedEvent {
    pub coord: CellCoord,
    pub cost: u32,
    pub resource: Option<PendingCell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileAction {
    Till,
    Water,
    Plant(ItemId),
    Harvest,
}

#[derive(Event, Debug, Clone)]
pub struct TileActionEvent {
    pub coord: CellCoord,
    pub action: TileAction,
}

/// A tile's look changed; renderers swap the prefab.
#[derive(Event, Debug, Clone)]
pub struct TileChangedEvent {
    pub coord: CellCoord,
    pub visual: TileVisual,
}

#[derive(Event, Debug, Clone)]
pub struct CropPlantedEvent {
    pub coord: CellCoord,
    pub crop_id: ItemId,
}

#[derive(Event, Debug, Clone)]
pub struct CropAdvancedEvent {
    pub coord: CellCoord,
    pub crop_id: ItemId,
    pub stage: u8,
}

#[derive(Event, Debug, Clone)]
pub struct CropHarvestedEvent {
    pub coord: CellCoord,
    pub crop_id: ItemId,
    pub yields: Vec<(ItemId, u32)>,
    pub regrew: bool,
}

#[derive(Event, Debug, Clone)]
pub struct ItemPickupEvent {
    pub item_id: ItemId,
    pub quantity: u32,
}

#[derive(Event, Debug, Clone)]
pub struct CoinsChangedEvent {
    pub balance: u32,
    /// positive = gain, negative = spend
    pub delta: i64,
    pub reason: String,
}

/// Sell items from the inventory at their registry price.
#[derive(Event, Debug, Clone)]
pub struct SellItemEvent {
    pub item_id: ItemId,
    pub quantity: u32,
}

#[derive(Event, Debug, Clone)]
pub struct HitResourceEvent {
    pub coord: CellCoord,
}

#[derive(Event, Debug, Clone)]
pub struct ResourceDepletedEvent {
    pub coord: CellCoord,
    pub kind: ResourceKind,
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const MAX_TILE_COST: u32 = 50_000;
pub const EARLY_DISCOUNT: f64 = 0.9;
pub const COST_GROWTH_RATE: f64 = 1.035;
pub const COST_CURVE_STRENGTH: f64 = 0.9;

pub const WOOD_ITEM: &str = "wood";
pub const STONE_ITEM: &str = "stone";
