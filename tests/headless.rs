//! Headless integration tests for Islandstead.
//!
//! These drive the real domain plugins through Bevy's `MinimalPlugins` with a
//! manual time step, so every frame advances the sim by a fixed 100ms.
//!
//! Run with: `cargo test --test headless`

use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use islandstead::clock::ClockPlugin;
use islandstead::data::{ConfigFile, DataPlugin};
use islandstead::economy::coins::EconomyStats;
use islandstead::economy::EconomyPlugin;
use islandstead::farming::FarmingPlugin;
use islandstead::shared::*;
use islandstead::world::WorldPlugin;

// ─────────────────────────────────────────────────────────────────────────────
// Test App Builder
// ─────────────────────────────────────────────────────────────────────────────

const FRAME: Duration = Duration::from_millis(100);

/// Builds a headless app with all shared resources and events registered and
/// every sim plugin except saving. The world seed is pinned to 42.
fn build_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));

    // ── Sim State ────────────────────────────────────────────────────────
    app.init_state::<SimState>();

    // ── Shared Resources (mirrors main.rs) ───────────────────────────────
    app.init_resource::<Clock>()
        .init_resource::<WorldGrid>()
        .init_resource::<PendingResourceGenerator>()
        .init_resource::<ResourceNodes>()
        .init_resource::<Inventory>()
        .init_resource::<Wallet>()
        .init_resource::<ItemRegistry>()
        .init_resource::<CropRegistry>();

    // ── Config: no file, fixed seed ──────────────────────────────────────
    app.insert_resource(ConfigFile(None))
        .insert_resource(WorldConfig {
            world_seed: Some(42),
            ..Default::default()
        });

    // ── Shared Events (mirrors main.rs) ──────────────────────────────────
    app.add_event::<SunriseEvent>()
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
        .add_event::<ResourceDepletedEvent>();

    app.add_plugins((
        ClockPlugin,
        WorldPlugin,
        FarmingPlugin,
        EconomyPlugin,
        DataPlugin,
    ));

    app
}

/// Boots through Loading into Playing.
fn booted_app() -> App {
    let mut app = build_test_app();
    // First update enters Loading and builds the world; second applies NextState.
    app.update();
    app.update();
    app
}

fn tile_action(app: &mut App, coord: CellCoord, action: TileAction) {
    app.world_mut().send_event(TileActionEvent { coord, action });
    app.update();
}

/// Sleeps with a zero base duration, which finishes in a single frame.
fn sleep_through_night(app: &mut App) {
    app.world_mut().send_event(SleepRequestEvent {
        base_duration_secs: Some(0.0),
    });
    app.update();
}

fn tile(app: &App, coord: CellCoord) -> OwnedTile {
    app.world()
        .resource::<WorldGrid>()
        .tile(coord)
        .cloned()
        .unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Boot
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_headless_boot_reaches_playing_and_time_flows() {
    let mut app = booted_app();

    assert_eq!(
        app.world().resource::<State<SimState>>().get(),
        &SimState::Playing,
        "Expected to reach Playing after loading"
    );
    assert_eq!(app.world().resource::<WorldGrid>().owned_count(), 18);
    assert!(!app.world().resource::<ItemRegistry>().items.is_empty());

    let start = app.world().resource::<Clock>().current_time;
    for _ in 0..50 {
        app.update();
    }
    let clock = app.world().resource::<Clock>();
    assert!(clock.current_time > start, "clock should advance while playing");
    assert_eq!(clock.day_number, 1);
}

#[test]
fn test_pause_freezes_the_clock() {
    let mut app = booted_app();
    app.world_mut()
        .resource_mut::<NextState<SimState>>()
        .set(SimState::Paused);
    app.update();
    assert!(app.world().resource::<Clock>().paused);

    let frozen = app.world().resource::<Clock>().current_time;
    for _ in 0..20 {
        app.update();
    }
    assert_eq!(app.world().resource::<Clock>().current_time, frozen);

    app.world_mut()
        .resource_mut::<NextState<SimState>>()
        .set(SimState::Playing);
    app.update();
    app.update();
    assert!(!app.world().resource::<Clock>().paused);
    assert!(app.world().resource::<Clock>().current_time > frozen);
}

// ─────────────────────────────────────────────────────────────────────────────
// Land
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_buy_adjacent_tile_spends_coins_and_spawns_preview() {
    let mut app = booted_app();
    app.world_mut().resource_mut::<Wallet>().coins = 10_000;

    let coord = CellCoord::new(0, 2);
    let cost = app.world().resource::<WorldGrid>().next_tile_cost();
    let preview = app
        .world()
        .resource::<PendingResourceGenerator>()
        .generate(coord);

    app.world_mut().send_event(PurchaseTileEvent { coord });
    app.update();

    let world = app.world();
    assert!(world.resource::<WorldGrid>().is_owned(coord));
    assert_eq!(world.resource::<WorldGrid>().owned_count(), 19);
    assert_eq!(world.resource::<Wallet>().coins, 10_000 - cost);
    assert_eq!(world.resource::<EconomyStats>().total_coins_spent, cost as u64);
    assert_eq!(
        world.resource::<ResourceNodes>().get(coord).is_some(),
        preview.has_resource && preview.hit_points > 0,
        "the previewed resource is what appears"
    );
    assert!(world.resource::<PendingResourceGenerator>().peek(coord).is_none());
}

#[test]
fn test_buy_detached_tile_is_refused() {
    let mut app = booted_app();
    app.world_mut().resource_mut::<Wallet>().coins = 10_000;

    app.world_mut().send_event(PurchaseTileEvent {
        coord: CellCoord::new(10, 10),
    });
    app.update();

    assert!(!app.world().resource::<WorldGrid>().is_owned(CellCoord::new(10, 10)));
    assert_eq!(app.world().resource::<Wallet>().coins, 10_000);
}

#[test]
fn test_buy_without_coins_is_refused() {
    let mut app = booted_app();
    app.world_mut().resource_mut::<Wallet>().coins = 0;

    app.world_mut().send_event(PurchaseTileEvent {
        coord: CellCoord::new(0, 2),
    });
    app.update();

    assert!(!app.world().resource::<WorldGrid>().is_owned(CellCoord::new(0, 2)));
}

// ─────────────────────────────────────────────────────────────────────────────
// Farming
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_full_carrot_lifecycle() {
    let mut app = booted_app();
    let coord = CellCoord::new(0, 0);

    tile_action(&mut app, coord, TileAction::Till);
    assert_eq!(tile(&app, coord).terrain, TerrainState::Soil);

    tile_action(&mut app, coord, TileAction::Plant("carrot".into()));
    assert_eq!(app.world().resource::<Inventory>().count("carrot_seeds"), 9);

    // Four stages: three watered nights to maturity.
    for night in 1..=3u8 {
        tile_action(&mut app, coord, TileAction::Water);
        assert_eq!(tile(&app, coord).terrain, TerrainState::WetSoil);
        sleep_through_night(&mut app);

        let t = tile(&app, coord);
        assert_eq!(t.crop.as_ref().unwrap().growth_stage, night);
        assert_eq!(t.terrain, TerrainState::Soil, "soil dries overnight");
    }
    assert_eq!(app.world().resource::<Clock>().day_number, 4);

    tile_action(&mut app, coord, TileAction::Harvest);
    let t = tile(&app, coord);
    assert!(t.crop.is_none());
    assert_eq!(t.terrain, TerrainState::Soil);
    assert_eq!(app.world().resource::<Inventory>().count("carrot"), 1);
}

#[test]
fn test_dry_crop_does_not_grow() {
    let mut app = booted_app();
    let coord = CellCoord::new(1, 1);

    tile_action(&mut app, coord, TileAction::Till);
    tile_action(&mut app, coord, TileAction::Plant("carrot".into()));
    sleep_through_night(&mut app);

    let t = tile(&app, coord);
    assert_eq!(t.crop.as_ref().unwrap().growth_stage, 0);
    assert_eq!(t.terrain, TerrainState::Soil);
}

#[test]
fn test_untouched_soil_reverts_to_grass() {
    let mut app = booted_app();
    let coord = CellCoord::new(-1, 0);

    tile_action(&mut app, coord, TileAction::Till);
    sleep_through_night(&mut app);

    assert_eq!(tile(&app, coord).terrain, TerrainState::Grass);
}

#[test]
fn test_house_footprint_ignores_actions() {
    let mut app = booted_app();
    let coord = CellCoord::new(3, 0);

    tile_action(&mut app, coord, TileAction::Till);
    assert_eq!(tile(&app, coord).terrain, TerrainState::Decor);
}

// ─────────────────────────────────────────────────────────────────────────────
// Clock
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_sleep_advances_exactly_one_day_to_sunrise() {
    let mut app = booted_app();
    app.world_mut()
        .resource_mut::<Clock>()
        .set_time(22.0);
    app.world_mut().send_event(SleepRequestEvent {
        base_duration_secs: Some(1.0),
    });

    for _ in 0..40 {
        app.update();
        if !app.world().resource::<Clock>().is_fast_forwarding() {
            break;
        }
    }

    let clock = app.world().resource::<Clock>();
    assert!(!clock.is_fast_forwarding());
    assert_eq!(clock.day_number, 2);
    assert!((clock.current_time - 8.0).abs() < 0.01);
}

// ─────────────────────────────────────────────────────────────────────────────
// Resources & selling
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_chopping_a_tree_yields_wood() {
    let mut app = booted_app();
    let coord = CellCoord::new(1, 0);
    app.world_mut().resource_mut::<ResourceNodes>().spawn(
        coord,
        &PendingCell {
            has_resource: true,
            kind: ResourceKind::Tree,
            hit_points: 3,
            variant_index: 0,
        },
    );

    for _ in 0..3 {
        app.world_mut().send_event(HitResourceEvent { coord });
        app.update();
    }

    assert!(app.world().resource::<ResourceNodes>().get(coord).is_none());
    let wood = app.world().resource::<Inventory>().count(WOOD_ITEM);
    assert!((2..=3).contains(&wood), "got {} wood", wood);
}

#[test]
fn test_selling_produce_pays_coins() {
    let mut app = booted_app();
    app.world_mut().resource_mut::<Inventory>().grant("carrot", 2);
    let before = app.world().resource::<Wallet>().coins;

    app.world_mut().send_event(SellItemEvent {
        item_id: "carrot".into(),
        quantity: 2,
    });
    app.update();

    assert_eq!(app.world().resource::<Wallet>().coins, before + 70);
    assert_eq!(app.world().resource::<Inventory>().count("carrot"), 0);
    assert_eq!(app.world().resource::<EconomyStats>().total_coins_earned, 70);
}
