//! World domain plugin for Islandstead.
//!
//! Responsible for:
//! - Owned land and adjacency-gated expansion (`grid`)
//! - Deterministic, coordinate-seeded resource rolls for unowned land (`rng`, `pending`)
//! - Trees and rocks materialized on purchased land, and chopping them (`nodes`)

use bevy::prelude::*;

use crate::shared::*;

pub mod grid;
pub mod nodes;
pub mod pending;
pub mod rng;

use nodes::HitOutcome;

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ResourceNodes>().add_systems(
            Update,
            (
                handle_purchase_requests,
                spawn_resource_nodes,
                handle_resource_hits,
            )
                .chain()
                .in_set(SimSet::Actions)
                .run_if(in_state(SimState::Playing)),
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// Buys requested tiles with coins from the wallet.
pub fn handle_purchase_requests(
    mut requests: EventReader<PurchaseTileEvent>,
    mut grid: ResMut<WorldGrid>,
    mut pending: ResMut<PendingResourceGenerator>,
    mut wallet: ResMut<Wallet>,
    mut purchased_writer: EventWriter<TilePurchasedEvent>,
    mut tile_writer: EventWriter<TileChangedEvent>,
    mut coins_writer: EventWriter<CoinsChangedEvent>,
) {
    for request in requests.read() {
        let coord = request.coord;
        let purchase = grid.try_buy_tile(coord, &mut pending, |cost| wallet.spend_coins(cost));

        let Some(purchase) = purchase else {
            debug!(
                "[World] Purchase of {:?} refused (owned: {}, adjacent: {}, coins: {})",
                coord,
                grid.is_owned(coord),
                grid.is_adjacent_to_owned(coord),
                wallet.coins()
            );
            continue;
        };

        info!(
            "[World] Bought tile {:?} for {} coins ({} owned, resource: {:?})",
            purchase.coord,
            purchase.cost,
            grid.owned_count(),
            purchase.resource.and_then(|c| c.resource())
        );

        if purchase.cost > 0 {
            coins_writer.send(CoinsChangedEvent {
                balance: wallet.coins(),
                delta: -(purchase.cost as i64),
                reason: format!("Land at ({}, {})", coord.x, coord.y),
            });
        }
        tile_writer.send(TileChangedEvent {
            coord,
            visual: TileVisual::Grass,
        });
        purchased_writer.send(TilePurchasedEvent {
            coord: purchase.coord,
            cost: purchase.cost,
            resource: purchase.resource,
        });
    }
}

/// Turns the previewed resource of a freshly bought tile into a real node.
pub fn spawn_resource_nodes(
    mut purchased: EventReader<TilePurchasedEvent>,
    mut nodes: ResMut<ResourceNodes>,
) {
    for event in purchased.read() {
        let Some(cell) = event.resource else {
            continue;
        };
        if nodes.spawn(event.coord, &cell) {
            info!(
                "[World] {:?} (variant {}) now stands at {:?}",
                cell.kind, cell.variant_index, event.coord
            );
        } else {
            warn!(
                "[World] Resource at {:?} has no hit points; leaving the tile bare",
                event.coord
            );
        }
    }
}

/// Chops trees and breaks rocks. Depleted nodes drop their yield straight
/// into the inventory.
pub fn handle_resource_hits(
    mut hits: EventReader<HitResourceEvent>,
    mut nodes: ResMut<ResourceNodes>,
    mut inventory: ResMut<Inventory>,
    mut depleted_writer: EventWriter<ResourceDepletedEvent>,
    mut pickup_writer: EventWriter<ItemPickupEvent>,
) {
    let mut rng = rand::thread_rng();
    for hit in hits.read() {
        match nodes.hit(hit.coord, &mut rng) {
            None => {
                debug!("[World] Nothing to hit at {:?}", hit.coord);
            }
            Some(HitOutcome::Damaged { remaining }) => {
                debug!("[World] Hit {:?}, {} hp left", hit.coord, remaining);
            }
            Some(HitOutcome::Depleted {
                kind,
                item_id,
                quantity,
            }) => {
                inventory.grant(item_id, quantity);
                info!(
                    "[World] {:?} at {:?} depleted, +{} {}",
                    kind, hit.coord, quantity, item_id
                );
                depleted_writer.send(ResourceDepletedEvent {
                    coord: hit.coord,
                    kind,
                });
                pickup_writer.send(ItemPickupEvent {
                    item_id: item_id.to_string(),
                    quantity,
                });
            }
        }
    }
}
