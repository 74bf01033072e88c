//! Selling produce for coins.

use bevy::prelude::*;

use crate::shared::*;

/// Move `quantity` of `item_id` out of `store` and pay for it. Returns the
/// coins earned, or `None` if the item is unknown or not in stock.
pub fn sell_items(
    store: &mut impl ItemStore,
    purse: &mut impl CoinPurse,
    registry: &ItemRegistry,
    item_id: &str,
    quantity: u32,
) -> Option<u32> {
    let def = registry.get(item_id)?;
    if quantity == 0 || !store.spend(item_id, quantity) {
        return None;
    }
    let earned = def.sell_price.saturating_mul(quantity);
    purse.add_coins(earned);
    Some(earned)
}

pub fn handle_sell(
    mut requests: EventReader<SellItemEvent>,
    mut inventory: ResMut<Inventory>,
    mut wallet: ResMut<Wallet>,
    registry: Res<ItemRegistry>,
    mut coins_writer: EventWriter<CoinsChangedEvent>,
) {
    for ev in requests.read() {
        if registry.get(&ev.item_id).is_none() {
            warn!("[Economy] Sell failed, unknown item '{}'", ev.item_id);
            continue;
        }
        match sell_items(&mut *inventory, &mut *wallet, &registry, &ev.item_id, ev.quantity) {
            Some(earned) => {
                coins_writer.send(CoinsChangedEvent {
                    balance: wallet.coins(),
                    delta: earned as i64,
                    reason: format!("Sold {} × {}", ev.quantity, ev.item_id),
                });
            }
            None => {
                debug!(
                    "[Economy] Sell failed, have {} '{}', want {}",
                    inventory.count(&ev.item_id),
                    ev.item_id,
                    ev.quantity
                );
            }
        }
    }
}
