use crate::shared::*;

/// Populate the ItemRegistry. Sell prices are what the sell counter pays.
pub fn populate_items(registry: &mut ItemRegistry) {
    let items = [
        // ── Produce ─────────────────────────────────────────────────────────
        ("carrot", "Carrot", 35),
        ("golden_carrot", "Golden Carrot", 350),
        ("strawberry", "Strawberry", 120),
        // ── Seeds ───────────────────────────────────────────────────────────
        ("carrot_seeds", "Carrot Seeds", 10),
        ("strawberry_seeds", "Strawberry Seeds", 50),
        // ── Materials ───────────────────────────────────────────────────────
        (WOOD_ITEM, "Wood", 2),
        (STONE_ITEM, "Stone", 2),
    ];

    for (id, name, sell_price) in items {
        registry.items.insert(
            id.to_string(),
            ItemDef {
                id: id.to_string(),
                name: name.to_string(),
                sell_price,
            },
        );
    }
}
