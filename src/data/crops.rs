use crate::shared::*;

/// Populate the CropRegistry with all crop definitions.
///
/// A crop advances one stage per sunrise on watered soil and is harvestable
/// on its last stage. Regrowing crops drop back one stage after harvest.
pub fn populate_crops(registry: &mut CropRegistry) {
    let crops: Vec<CropDef> = vec![
        CropDef {
            id: "carrot".into(),
            name: "Carrot".into(),
            seed_id: "carrot_seeds".into(),
            // seed, sprout, leafy, ready
            stage_count: 4,
            regrows: false,
            output_item: "carrot".into(),
            output_quantity: 1,
            rare: Some(RareYield {
                item_id: "golden_carrot".into(),
                chance_percent: 5.0,
                replaces: false,
            }),
        },
        CropDef {
            id: "strawberry".into(),
            name: "Strawberry".into(),
            seed_id: "strawberry_seeds".into(),
            stage_count: 5,
            regrows: true,
            output_item: "strawberry".into(),
            output_quantity: 2,
            rare: None,
        },
    ];

    for crop in crops {
        registry.crops.insert(crop.id.clone(), crop);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::items::populate_items;

    #[test]
    fn test_every_crop_references_known_items() {
        let mut items = ItemRegistry::default();
        populate_items(&mut items);
        let mut crops = CropRegistry::default();
        populate_crops(&mut crops);

        assert!(!crops.crops.is_empty());
        for crop in crops.crops.values() {
            assert!(crop.stage_count > 0, "{} has no stages", crop.id);
            assert!(items.get(&crop.seed_id).is_some(), "{} seed", crop.id);
            assert!(items.get(&crop.output_item).is_some(), "{} output", crop.id);
            if let Some(rare) = &crop.rare {
                assert!(items.get(&rare.item_id).is_some(), "{} rare", crop.id);
                assert!((0.0..=100.0).contains(&rare.chance_percent));
            }
        }
    }

    #[test]
    fn test_crops_are_keyed_by_id() {
        let mut crops = CropRegistry::default();
        populate_crops(&mut crops);
        let carrot = crops.get("carrot").unwrap();
        assert_eq!(carrot.mature_stage(), 3);
        assert!(crops.get("strawberry").unwrap().regrows);
    }
}
