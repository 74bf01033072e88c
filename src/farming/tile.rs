//! Per-tile state machine: terrain wetness × optional crop lifecycle.
//!
//! Every action is a plain method returning whether anything happened.
//! Wrong state, missing seeds and immature crops are all silent no-ops.

use rand::Rng;

use crate::shared::*;

/// Items a successful harvest produced, in grant order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HarvestOutcome {
    pub yields: Vec<(ItemId, u32)>,
    pub regrew: bool,
}

/// What a sunrise did to one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SunriseOutcome {
    /// New growth stage, if the crop advanced.
    pub grew_to: Option<u8>,
    pub visual_changed: bool,
}

impl OwnedTile {
    pub fn is_decor(&self) -> bool {
        self.terrain == TerrainState::Decor
    }

    pub fn has_crop(&self) -> bool {
        self.crop.is_some()
    }

    pub fn visual(&self) -> TileVisual {
        match (self.terrain, self.crop.is_some()) {
            (TerrainState::Decor, _) => TileVisual::Decor,
            (TerrainState::Grass, _) => TileVisual::Grass,
            (TerrainState::Soil, false) => TileVisual::Soil,
            (TerrainState::Soil, true) => TileVisual::SeededDry,
            (TerrainState::WetSoil, false) => TileVisual::WetSoil,
            (TerrainState::WetSoil, true) => TileVisual::SeededWet,
        }
    }

    /// Grass → Soil.
    pub fn till(&mut self, day: u32) -> bool {
        if self.terrain != TerrainState::Grass {
            return false;
        }
        self.terrain = TerrainState::Soil;
        self.last_tilled_day = day;
        true
    }

    /// Soil or wet soil → wet soil. Watering never advances a crop by itself.
    pub fn water(&mut self, day: u32) -> bool {
        if !matches!(self.terrain, TerrainState::Soil | TerrainState::WetSoil) {
            return false;
        }
        self.terrain = TerrainState::WetSoil;
        self.last_water_day = day;
        if let Some(crop) = self.crop.as_mut() {
            crop.last_water_day = day;
        }
        true
    }

    pub fn can_plant(&self) -> bool {
        matches!(self.terrain, TerrainState::Soil | TerrainState::WetSoil) && self.crop.is_none()
    }

    /// Plant `def`, paying one seed from `store`. Nothing is spent on failure.
    pub fn plant(
        &mut self,
        def: &CropDef,
        day: u32,
        rotation_seed: f32,
        store: &mut impl ItemStore,
    ) -> bool {
        if !self.can_plant() || def.stage_count == 0 {
            return false;
        }
        if !store.spend(&def.seed_id, 1) {
            return false;
        }
        self.crop = Some(PlantedCrop {
            crop_id: def.id.clone(),
            growth_stage: 0,
            rotation_seed,
            planted_day: day,
            last_growth_day: day,
            last_water_day: self.last_water_day,
        });
        true
    }

    pub fn is_harvestable(&self, def: &CropDef) -> bool {
        match &self.crop {
            Some(crop) => {
                crop.crop_id == def.id && def.stage_count > 0 && crop.growth_stage == def.mature_stage()
            }
            None => false,
        }
    }

    /// Harvest a mature crop into `store`.
    ///
    /// The normal output is granted unless a rare yield replaces it. The rare
    /// roll is independent: a replacing rare yield whose roll fails leaves the
    /// harvest empty.
    pub fn harvest(
        &mut self,
        def: &CropDef,
        day: u32,
        store: &mut impl ItemStore,
        rng: &mut impl Rng,
    ) -> Option<HarvestOutcome> {
        if !self.is_harvestable(def) {
            return None;
        }

        let mut outcome = HarvestOutcome::default();
        let grants_normal = def.rare.as_ref().map_or(true, |rare| !rare.replaces);
        if grants_normal && def.output_quantity > 0 {
            store.grant(&def.output_item, def.output_quantity);
            outcome
                .yields
                .push((def.output_item.clone(), def.output_quantity));
        }
        if let Some(rare) = &def.rare {
            let roll: f32 = rng.gen_range(0.0..100.0);
            if roll <= rare.chance_percent {
                store.grant(&rare.item_id, 1);
                outcome.yields.push((rare.item_id.clone(), 1));
            }
        }

        if def.regrows {
            if let Some(crop) = self.crop.as_mut() {
                crop.growth_stage = def.regrow_stage();
                crop.last_growth_day = day;
            }
            outcome.regrew = true;
        } else {
            self.crop = None;
            self.terrain = TerrainState::Soil;
            self.last_tilled_day = day;
        }
        Some(outcome)
    }

    /// Overnight pass, once per sunrise. `def` is the planted crop's
    /// definition; a crop without one neither grows nor breaks the pass.
    pub fn on_sunrise(&mut self, def: Option<&CropDef>, day: u32) -> SunriseOutcome {
        let mut outcome = SunriseOutcome::default();
        if self.is_decor() {
            return outcome;
        }
        let before = self.visual();

        if let Some(crop) = self.crop.as_mut() {
            if self.terrain == TerrainState::WetSoil {
                if let Some(def) = def.filter(|d| d.stage_count > 0) {
                    let next = crop.growth_stage.saturating_add(1).min(def.mature_stage());
                    if next != crop.growth_stage {
                        crop.growth_stage = next;
                        crop.last_growth_day = day;
                        outcome.grew_to = Some(next);
                    }
                }
            }
            if self.terrain == TerrainState::WetSoil {
                self.terrain = TerrainState::Soil;
            }
        } else {
            if self.terrain == TerrainState::Soil && self.last_tilled_day < day {
                self.terrain = TerrainState::Grass;
            }
            if self.terrain == TerrainState::WetSoil {
                self.terrain = TerrainState::Soil;
            }
        }

        outcome.visual_changed = self.visual() != before;
        outcome
    }
}
