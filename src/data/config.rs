//! `WorldConfig` in RON.

use std::fs;
use std::path::Path;

use crate::shared::*;

pub const DEFAULT_CONFIG_PATH: &str = "assets/config/world.ron";

/// Parse a config. Missing fields take their defaults.
pub fn parse_config(text: &str) -> Result<WorldConfig, String> {
    ron::from_str(text).map_err(|e| format!("Invalid world config: {}", e))
}

pub fn load_config(path: &Path) -> Result<WorldConfig, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Read failed for {}: {}", path.display(), e))?;
    parse_config(&text)
}

/// Pull nonsensical values back into range. Returns one message per fix.
pub fn sanitize(config: &mut WorldConfig) -> Vec<String> {
    let mut fixes = Vec::new();

    if config.clock.day_length_seconds <= 0.0 {
        fixes.push(format!(
            "day_length_seconds {} is not positive, using 600",
            config.clock.day_length_seconds
        ));
        config.clock.day_length_seconds = 600.0;
    }
    for (name, hour) in [
        ("start_hour", &mut config.clock.start_hour),
        ("sunrise_hour", &mut config.clock.sunrise_hour),
        ("sunset_hour", &mut config.clock.sunset_hour),
    ] {
        if !(0.0..HOURS_PER_DAY).contains(&*hour) {
            let wrapped = (*hour).rem_euclid(HOURS_PER_DAY);
            fixes.push(format!("{} {} wrapped to {}", name, hour, wrapped));
            *hour = wrapped;
        }
    }

    let spawn = &mut config.spawn;
    for (name, chance) in [
        ("spawn_chance", &mut spawn.spawn_chance),
        ("tree_weight", &mut spawn.tree_weight),
    ] {
        if !(0.0..=1.0).contains(&*chance) {
            let clamped = (*chance).clamp(0.0, 1.0);
            fixes.push(format!("{} {} clamped to {}", name, chance, clamped));
            *chance = clamped;
        }
    }
    if spawn.tree_variants == 0 {
        fixes.push("tree_variants is 0, trees will have no variant".into());
    }
    if spawn.rock_variants == 0 {
        fixes.push("rock_variants is 0, rocks will have no variant".into());
    }

    if config.start_plot_radius < 0 {
        fixes.push(format!(
            "start_plot_radius {} is negative, using 0",
            config.start_plot_radius
        ));
        config.start_plot_radius = 0;
    }

    fixes
}
