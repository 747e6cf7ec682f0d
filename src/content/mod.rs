//! Content domain: RON data loaded once at startup.

mod data;
mod loader;
mod registry;
mod validation;


pub use data::{DataFile, EnemyDef, GameplayDefaults};
pub use loader::{
    ContentLoadError, LoadedContent, load_all_content, parse_data_file, parse_single_file,
};
pub use registry::ContentRegistry;
pub use validation::{ValidationError, validate_content};

use bevy::prelude::*;
use std::path::Path;

pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameplayDefaults>()
            .init_resource::<ContentRegistry>()
            .add_systems(Startup, load_content);
    }
}

/// Load assets/data, sanitize the movement tuning and publish everything as
/// resources. Anything that fails to load keeps its defaults.
pub fn load_content(mut commands: Commands) {
    let (content, errors) = load_all_content(Path::new("assets/data"));
    for error in &errors {
        warn!("{}", error);
    }

    let LoadedContent {
        registry,
        defaults,
        tuning,
    } = content;

    let (tuning, warnings) = tuning.sanitized();
    for warning in &warnings {
        warn!("{}", warning);
    }
    info!(
        "jump height {:.2}, reachable with air jumps {:.2}",
        tuning.single_jump_height(),
        tuning.max_reachable_height()
    );

    for error in validate_content(&registry, &defaults) {
        warn!("{}", error);
    }
    info!("{}", registry.summary());

    commands.insert_resource(Time::<Fixed>::from_hz(fixed_tick_rate(&defaults)));
    commands.insert_resource(tuning);
    commands.insert_resource(registry);
    commands.insert_resource(defaults);
}

/// The configured fixed tick rate, or the default rate when it is not a
/// positive finite number.
pub fn fixed_tick_rate(defaults: &GameplayDefaults) -> f64 {
    let hz = defaults.fixed_hz;
    if hz.is_finite() && hz > 0.0 {
        return hz;
    }
    let fallback = GameplayDefaults::default().fixed_hz;
    warn!("fixed_hz {} is unusable, running at {} Hz", hz, fallback);
    fallback
}
