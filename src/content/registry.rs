//! ContentRegistry resource providing HashMap lookups for all loaded content.

use bevy::prelude::*;
use std::collections::HashMap;

use super::data::*;

/// Central registry for all loaded game content.
/// Provides O(1) lookup by id for any content type.
#[derive(Resource, Default)]
pub struct ContentRegistry {
    pub enemies: HashMap<String, EnemyDef>,
}

impl ContentRegistry {
    /// Returns a summary of loaded content counts for logging.
    pub fn summary(&self) -> String {
        format!("ContentRegistry loaded:\n - Enemies: {}", self.enemies.len())
    }

    /// Returns total count of all loaded items.
    pub fn total_count(&self) -> usize {
        self.enemies.len()
    }
}
