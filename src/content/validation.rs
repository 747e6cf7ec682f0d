//! Validation for cross-references and ranges in loaded content.

use super::data::*;
use super::registry::ContentRegistry;

/// A validation error with context about what failed.
#[derive(Debug, PartialEq)]
pub enum ValidationError {
    MissingRef {
        source_type: &'static str,
        source_id: String,
        field: &'static str,
        target_type: &'static str,
        missing_id: String,
    },
    OutOfRange {
        source_type: &'static str,
        source_id: String,
        field: &'static str,
        value: f64,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingRef {
                source_type,
                source_id,
                field,
                target_type,
                missing_id,
            } => write!(
                f,
                "{} '{}' references missing {} '{}' in field '{}'",
                source_type, source_id, target_type, missing_id, field
            ),
            ValidationError::OutOfRange {
                source_type,
                source_id,
                field,
                value,
            } => write!(
                f,
                "{} '{}' has out of range value {} in field '{}'",
                source_type, source_id, value, field
            ),
        }
    }
}

/// Helper macro for checking a reference exists
macro_rules! check_ref {
    ($errors:expr, $registry_map:expr, $source_type:expr, $source_id:expr, $field:expr, $target_type:expr, $ref_id:expr) => {
        if !$registry_map.contains_key($ref_id) {
            $errors.push(ValidationError::MissingRef {
                source_type: $source_type,
                source_id: $source_id.to_string(),
                field: $field,
                target_type: $target_type,
                missing_id: $ref_id.to_string(),
            });
        }
    };
}

/// Helper macro for checking a value is strictly positive
macro_rules! check_positive {
    ($errors:expr, $source_type:expr, $source_id:expr, $field:expr, $value:expr) => {
        if !($value > Default::default()) {
            $errors.push(ValidationError::OutOfRange {
                source_type: $source_type,
                source_id: $source_id.to_string(),
                field: $field,
                value: $value as f64,
            });
        }
    };
}

/// Validate all cross-references in the registry and defaults.
/// Returns a list of validation errors, empty if everything is valid.
pub fn validate_content(
    registry: &ContentRegistry,
    defaults: &GameplayDefaults,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (id, enemy) in &registry.enemies {
        check_positive!(errors, "Enemy", id, "stats.max_health", enemy.stats.max_health);
        check_positive!(errors, "Enemy", id, "size.x", enemy.size.x);
        check_positive!(errors, "Enemy", id, "size.y", enemy.size.y);
    }

    check_ref!(
        errors,
        registry.enemies,
        "GameplayDefaults",
        "gameplay_defaults",
        "test_level_enemy",
        "Enemy",
        &defaults.test_level_enemy
    );
    check_positive!(
        errors,
        "GameplayDefaults",
        "gameplay_defaults",
        "fixed_hz",
        defaults.fixed_hz
    );
    check_positive!(
        errors,
        "GameplayDefaults",
        "gameplay_defaults",
        "player.max_health",
        defaults.player.max_health
    );

    errors
}
