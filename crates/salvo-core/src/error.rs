//! Error types for outfit loading and weapon construction.

use thiserror::Error;

use crate::enums::WeaponCategory;
use crate::types::PilotId;

/// Problems found while loading an outfit catalog.
#[derive(Debug, Error)]
pub enum OutfitError {
    #[error("outfit `{name}` has unrecognized category `{category}`")]
    UnknownCategory { name: String, category: String },

    #[error("outfit entry {index} is malformed: {source}")]
    Malformed {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("outfit `{name}`: {field} must be positive, got {value}")]
    NonPositive {
        name: String,
        field: &'static str,
        value: f64,
    },

    #[error("outfit catalog is not a JSON array: {0}")]
    NotAnArray(#[source] serde_json::Error),
}

/// Reasons the factory refuses to build a weapon.
#[derive(Debug, Error, PartialEq)]
pub enum FactoryError {
    #[error("outfit `{name}` is a {category:?}, not a projectile weapon")]
    NotAProjectile {
        name: String,
        category: WeaponCategory,
    },

    #[error("outfit `{name}` is a {category:?}, not a beam")]
    NotABeam {
        name: String,
        category: WeaponCategory,
    },

    #[error("outfit `{name}` cannot be fired: {reason}")]
    InvalidOutfit { name: String, reason: String },

    #[error("shooter {0:?} does not exist")]
    MissingShooter(PilotId),
}
