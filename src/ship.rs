// 🚀 Ship Entity - the only record the registry stores
//
// `Ship` is a persisted, validated value. `ShipInput` is what clients send:
// every field optional, so the same shape serves both full creation payloads
// and partial update patches.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// SHIP TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipType {
    Transport,
    Military,
    Merchant,
}

impl ShipType {
    pub const ALL: [ShipType; 3] = [ShipType::Transport, ShipType::Military, ShipType::Merchant];

    /// Name used on the wire and in the `ship_type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipType::Transport => "TRANSPORT",
            ShipType::Military => "MILITARY",
            ShipType::Merchant => "MERCHANT",
        }
    }
}

impl fmt::Display for ShipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ShipType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShipType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown ship type: {}", s))
    }
}

// ============================================================================
// SHIP
// ============================================================================

/// A stored ship.
///
/// `prod_date` travels as epoch milliseconds. `rating` is derived and always
/// matches `speed`, `is_used` and the production year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ship {
    /// Store-assigned, 0 until inserted
    pub id: i64,
    pub name: String,
    pub planet: String,
    pub ship_type: ShipType,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub prod_date: DateTime<Utc>,
    pub is_used: bool,
    pub speed: f64,
    pub crew_size: i32,
    pub rating: f64,
}

impl Ship {
    /// Calendar year of `prod_date` in UTC
    pub fn prod_year(&self) -> i32 {
        self.prod_date.year()
    }
}

// ============================================================================
// SHIP INPUT (create payload / update patch)
// ============================================================================

/// Client-supplied ship fields.
///
/// Unknown keys (`id`, `rating`) are ignored: the id belongs to the store and
/// the rating is always computed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipInput {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub planet: Option<String>,

    #[serde(default)]
    pub ship_type: Option<ShipType>,

    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub prod_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub is_used: Option<bool>,

    #[serde(default)]
    pub speed: Option<f64>,

    #[serde(default)]
    pub crew_size: Option<i32>,
}

impl ShipInput {
    /// True when the patch would not touch any field
    pub fn is_empty(&self) -> bool {
        *self == ShipInput::default()
    }

    /// Overlay this patch on an existing ship, producing a new candidate.
    ///
    /// The original is left untouched; `rating` is carried over as-is and must
    /// be recomputed by the caller once the candidate passes validation.
    pub fn apply_to(&self, existing: &Ship) -> Ship {
        let mut merged = existing.clone();

        if let Some(name) = &self.name {
            merged.name = name.clone();
        }
        if let Some(planet) = &self.planet {
            merged.planet = planet.clone();
        }
        if let Some(ship_type) = self.ship_type {
            merged.ship_type = ship_type;
        }
        if let Some(prod_date) = self.prod_date {
            merged.prod_date = prod_date;
        }
        if let Some(is_used) = self.is_used {
            merged.is_used = is_used;
        }
        if let Some(speed) = self.speed {
            merged.speed = speed;
        }
        if let Some(crew_size) = self.crew_size {
            merged.crew_size = crew_size;
        }

        merged
    }
}
