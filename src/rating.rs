// ⭐ Rating Engine
// Derived score from speed, usage and production year.
//
//   rating = round2(80 * speed * k / (3019 - year + 1)),  k = 0.5 if used else 1

use crate::ship::Ship;

/// Year the fleet is rated against; a ship built this year has divisor 1.
pub const CURRENT_YEAR: i32 = 3019;

const SPEED_WEIGHT: f64 = 80.0;
const USED_PENALTY: f64 = 0.5;

/// Compute the rating for raw attributes.
///
/// Callers must have validated `prod_year <= CURRENT_YEAR`.
pub fn compute(speed: f64, is_used: bool, prod_year: i32) -> f64 {
    let k = if is_used { USED_PENALTY } else { 1.0 };
    let age = f64::from(CURRENT_YEAR - prod_year + 1);

    round2(SPEED_WEIGHT * speed * k / age)
}

/// Rating for a (validated) ship
pub fn rate(ship: &Ship) -> f64 {
    compute(ship.speed, ship.is_used, ship.prod_year())
}

/// Round to two decimals, half-up on the value scaled by 100
pub fn round2(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}
