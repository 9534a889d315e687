// 📐 Shape Layer - Ship Validation
// Field bounds and the year window every stored ship must satisfy

use crate::ship::{Ship, ShipInput};
use std::ops::RangeInclusive;

// ============================================================================
// BOUNDS
// ============================================================================

pub const NAME_LEN: RangeInclusive<usize> = 1..=50;
pub const PLANET_LEN: RangeInclusive<usize> = 1..=50;
pub const SPEED: RangeInclusive<f64> = 0.01..=0.99;
pub const CREW_SIZE: RangeInclusive<i32> = 1..=9999;
pub const PROD_YEAR: RangeInclusive<i32> = 2800..=3019;

// ============================================================================
// VALIDATION RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), Vec<ValidationError>>;

// ============================================================================
// CHECKS
// ============================================================================

/// Check every bound on a fully merged candidate.
///
/// Collects all failures instead of stopping at the first one.
pub fn validate_ship(ship: &Ship) -> ValidationResult {
    let mut errors = Vec::new();

    check_text("name", &ship.name, &NAME_LEN, &mut errors);
    check_text("planet", &ship.planet, &PLANET_LEN, &mut errors);

    if !SPEED.contains(&ship.speed) {
        errors.push(ValidationError::new(
            "speed",
            format!(
                "must be between {} and {}, got {}",
                SPEED.start(),
                SPEED.end(),
                ship.speed
            ),
        ));
    }

    if !CREW_SIZE.contains(&ship.crew_size) {
        errors.push(ValidationError::new(
            "crewSize",
            format!(
                "must be between {} and {}, got {}",
                CREW_SIZE.start(),
                CREW_SIZE.end(),
                ship.crew_size
            ),
        ));
    }

    let year = ship.prod_year();
    if !PROD_YEAR.contains(&year) {
        errors.push(ValidationError::new(
            "prodDate",
            format!(
                "production year must be between {} and {}, got {}",
                PROD_YEAR.start(),
                PROD_YEAR.end(),
                year
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Turn a creation payload into a candidate ship.
///
/// Every required field must be present; `isUsed` defaults to false. The
/// returned ship has `id = 0` and no rating yet.
pub fn validate_new(input: &ShipInput) -> Result<Ship, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let name = required("name", input.name.as_ref(), &mut errors);
    let planet = required("planet", input.planet.as_ref(), &mut errors);
    let ship_type = required("shipType", input.ship_type.as_ref(), &mut errors);
    let prod_date = required("prodDate", input.prod_date.as_ref(), &mut errors);
    let speed = required("speed", input.speed.as_ref(), &mut errors);
    let crew_size = required("crewSize", input.crew_size.as_ref(), &mut errors);

    let (Some(name), Some(planet), Some(ship_type), Some(prod_date), Some(speed), Some(crew_size)) =
        (name, planet, ship_type, prod_date, speed, crew_size)
    else {
        return Err(errors);
    };

    let candidate = Ship {
        id: 0,
        name: name.clone(),
        planet: planet.clone(),
        ship_type: *ship_type,
        prod_date: *prod_date,
        is_used: input.is_used.unwrap_or(false),
        speed: *speed,
        crew_size: *crew_size,
        rating: 0.0,
    };

    validate_ship(&candidate)?;
    Ok(candidate)
}

/// Merge a patch onto an existing ship and check the result.
///
/// `existing` is never modified; on failure the caller simply drops the
/// candidate.
pub fn validate_patch(existing: &Ship, patch: &ShipInput) -> Result<Ship, Vec<ValidationError>> {
    let candidate = patch.apply_to(existing);
    validate_ship(&candidate)?;
    Ok(candidate)
}

fn required<'a, T>(field: &str, value: Option<&'a T>, errors: &mut Vec<ValidationError>) -> Option<&'a T> {
    if value.is_none() {
        errors.push(ValidationError::new(field, "Required field is missing"));
    }
    value
}

fn check_text(field: &str, value: &str, bounds: &RangeInclusive<usize>, errors: &mut Vec<ValidationError>) {
    let len = value.chars().count();
    if !bounds.contains(&len) {
        errors.push(ValidationError::new(
            field,
            format!(
                "length must be between {} and {} characters, got {}",
                bounds.start(),
                bounds.end(),
                len
            ),
        ));
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ship::ShipType;
    use chrono::{DateTime, TimeZone, Utc};

    fn year(y: i32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, 6, 15, 12, 0, 0).unwrap()
    }

    fn create_test_input() -> ShipInput {
        ShipInput {
            name: Some("Eagle".to_string()),
            planet: Some("Mars".to_string()),
            ship_type: Some(ShipType::Transport),
            prod_date: Some(year(3000)),
            is_used: None,
            speed: Some(0.5),
            crew_size: Some(10),
        }
    }

    fn fields(errors: &[ValidationError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn test_validate_new_valid() {
        let ship = validate_new(&create_test_input()).unwrap();

        assert_eq!(ship.id, 0);
        assert_eq!(ship.name, "Eagle");
        assert!(!ship.is_used, "isUsed defaults to false");
    }

    #[test]
    fn test_validate_new_reports_every_missing_field() {
        let errors = validate_new(&ShipInput::default()).unwrap_err();

        assert_eq!(
            fields(&errors),
            vec!["name", "planet", "shipType", "prodDate", "speed", "crewSize"]
        );
    }

    #[test]
    fn test_is_used_is_optional() {
        let mut input = create_test_input();
        input.is_used = Some(true);
        assert!(validate_new(&input).unwrap().is_used);
    }

    #[test]
    fn test_speed_bounds() {
        for ok in [0.01, 0.5, 0.99] {
            let mut input = create_test_input();
            input.speed = Some(ok);
            assert!(validate_new(&input).is_ok(), "speed {} should pass", ok);
        }

        for bad in [0.009999, 0.990001, 0.0, 1.0, -0.5] {
            let mut input = create_test_input();
            input.speed = Some(bad);
            let errors = validate_new(&input).unwrap_err();
            assert_eq!(fields(&errors), vec!["speed"], "speed {} should fail", bad);
        }
    }

    #[test]
    fn test_prod_year_bounds() {
        for ok in [2800, 3019] {
            let mut input = create_test_input();
            input.prod_date = Some(year(ok));
            assert!(validate_new(&input).is_ok(), "year {} should pass", ok);
        }

        for bad in [2799, 3020] {
            let mut input = create_test_input();
            input.prod_date = Some(year(bad));
            let errors = validate_new(&input).unwrap_err();
            assert_eq!(fields(&errors), vec!["prodDate"], "year {} should fail", bad);
        }
    }

    #[test]
    fn test_year_edges_are_utc() {
        let mut input = create_test_input();

        input.prod_date = Some(Utc.with_ymd_and_hms(2800, 1, 1, 0, 0, 0).unwrap());
        assert!(validate_new(&input).is_ok());

        input.prod_date = Some(Utc.with_ymd_and_hms(3019, 12, 31, 23, 59, 59).unwrap());
        assert!(validate_new(&input).is_ok());

        input.prod_date = Some(Utc.with_ymd_and_hms(2799, 12, 31, 23, 59, 59).unwrap());
        assert!(validate_new(&input).is_err());
    }

    #[test]
    fn test_crew_size_bounds() {
        for ok in [1, 9999] {
            let mut input = create_test_input();
            input.crew_size = Some(ok);
            assert!(validate_new(&input).is_ok());
        }
        for bad in [0, 10000, -3] {
            let mut input = create_test_input();
            input.crew_size = Some(bad);
            assert_eq!(fields(&validate_new(&input).unwrap_err()), vec!["crewSize"]);
        }
    }

    #[test]
    fn test_text_lengths() {
        let mut input = create_test_input();
        input.name = Some("x".repeat(50));
        input.planet = Some("p".to_string());
        assert!(validate_new(&input).is_ok());

        input.name = Some("x".repeat(51));
        input.planet = Some(String::new());
        assert_eq!(fields(&validate_new(&input).unwrap_err()), vec!["name", "planet"]);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let mut input = create_test_input();
        input.name = Some("ä".repeat(50));
        assert!(validate_new(&input).is_ok());
    }

    #[test]
    fn test_validate_patch_merges_then_checks() {
        let existing = validate_new(&create_test_input()).unwrap();

        let patch = ShipInput {
            speed: Some(0.75),
            ..ShipInput::default()
        };
        let merged = validate_patch(&existing, &patch).unwrap();
        assert_eq!(merged.speed, 0.75);
        assert_eq!(merged.name, existing.name);

        let bad = ShipInput {
            name: Some(String::new()),
            crew_size: Some(0),
            ..ShipInput::default()
        };
        let errors = validate_patch(&existing, &bad).unwrap_err();
        assert_eq!(fields(&errors), vec!["name", "crewSize"]);
        assert_eq!(existing.name, "Eagle");
    }

    #[test]
    fn test_error_display() {
        let err = ValidationError::new("speed", "too fast");
        assert_eq!(err.to_string(), "speed: too fast");
    }
}
