// 🛠️ Ship Service - the operations exposed over HTTP and the CLI
//
// Mutations follow one path: resolve → merge → validate → rate → write.
// Nothing reaches the store until the candidate has passed validation.

use rusqlite::Connection;

use crate::db::{self, CsvRow};
use crate::errors::{ShipError, ShipResult};
use crate::filter::{ListParams, ShipFilter};
use crate::rating;
use crate::schema;
use crate::ship::{Ship, ShipInput};

/// Resolve an id to a stored ship
pub fn get_ship(conn: &Connection, id: i64) -> ShipResult<Ship> {
    if id <= 0 {
        return Err(ShipError::InvalidId(id));
    }

    db::find_ship(conn, id)?.ok_or(ShipError::NotFound(id))
}

/// Paged, filtered, ordered listing
pub fn list_ships(conn: &Connection, filter: &ShipFilter, params: &ListParams) -> ShipResult<Vec<Ship>> {
    let page = params.page().map_err(ShipError::InvalidPage)?;
    let predicate = filter.predicate();

    Ok(db::select_ships(conn, &predicate, params.order(), page)?)
}

/// Number of ships matching the same filter the listing uses
pub fn count_ships(conn: &Connection, filter: &ShipFilter) -> ShipResult<i64> {
    Ok(db::count_ships(conn, &filter.predicate())?)
}

pub fn create_ship(conn: &Connection, input: &ShipInput) -> ShipResult<Ship> {
    let mut candidate = schema::validate_new(input)?;
    candidate.rating = rating::rate(&candidate);

    let ship = db::insert_ship(conn, &candidate)?;
    tracing::info!(id = ship.id, name = %ship.name, rating = ship.rating, "ship created");

    Ok(ship)
}

/// Apply a partial patch to ship `id`; fields absent from the patch keep
/// their stored values and the rating is recomputed from the result.
pub fn update_ship(conn: &Connection, id: i64, patch: &ShipInput) -> ShipResult<Ship> {
    let existing = get_ship(conn, id)?;
    apply_update(conn, existing, patch)
}

/// Merge `patch` into a ship already resolved with `get_ship`, validate,
/// rerate and write it back.
pub fn apply_update(conn: &Connection, existing: Ship, patch: &ShipInput) -> ShipResult<Ship> {
    let id = existing.id;
    if patch.is_empty() {
        tracing::debug!(id, "empty patch, only the rating is recomputed");
    }

    let mut candidate = schema::validate_patch(&existing, patch)?;
    candidate.rating = rating::rate(&candidate);

    if !db::update_ship(conn, &candidate)? {
        // deleted between resolve and write
        return Err(ShipError::NotFound(id));
    }
    tracing::info!(id, rating = candidate.rating, "ship updated");

    Ok(candidate)
}

pub fn delete_ship(conn: &Connection, id: i64) -> ShipResult<()> {
    get_ship(conn, id)?;

    if !db::delete_ship(conn, id)? {
        return Err(ShipError::NotFound(id));
    }
    tracing::info!(id, "ship deleted");

    Ok(())
}

/// Outcome of a bulk import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub rejected: usize,
}

/// Create every parsed row through the normal create path. Rows that failed
/// to parse or validate are skipped and counted; store failures abort.
pub fn import_ships(conn: &Connection, rows: &[CsvRow]) -> ShipResult<ImportSummary> {
    let mut summary = ImportSummary::default();

    for row in rows {
        let input = match &row.input {
            Ok(input) => input,
            Err(reason) => {
                tracing::warn!(line = row.line, %reason, "skipping unreadable ship");
                summary.rejected += 1;
                continue;
            }
        };

        match create_ship(conn, input) {
            Ok(_) => summary.inserted += 1,
            Err(ShipError::Validation(errors)) => {
                tracing::warn!(line = row.line, errors = %ShipError::Validation(errors), "skipping ship");
                summary.rejected += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(summary)
}
