use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::io::Read;
use std::path::Path;

use crate::filter::{Page, Predicate, ShipOrder};
use crate::ship::{Ship, ShipInput, ShipType};

const SHIP_COLUMNS: &str =
    "id, name, planet, ship_type, prod_date, is_used, speed, crew_size, rating";

pub fn setup_database(conn: &Connection) -> Result<()> {
    // WAL for file databases; in-memory connections report "memory" and keep it
    let mode: String = conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    tracing::debug!(journal_mode = %mode, "journal mode set");

    // ==========================================================================
    // Ships Table
    // prod_date is epoch millis (UTC), is_used is 0/1
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS ship (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            planet TEXT NOT NULL,
            ship_type TEXT NOT NULL,
            prod_date INTEGER NOT NULL,
            is_used INTEGER NOT NULL DEFAULT 0,
            speed REAL NOT NULL,
            crew_size INTEGER NOT NULL,
            rating REAL NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes
    // ==========================================================================
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_ship_prod_date ON ship(prod_date)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_ship_rating ON ship(rating)",
        [],
    )?;

    Ok(())
}

/// Open (or create) the database file and make sure the schema exists
pub fn open_database(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database at {}", path.display()))?;
    setup_database(&conn).context("Failed to initialize database schema")?;
    Ok(conn)
}

fn ship_from_row(row: &Row<'_>) -> rusqlite::Result<Ship> {
    let ship_type_str: String = row.get(3)?;
    let prod_date_ms: i64 = row.get(4)?;

    let ship_type = ship_type_str.parse::<ShipType>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, e.into())
    })?;
    let prod_date = DateTime::<Utc>::from_timestamp_millis(prod_date_ms)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(4, prod_date_ms))?;

    Ok(Ship {
        id: row.get(0)?,
        name: row.get(1)?,
        planet: row.get(2)?,
        ship_type,
        prod_date,
        is_used: row.get(5)?,
        speed: row.get(6)?,
        crew_size: row.get(7)?,
        rating: row.get(8)?,
    })
}

// ============================================================================
// Queries
// ============================================================================

/// One page of ships matching `predicate`, in `order`
pub fn select_ships(
    conn: &Connection,
    predicate: &Predicate,
    order: ShipOrder,
    page: Page,
) -> Result<Vec<Ship>> {
    let (where_clause, mut values) = predicate.to_sql();
    let sql = format!(
        "SELECT {} FROM ship{}{} LIMIT ? OFFSET ?",
        SHIP_COLUMNS,
        where_clause,
        order.to_sql()
    );
    values.push(page.limit().into());
    values.push(page.offset().into());

    tracing::debug!(%sql, params = values.len(), "listing ships");

    let mut stmt = conn.prepare(&sql)?;
    let ships = stmt
        .query_map(params_from_iter(values), ship_from_row)?
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to read ships")?;

    Ok(ships)
}

/// Every ship matching `predicate`, in `order`
pub fn select_all_ships(conn: &Connection, predicate: &Predicate, order: ShipOrder) -> Result<Vec<Ship>> {
    let (where_clause, values) = predicate.to_sql();
    let sql = format!("SELECT {} FROM ship{}{}", SHIP_COLUMNS, where_clause, order.to_sql());

    let mut stmt = conn.prepare(&sql)?;
    let ships = stmt
        .query_map(params_from_iter(values), ship_from_row)?
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to read ships")?;

    Ok(ships)
}

/// Number of ships matching `predicate`
pub fn count_ships(conn: &Connection, predicate: &Predicate) -> Result<i64> {
    let (where_clause, values) = predicate.to_sql();
    let sql = format!("SELECT COUNT(*) FROM ship{}", where_clause);

    tracing::debug!(%sql, params = values.len(), "counting ships");

    let count: i64 = conn.query_row(&sql, params_from_iter(values), |row| row.get(0))?;
    Ok(count)
}

pub fn find_ship(conn: &Connection, id: i64) -> Result<Option<Ship>> {
    let ship = conn
        .query_row(
            &format!("SELECT {} FROM ship WHERE id = ?1", SHIP_COLUMNS),
            params![id],
            ship_from_row,
        )
        .optional()
        .with_context(|| format!("Failed to load ship {}", id))?;

    Ok(ship)
}

// ============================================================================
// Mutations
// ============================================================================

/// Insert a validated ship; returns it with the assigned id
pub fn insert_ship(conn: &Connection, ship: &Ship) -> Result<Ship> {
    conn.execute(
        "INSERT INTO ship (
            name, planet, ship_type, prod_date, is_used, speed, crew_size, rating
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            ship.name,
            ship.planet,
            ship.ship_type.as_str(),
            ship.prod_date.timestamp_millis(),
            ship.is_used,
            ship.speed,
            ship.crew_size,
            ship.rating,
        ],
    )
    .context("Failed to insert ship")?;

    let mut stored = ship.clone();
    stored.id = conn.last_insert_rowid();
    Ok(stored)
}

/// Overwrite every mutable column of `ship.id`; returns false if the row is gone
pub fn update_ship(conn: &Connection, ship: &Ship) -> Result<bool> {
    let changed = conn
        .execute(
            "UPDATE ship
             SET name = ?1, planet = ?2, ship_type = ?3, prod_date = ?4,
                 is_used = ?5, speed = ?6, crew_size = ?7, rating = ?8
             WHERE id = ?9",
            params![
                ship.name,
                ship.planet,
                ship.ship_type.as_str(),
                ship.prod_date.timestamp_millis(),
                ship.is_used,
                ship.speed,
                ship.crew_size,
                ship.rating,
                ship.id,
            ],
        )
        .with_context(|| format!("Failed to update ship {}", ship.id))?;

    Ok(changed == 1)
}

/// Returns false if no row had that id
pub fn delete_ship(conn: &Connection, id: i64) -> Result<bool> {
    let deleted = conn
        .execute("DELETE FROM ship WHERE id = ?1", params![id])
        .with_context(|| format!("Failed to delete ship {}", id))?;

    Ok(deleted == 1)
}

// ============================================================================
// CSV seed files
// ============================================================================

/// One data row of a CSV seed file
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    /// 1-based line in the file (the header is line 1)
    pub line: u64,
    /// The parsed fields, or why the row could not be read
    pub input: std::result::Result<ShipInput, String>,
}

/// Parse ship rows from CSV with header
/// `name,planet,shipType,prodDate,isUsed,speed,crewSize` (prodDate in epoch ms).
///
/// Rows are not validated here. A malformed row (unknown ship type, wrong
/// field count, non-numeric value) becomes a failed `CsvRow` and parsing
/// carries on; only I/O failures abort.
pub fn read_ships_csv<R: Read>(reader: R) -> Result<Vec<CsvRow>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers().context("Failed to read CSV header")?.clone();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let row = match result {
            Ok(record) => CsvRow {
                line: record.position().map_or(0, |p| p.line()),
                input: record
                    .deserialize::<ShipInput>(Some(&headers))
                    .map_err(|e| e.to_string()),
            },
            Err(e) if e.is_io_error() => {
                return Err(e).context("Failed to read CSV record");
            }
            Err(e) => CsvRow {
                line: e.position().map_or(0, |p| p.line()),
                input: Err(e.to_string()),
            },
        };

        if let Err(reason) = &row.input {
            tracing::warn!(line = row.line, %reason, "malformed CSV row");
        }
        rows.push(row);
    }

    Ok(rows)
}

pub fn load_csv(csv_path: &Path) -> Result<Vec<CsvRow>> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open CSV file {}", csv_path.display()))?;
    read_ships_csv(file)
}
