// Fleet Registry - Core Library
// Exposes all modules for use in the CLI, the API server and tests

pub mod db;
pub mod ship;
pub mod filter;   // Filter Builder
pub mod rating;   // Rating Engine
pub mod schema;   // Validation
pub mod errors;
pub mod service;
pub mod config;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use db::{
    setup_database, open_database, load_csv, read_ships_csv, CsvRow,
    select_ships, select_all_ships, count_ships, find_ship,
    insert_ship, update_ship, delete_ship,
};
pub use ship::{Ship, ShipInput, ShipType};
pub use filter::{
    Field, Fragment, Predicate, ShipFilter, ShipOrder, Page, ListParams,
    DEFAULT_PAGE_SIZE,
};
pub use schema::{ValidationError, ValidationResult};
pub use errors::{ErrorKind, ShipError, ShipResult};
pub use service::ImportSummary;
pub use config::Config;

#[cfg(feature = "server")]
pub use api::{create_router, AppState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
