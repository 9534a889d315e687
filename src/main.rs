use anyhow::{bail, Context, Result};
use std::env;
use std::path::Path;

use fleet_registry::config::{self, Config};
use fleet_registry::{load_csv, open_database, service, Predicate, ShipOrder};

const USAGE: &str = "usage: fleet-registry <import FILE.csv | count | list [ORDER]>";

fn main() -> Result<()> {
    let config = Config::from_env()?;
    config::init_tracing(&config.log_filter);

    let args: Vec<String> = env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("import") => {
            let csv_path = args.get(1).context(USAGE)?;
            run_import(&config, Path::new(csv_path))
        }
        Some("count") => run_count(&config),
        Some("list") => {
            let order = match args.get(1) {
                Some(name) => name.parse::<ShipOrder>().map_err(anyhow::Error::msg)?,
                None => ShipOrder::Id,
            };
            run_list(&config, order)
        }
        _ => bail!(USAGE),
    }
}

fn run_import(config: &Config, csv_path: &Path) -> Result<()> {
    println!("🚀 Fleet Registry - CSV → SQLite");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    println!("\n📂 Loading CSV...");
    let rows = load_csv(csv_path)?;
    let unreadable = rows.iter().filter(|r| r.input.is_err()).count();
    println!("✓ Loaded {} rows from {} ({} unreadable)", rows.len(), csv_path.display(), unreadable);

    let conn = open_database(&config.db_path)?;
    println!("✓ Database ready: {}", config.db_path.display());

    println!("\n💾 Creating ships...");
    let summary = service::import_ships(&conn, &rows)?;
    println!("✓ Inserted: {} ships", summary.inserted);
    println!("✓ Rejected: {} rows (see log for reasons)", summary.rejected);

    let total = fleet_registry::count_ships(&conn, &Predicate::all())?;
    println!("\n✅ Database contains {} ships", total);

    Ok(())
}

fn run_count(config: &Config) -> Result<()> {
    let conn = open_database(&config.db_path)?;
    let total = fleet_registry::count_ships(&conn, &Predicate::all())?;
    println!("{}", total);
    Ok(())
}

fn run_list(config: &Config, order: ShipOrder) -> Result<()> {
    let conn = open_database(&config.db_path)?;
    let ships = fleet_registry::select_all_ships(&conn, &Predicate::all(), order)?;

    println!(
        "{:>5}  {:<24} {:<16} {:<10} {:>5} {:>5} {:>5} {:>5} {:>7}",
        "ID", "NAME", "PLANET", "TYPE", "YEAR", "USED", "SPEED", "CREW", "RATING"
    );
    for ship in &ships {
        println!(
            "{:>5}  {:<24} {:<16} {:<10} {:>5} {:>5} {:>5.2} {:>5} {:>7.2}",
            ship.id,
            ship.name,
            ship.planet,
            ship.ship_type,
            ship.prod_year(),
            if ship.is_used { "yes" } else { "no" },
            ship.speed,
            ship.crew_size,
            ship.rating,
        );
    }
    println!("\n{} ships", ships.len());

    Ok(())
}
