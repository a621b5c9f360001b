use rusqlite::Connection;
use tracing::info;

/// Run SQLite migrations
pub fn run_migrations(conn: &Connection) -> Result<(), rusqlite::Error> {
    info!("Running SQLite migrations");

    create_readings_table(conn)?;
    create_readings_index(conn)?;

    info!("SQLite migrations completed successfully");
    Ok(())
}

/// Create the readings table
///
/// `position` holds the collection order; it is rewritten whenever the whole
/// collection is replaced (load, sort).
fn create_readings_table(conn: &Connection) -> Result<(), rusqlite::Error> {
    info!("Creating readings table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS readings (
            id TEXT PRIMARY KEY,
            position INTEGER NOT NULL,
            date TEXT NOT NULL,
            time TEXT NOT NULL,
            systolic INTEGER NOT NULL,
            diastolic INTEGER NOT NULL,
            pulse INTEGER NOT NULL
        )",
        [],
    )?;

    Ok(())
}

fn create_readings_index(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_readings_position ON readings (position)",
        [],
    )?;

    Ok(())
}
