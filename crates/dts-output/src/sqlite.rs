//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! three tables: `vehicle_snapshots`, `tick_summaries` and `departures`.

use std::path::Path;

use rusqlite::Connection;

use crate::{DepartureRow, OutputResult, TickSummaryRow, VehicleSnapshotRow};
use crate::writer::OutputWriter;

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS vehicle_snapshots (
                 agent_id       INTEGER NOT NULL,
                 tick           INTEGER NOT NULL,
                 time_secs      REAL    NOT NULL,
                 x              REAL    NOT NULL,
                 y              REAL    NOT NULL,
                 heading        REAL    NOT NULL,
                 state          TEXT    NOT NULL,
                 waypoint       INTEGER NOT NULL,
                 remaining_wait REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS tick_summaries (
                 tick                   INTEGER PRIMARY KEY,
                 time_secs              REAL    NOT NULL,
                 live_cars              INTEGER NOT NULL,
                 spawned                INTEGER NOT NULL,
                 turned_away            INTEGER NOT NULL,
                 departures             INTEGER NOT NULL,
                 total_served           INTEGER NOT NULL,
                 average_time_in_system REAL    NOT NULL,
                 traffic_intensity      REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS departures (
                 agent_id       INTEGER NOT NULL,
                 tick           INTEGER NOT NULL,
                 entered_at     REAL    NOT NULL,
                 departed_at    REAL    NOT NULL,
                 time_in_system REAL    NOT NULL,
                 reason         TEXT    NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_snapshots(&mut self, rows: &[VehicleSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO vehicle_snapshots \
                 (agent_id, tick, time_secs, x, y, heading, state, waypoint, remaining_wait) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.agent_id,
                    row.tick as i64,
                    row.time_secs,
                    row.x as f64,
                    row.y as f64,
                    row.heading as f64,
                    row.state,
                    row.waypoint,
                    row.remaining_wait as f64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO tick_summaries \
             (tick, time_secs, live_cars, spawned, turned_away, departures, \
              total_served, average_time_in_system, traffic_intensity) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                row.tick as i64,
                row.time_secs,
                row.live_cars as i64,
                row.spawned as i64,
                row.turned_away as i64,
                row.departures as i64,
                row.total_served as i64,
                row.average_time_in_system,
                row.traffic_intensity,
            ],
        )?;
        Ok(())
    }

    fn write_departure(&mut self, row: &DepartureRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO departures \
             (agent_id, tick, entered_at, departed_at, time_in_system, reason) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                row.agent_id,
                row.tick as i64,
                row.entered_at,
                row.departed_at,
                row.time_in_system,
                row.reason,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
