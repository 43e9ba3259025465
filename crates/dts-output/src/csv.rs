//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `vehicle_snapshots.csv`
//! - `tick_summaries.csv`
//! - `departures.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::{DepartureRow, OutputResult, TickSummaryRow, VehicleSnapshotRow};
use crate::writer::OutputWriter;

pub const SNAPSHOT_HEADERS: [&str; 9] =
    ["agent_id", "tick", "time_secs", "x", "y", "heading", "state", "waypoint", "remaining_wait"];

pub const SUMMARY_HEADERS: [&str; 9] = [
    "tick",
    "time_secs",
    "live_cars",
    "spawned",
    "turned_away",
    "departures",
    "total_served",
    "average_time_in_system",
    "traffic_intensity",
];

pub const DEPARTURE_HEADERS: [&str; 6] =
    ["agent_id", "tick", "entered_at", "departed_at", "time_in_system", "reason"];

/// Writes simulation output to three CSV files.
pub struct CsvWriter {
    snapshots:  Writer<File>,
    summaries:  Writer<File>,
    departures: Writer<File>,
    finished:   bool,
}

impl CsvWriter {
    /// Open (or create) the CSV files in `dir` and write the header rows.
    ///
    /// `dir` is created if it does not exist.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut snapshots = Writer::from_path(dir.join("vehicle_snapshots.csv"))?;
        snapshots.write_record(SNAPSHOT_HEADERS)?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(SUMMARY_HEADERS)?;

        let mut departures = Writer::from_path(dir.join("departures.csv"))?;
        departures.write_record(DEPARTURE_HEADERS)?;

        Ok(Self {
            snapshots,
            summaries,
            departures,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[VehicleSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.agent_id.to_string(),
                row.tick.to_string(),
                format!("{:.3}", row.time_secs),
                format!("{:.4}", row.x),
                format!("{:.4}", row.y),
                format!("{:.4}", row.heading),
                row.state.to_owned(),
                row.waypoint.to_string(),
                format!("{:.3}", row.remaining_wait),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            format!("{:.3}", row.time_secs),
            row.live_cars.to_string(),
            row.spawned.to_string(),
            row.turned_away.to_string(),
            row.departures.to_string(),
            row.total_served.to_string(),
            format!("{:.3}", row.average_time_in_system),
            format!("{:.4}", row.traffic_intensity),
        ])?;
        Ok(())
    }

    fn write_departure(&mut self, row: &DepartureRow) -> OutputResult<()> {
        self.departures.write_record(&[
            row.agent_id.to_string(),
            row.tick.to_string(),
            format!("{:.3}", row.entered_at),
            format!("{:.3}", row.departed_at),
            format!("{:.3}", row.time_in_system),
            row.reason.to_owned(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.summaries.flush()?;
        self.departures.flush()?;
        Ok(())
    }
}
