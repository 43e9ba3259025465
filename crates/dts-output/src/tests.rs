//! Integration tests for dts-output.

#[cfg(test)]
mod fixtures {
    use crate::row::{DepartureRow, TickSummaryRow, VehicleSnapshotRow};

    pub fn snap_row(agent_id: u32, tick: u64) -> VehicleSnapshotRow {
        VehicleSnapshotRow {
            agent_id,
            tick,
            time_secs:      tick as f64 * 0.1,
            x:              agent_id as f32,
            y:              -1.5,
            heading:        0.0,
            state:          "traveling",
            waypoint:       agent_id + 1,
            remaining_wait: 0.0,
        }
    }

    pub fn summary_row(tick: u64) -> TickSummaryRow {
        TickSummaryRow {
            tick,
            time_secs:              tick as f64 * 0.5,
            live_cars:              2,
            spawned:                1,
            turned_away:            0,
            departures:             0,
            total_served:           tick,
            average_time_in_system: 12.25,
            traffic_intensity:      0.5,
        }
    }

    pub fn departure_row(agent_id: u32) -> DepartureRow {
        DepartureRow {
            agent_id,
            tick:           40,
            entered_at:     1.0,
            departed_at:    4.5,
            time_in_system: 3.5,
            reason:         "journey_complete",
        }
    }
}

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::{CsvWriter, DEPARTURE_HEADERS, SNAPSHOT_HEADERS, SUMMARY_HEADERS};
    use crate::writer::OutputWriter;
    use super::fixtures::{departure_row, snap_row, summary_row};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn headers(dir: &TempDir, file: &str) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(dir.path().join(file)).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    fn records(dir: &TempDir, file: &str) -> Vec<csv::StringRecord> {
        let mut rdr = csv::Reader::from_path(dir.path().join(file)).unwrap();
        rdr.records().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("vehicle_snapshots.csv").exists());
        assert!(dir.path().join("tick_summaries.csv").exists());
        assert!(dir.path().join("departures.csv").exists());
    }

    #[test]
    fn csv_creates_missing_directory() {
        let dir = tmp();
        let nested = dir.path().join("runs").join("a");
        let _w = CsvWriter::new(&nested).unwrap();
        assert!(nested.join("departures.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        assert_eq!(headers(&dir, "vehicle_snapshots.csv"), SNAPSHOT_HEADERS);
        assert_eq!(headers(&dir, "tick_summaries.csv"), SUMMARY_HEADERS);
        assert_eq!(headers(&dir, "departures.csv"), DEPARTURE_HEADERS);
    }

    #[test]
    fn csv_snapshot_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[snap_row(0, 5), snap_row(1, 5), snap_row(2, 5)]).unwrap();
        w.finish().unwrap();

        let rows = records(&dir, "vehicle_snapshots.csv");
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "0"); // agent_id
        assert_eq!(&rows[0][1], "5"); // tick
        assert_eq!(&rows[2][3], "2.0000"); // x
        assert_eq!(&rows[1][4], "-1.5000"); // y
        assert_eq!(&rows[1][6], "traveling");
        assert_eq!(&rows[1][7], "2"); // waypoint
    }

    #[test]
    fn csv_summary_and_departure_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&summary_row(3)).unwrap();
        w.write_departure(&departure_row(7)).unwrap();
        w.finish().unwrap();

        let summaries = records(&dir, "tick_summaries.csv");
        assert_eq!(summaries.len(), 1);
        assert_eq!(&summaries[0][0], "3");
        assert_eq!(&summaries[0][1], "1.500");
        assert_eq!(&summaries[0][7], "12.250");

        let departures = records(&dir, "departures.csv");
        assert_eq!(departures.len(), 1);
        assert_eq!(&departures[0][0], "7");
        assert_eq!(&departures[0][4], "3.500");
        assert_eq!(&departures[0][5], "journey_complete");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_empty_snapshot_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[]).unwrap();
    }

    /// Ten seconds of a one-stop lane with arrivals every 4 s.
    #[test]
    fn integration_csv() {
        use dts_agent::VehicleParams;
        use dts_core::{SimConfig, Vec2};
        use dts_facility::{FacilityConfig, FacilityParams};
        use dts_sim::SimBuilder;
        use dts_spatial::{ServiceType, Waypoint, WaypointGraphBuilder};

        use crate::observer::SimOutputObserver;

        let mut b = WaypointGraphBuilder::new();
        let entry = b.add_waypoint(Waypoint::path(Vec2::ZERO));
        let order = b.add_waypoint(Waypoint::stop(Vec2::new(2.1, 0.0), ServiceType::Order));
        let exit = b.add_waypoint(Waypoint::path(Vec2::new(4.1, 0.0)));
        b.add_chain(&[entry, order, exit]);
        let graph = b.build().unwrap();

        let mut config = SimConfig::for_duration(10.0, 0.1, 1);
        config.output_interval_ticks = 10;
        let facility = FacilityConfig {
            params: FacilityParams {
                average_inter_arrival_time: 4.0,
                arrival_variation: 0.0,
                average_service_time: 5.0,
                service_variation: 0.0,
                max_cars: 1,
                ..FacilityParams::default()
            },
            vehicles: vec![VehicleParams::default()],
        };
        let mut sim = SimBuilder::new(config, graph, facility).build().unwrap();

        let dir = tmp();
        let writer = CsvWriter::new(dir.path()).unwrap();
        let mut obs = SimOutputObserver::new(writer);
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");

        assert_eq!(records(&dir, "tick_summaries.csv").len(), 100);

        let departures = records(&dir, "departures.csv");
        let served = sim.facility.stats().total_cars_served() as usize;
        assert!(served >= 1);
        assert_eq!(departures.len(), served);

        // At most one car per snapshot tick.
        let snapshots = records(&dir, "vehicle_snapshots.csv");
        assert!(!snapshots.is_empty() && snapshots.len() <= 10);
        assert_eq!(&snapshots[0][1], "0");
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;
    use super::fixtures::{departure_row, snap_row, summary_row};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn open(dir: &TempDir) -> rusqlite::Connection {
        rusqlite::Connection::open(dir.path().join("output.db")).unwrap()
    }

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("output.db").exists());
    }

    #[test]
    fn sqlite_snapshot_count() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[snap_row(0, 1), snap_row(1, 1), snap_row(2, 1)]).unwrap();
        w.finish().unwrap();

        let count: i64 = open(&dir)
            .query_row("SELECT COUNT(*) FROM vehicle_snapshots", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn sqlite_snapshot_values() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[snap_row(4, 2)]).unwrap();
        w.finish().unwrap();

        let (x, state, waypoint): (f64, String, i64) = open(&dir)
            .query_row(
                "SELECT x, state, waypoint FROM vehicle_snapshots WHERE agent_id = 4",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(x, 4.0);
        assert_eq!(state, "traveling");
        assert_eq!(waypoint, 5);
    }

    #[test]
    fn sqlite_tick_summary() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&summary_row(7)).unwrap();
        w.finish().unwrap();

        let (tick, served, avg): (i64, i64, f64) = open(&dir)
            .query_row(
                "SELECT tick, total_served, average_time_in_system FROM tick_summaries WHERE tick = 7",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(tick, 7);
        assert_eq!(served, 7);
        assert_eq!(avg, 12.25);
    }

    #[test]
    fn sqlite_departure() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_departure(&departure_row(3)).unwrap();
        w.finish().unwrap();

        let (agent, reason, tis): (i64, String, f64) = open(&dir)
            .query_row("SELECT agent_id, reason, time_in_system FROM departures", [], |r| {
                Ok((r.get(0)?, r.get(1)?, r.get(2)?))
            })
            .unwrap();
        assert_eq!(agent, 3);
        assert_eq!(reason, "journey_complete");
        assert_eq!(tis, 3.5);
    }
}
