//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use dts_agent::VehicleAgent;
use dts_core::Tick;
use dts_facility::{DepartureRecord, FacilityStats};
use dts_sim::{SimObserver, TickSummary};

use crate::row::{DepartureRow, TickSummaryRow, VehicleSnapshotRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes vehicle snapshots, tick summaries and
/// departures to any [`OutputWriter`] backend (CSV, SQLite, …).
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                tracing::warn!("output write failed, later errors suppressed: {e}");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_departure(&mut self, tick: Tick, record: &DepartureRecord) {
        let row = DepartureRow {
            agent_id:       record.agent.0,
            tick:           tick.0,
            entered_at:     record.entered_at,
            departed_at:    record.departed_at,
            time_in_system: record.time_in_system,
            reason:         record.reason.as_str(),
        };
        let result = self.writer.write_departure(&row);
        self.store_err(result);
    }

    fn on_tick_end(&mut self, s: &TickSummary) {
        let row = TickSummaryRow {
            tick:                   s.tick.0,
            time_secs:              s.now,
            live_cars:              s.live as u64,
            spawned:                s.spawned as u64,
            turned_away:            s.turned_away as u64,
            departures:             s.departures as u64,
            total_served:           s.total_served,
            average_time_in_system: s.average_time_in_system,
            traffic_intensity:      s.traffic_intensity,
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, now: f64, vehicles: &[VehicleAgent]) {
        let rows: Vec<VehicleSnapshotRow> = vehicles
            .iter()
            .map(|v| {
                let pose = v.pose();
                VehicleSnapshotRow {
                    agent_id:       v.id().0,
                    tick:           tick.0,
                    time_secs:      now,
                    x:              pose.position.x,
                    y:              pose.position.y,
                    heading:        pose.heading,
                    state:          v.state().as_str(),
                    waypoint:       v.current_waypoint().0,
                    remaining_wait: v.remaining_wait_time(),
                }
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick, _stats: &FacilityStats) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
