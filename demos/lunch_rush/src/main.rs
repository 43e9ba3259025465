//! lunch_rush — a single-lane drive-thru through the midday peak.
//!
//! Cars arrive at random (exponential gaps), queue at the menu board, pay,
//! pick up, and leave.  Facility parameters come from an optional TOML file
//! given as the first argument; without one the built-in lunch-rush numbers
//! are used.
//!
//! ```text
//! RUST_LOG=lunch_rush=debug cargo run -p lunch_rush -- demos/lunch_rush/lunch_rush.toml
//! ```

mod lane;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};

use dts_agent::VehicleAgent;
use dts_core::{SimConfig, Tick};
use dts_facility::{DepartureRecord, FacilityConfig, FacilityParams, FacilityStats, SpawnPoint, load_facility_toml};
use dts_output::{CsvWriter, OutputWriter, SimOutputObserver};
use dts_sim::{SimBuilder, SimObserver, TickSummary};

use lane::build_lane;

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:                  u64   = 42;
const TICK_DURATION_SECS:    f32   = 0.05;  // 20 Hz
const SIM_SECS:              f64   = 2.0 * 3_600.0;
const OUTPUT_INTERVAL_TICKS: u64   = 20;    // one snapshot per simulated second
const PROGRESS_EVERY_SECS:   f64   = 600.0;
const OUTPUT_DIR:            &str  = "output/lunch_rush";

fn lunch_rush_params() -> FacilityParams {
    FacilityParams {
        customers_per_hour:   Some(60.0),
        arrival_variation:    0.3,
        average_service_time: 90.0,
        service_variation:    0.15,
        order_percentage:     0.25,
        payment_percentage:   0.15,
        max_cars:             8,
        ..FacilityParams::default()
    }
}

// ── Observer wrapper ──────────────────────────────────────────────────────────

/// Forwards to the output observer, counting rows and logging progress.
struct RushObserver<W: OutputWriter> {
    inner:          SimOutputObserver<W>,
    progress_ticks: u64,
    snapshot_rows:  usize,
    summary_rows:   usize,
    departure_rows: usize,
    peak_live:      usize,
}

impl<W: OutputWriter> RushObserver<W> {
    fn new(inner: SimOutputObserver<W>, tick_duration_secs: f32) -> Self {
        let progress_ticks = (PROGRESS_EVERY_SECS / tick_duration_secs as f64).round().max(1.0) as u64;
        Self {
            inner,
            progress_ticks,
            snapshot_rows: 0,
            summary_rows: 0,
            departure_rows: 0,
            peak_live: 0,
        }
    }
}

impl<W: OutputWriter> SimObserver for RushObserver<W> {
    fn on_departure(&mut self, tick: Tick, record: &DepartureRecord) {
        self.departure_rows += 1;
        self.inner.on_departure(tick, record);
    }

    fn on_tick_end(&mut self, s: &TickSummary) {
        self.summary_rows += 1;
        self.peak_live = self.peak_live.max(s.live);
        if s.tick.0 > 0 && s.tick.0.is_multiple_of(self.progress_ticks) {
            tracing::info!(
                "t={:>6.0}s  in lane {:>2}  served {:>4}  mean time in system {:>6.1}s",
                s.now,
                s.live,
                s.total_served,
                s.average_time_in_system
            );
        }
        self.inner.on_tick_end(s);
    }

    fn on_snapshot(&mut self, tick: Tick, now: f64, vehicles: &[VehicleAgent]) {
        self.snapshot_rows += vehicles.len();
        self.inner.on_snapshot(tick, now, vehicles);
    }

    fn on_sim_end(&mut self, final_tick: Tick, stats: &FacilityStats) {
        self.inner.on_sim_end(final_tick, stats);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("lunch_rush=info,dts_sim=info,dts_facility=info")
            }),
        )
        .init();

    // 1. Facility configuration.
    let facility = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => {
            let cfg = load_facility_toml(&path)
                .with_context(|| format!("loading facility config {}", path.display()))?;
            tracing::info!("loaded {} ({} vehicle template(s))", path.display(), cfg.vehicles.len());
            cfg
        }
        None => FacilityConfig { params: lunch_rush_params(), ..FacilityConfig::default() },
    };

    // 2. Lane.
    let (graph, entry) = build_lane()?;
    tracing::info!("lane: {} waypoints, {} links", graph.node_count(), graph.edge_count());

    // 3. Sim.
    let mut config = SimConfig::for_duration(SIM_SECS, TICK_DURATION_SECS, SEED);
    config.output_interval_ticks = OUTPUT_INTERVAL_TICKS;
    let spawn = SpawnPoint {
        pose: dts_core::Pose::new(graph.position(entry)?, 0.0),
        initial_waypoint: Some(entry),
    };
    let mut sim = SimBuilder::new(config.clone(), graph, facility).spawn_point(spawn).build()?;
    tracing::info!(
        "mean inter-arrival {:.1}s, traffic intensity {:.2}",
        sim.facility.derived().average_inter_arrival_time,
        sim.facility.traffic_intensity()
    );

    // 4. Output.
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = RushObserver::new(SimOutputObserver::new(writer), config.tick_duration_secs);

    // 5. Run.
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        tracing::error!("output error: {e}");
    }

    // 6. Summary.
    let stats = sim.facility.stats();
    tracing::info!("simulated {} in {:.3}s wall", sim.clock, elapsed.as_secs_f64());
    tracing::info!(
        "spawned {}  served {}  turned away {} (full) / {} (entry blocked)  peak in lane {}",
        stats.total_spawned(),
        stats.total_cars_served(),
        stats.rejected_at_capacity(),
        stats.rejected_spawn_occupied(),
        obs.peak_live
    );
    tracing::info!(
        "mean time in system {:.1}s, throughput {:.1} cars/h",
        stats.average_time_in_system(),
        stats.throughput_per_hour(sim.now())
    );
    tracing::info!(
        "{OUTPUT_DIR}: vehicle_snapshots.csv {} rows, tick_summaries.csv {} rows, departures.csv {} rows",
        obs.snapshot_rows,
        obs.summary_rows,
        obs.departure_rows
    );

    Ok(())
}
