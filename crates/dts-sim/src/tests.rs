//! Integration tests for dts-sim.

use dts_agent::VehicleParams;
use dts_core::{SimConfig, Tick, Vec2, WaypointId};
use dts_facility::{DepartureRecord, FacilityConfig, FacilityParams, FacilityStats};
use dts_spatial::{ServiceType, Waypoint, WaypointGraph, WaypointGraphBuilder};

use crate::{SimBuilder, SimObserver, StopHandle, TickSummary};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config(secs: f64, seed: u64) -> SimConfig {
    SimConfig::for_duration(secs, 0.1, seed)
}

/// entry (0,0) ──► order stop (stop_x, 0) ──► exit (stop_x + 2, 0)
///
/// `stop_x` is chosen so the 0.2 m steps of a speed-2 vehicle at dt 0.1 land
/// 0.1 m short of each waypoint.
fn lane(stop_x: f32) -> WaypointGraph {
    let mut b = WaypointGraphBuilder::new();
    let entry = b.add_waypoint(Waypoint::path(Vec2::ZERO));
    let order = b.add_waypoint(Waypoint::stop(Vec2::new(stop_x, 0.0), ServiceType::Order));
    let exit = b.add_waypoint(Waypoint::path(Vec2::new(stop_x + 2.0, 0.0)));
    b.add_chain(&[entry, order, exit]);
    b.build().unwrap()
}

/// Fixed arrival gap, fixed 20% order stop, no jitter.
fn fixed_params(gap: f64, service: f32, max_cars: usize) -> FacilityParams {
    FacilityParams {
        average_inter_arrival_time: gap,
        arrival_variation: 0.0,
        clamp_arrivals: true,
        average_service_time: service,
        service_variation: 0.0,
        max_cars,
        ..FacilityParams::default()
    }
}

fn facility(params: FacilityParams) -> FacilityConfig {
    FacilityConfig { params, vehicles: vec![VehicleParams::default()] }
}

#[derive(Default)]
struct Recorder {
    starts:     u64,
    departures: Vec<DepartureRecord>,
    summaries:  Vec<TickSummary>,
    snapshots:  Vec<(Tick, usize)>,
    ended:      Vec<(Tick, u64)>,
    stop_at:    Option<(Tick, StopHandle)>,
}

impl SimObserver for Recorder {
    fn on_tick_start(&mut self, _tick: Tick, _now: f64) {
        self.starts += 1;
    }
    fn on_departure(&mut self, _tick: Tick, record: &DepartureRecord) {
        self.departures.push(*record);
    }
    fn on_tick_end(&mut self, summary: &TickSummary) {
        self.summaries.push(*summary);
        if let Some((tick, handle)) = &self.stop_at {
            if summary.tick == *tick {
                handle.request_stop();
            }
        }
    }
    fn on_snapshot(&mut self, tick: Tick, _now: f64, vehicles: &[dts_agent::VehicleAgent]) {
        self.snapshots.push((tick, vehicles.len()));
    }
    fn on_sim_end(&mut self, final_tick: Tick, stats: &FacilityStats) {
        self.ended.push((final_tick, stats.total_cars_served()));
    }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;
    use crate::SimError;
    use dts_core::DtsError;

    #[test]
    fn default_spawn_faces_first_link() {
        let sim = SimBuilder::new(test_config(1.0, 1), lane(2.1), FacilityConfig::default())
            .build()
            .unwrap();
        assert_eq!(sim.facility.initial_waypoint(), WaypointId(0));
        assert_eq!(sim.facility.spawn_pose().position, Vec2::ZERO);
        assert!(sim.facility.spawn_pose().heading.abs() < 1e-6);
        assert_eq!(sim.clock.current_tick, Tick(0));
    }

    #[test]
    fn zero_tick_duration_errors() {
        let config = SimConfig { tick_duration_secs: 0.0, total_ticks: 10, ..SimConfig::default() };
        let result = SimBuilder::new(config, lane(2.1), FacilityConfig::default()).build();
        assert!(matches!(result, Err(SimError::Core(DtsError::InvalidTickDuration(d))) if d == 0.0));
    }

    #[test]
    fn nan_tick_duration_errors() {
        let config =
            SimConfig { tick_duration_secs: f32::NAN, total_ticks: 10, ..SimConfig::default() };
        let result = SimBuilder::new(config, lane(2.1), FacilityConfig::default()).build();
        assert!(matches!(result, Err(SimError::Core(DtsError::InvalidTickDuration(_)))));
    }

    #[test]
    fn empty_graph_errors() {
        let result =
            SimBuilder::new(test_config(1.0, 1), WaypointGraph::empty(), FacilityConfig::default())
                .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn facility_errors_propagate() {
        let cfg = FacilityConfig { params: FacilityParams::default(), vehicles: vec![] };
        let result = SimBuilder::new(test_config(1.0, 1), lane(2.1), cfg).build();
        assert!(matches!(result, Err(SimError::Facility(_))));
    }

    #[test]
    fn cycle_is_only_a_warning() {
        let mut b = WaypointGraphBuilder::new();
        let a = b.add_waypoint(Waypoint::path(Vec2::ZERO));
        let c = b.add_waypoint(Waypoint::path(Vec2::new(3.0, 0.0)));
        b.add_link(a, c);
        b.add_link(c, a);
        let graph = b.build().unwrap();
        assert!(graph.cycle_reachable_from(a));
        assert!(SimBuilder::new(test_config(1.0, 1), graph, FacilityConfig::default()).build().is_ok());
    }
}

// ── Full runs ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    /// Arrivals every 10 s, one car at a time, a 2 s order stop: each car
    /// needs 1 s to the stop, 2 s there, 1 s to the exit.
    #[test]
    fn single_server_thirty_seconds() {
        let mut config = test_config(30.0, 2024);
        config.output_interval_ticks = 10;
        let mut sim = SimBuilder::new(config, lane(2.1), facility(fixed_params(10.0, 10.0, 1)))
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();

        assert_eq!(sim.clock.current_tick, Tick(300));
        assert_eq!(rec.starts, 300);
        assert_eq!(rec.summaries.len(), 300);
        assert_eq!(rec.snapshots.len(), 30);
        assert!(rec.summaries.iter().all(|s| s.live <= 1));
        assert!(rec.summaries.iter().all(|s| s.contacts == 0));

        let stats = sim.facility.stats();
        assert_eq!(stats.total_spawned(), 3);
        assert_eq!(stats.total_cars_served(), 3);
        assert_eq!(rec.departures.len(), 3);
        // Cars arrive on ticks 0, 100, 200 and depart 40 ticks later.  The
        // clock accumulates the f32 tick duration, so compare in ticks.
        let dt = sim.clock.tick_duration_secs as f64;
        for (i, d) in rec.departures.iter().enumerate() {
            let arrived = 100.0 * i as f64;
            assert!((d.entered_at - arrived * dt).abs() < 1e-9, "{d:?}");
            assert!((d.departed_at - (arrived + 40.0) * dt).abs() < 1e-9, "{d:?}");
            assert!((d.time_in_system - 40.0 * dt).abs() < 1e-9, "{d:?}");
        }
        assert!((stats.average_time_in_system() - 40.0 * dt).abs() < 1e-9);
        assert!((stats.throughput_per_hour(30.0) - 360.0).abs() < 1e-9);
        assert_eq!(rec.ended, vec![(Tick(300), 3)]);
        assert!((rec.summaries[299].traffic_intensity - 1.0).abs() < 1e-9);
    }

    #[test]
    fn same_seed_same_history() {
        let params = FacilityParams {
            average_inter_arrival_time: 2.0,
            average_service_time: 10.0,
            max_cars: 4,
            ..FacilityParams::default()
        };
        let run = |seed| {
            let mut sim = SimBuilder::new(test_config(60.0, seed), lane(4.1), facility(params.clone()))
                .build()
                .unwrap();
            let mut rec = Recorder::default();
            sim.run(&mut rec).unwrap();
            let poses: Vec<_> = sim.vehicles().iter().map(|v| v.pose()).collect();
            (rec.departures, rec.summaries, poses)
        };
        let a = run(11);
        let b = run(11);
        assert_eq!(a, b);
        assert!(!a.0.is_empty());
    }

    /// A long order stop holds the first car; the second stops behind it.
    #[test]
    fn queue_forms_behind_a_serving_car() {
        let mut sim = SimBuilder::new(test_config(60.0, 3), lane(6.1), facility(fixed_params(1.0, 100.0, 2)))
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        sim.run_ticks(100, &mut rec).unwrap();

        let cars = sim.vehicles();
        assert_eq!(cars.len(), 2);
        let (front, back) = (&cars[0], &cars[1]);
        assert_eq!(front.state(), dts_agent::VehicleState::WaitingForService);
        assert!(!back.is_moving());
        assert!(back.position().x < front.position().x - 1.0);
        assert!(back.position().x > 3.0);
        assert!(rec.summaries.iter().all(|s| s.contacts == 0));
        assert!(sim.facility.stats().rejected_at_capacity() > 0);
    }

    #[test]
    fn removal_through_the_sim() {
        let mut sim = SimBuilder::new(test_config(30.0, 1), lane(2.1), facility(fixed_params(10.0, 10.0, 1)))
            .build()
            .unwrap();
        sim.run_ticks(5, &mut crate::NoopObserver).unwrap();
        let id = sim.vehicles()[0].id();
        let rec = sim.remove_agent(id).unwrap();
        assert_eq!(rec.reason, dts_agent::DepartureReason::Removed);
        assert!(sim.vehicles().is_empty());
        assert!(sim.index.is_empty());
    }

    #[test]
    fn hot_reload_between_ticks() {
        let mut sim = SimBuilder::new(test_config(30.0, 1), lane(2.1), facility(fixed_params(10.0, 10.0, 1)))
            .build()
            .unwrap();
        sim.run_ticks(5, &mut crate::NoopObserver).unwrap();
        assert!(sim.update_params(fixed_params(-1.0, 10.0, 1)).is_err());
        sim.update_params(fixed_params(5.0, 10.0, 1)).unwrap();
        assert!((sim.facility.traffic_intensity() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn host_supplied_tick_durations() {
        let mut sim = SimBuilder::new(test_config(30.0, 1), lane(2.1), facility(fixed_params(10.0, 10.0, 1)))
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        for dt in [0.2, 0.2, 0.05, 0.05] {
            sim.step_with(dt, &mut rec).unwrap().unwrap();
        }
        assert_eq!(sim.clock.current_tick, Tick(4));
        assert!((sim.now() - 0.5).abs() < 1e-6);
        // speed 2: 0.4 + 0.4 + 0.1 + 0.1
        let x = sim.vehicles()[0].position().x;
        assert!((x - 1.0).abs() < 1e-5, "x = {x}");

        // A zero or negative delta still counts a tick but moves nothing.
        let summary = sim.step_with(-1.0, &mut rec).unwrap().unwrap();
        assert_eq!(summary.tick, Tick(4));
        assert_eq!(sim.clock.current_tick, Tick(5));
        assert!((sim.now() - 0.5).abs() < 1e-6);
        assert_eq!(sim.vehicles()[0].position().x, x);
        assert_eq!(rec.summaries.len(), 5);

        sim.stop_handle().request_stop();
        assert!(sim.step_with(0.1, &mut rec).unwrap().is_none());
        assert_eq!(sim.clock.current_tick, Tick(5));
    }
}

// ── Cancellation ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod stop_tests {
    use super::*;

    #[test]
    fn observer_stops_the_run() {
        let mut sim = SimBuilder::new(test_config(30.0, 1), lane(2.1), facility(fixed_params(10.0, 10.0, 1)))
            .build()
            .unwrap();
        let mut rec = Recorder { stop_at: Some((Tick(14), sim.stop_handle())), ..Recorder::default() };
        sim.run(&mut rec).unwrap();

        assert_eq!(sim.clock.current_tick, Tick(15));
        assert_eq!(rec.summaries.len(), 15);
        assert!(sim.is_stopped());
        assert_eq!(rec.ended.len(), 1);

        let frozen = sim.vehicles()[0].pose();
        let served = sim.facility.stats().total_cars_served();
        sim.run_ticks(100, &mut rec).unwrap();
        assert_eq!(sim.clock.current_tick, Tick(15));
        assert_eq!(sim.vehicles()[0].pose(), frozen);
        assert_eq!(sim.facility.stats().total_cars_served(), served);
        assert!(sim.remove_agent(sim.vehicles()[0].id()).is_none());
    }

    #[test]
    fn stop_from_another_thread() {
        let handle = StopHandle::new();
        let mut sim = SimBuilder::new(test_config(30.0, 1), lane(2.1), FacilityConfig::default())
            .stop_handle(handle.clone())
            .build()
            .unwrap();
        std::thread::spawn(move || handle.request_stop()).join().unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();
        assert_eq!(sim.clock.current_tick, Tick(0));
        assert_eq!(rec.starts, 0);
        assert_eq!(rec.ended, vec![(Tick(0), 0)]);
        assert_eq!(sim.facility.stats().total_spawned(), 0);
    }
}
