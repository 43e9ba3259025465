//! `dts-facility` — the drive-thru as a queueing system.
//!
//! The [`FacilityScheduler`] owns every live [`VehicleAgent`][dts_agent::VehicleAgent].
//! It turns aggregate queueing inputs (arrival rate, mean service time,
//! stage split) into per-vehicle stochastic timings, admits vehicles up to
//! `max_cars`, and keeps FIFO time-in-system statistics.
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`params`]    | `FacilityParams`, `DerivedParams`, `StageShares`          |
//! | [`service`]   | `ServiceTimeAllocator`                                    |
//! | [`arrival`]   | `InterArrivalSampler`, `ArrivalTimer`                     |
//! | [`stats`]     | `FacilityStats`, `DepartureRecord`                        |
//! | [`scheduler`] | `FacilityScheduler`, `SpawnPoint`, `SpawnOutcome`, `StepReport` |
//! | [`loader`]    | `FacilityConfig`, TOML loading                            |

pub mod arrival;
pub mod error;
pub mod loader;
pub mod params;
pub mod scheduler;
pub mod service;
pub mod stats;


pub use arrival::{ArrivalTimer, InterArrivalSampler};
pub use error::{FacilityError, FacilityResult};
pub use loader::{FacilityConfig, load_facility_toml, parse_facility_toml};
pub use params::{DerivedParams, FacilityParams, StageShares};
pub use scheduler::{FacilityScheduler, SpawnOutcome, SpawnPoint, StepReport};
pub use service::ServiceTimeAllocator;
pub use stats::{DepartureRecord, FacilityStats};
