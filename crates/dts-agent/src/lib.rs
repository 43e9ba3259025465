//! `dts-agent` — one vehicle moving through the lane.
//!
//! # Overview
//!
//! A [`VehicleAgent`] owns its pose, its current target waypoint, two wait
//! timers, and an RNG.  Once per simulation step the host calls
//! [`VehicleAgent::tick`] with a [`TickContext`] that lends it the lane graph,
//! the shared [`SpatialQuery`][dts_spatial::SpatialQuery], and optionally a
//! [`ServiceTimeSource`].  The agent never sees other agents except through
//! proximity queries, so single-file queueing emerges from each vehicle
//! refusing to drive into an occupied slot ahead of it.
//!
//! When the agent leaves the lane it reports a [`Departure`] through its
//! [`TerminationNotifier`] exactly once.
//!
//! # Crate layout
//!
//! | Module       | Contents                                        |
//! |--------------|-------------------------------------------------|
//! | [`agent`]    | `VehicleAgent`, `AgentSpawn`, `TickOutcome`     |
//! | [`params`]   | `VehicleParams`, `QueueSlotPolicy`              |
//! | [`state`]    | `VehicleState`                                  |
//! | [`context`]  | `TickContext`                                   |
//! | [`service`]  | `ServiceTimeSource`, `ConstantServiceTime`      |
//! | [`notifier`] | `TerminationNotifier`, `Departure`              |

pub mod agent;
pub mod context;
pub mod error;
pub mod notifier;
pub mod params;
pub mod service;
pub mod state;


pub use agent::{AgentSpawn, BlockReason, TickOutcome, VehicleAgent};
pub use context::TickContext;
pub use error::{AgentError, AgentResult};
pub use notifier::{Departure, DepartureReason, TerminationNotifier};
pub use params::{QueueSlotPolicy, VehicleParams};
pub use service::{ConstantServiceTime, ServiceTimeSource};
pub use state::VehicleState;
