//! `dts-core` — foundational types for the drive-thru lane simulator.
//!
//! This crate is a dependency of every other `dts-*` crate.  It intentionally
//! has no `dts-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `WaypointId`                               |
//! | [`geo`]         | `Vec2`, `Pose`, angle helpers                         |
//! | [`time`]        | `Tick`, `SimClock`, `Clock`, `SimConfig`              |
//! | [`rng`]         | `AgentRng` (per-agent), `SimRng` (global), exponential draws |
//! | [`error`]       | `DtsError`, `DtsResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{DtsError, DtsResult};
pub use geo::{Pose, Vec2};
pub use ids::{AgentId, WaypointId};
pub use rng::{AgentRng, SimRng, sample_exponential};
pub use time::{Clock, SimClock, SimConfig, Tick};
