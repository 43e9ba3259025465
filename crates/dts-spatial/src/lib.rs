//! `dts-spatial` — lane topology, occupancy indexing, and proximity queries.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`waypoint`] | `Waypoint`, `ServiceType`                                    |
//! | [`graph`]    | `WaypointGraph` (CSR successor lists), `WaypointGraphBuilder` |
//! | [`query`]    | `SpatialQuery` trait, `CollisionLayer`, `OrientedBox`, `Occupant` |
//! | [`index`]    | `OccupancyIndex` — R-tree backed `SpatialQuery`              |
//! | [`contact`]  | `ContactTracker`, `ContactEvent` (edge-triggered touches)    |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                           |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                     |
//! |-----------|------------------------------------------------------------|
//! | `serde`   | Derives `Serialize`/`Deserialize` on public types.         |
//! | `fx-hash` | FxHash for the occupancy side map.                          |

pub mod contact;
pub mod error;
pub mod graph;
pub mod index;
pub mod query;
pub mod waypoint;


pub use contact::{ContactEvent, ContactTracker};
pub use error::{SpatialError, SpatialResult};
pub use graph::{WaypointGraph, WaypointGraphBuilder};
pub use index::OccupancyIndex;
pub use query::{CollisionLayer, Occupant, OrientedBox, SpatialQuery};
pub use waypoint::{ServiceType, Waypoint};
