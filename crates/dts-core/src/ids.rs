//! Vehicle and waypoint identifiers.
//!
//! Both are `u32` newtypes so the two can never be swapped at a call site.
//! `Display` renders the short form used in log lines ("car 7", "wp 3");
//! `Debug` keeps the type name for test failures.

use std::fmt;

macro_rules! id_newtype {
    ($(#[$attr:meta])* $name:ident, $label:literal) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub u32);

        impl $name {
            /// Placeholder for "unassigned". Never handed out by a graph or
            /// scheduler.
            pub const INVALID: $name = $name(u32::MAX);

            /// Position in the owning `Vec`.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            #[inline]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, concat!($label, " {}"), self.0)
                } else {
                    f.write_str(concat!($label, " <unassigned>"))
                }
            }
        }
    };
}

id_newtype! {
    /// A vehicle. Issued in spawn order and never reused within a run.
    AgentId, "car"
}

id_newtype! {
    /// A node in the waypoint graph; equal to its insertion index.
    WaypointId, "wp"
}

impl AgentId {
    /// The id issued to the vehicle spawned after this one.
    #[inline]
    pub fn successor(self) -> AgentId {
        AgentId(self.0 + 1)
    }
}
