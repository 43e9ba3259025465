//! Exactly-once departure notification.
//!
//! Each vehicle owns a [`TerminationNotifier`] wrapping the sending half of
//! its scheduler's departure channel.  Firing consumes the sender, so a
//! second call is a no-op by construction.  A send to a scheduler that has
//! already dropped its receiver is silently discarded.

use std::sync::mpsc::Sender;

use dts_core::AgentId;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DepartureReason {
    /// Reached a terminal waypoint.
    JourneyComplete,
    /// Evicted by the host.
    Removed,
}

impl DepartureReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DepartureReason::JourneyComplete => "journey_complete",
            DepartureReason::Removed         => "removed",
        }
    }
}

/// Message sent when a vehicle leaves the simulation.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Departure {
    pub agent: AgentId,
    pub reason: DepartureReason,
    /// Simulated seconds at which it left.
    pub at: f64,
}

#[derive(Debug, Default)]
pub struct TerminationNotifier {
    tx: Option<Sender<Departure>>,
}

impl TerminationNotifier {
    pub fn new(tx: Sender<Departure>) -> Self {
        Self { tx: Some(tx) }
    }

    /// A notifier with nobody listening.
    pub fn detached() -> Self {
        Self { tx: None }
    }

    /// `true` until [`fire`](Self::fire) has been called.
    pub fn is_armed(&self) -> bool {
        self.tx.is_some()
    }

    /// Send `departure` if this notifier has not fired yet.  Returns whether
    /// this call was the one that fired.
    pub fn fire(&mut self, departure: Departure) -> bool {
        match self.tx.take() {
            Some(tx) => {
                // Receiver gone means the scheduler is tearing down.
                let _ = tx.send(departure);
                true
            }
            None => false,
        }
    }
}
