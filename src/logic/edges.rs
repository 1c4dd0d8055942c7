//! Pending-press latches shared between button producers and the
//! reconciliation loop.

use core::sync::atomic::{AtomicU8, Ordering};

/// One of the three momentary inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// SW1 - request advertising.
    Start,
    /// SW2 - stop advertising / drop the connection.
    Stop,
    /// SW3 - flip the address-privacy mode.
    Toggle,
}

impl Edge {
    const fn mask(self) -> u8 {
        match self {
            Edge::Start => 1 << 0,
            Edge::Stop => 1 << 1,
            Edge::Toggle => 1 << 2,
        }
    }
}

/// Snapshot of the latches returned by one drain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Edges {
    pub start: bool,
    pub stop: bool,
    pub toggle: bool,
}

impl Edges {
    pub fn any(self) -> bool {
        self.start || self.stop || self.toggle
    }
}

/// Three single-bit press latches packed into one atomic byte.
///
/// Producers set bits from interrupt or task context; the reconciliation
/// loop is the only consumer. Presses coalesce: two signals on the same
/// line before a drain are observed once. There is no queued history.
pub struct PendingEdges {
    bits: AtomicU8,
}

impl PendingEdges {
    pub const fn new() -> Self {
        Self {
            bits: AtomicU8::new(0),
        }
    }

    /// Latch one edge. Constant-time and interrupt-safe; never blocks.
    pub fn signal(&self, edge: Edge) {
        self.bits.fetch_or(edge.mask(), Ordering::Release);
    }

    /// Read and clear all three latches in a single atomic step,
    /// returning their prior values.
    pub fn drain(&self) -> Edges {
        let bits = self.bits.swap(0, Ordering::AcqRel);
        Edges {
            start: bits & Edge::Start.mask() != 0,
            stop: bits & Edge::Stop.mask() != 0,
            toggle: bits & Edge::Toggle.mask() != 0,
        }
    }
}
