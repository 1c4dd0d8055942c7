//! Reconciliation core - the decisional heart of the firmware.
//!
//! Everything in this module is plain `core` Rust with no hardware or
//! SoftDevice dependency, so the whole state machine runs under host
//! `cargo test`.
//!
//! ## Components
//!
//! - **State**: [`state::DeviceState`] owns the single source of truth
//!   (connection slot, advertising mirror, intent latch, address mode,
//!   passkey indicator) and the policies that react to buttons and
//!   stack events.
//! - **Edges**: [`edges::PendingEdges`] latches button presses from
//!   interrupt-driven producers until the loop drains them.
//! - **Events**: [`events`] defines the message boundary between the
//!   radio subsystem and the loop; the loop is the sole mutator of
//!   device state.
//! - **Indicators**: [`indicators::Indicators`] projects state onto the
//!   four LED lines.

pub mod edges;
pub mod events;
pub mod indicators;
pub mod state;
