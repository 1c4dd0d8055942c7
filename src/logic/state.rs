//! Device state and the policies that mutate it.
//!
//! [`DeviceState`] reconciles three input streams - button edges, radio
//! stack events and the user's standing intent - into one consistent
//! answer to "what is the device doing". Operations return named
//! outcome enums rather than mutating silently, so the idempotent
//! early-exits and the deferred-disconnect path can be logged and
//! asserted on directly.
//!
//! Two invariants hold at every tick boundary:
//!
//! 1. a held connection implies advertising is off;
//! 2. running advertising implies no held connection.
//!
//! `advertise_wanted` is deliberately outside both: it is intent, not
//! radio state, and it is the only field that survives a disconnect to
//! decide whether advertising resumes.

use crate::logic::edges::Edges;
use crate::logic::events::{Peer, StackEvent};

/// Address privacy mode used for advertising.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressMode {
    /// Resolvable private address, rotated periodically by the stack.
    RotatingPrivate,
    /// The fixed identity address.
    StableIdentity,
}

impl AddressMode {
    pub fn toggled(self) -> Self {
        match self {
            AddressMode::RotatingPrivate => AddressMode::StableIdentity,
            AddressMode::StableIdentity => AddressMode::RotatingPrivate,
        }
    }
}

/// Coarse link state derived from the connection slot and the
/// advertising mirror.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    Idle,
    Advertising,
    Connected,
}

/// Result of a start request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartOutcome {
    /// Advertising begins with this mode; the radio must be told.
    Started(AddressMode),
    /// A link is up - nothing to do.
    AlreadyConnected,
    /// Advertising already runs - nothing to do.
    AlreadyAdvertising,
}

/// Result of a stop request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopOutcome {
    /// A disconnect must be issued to the peer; the connection slot is
    /// cleared only by the later disconnect event.
    DisconnectRequested,
    /// Advertising is considered stopped (best-effort on the radio
    /// side).
    AdvertisingStopped,
}

/// Result of an address-mode toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ToggleOutcome {
    /// Advertising was running: restart it (stop, then start) with the
    /// new mode.
    Restarted(AddressMode),
    /// The new mode is latched and applies to the next advertising
    /// session.
    ModeLatched(AddressMode),
}

/// Follow-up work a stack event asks of the loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventReaction {
    None,
    /// The link dropped with intent still latched: advertising resumes
    /// with this mode.
    ResumeAdvertising(AddressMode),
}

/// The single source of truth for what the device is doing.
pub struct DeviceState {
    peer: Option<Peer>,
    advertising: bool,
    advertise_wanted: bool,
    mode: AddressMode,
    passkey_active: bool,
}

impl DeviceState {
    pub const fn new() -> Self {
        Self {
            peer: None,
            advertising: false,
            advertise_wanted: false,
            mode: AddressMode::RotatingPrivate,
            passkey_active: false,
        }
    }

    pub fn peer(&self) -> Option<Peer> {
        self.peer
    }

    pub fn is_advertising(&self) -> bool {
        self.advertising
    }

    pub fn advertise_wanted(&self) -> bool {
        self.advertise_wanted
    }

    pub fn address_mode(&self) -> AddressMode {
        self.mode
    }

    pub fn passkey_active(&self) -> bool {
        self.passkey_active
    }

    pub fn link_state(&self) -> LinkState {
        if self.peer.is_some() {
            LinkState::Connected
        } else if self.advertising {
            LinkState::Advertising
        } else {
            LinkState::Idle
        }
    }

    /// Start button: latch the intent, then start advertising unless a
    /// link exists or advertising already runs.
    pub fn request_start(&mut self) -> StartOutcome {
        self.advertise_wanted = true;
        self.start_advertising()
    }

    fn start_advertising(&mut self) -> StartOutcome {
        if self.peer.is_some() {
            return StartOutcome::AlreadyConnected;
        }
        if self.advertising {
            return StartOutcome::AlreadyAdvertising;
        }
        self.advertising = true;
        StartOutcome::Started(self.mode)
    }

    /// Stop button: clear the intent, then either ask the peer to
    /// disconnect or stop advertising.
    ///
    /// While connected the slot is left untouched - the stack confirms
    /// the teardown with a disconnect event later. Otherwise the stop is
    /// unconditional: even if the radio side fails to stop, the mirror
    /// goes false and a later start/stop cycle re-settles it.
    pub fn request_stop(&mut self) -> StopOutcome {
        self.advertise_wanted = false;
        if self.peer.is_some() {
            StopOutcome::DisconnectRequested
        } else {
            self.advertising = false;
            StopOutcome::AdvertisingStopped
        }
    }

    /// Toggle button: flip the address mode; restart advertising only if
    /// it is currently running.
    ///
    /// The restart is stop-then-start: there is a window with no
    /// advertisement on air, and that window is accepted.
    pub fn toggle_mode(&mut self) -> ToggleOutcome {
        self.mode = self.mode.toggled();
        if self.advertising {
            self.advertising = false;
            match self.start_advertising() {
                StartOutcome::Started(mode) => ToggleOutcome::Restarted(mode),
                // a held link cannot coexist with a running advertiser
                StartOutcome::AlreadyConnected | StartOutcome::AlreadyAdvertising => {
                    ToggleOutcome::ModeLatched(self.mode)
                }
            }
        } else {
            ToggleOutcome::ModeLatched(self.mode)
        }
    }

    /// Apply one radio-stack event.
    pub fn on_stack_event(&mut self, event: &StackEvent) -> EventReaction {
        match event {
            StackEvent::Connected(peer) => {
                self.peer = Some(*peer);
                // connectable advertising ends when the link comes up
                self.advertising = false;
                EventReaction::None
            }
            // failed connection attempts are logged upstream and change
            // nothing here
            StackEvent::ConnectFailed { .. } => EventReaction::None,
            StackEvent::Disconnected { .. } => {
                self.peer = None;
                self.passkey_active = false;
                if self.advertise_wanted {
                    match self.start_advertising() {
                        StartOutcome::Started(mode) => EventReaction::ResumeAdvertising(mode),
                        StartOutcome::AlreadyConnected | StartOutcome::AlreadyAdvertising => {
                            EventReaction::None
                        }
                    }
                } else {
                    EventReaction::None
                }
            }
            StackEvent::AdvertiseFailed => {
                self.advertising = false;
                EventReaction::None
            }
            StackEvent::SecurityChanged { .. } => EventReaction::None,
            StackEvent::PasskeyDisplay => {
                self.passkey_active = true;
                EventReaction::None
            }
            // acceptance happens at the stack boundary
            StackEvent::PairingConfirm => EventReaction::None,
            StackEvent::PairingCancelled
            | StackEvent::PairingComplete { .. }
            | StackEvent::PairingFailed { .. } => {
                self.passkey_active = false;
                EventReaction::None
            }
        }
    }
}

impl Default for DeviceState {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcomes of one tick's worth of button edges, in dispatch order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeOutcomes {
    pub start: Option<StartOutcome>,
    pub stop: Option<StopOutcome>,
    pub toggle: Option<ToggleOutcome>,
}

/// Dispatch the drained edges against the state, start then stop then
/// toggle.
pub fn apply_edges(state: &mut DeviceState, edges: Edges) -> EdgeOutcomes {
    EdgeOutcomes {
        start: edges.start.then(|| state.request_start()),
        stop: edges.stop.then(|| state.request_stop()),
        toggle: edges.toggle.then(|| state.toggle_mode()),
    }
}
