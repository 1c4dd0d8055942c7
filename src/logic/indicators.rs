//! Projection of device state onto the four output lines.

use crate::logic::state::{AddressMode, DeviceState};

/// The four indicator lines, in board order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Indicators {
    /// LED1: connectable advertising is running.
    pub advertising: bool,
    /// LED2: a central is connected.
    pub connected: bool,
    /// LED3: the stable identity address is selected.
    pub stable_identity: bool,
    /// LED4: a passkey display/confirmation is in progress.
    pub passkey: bool,
}

impl Indicators {
    /// Compute the lines for the current state. Pure - called once per
    /// reconciliation tick.
    pub fn project(state: &DeviceState) -> Self {
        Self {
            advertising: state.is_advertising(),
            connected: state.peer().is_some(),
            stable_identity: state.address_mode() == AddressMode::StableIdentity,
            passkey: state.passkey_active(),
        }
    }

    /// The lines as an array indexed 0..=3.
    pub fn as_array(self) -> [bool; 4] {
        [
            self.advertising,
            self.connected,
            self.stable_identity,
            self.passkey,
        ]
    }
}
