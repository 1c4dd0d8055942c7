//! Message boundary between the radio subsystem and the reconciliation
//! loop.
//!
//! Stack callbacks never touch [`DeviceState`](crate::logic::state::DeviceState)
//! directly; they post a [`StackEvent`] and the loop applies it on its
//! next tick. In the other direction the loop posts [`RadioCommand`]s,
//! which the radio task treats as intents - a command that no longer
//! applies (e.g. a stop racing a fresh connection) is ignored with a log
//! line, not an error.

use crate::logic::state::AddressMode;

/// Identity of the connected central, as reported by the stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Peer {
    /// 6-byte device address, LSB first.
    pub addr: [u8; 6],
}

/// Events published by the radio task and security callbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StackEvent {
    /// A central connected. Connectable advertising has already ended on
    /// the radio side.
    Connected(Peer),
    /// The stack reported a failed connection attempt. Logged, ignored.
    ConnectFailed { status: u8 },
    /// The link dropped. `reason` is the HCI reason code when the stack
    /// reports one.
    Disconnected { reason: Option<u8> },
    /// Link security level changed.
    SecurityChanged { encrypted: bool, mitm_protected: bool },
    /// A passkey is being displayed for entry on the peer device.
    PasskeyDisplay,
    /// Plain ("just works") confirmation request. Always accepted at the
    /// stack boundary; the device never rejects one.
    PairingConfirm,
    /// The pairing attempt was abandoned by the stack.
    PairingCancelled,
    /// Pairing finished successfully.
    PairingComplete { bonded: bool },
    /// Pairing finished unsuccessfully.
    PairingFailed { reason: u8 },
    /// An advertising start request was rejected outright (anything but
    /// "already active").
    AdvertiseFailed,
}

/// Requests from the reconciliation loop to the radio task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioCommand {
    /// Begin connectable advertising with the given address mode.
    Advertise(AddressMode),
    /// Cancel the running advertiser, if any.
    StopAdvertising,
    /// Ask the connected peer to go away (remote-user-terminated).
    Disconnect,
}
