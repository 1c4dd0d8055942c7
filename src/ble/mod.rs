//! Bluetooth Low Energy subsystem.
//!
//! This module drives the Nordic SoftDevice S140 in **Peripheral** role:
//!
//! 1. **Advertising payloads** - raw AD structures for the primary
//!    payload (flags + 128-bit service UUID) and the scan response
//!    (device name).
//! 2. **Radio task** - owns connectable advertising, the single
//!    connection, and disconnect requests; the only code that talks to
//!    the SoftDevice.
//! 3. **Security** - pairing/bonding callbacks: passkey display,
//!    "just works" acceptance, in-RAM bond cache.
//!
//! Communication with the reconciliation loop is done via Embassy
//! channels: commands in, stack events out.

pub mod adv_payload;

#[cfg(feature = "embedded")]
pub mod security;
#[cfg(feature = "embedded")]
pub mod worker;
