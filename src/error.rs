//! Error classification for SoftDevice requests.
//!
//! Implements `defmt::Format` for efficient on-target logging. The one
//! policy that matters lives here as a named step so it is visible in
//! one place: a stack report of "already in the requested state" is
//! success, not an error.

use defmt::Format;
use nrf_softdevice::ble::peripheral::AdvertiseError;
use nrf_softdevice::RawError;

/// How a rejected advertising start request is to be treated.
#[derive(Debug, Format)]
pub enum AdvStartFailure {
    /// The stack says advertising is already active. Folded into
    /// success; the mirror flag stays set.
    AlreadyActive,
    /// Any other rejection. Fatal for this request: logged, advertising
    /// mirror cleared, no retry.
    Fatal(AdvertiseError),
}

/// Classify an advertising start rejection.
pub fn classify_advertise_error(err: AdvertiseError) -> AdvStartFailure {
    match err {
        AdvertiseError::Raw(RawError::InvalidState) => AdvStartFailure::AlreadyActive,
        other => AdvStartFailure::Fatal(other),
    }
}
