//! Application-wide constants and compile-time configuration.
//!
//! All timing parameters, radio constants and capacity limits live here
//! so they can be tuned in one place.

// Identity

/// GAP device name, sent in the scan response so phones display it.
pub const DEVICE_NAME: &str = "btn2ble";

/// 128-bit service UUID carried in the primary advertising payload
/// (00002222-0000-1000-8000-00805f9b34fb, LSB order as transmitted).
pub const SERVICE_UUID: [u8; 16] = [
    0xfb, 0x34, 0x9b, 0x5f, //
    0x80, 0x00, 0x00, 0x80, //
    0x00, 0x10, 0x00, 0x00, //
    0x22, 0x22, 0x00, 0x00, //
];

// BLE

/// Advertising interval in 0.625 ms units. 160 = 100 ms, within the
/// fast-advertising range so discovery stays snappy.
pub const ADV_INTERVAL_UNITS: u32 = 160;

/// Seconds between resolvable-private-address rotations while privacy
/// mode is active.
pub const RPA_ROTATE_INTERVAL_SECS: u16 = 900;

/// Maximum number of bond keys kept in the in-RAM cache. Persistent bond
/// storage is handled outside this firmware.
pub const MAX_BONDED_PEERS: usize = 4;

// Reconciliation loop

/// Period of the button/event polling tick (ms). Presses are observed
/// with at most one tick of latency.
pub const TICK_INTERVAL_MS: u64 = 20;

/// Depth of the stack-event queue feeding the reconciliation loop.
pub const EVENT_QUEUE_DEPTH: usize = 8;

/// Depth of the radio-command queue feeding the radio task.
pub const COMMAND_QUEUE_DEPTH: usize = 4;

// GPIO pin assignments (nRF52840-DK)
//
// Actual `embassy_nrf::peripherals::*` pins are selected in `main.rs`.
//
//   Button START  (SW1) → P0.11
//   Button STOP   (SW2) → P0.12
//   Button TOGGLE (SW3) → P0.24
//   LED1 advertising    → P0.13
//   LED2 connected      → P0.14
//   LED3 address mode   → P0.15
//   LED4 passkey        → P0.16

/// Button debounce time (ms).
pub const BUTTON_DEBOUNCE_MS: u64 = 50;
