//! User interface subsystem - physical buttons + status LEDs.
//!
//! Three active-low buttons (internal pull-up) latch edges into the
//! shared [`PendingEdges`](crate::logic::edges::PendingEdges); the four
//! DK LEDs are driven from the per-tick
//! [`Indicators`](crate::logic::indicators::Indicators) projection.
//!
//! ## Components
//!
//! - **Buttons**: SW1 start, SW2 stop/disconnect, SW3 address-mode
//!   toggle, each watched by its own debouncing task.
//! - **LEDs**: LED1 advertising, LED2 connected, LED3 address mode,
//!   LED4 passkey indicator.

pub mod buttons;
pub mod leds;
