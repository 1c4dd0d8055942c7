//! GPIO button input with async debouncing.
//!
//! Three physical buttons (active-low with internal pull-up):
//!   - START  - begin connectable advertising
//!   - STOP   - stop advertising / drop the connection
//!   - TOGGLE - flip the address-privacy mode
//!
//! Each button is handled by an async task that waits for a GPIO edge,
//! debounces it, and latches the press into [`PendingEdges`]. Latching
//! instead of queueing keeps the contract of the reconciliation loop:
//! rapid repeated presses before the next tick coalesce into one.

use crate::config::BUTTON_DEBOUNCE_MS;
use crate::logic::edges::{Edge, PendingEdges};
use defmt::info;
use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_time::{Duration, Timer};

/// Run a single button watch loop.
///
/// Waits for the pin to go low (pressed), debounces, latches the edge,
/// then waits for release before repeating.
pub async fn watch(pin: AnyPin, edge: Edge, edges: &'static PendingEdges) -> ! {
    let mut btn = Input::new(pin, Pull::Up);

    loop {
        // Wait for falling edge (button press, active-low).
        btn.wait_for_falling_edge().await;

        // Debounce: wait and re-check.
        Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;

        if btn.is_low() {
            info!("Button: {:?}", edge);
            edges.signal(edge);

            // Wait for release to avoid repeat triggers.
            btn.wait_for_rising_edge().await;
            Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;
        }
    }
}
