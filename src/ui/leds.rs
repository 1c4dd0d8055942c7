//! Status LED driver.
//!
//! The four DK LEDs are active-low: driving the pin low lights the LED.

use crate::logic::indicators::Indicators;
use embassy_nrf::gpio::Output;

/// The four indicator LEDs, board order LED1..LED4.
pub struct LedPanel {
    advertising: Output<'static>,
    connected: Output<'static>,
    address_mode: Output<'static>,
    passkey: Output<'static>,
}

impl LedPanel {
    pub fn new(
        advertising: Output<'static>,
        connected: Output<'static>,
        address_mode: Output<'static>,
        passkey: Output<'static>,
    ) -> Self {
        Self {
            advertising,
            connected,
            address_mode,
            passkey,
        }
    }

    /// Force every LED off.
    pub fn all_off(&mut self) {
        self.apply(Indicators::default());
    }

    /// Drive the panel from one projection.
    pub fn apply(&mut self, indicators: Indicators) {
        drive(&mut self.advertising, indicators.advertising);
        drive(&mut self.connected, indicators.connected);
        drive(&mut self.address_mode, indicators.stable_identity);
        drive(&mut self.passkey, indicators.passkey);
    }
}

fn drive(line: &mut Output<'static>, on: bool) {
    // active-low
    if on {
        line.set_low();
    } else {
        line.set_high();
    }
}
