//! Keyboard lighting
//!
//! The RGB matrix shows an animated palette whose brightness is controlled by
//! [`Lighting`]: cycled between off, dim and full with a key, faded out when the
//! keyboard is idle and faded back in on the next key press. Single-color status
//! LEDs show the state of the layers, Caps Word and Sentence Case.

/// Idle-aware brightness controller
mod lighting;
/// Reference RGB matrix output
mod output;

pub use lighting::{Lighting, LightingConfig};
pub use output::{hsv_to_rgb, Leds};

use crate::host::{StatusLed, StatusLeds};

/// Last state written to each status LED
///
/// The LEDs are only written when their state changes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Indicators {
    state: [bool; 3],
}

impl Indicators {
    pub const fn new() -> Self {
        Self { state: [false; 3] }
    }

    pub fn get(&self, led: StatusLed) -> bool {
        self.state[Self::index(led)]
    }

    /// Set LED state, returns true if it changed
    pub fn set(&mut self, leds: &mut impl StatusLeds, led: StatusLed, on: bool) -> bool {
        let i = Self::index(led);
        if self.state[i] == on {
            return false;
        }
        self.state[i] = on;
        leds.set_status_led(led, on);
        true
    }

    fn index(led: StatusLed) -> usize {
        match led {
            StatusLed::Layer => 0,
            StatusLed::SentencePrimed => 1,
            StatusLed::CapsWord => 2,
        }
    }
}
