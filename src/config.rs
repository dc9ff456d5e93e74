//! Keymap configuration

use static_assertions as sa;

use crate::keyboard::KeymapConfig;
use crate::keyboard::leds::LightingConfig;
use crate::layers::{LAYERS, N_LAYERS};

/// Default time after which a tap-hold key resolves as hold, in ms
pub const TAPPING_TERM: u16 = 200;
/// Time within which a tap-hold key pressed again repeats its tap action, in ms
pub const QUICK_TAP_TERM: u16 = TAPPING_TERM;

/// Brightness limit of the RGB matrix
pub const MAX_BRIGHTNESS: u8 = 200;

pub static CONFIG: KeymapConfig = KeymapConfig {
    layers: &LAYERS,
    lighting: LightingConfig {
        max_brightness: MAX_BRIGHTNESS,
        hue_step: 8,
        speed: 100,
        fade_time: 511,
        idle_short: 5_000,
        idle_long: 30_000,
        busy_events: 10,
    },
    caps_word_timeout: 5_000,
    sentence_case_timeout: 5_000,
};

// Chordal hold and the status LED rely on this layer order
sa::const_assert_eq!(N_LAYERS, 6);
// Dim level must be distinct from both off and full
sa::const_assert!(MAX_BRIGHTNESS >= 3);
// Ring finger mods use a shorter tapping term
sa::const_assert!(TAPPING_TERM > 45);
