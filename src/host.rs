//! Primitives provided by the firmware that the keymap is linked into
//!
//! The keymap never touches hardware directly. Timers, the RGB matrix driver
//! and status LEDs are reached through these traits, so the firmware decides
//! how they are implemented (and tests can substitute their own).

/// Monotonic millisecond timer
pub trait Clock {
    /// Current time in milliseconds, wrapping at 32 bits
    fn now(&self) -> u32;
}

/// RGB matrix lighting driver
pub trait RgbMatrix {
    /// Turn lighting on (without persisting the setting)
    fn enable(&mut self);
    /// Current global color
    fn hsv(&self) -> Hsv;
    /// Set global color (without persisting the setting)
    fn set_hsv(&mut self, hsv: Hsv);
    /// Select the animation effect
    fn set_effect(&mut self, effect: Effect);
    /// Set animation speed
    fn set_speed(&mut self, speed: u8);
}

/// Single-color status LEDs on the keyboard case
pub trait StatusLeds {
    fn set_status_led(&mut self, led: StatusLed, on: bool);
}

/// Everything the keymap needs from the firmware
pub trait Host: Clock + RgbMatrix + StatusLeds {}

impl<T: Clock + RgbMatrix + StatusLeds> Host for T {}

/// Color in hue/saturation/value representation, all components 8-bit
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }
}

/// Palette-based animation effects of the RGB matrix driver
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Effect {
    Gradient,
    Flow,
    Ripple,
    Sparkle,
    Vortex,
    Reactive,
}

impl Effect {
    const ALL: [Effect; 6] = [
        Effect::Gradient,
        Effect::Flow,
        Effect::Ripple,
        Effect::Sparkle,
        Effect::Vortex,
        Effect::Reactive,
    ];

    /// Effect with given index, wrapping around the list of effects
    pub const fn from_index(i: u8) -> Self {
        Self::ALL[i as usize % Self::ALL.len()]
    }

    /// Following effect, wrapping around
    pub const fn next(self) -> Self {
        Self::from_index(self as u8 + 1)
    }
}

/// Status LEDs available on the keyboard
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusLed {
    /// Any layer above SYM is active
    Layer,
    /// Sentence Case will capitalize the next letter
    SentencePrimed,
    /// Caps Word is active
    CapsWord,
}
