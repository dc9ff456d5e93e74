//! Per-key tuning of tap-hold keys
//!
//! The timeouts are baked into the layers, so keyberon uses them directly. Firmware
//! with its own tap-hold engine can query them through [`TapHoldPolicy`].

use crate::config::{QUICK_TAP_TERM, TAPPING_TERM};
use crate::layers::Layer;
use super::event::KeyRecord;

/// Callbacks used by a tap-hold engine to decide between tap and hold
pub trait TapHoldPolicy {
    /// Time after which the key resolves as hold
    fn tapping_term(&self, key: TapHoldKey) -> u16;
    /// Time within which pressing the key again repeats its tap action; 0 disables repeat
    fn quick_tap_term(&self, key: TapHoldKey) -> u16;
    /// Whether `tap_hold` may resolve as hold when `other` is pressed while it is held
    fn chordal_hold(&self, tap_hold: &KeyRecord, other: &KeyRecord) -> bool;
}

/// Tap-hold keys of the keymap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TapHoldKey {
    HrmA,
    HrmR,
    HrmS,
    HrmT,
    HrmD,
    HrmN,
    HrmE,
    HrmI,
    HrmO,
    HrmH,
    NavBsp,
    SymSpc,
    FunEsc,
    ExtEnt,
    ZoomIn,
    ZoomOut,
}

/// Hand that presses a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hand {
    Left,
    Right,
    /// Thumb keys can be chorded with either hand
    Either,
}

impl Hand {
    pub fn of((row, col): (u8, u8)) -> Self {
        match (row, col) {
            (4, _) => Hand::Either,
            (_, 0..=5) => Hand::Left,
            _ => Hand::Right,
        }
    }
}

impl TapHoldKey {
    /// Location of each key as (layer, (row, col))
    pub const POSITIONS: [(TapHoldKey, Layer, (u8, u8)); 16] = [
        (TapHoldKey::HrmA, Layer::Base, (2, 1)),
        (TapHoldKey::HrmR, Layer::Base, (2, 2)),
        (TapHoldKey::HrmS, Layer::Base, (2, 3)),
        (TapHoldKey::HrmT, Layer::Base, (2, 4)),
        (TapHoldKey::HrmD, Layer::Base, (3, 4)),
        (TapHoldKey::HrmN, Layer::Base, (2, 7)),
        (TapHoldKey::HrmE, Layer::Base, (2, 8)),
        (TapHoldKey::HrmI, Layer::Base, (2, 9)),
        (TapHoldKey::HrmO, Layer::Base, (2, 10)),
        (TapHoldKey::HrmH, Layer::Base, (3, 7)),
        (TapHoldKey::NavBsp, Layer::Base, (4, 4)),
        (TapHoldKey::FunEsc, Layer::Base, (4, 5)),
        (TapHoldKey::ExtEnt, Layer::Base, (4, 6)),
        (TapHoldKey::SymSpc, Layer::Base, (4, 7)),
        (TapHoldKey::ZoomIn, Layer::Fun, (2, 6)),
        (TapHoldKey::ZoomOut, Layer::Fun, (3, 6)),
    ];

    /// Tap-hold key at given position of a layer
    pub fn at(layer: u8, position: (u8, u8)) -> Option<Self> {
        Self::POSITIONS.iter()
            .find(|(_, l, pos)| *l as u8 == layer && *pos == position)
            .map(|(key, _, _)| *key)
    }

    /// Tap-hold key that generated the event, `None` for other keys and combos
    pub fn of(record: &KeyRecord) -> Option<Self> {
        record.position.and_then(|pos| Self::at(record.layer, pos))
    }

    pub const fn tapping_term(self) -> u16 {
        match self {
            // Ring fingers are slower to release
            TapHoldKey::HrmR | TapHoldKey::HrmE => TAPPING_TERM - 45,
            _ => TAPPING_TERM,
        }
    }

    pub const fn quick_tap_term(self) -> u16 {
        match self {
            // Keep key repeat only where double letters are common
            TapHoldKey::HrmN | TapHoldKey::HrmH => QUICK_TAP_TERM,
            _ => 0,
        }
    }
}

/// Decide if a tap-hold key may be held while another key is pressed
///
/// Holding is allowed for combos, for chords across both hands and for thumb
/// keys. The NAV layer key is always allowed, so that navigation works one-handed.
pub fn chordal_hold(tap_hold: &KeyRecord, other: &KeyRecord) -> bool {
    if TapHoldKey::of(tap_hold) == Some(TapHoldKey::NavBsp) {
        return true;
    }
    match (tap_hold.position, other.position) {
        (Some(a), Some(b)) => match (Hand::of(a), Hand::of(b)) {
            (Hand::Either, _) | (_, Hand::Either) => true,
            (a, b) => a != b,
        },
        _ => true,
    }
}
