use core::ops::{BitAnd, BitOr, Not};

use bitfield::bitfield;
use keyberon::action;
use keyberon::key_code::KeyCode;

use super::actions::Action as CustomAction;

/// Key action as stored in the layers
pub type Action = action::Action<CustomAction>;

bitfield! {
    /// Modifier keys packed the same way as in a HID boot keyboard report
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct Mods(u8);
    impl Debug;
    pub lctrl, set_lctrl: 0;
    pub lshift, set_lshift: 1;
    pub lalt, set_lalt: 2;
    pub lgui, set_lgui: 3;
    pub rctrl, set_rctrl: 4;
    pub rshift, set_rshift: 5;
    pub ralt, set_ralt: 6;
    pub rgui, set_rgui: 7;
}

impl Mods {
    pub const NONE: Self = Mods(0);
    pub const LCTRL: Self = Mods(1 << 0);
    pub const LSHIFT: Self = Mods(1 << 1);
    pub const LALT: Self = Mods(1 << 2);
    pub const LGUI: Self = Mods(1 << 3);
    pub const RCTRL: Self = Mods(1 << 4);
    pub const RSHIFT: Self = Mods(1 << 5);
    pub const RALT: Self = Mods(1 << 6);
    pub const RGUI: Self = Mods(1 << 7);
    pub const SHIFT: Self = Mods(Self::LSHIFT.0 | Self::RSHIFT.0);

    /// Modifier bit of a modifier key code, `None` for other keys
    pub fn from_keycode(kc: KeyCode) -> Option<Self> {
        let code = kc as u8;
        let first = KeyCode::LCtrl as u8;
        if (first..=KeyCode::RGui as u8).contains(&code) {
            Some(Mods(1 << (code - first)))
        } else {
            None
        }
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Either of the shift keys is held
    pub const fn shifted(self) -> bool {
        self.0 & Self::SHIFT.0 != 0
    }

    /// No modifiers other than Shift and AltGr (right Alt) are held
    pub const fn only_shift_or_altgr(self) -> bool {
        self.0 & !(Self::SHIFT.0 | Self::RALT.0) == 0
    }
}

impl BitOr for Mods {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Mods(self.0 | rhs.0)
    }
}

impl BitAnd for Mods {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Mods(self.0 & rhs.0)
    }
}

impl Not for Mods {
    type Output = Self;

    fn not(self) -> Self {
        Mods(!self.0)
    }
}

/// Single key transition as seen by the firmware
#[derive(Clone, Copy)]
pub struct KeyRecord {
    /// Action of the key on the layer it was pressed on
    pub action: &'static Action,
    /// True for press, false for release
    pub pressed: bool,
    /// Matrix position as (row, col); `None` for combos
    pub position: Option<(u8, u8)>,
    /// Layer the action comes from
    pub layer: u8,
    /// For tap-hold keys: number of taps, 0 if the key is being held
    pub tap_count: u8,
    /// Modifiers held when the event happened
    pub mods: Mods,
}

impl KeyRecord {
    /// Key code with modifiers that this event types, if it types anything
    ///
    /// Tap-hold keys resolve to their tap action when tapped and to nothing when held.
    /// Modifiers held on the keyboard are combined with modifiers of the action itself.
    pub fn keycode(&self) -> Option<(KeyCode, Mods)> {
        typed_key(self.action, self.tap_count > 0)
            .map(|(kc, mods)| (kc, mods | self.mods))
    }

    /// True if the action is a tap-hold key
    pub fn is_tap_hold(&self) -> bool {
        matches!(self.action, Action::HoldTap { .. })
    }

    /// True for keys that only change modifiers or layers, or do nothing at all
    ///
    /// Word-level features (Caps Word, Sentence Case) let these keys through
    /// without changing their state.
    pub fn is_passive(&self) -> bool {
        match self.action {
            Action::NoOp | Action::Trans | Action::Layer(_) | Action::DefaultLayer(_) => true,
            Action::KeyCode(kc) => Mods::from_keycode(*kc).is_some(),
            Action::MultipleKeyCodes(kcs) => kcs.iter().all(|kc| Mods::from_keycode(*kc).is_some()),
            Action::HoldTap { .. } => self.tap_count == 0,
            Action::Custom(CustomAction::OneShot(_)) => true,
            _ => false,
        }
    }
}

/// Key code and modifiers that an action types
///
/// Modifier-only actions and non-key actions type nothing.
pub fn typed_key(action: &Action, tapped: bool) -> Option<(KeyCode, Mods)> {
    match action {
        Action::KeyCode(kc) => match Mods::from_keycode(*kc) {
            Some(_) => None,
            None => Some((*kc, Mods::NONE)),
        },
        Action::MultipleKeyCodes(kcs) => {
            let mut mods = Mods::NONE;
            let mut key = None;
            for kc in kcs.iter().copied() {
                match Mods::from_keycode(kc) {
                    Some(m) => mods = mods | m,
                    None => key = Some(kc),
                }
            }
            key.map(|kc| (kc, mods))
        },
        Action::HoldTap { tap, .. } if tapped => typed_key(tap, true),
        _ => None,
    }
}

/// Key code classes
pub mod class {
    use keyberon::key_code::KeyCode;

    fn within(kc: KeyCode, first: KeyCode, last: KeyCode) -> bool {
        (first as u8..=last as u8).contains(&(kc as u8))
    }

    pub fn is_letter(kc: KeyCode) -> bool {
        within(kc, KeyCode::A, KeyCode::Z)
    }

    /// Number row keys 1..0
    pub fn is_digit(kc: KeyCode) -> bool {
        within(kc, KeyCode::Kb1, KeyCode::Kb0)
    }

    /// Symbol keys from `-` to `;` on US layout (`- = [ ] \ # ;`)
    pub fn is_symbol(kc: KeyCode) -> bool {
        within(kc, KeyCode::Minus, KeyCode::SColon)
    }

    pub(crate) fn in_range(kc: KeyCode, first: KeyCode, last: KeyCode) -> bool {
        within(kc, first, last)
    }
}
