use keyberon::key_code::KeyCode;

use super::event::{class, typed_key, KeyRecord, Mods};

/// Memory of the last typed key for the firmware's Repeat key
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LastKey {
    key: Option<(KeyCode, Mods)>,
}

impl LastKey {
    pub const fn new() -> Self {
        Self { key: None }
    }

    /// Key and modifiers that the Repeat key should type
    pub fn get(&self) -> Option<(KeyCode, Mods)> {
        self.key
    }

    /// Remember a key press
    ///
    /// Tap-hold keys are remembered by their tap action. `capitalized` tells that
    /// the key gets a weak Shift from Sentence Case. Shift is then dropped again for
    /// most letters, so repeating `A` gives `a`; letters such as N and Z keep it
    /// (think "NN" and "ZZ" in Vim).
    pub fn remember(&mut self, record: &KeyRecord, capitalized: bool) {
        if !record.pressed || record.is_passive() {
            return;
        }
        let Some((kc, action_mods)) = typed_key(record.action, true) else {
            return;
        };
        let mut mods = action_mods | record.mods;
        if capitalized {
            mods = mods | Mods::LSHIFT;
        }
        if forgets_shift(kc) && mods.only_shift_or_altgr() {
            mods = mods & !Mods::SHIFT;
        }
        self.key = Some((kc, mods));
    }
}

fn forgets_shift(kc: KeyCode) -> bool {
    use KeyCode::*;
    class::in_range(kc, A, H) || class::in_range(kc, K, M) || class::in_range(kc, O, U)
}
