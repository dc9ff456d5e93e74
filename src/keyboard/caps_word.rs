use keyberon::key_code::KeyCode;

use super::event::{class, typed_key, KeyRecord, Mods};
use crate::utils::time_reached;

/// Capitalize the word being typed, then turn off automatically
///
/// Letters get a weak Shift. Digits, Backspace, Delete, `_` and `:` keep the word
/// going without Shift, modifiers and layer keys are ignored and anything else
/// ends the word. Also turns off after a period of inactivity.
pub struct CapsWord {
    timeout: u32,
    /// Time of the last key that continued the word, `None` when inactive
    active_since: Option<u32>,
}

/// How a key press affects Caps Word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapsWordKey {
    /// Continue and shift the key
    Shifted,
    /// Continue without shifting
    Continue,
    /// Deactivate
    Stop,
    /// Let the key through without affecting Caps Word
    Ignore,
}

impl CapsWord {
    pub const fn new(timeout: u32) -> Self {
        Self { timeout, active_since: None }
    }

    pub fn is_active(&self) -> bool {
        self.active_since.is_some()
    }

    pub fn set(&mut self, active: bool, now: u32) {
        if active != self.is_active() {
            debug!("Caps Word {=bool}", active);
        }
        self.active_since = active.then_some(now);
    }

    pub fn toggle(&mut self, now: u32) {
        self.set(!self.is_active(), now);
    }

    /// Handle a key press returning weak modifiers to apply to it
    pub fn process(&mut self, record: &KeyRecord, now: u32) -> Mods {
        if !self.is_active() || !record.pressed {
            return Mods::NONE;
        }
        match Self::classify(record) {
            CapsWordKey::Shifted => {
                self.active_since = Some(now);
                Mods::LSHIFT
            },
            CapsWordKey::Continue => {
                self.active_since = Some(now);
                Mods::NONE
            },
            CapsWordKey::Stop => {
                self.set(false, now);
                Mods::NONE
            },
            CapsWordKey::Ignore => Mods::NONE,
        }
    }

    /// Deactivate after idle timeout; returns true if it has just been deactivated
    pub fn tick(&mut self, now: u32) -> bool {
        match self.active_since {
            Some(since) if time_reached(now, since.wrapping_add(self.timeout)) => {
                self.set(false, now);
                true
            },
            _ => false,
        }
    }

    pub fn classify(record: &KeyRecord) -> CapsWordKey {
        if record.is_passive() {
            return CapsWordKey::Ignore;
        }
        if !record.mods.only_shift_or_altgr() {
            return CapsWordKey::Stop;
        }
        let Some((kc, mods)) = typed_key(record.action, record.tap_count > 0) else {
            return CapsWordKey::Stop;
        };
        let shifted = mods.shifted();
        match kc {
            kc if class::is_letter(kc) => CapsWordKey::Shifted,
            kc if class::is_digit(kc) && !shifted => CapsWordKey::Continue,
            KeyCode::BSpace | KeyCode::Delete => CapsWordKey::Continue,
            // `_` and `:`
            KeyCode::Minus | KeyCode::SColon if shifted => CapsWordKey::Continue,
            _ => CapsWordKey::Stop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::event::Action;
    use keyberon::action::{k, m, HoldTapConfig};

    static A: Action = k(KeyCode::A);
    static KB5: Action = k(KeyCode::Kb5);
    static PERC: Action = m(&[KeyCode::LShift, KeyCode::Kb5]);
    static BSPC: Action = k(KeyCode::BSpace);
    static MINS: Action = k(KeyCode::Minus);
    static UNDS: Action = m(&[KeyCode::LShift, KeyCode::Minus]);
    static COLN: Action = m(&[KeyCode::LShift, KeyCode::SColon]);
    static SPC: Action = k(KeyCode::Space);
    static LSFT: Action = k(KeyCode::LShift);
    static SYM_SPC: Action = Action::HoldTap {
        timeout: 200,
        hold: &Action::Layer(1),
        tap: &k(KeyCode::Space),
        config: HoldTapConfig::Default,
        tap_hold_interval: 0,
    };

    fn press(action: &'static Action) -> KeyRecord {
        KeyRecord { action, pressed: true, position: Some((1, 1)), layer: 0, tap_count: 0, mods: Mods::NONE }
    }

    #[test]
    fn key_classes() {
        assert_eq!(CapsWord::classify(&press(&A)), CapsWordKey::Shifted);
        assert_eq!(CapsWord::classify(&press(&KB5)), CapsWordKey::Continue);
        assert_eq!(CapsWord::classify(&press(&PERC)), CapsWordKey::Stop);
        assert_eq!(CapsWord::classify(&press(&BSPC)), CapsWordKey::Continue);
        assert_eq!(CapsWord::classify(&press(&UNDS)), CapsWordKey::Continue);
        assert_eq!(CapsWord::classify(&press(&COLN)), CapsWordKey::Continue);
        assert_eq!(CapsWord::classify(&press(&MINS)), CapsWordKey::Stop);
        assert_eq!(CapsWord::classify(&press(&SPC)), CapsWordKey::Stop);
        assert_eq!(CapsWord::classify(&press(&LSFT)), CapsWordKey::Ignore);
    }

    #[test]
    fn tap_hold_keys() {
        let held = press(&SYM_SPC);
        let tapped = KeyRecord { tap_count: 1, ..press(&SYM_SPC) };
        assert_eq!(CapsWord::classify(&held), CapsWordKey::Ignore);
        assert_eq!(CapsWord::classify(&tapped), CapsWordKey::Stop);
    }

    #[test]
    fn other_mods_stop() {
        let ctrl_a = KeyRecord { mods: Mods::LCTRL, ..press(&A) };
        let shift_a = KeyRecord { mods: Mods::RSHIFT, ..press(&A) };
        assert_eq!(CapsWord::classify(&ctrl_a), CapsWordKey::Stop);
        assert_eq!(CapsWord::classify(&shift_a), CapsWordKey::Shifted);
    }

    #[test]
    fn shifts_word_until_space() {
        let mut cw = CapsWord::new(5000);
        assert_eq!(cw.process(&press(&A), 0), Mods::NONE);
        cw.toggle(0);
        assert!(cw.is_active());
        assert_eq!(cw.process(&press(&A), 10), Mods::LSHIFT);
        assert_eq!(cw.process(&press(&KB5), 20), Mods::NONE);
        assert_eq!(cw.process(&press(&LSFT), 30), Mods::NONE);
        assert!(cw.is_active());
        assert_eq!(cw.process(&press(&SPC), 40), Mods::NONE);
        assert!(!cw.is_active());
    }

    #[test]
    fn releases_are_ignored() {
        let mut cw = CapsWord::new(5000);
        cw.set(true, 0);
        let release = KeyRecord { pressed: false, ..press(&SPC) };
        assert_eq!(cw.process(&release, 10), Mods::NONE);
        assert!(cw.is_active());
    }

    #[test]
    fn idle_timeout() {
        let mut cw = CapsWord::new(5000);
        cw.set(true, 1000);
        cw.process(&press(&A), 3000);
        assert!(!cw.tick(7999));
        assert!(cw.is_active());
        assert!(cw.tick(8000));
        assert!(!cw.is_active());
        assert!(!cw.tick(9000));
    }

    #[test]
    fn toggle_twice() {
        let mut cw = CapsWord::new(5000);
        cw.toggle(0);
        cw.toggle(1);
        assert!(!cw.is_active());
    }
}
