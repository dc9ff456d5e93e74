use keyberon::key_code::KeyCode;
use smlang::statemachine;

use super::event::{class, typed_key, KeyRecord, Mods};
use crate::utils::time_reached;

pub type Fsm = StateMachine<Context>;

statemachine! {
    transitions: {
        *Init + Letter = Word,
        Init + Ending = Init,
        Init + Symbol = Init,
        Init + Space = Init,
        Init + Quote = Init,

        Word + Letter = Word,
        Word + Quote = Word,
        Word + Ending = Ending,
        Word + Symbol = Init,
        Word + Space = Init,

        // "e.g." and similar do not end a sentence
        Ending + Letter = Abbrev,
        Ending + Ending = Ending,
        Ending + Quote = Ending,
        Ending + Symbol = Init,
        Ending + Space = Primed,

        Abbrev + Letter = Abbrev,
        Abbrev + Ending = Abbrev,
        Abbrev + Quote = Abbrev,
        Abbrev + Symbol = Init,
        Abbrev + Space = Init,

        Primed + Letter / capitalize = Word,
        Primed + Space = Primed,
        Primed + Quote = Primed,
        Primed + Ending = Init,
        Primed + Symbol = Init,
    }
}

#[derive(Default)]
pub struct Context {
    capitalize: bool,
}

impl StateMachineContext for Context {
    fn capitalize(&mut self) {
        self.capitalize = true;
    }
}

/// Role of a key press in a sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyClass {
    Letter,
    /// `.`, `!` and `?`
    Ending,
    /// Digits and other symbols
    Symbol,
    Space,
    Quote,
}

impl From<KeyClass> for Events {
    fn from(class: KeyClass) -> Self {
        match class {
            KeyClass::Letter => Events::Letter,
            KeyClass::Ending => Events::Ending,
            KeyClass::Symbol => Events::Symbol,
            KeyClass::Space => Events::Space,
            KeyClass::Quote => Events::Quote,
        }
    }
}

/// Capitalize the first letter of each sentence
///
/// Tracks the keys being typed: after a word, a sentence ending and a space the
/// next letter gets a weak Shift. State is cleared by keys that do not belong in
/// prose (e.g. with Ctrl held, arrows) and after a period of inactivity.
pub struct SentenceCase {
    fsm: Fsm,
    timeout: u32,
    last_key: Option<u32>,
}

impl SentenceCase {
    pub fn new(timeout: u32) -> Self {
        Self {
            fsm: Fsm::new(Context::default()),
            timeout,
            last_key: None,
        }
    }

    /// The next letter will be capitalized
    pub fn is_primed(&self) -> bool {
        *self.fsm.state() == States::Primed
    }

    /// Return to the initial state
    pub fn clear(&mut self) {
        self.fsm = Fsm::new(Context::default());
        self.last_key = None;
    }

    /// True if the key press would be capitalized
    pub fn would_capitalize(&self, record: &KeyRecord) -> bool {
        self.is_primed() && Self::classify(record) == Some(KeyClass::Letter)
    }

    /// Handle a key press returning weak modifiers to apply to it
    pub fn process(&mut self, record: &KeyRecord, now: u32) -> Mods {
        if !record.pressed || record.is_passive() {
            return Mods::NONE;
        }
        let Some(class) = Self::classify(record) else {
            self.clear();
            return Mods::NONE;
        };
        self.last_key = Some(now);
        if self.fsm.process_event(class.into()).is_err() {
            self.clear();
        }
        if core::mem::take(&mut self.fsm.context.capitalize) {
            debug!("Sentence Case capitalize");
            Mods::LSHIFT
        } else {
            Mods::NONE
        }
    }

    /// Clear the state after idle timeout
    pub fn tick(&mut self, now: u32) {
        if let Some(last) = self.last_key {
            if time_reached(now, last.wrapping_add(self.timeout)) {
                self.clear();
            }
        }
    }

    /// Classify key press, `None` for keys that should clear the state
    ///
    /// Only Shift and AltGr may be held; `,` counts as sentence ending when
    /// typed with Shift held.
    pub fn classify(record: &KeyRecord) -> Option<KeyClass> {
        if !record.mods.only_shift_or_altgr() {
            return None;
        }
        let (kc, mods) = typed_key(record.action, record.tap_count > 0)?;
        let shifted = mods.shifted();
        let class = match kc {
            kc if class::is_letter(kc) => KeyClass::Letter,
            KeyCode::Dot => KeyClass::Ending,
            KeyCode::Kb1 | KeyCode::Slash if shifted => KeyClass::Ending,
            KeyCode::Comma if !shifted => match record.mods.shifted() {
                true => KeyClass::Ending,
                false => KeyClass::Symbol,
            },
            // 2..0 and @..)
            kc if class::in_range(kc, KeyCode::Kb2, KeyCode::Kb0) => KeyClass::Symbol,
            // -..; and _..:
            kc if class::is_symbol(kc) => KeyClass::Symbol,
            KeyCode::Grave if !shifted => KeyClass::Symbol,
            KeyCode::Space if !shifted => KeyClass::Space,
            KeyCode::Quote => KeyClass::Quote,
            _ => return None,
        };
        Some(class)
    }
}
