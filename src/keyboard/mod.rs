//! Keymap logic
//!
//! Stateful keymap features built on top of the [`keyberon`] layers. The
//! firmware owns the key matrix, tap-hold resolution and USB; it reports each
//! key transition to the [`Keymap`] through [`EventSink`] and performs the
//! [`Output`]s that the keymap queues.

/// Special keyboard actions
pub mod actions;
/// Capitalize the word being typed
pub mod caps_word;
/// Key event log
pub mod debug;
/// Key events and modifiers
pub mod event;
/// Keyboard lightning control
pub mod leds;
/// Last key memory for the Repeat key
pub mod repeat;
/// Capitalize sentences automatically
pub mod sentence_case;
/// Tap-hold timing per key
pub mod tap_hold;

use heapless::Deque;
use keyberon::key_code::KeyCode;

use crate::host::{Host, StatusLed};
use crate::layers::{Layer, Layers, Layout};
use crate::utils::Rand;
use actions::MacroStep;
use caps_word::CapsWord;
use leds::{Indicators, Lighting, LightingConfig};
use repeat::LastKey;
use sentence_case::SentenceCase;
use tap_hold::{TapHoldKey, TapHoldPolicy};

pub use actions::Action;
pub use event::{KeyRecord, Mods};

/// Keymap configuration
pub struct KeymapConfig {
    /// Keyboard layers configuration
    pub layers: &'static Layers,
    /// Configuration of RGB matrix brightness control
    pub lighting: LightingConfig,
    /// Caps Word turns off after this many ms without typing
    pub caps_word_timeout: u32,
    /// Sentence Case resets after this many ms without typing
    pub sentence_case_timeout: u32,
}

/// Hooks called by the firmware event loop
pub trait EventSink {
    /// Called once after the keyboard has been initialized
    fn on_init(&mut self);
    /// Called on every key press and release
    ///
    /// Returns false if the key has been fully handled and the firmware should
    /// not process it any further.
    fn on_event(&mut self, record: &KeyRecord) -> bool;
    /// Called periodically, typically every millisecond
    fn on_tick(&mut self);
    /// Called when the set of active layers changes
    fn on_layer_change(&mut self, highest_layer: u8);
}

/// Action that the keymap asks the firmware to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// Press and release a key with given modifiers
    Tap(KeyCode, Mods),
    /// Wait before performing the next output, in ms
    Delay(u16),
    /// Apply modifiers to the next key report only
    WeakMods(Mods),
}

/// Maximum number of outputs waiting for the firmware
pub const OUTPUT_QUEUE_LEN: usize = 16;

/// Keymap state
pub struct Keymap<H: Host> {
    host: H,
    config: &'static KeymapConfig,
    lighting: Lighting,
    caps_word: CapsWord,
    sentence_case: SentenceCase,
    last_key: LastKey,
    indicators: Indicators,
    rand: Rand,
    debug: bool,
    outputs: Deque<Output, OUTPUT_QUEUE_LEN>,
}

impl<H: Host> Keymap<H> {
    pub fn new(host: H, config: &'static KeymapConfig) -> Self {
        Self {
            host,
            config,
            lighting: Lighting::new(config.lighting),
            caps_word: CapsWord::new(config.caps_word_timeout),
            sentence_case: SentenceCase::new(config.sentence_case_timeout),
            last_key: LastKey::new(),
            indicators: Indicators::new(),
            rand: Rand::new(),
            debug: false,
            outputs: Deque::new(),
        }
    }

    /// Create keyberon layout from the configured layers
    pub fn layout(&self) -> Layout {
        Layout::new(self.config.layers)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn lighting(&self) -> &Lighting {
        &self.lighting
    }

    pub fn caps_word(&self) -> &CapsWord {
        &self.caps_word
    }

    pub fn sentence_case(&self) -> &SentenceCase {
        &self.sentence_case
    }

    /// Key that the Repeat key should type
    pub fn last_key(&self) -> Option<(KeyCode, Mods)> {
        self.last_key.get()
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Enable or disable logging of key events
    pub fn set_debug(&mut self, enabled: bool) {
        self.debug = enabled;
        info!("Key event log {=bool}", enabled);
    }

    /// Take next output to be performed by the firmware
    pub fn pop_output(&mut self) -> Option<Output> {
        self.outputs.pop_front()
    }

    fn push_output(&mut self, output: Output) {
        if self.outputs.push_back(output).is_err() {
            warn!("Output queue full, dropping output");
        }
    }

    /// Perform custom action, returns true if the firmware should handle it too
    fn handle_action(&mut self, action: &Action, pressed: bool, now: u32) -> bool {
        let forward = matches!(action, Action::OneShot(_) | Action::Mouse(_));
        if !pressed {
            return forward;
        }
        match action {
            Action::CapsWord => self.caps_word.toggle(now),
            Action::Lighting(lighting) => {
                self.lighting.perform(*lighting, &mut self.host, &mut self.rand, now);
            },
            Action::Macro(m) => {
                for step in m.steps() {
                    self.push_output(match *step {
                        MacroStep::Tap(kc, mods) => Output::Tap(kc, mods),
                        MacroStep::Delay(ms) => Output::Delay(ms),
                    });
                }
            },
            Action::DebugToggle => self.set_debug(!self.debug),
            Action::OneShot(_) | Action::Mouse(_) => {},
        }
        forward
    }

    /// Word-level features: Caps Word, Sentence Case and the Repeat key memory
    fn process_press(&mut self, record: &KeyRecord, now: u32) {
        let capitalized = self.sentence_case.would_capitalize(record);
        self.last_key.remember(record, capitalized);

        let weak = self.caps_word.process(record, now) | self.sentence_case.process(record, now);
        if !weak.is_empty() {
            self.push_output(Output::WeakMods(weak));
        }
    }

    fn update_indicators(&mut self) {
        self.indicators.set(&mut self.host, StatusLed::CapsWord, self.caps_word.is_active());
        self.indicators.set(&mut self.host, StatusLed::SentencePrimed, self.sentence_case.is_primed());
    }
}

impl<H: Host> EventSink for Keymap<H> {
    fn on_init(&mut self) {
        let now = self.host.now();
        for led in [StatusLed::Layer, StatusLed::SentencePrimed, StatusLed::CapsWord] {
            self.host.set_status_led(led, false);
        }
        self.lighting.init(&mut self.host, &mut self.rand, now);
    }

    fn on_event(&mut self, record: &KeyRecord) -> bool {
        let now = self.host.now();
        self.lighting.activity(&mut self.host, now);

        if self.debug {
            let line = debug::format_record(record);
            info!("{=str}", line.as_str());
        }

        let mut forward = true;
        if let keyberon::action::Action::Custom(action) = record.action {
            forward = self.handle_action(action, record.pressed, now);
            if *action == Action::CapsWord {
                self.update_indicators();
                return forward;
            }
        }

        if record.pressed {
            self.process_press(record, now);
        }
        self.update_indicators();
        forward
    }

    fn on_tick(&mut self) {
        let now = self.host.now();
        self.lighting.tick(&mut self.host, now);
        self.caps_word.tick(now);
        self.sentence_case.tick(now);
        self.update_indicators();
    }

    fn on_layer_change(&mut self, highest_layer: u8) {
        let on = highest_layer > Layer::Sym as u8;
        self.indicators.set(&mut self.host, StatusLed::Layer, on);
    }
}

impl<H: Host> TapHoldPolicy for Keymap<H> {
    fn tapping_term(&self, key: TapHoldKey) -> u16 {
        key.tapping_term()
    }

    fn quick_tap_term(&self, key: TapHoldKey) -> u16 {
        key.quick_tap_term()
    }

    fn chordal_hold(&self, tap_hold: &KeyRecord, other: &KeyRecord) -> bool {
        tap_hold::chordal_hold(tap_hold, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CONFIG, MAX_BRIGHTNESS, TAPPING_TERM};
    use crate::host::{Clock, Effect, Hsv, RgbMatrix, StatusLeds};
    use leds::Leds;

    struct TestHost {
        now: u32,
        leds: Leds<4>,
        status: [bool; 3],
        status_writes: usize,
    }

    impl TestHost {
        fn new() -> Self {
            Self { now: 1000, leds: Leds::new(), status: [true; 3], status_writes: 0 }
        }

        fn status(&self, led: StatusLed) -> bool {
            self.status[led as usize]
        }
    }

    impl Clock for TestHost {
        fn now(&self) -> u32 {
            self.now
        }
    }

    impl RgbMatrix for TestHost {
        fn enable(&mut self) {
            self.leds.enable()
        }

        fn hsv(&self) -> Hsv {
            self.leds.hsv()
        }

        fn set_hsv(&mut self, hsv: Hsv) {
            self.leds.set_hsv(hsv)
        }

        fn set_effect(&mut self, effect: Effect) {
            self.leds.set_effect(effect)
        }

        fn set_speed(&mut self, speed: u8) {
            self.leds.set_speed(speed)
        }
    }

    impl StatusLeds for TestHost {
        fn set_status_led(&mut self, led: StatusLed, on: bool) {
            self.status[led as usize] = on;
            self.status_writes += 1;
        }
    }

    fn keymap() -> Keymap<TestHost> {
        let mut keymap = Keymap::new(TestHost::new(), &CONFIG);
        keymap.on_init();
        keymap
    }

    /// Advance time by `ms`, ticking every millisecond
    fn advance(keymap: &mut Keymap<TestHost>, ms: u32) {
        for _ in 0..ms {
            keymap.host_mut().now += 1;
            keymap.on_tick();
        }
    }

    fn key(layer: Layer, (row, col): (u8, u8), pressed: bool) -> KeyRecord {
        let action = &CONFIG.layers[layer as usize][row as usize][col as usize];
        let tap_count = if matches!(action, keyberon::action::Action::HoldTap { .. }) { 1 } else { 0 };
        KeyRecord { action, pressed, position: Some((row, col)), layer: layer as u8, tap_count, mods: Mods::NONE }
    }

    /// Press and release a key, returning the result of the press
    fn tap(keymap: &mut Keymap<TestHost>, layer: Layer, pos: (u8, u8)) -> bool {
        let result = keymap.on_event(&key(layer, pos, true));
        keymap.host_mut().now += 10;
        keymap.on_event(&key(layer, pos, false));
        result
    }

    fn outputs(keymap: &mut Keymap<TestHost>) -> std::vec::Vec<Output> {
        core::iter::from_fn(|| keymap.pop_output()).collect()
    }

    const A: (u8, u8) = (2, 1);
    const J: (u8, u8) = (1, 6);
    const DOT: (u8, u8) = (3, 9);
    const MINUS: (u8, u8) = (0, 11);
    const SPACE: (u8, u8) = (4, 7);
    const CAPS_WORD: (u8, u8) = (2, 0);
    const RGB_BRIGHTNESS: (u8, u8) = (1, 1);
    const DEBUG_TOGGLE: (u8, u8) = (3, 1);
    const SELECT_LINE: (u8, u8) = (2, 4);
    const SEARCH_SELECTION: (u8, u8) = (1, 10);
    const MOUSE_BUTTON: (u8, u8) = (1, 7);

    #[test]
    fn init_fades_in_and_clears_status_leds() {
        let mut km = keymap();
        assert_eq!(km.host().status, [false; 3]);
        assert!(km.host().leds.is_enabled());
        assert_eq!(km.lighting().level(), MAX_BRIGHTNESS);
        advance(&mut km, 600);
        assert_eq!(km.host().hsv().v, MAX_BRIGHTNESS);
        assert!(km.lighting().deadline().is_some());
    }

    #[test]
    fn idle_keyboard_goes_dark_and_wakes_up() {
        let mut km = keymap();
        advance(&mut km, 600);
        advance(&mut km, CONFIG.lighting.idle_short + 600);
        assert_eq!(km.host().hsv().v, 0);
        assert!(km.lighting().is_asleep());

        tap(&mut km, Layer::Base, J);
        advance(&mut km, 600);
        assert_eq!(km.host().hsv().v, MAX_BRIGHTNESS);
    }

    #[test]
    fn typing_keeps_lights_on() {
        let mut km = keymap();
        advance(&mut km, 600);
        for _ in 0..20 {
            advance(&mut km, CONFIG.lighting.idle_short - 100);
            tap(&mut km, Layer::Base, J);
        }
        assert_eq!(km.host().hsv().v, MAX_BRIGHTNESS);
        assert!(km.lighting().event_count() > CONFIG.lighting.busy_events);
    }

    #[test]
    fn brightness_key_is_consumed() {
        let mut km = keymap();
        advance(&mut km, 600);
        assert!(!tap(&mut km, Layer::Fun, RGB_BRIGHTNESS));
        assert_eq!(km.lighting().level(), 0);
        advance(&mut km, 600);
        assert_eq!(km.host().hsv().v, 0);

        // Off stays off while typing
        tap(&mut km, Layer::Base, J);
        advance(&mut km, 600);
        assert_eq!(km.host().hsv().v, 0);

        tap(&mut km, Layer::Fun, RGB_BRIGHTNESS);
        advance(&mut km, 600);
        assert_eq!(km.host().hsv().v, km.lighting().dim_level());
    }

    #[test]
    fn caps_word_shifts_letters() {
        let mut km = keymap();
        assert!(!tap(&mut km, Layer::Base, CAPS_WORD));
        assert!(km.caps_word().is_active());
        assert!(km.host().status(StatusLed::CapsWord));

        assert!(tap(&mut km, Layer::Base, A));
        assert!(tap(&mut km, Layer::Base, J));
        assert_eq!(outputs(&mut km), [Output::WeakMods(Mods::LSHIFT); 2]);

        tap(&mut km, Layer::Base, SPACE);
        assert!(!km.caps_word().is_active());
        assert!(!km.host().status(StatusLed::CapsWord));
        assert!(outputs(&mut km).is_empty());
    }

    #[test]
    fn caps_word_times_out() {
        let mut km = keymap();
        tap(&mut km, Layer::Base, CAPS_WORD);
        tap(&mut km, Layer::Base, A);
        advance(&mut km, CONFIG.caps_word_timeout - 20);
        assert!(km.caps_word().is_active());
        advance(&mut km, 20);
        assert!(!km.caps_word().is_active());
        assert!(!km.host().status(StatusLed::CapsWord));
    }

    #[test]
    fn sentence_case_capitalizes_and_remembers() {
        let mut km = keymap();
        for pos in [A, DOT, SPACE] {
            tap(&mut km, Layer::Base, pos);
        }
        assert!(km.sentence_case().is_primed());
        assert!(km.host().status(StatusLed::SentencePrimed));

        tap(&mut km, Layer::Base, J);
        assert_eq!(outputs(&mut km), [Output::WeakMods(Mods::LSHIFT)]);
        assert!(!km.host().status(StatusLed::SentencePrimed));
        assert_eq!(km.last_key(), Some((KeyCode::J, Mods::LSHIFT)));

        tap(&mut km, Layer::Base, A);
        assert!(outputs(&mut km).is_empty());
        assert_eq!(km.last_key(), Some((KeyCode::A, Mods::NONE)));
    }

    #[test]
    fn sentence_case_cleared_by_symbols() {
        let mut km = keymap();
        for pos in [A, DOT, MINUS, SPACE] {
            tap(&mut km, Layer::Base, pos);
        }
        assert!(!km.sentence_case().is_primed());
        assert_eq!(km.last_key(), Some((KeyCode::Space, Mods::NONE)));
    }

    #[test]
    fn macros_are_queued() {
        let mut km = keymap();
        assert!(!tap(&mut km, Layer::Ext, SELECT_LINE));
        assert_eq!(outputs(&mut km), [
            Output::Tap(KeyCode::Home, Mods::NONE),
            Output::Tap(KeyCode::End, Mods::LSHIFT),
        ]);

        tap(&mut km, Layer::Ext, SEARCH_SELECTION);
        let out = outputs(&mut km);
        assert_eq!(out.len(), 5);
        assert_eq!(out[2], Output::Delay(100));
        assert_eq!(out[4], Output::Tap(KeyCode::Enter, Mods::NONE));
    }

    #[test]
    fn output_queue_drops_overflow() {
        let mut km = keymap();
        for _ in 0..4 {
            tap(&mut km, Layer::Ext, SEARCH_SELECTION);
        }
        let out = outputs(&mut km);
        assert_eq!(out.len(), OUTPUT_QUEUE_LEN);
        assert_eq!(out[15], Output::Tap(KeyCode::C, Mods::LCTRL));
    }

    #[test]
    fn firmware_handles_mouse_keys() {
        let mut km = keymap();
        assert!(tap(&mut km, Layer::Ext, MOUSE_BUTTON));
        assert!(km.on_event(&key(Layer::Ext, MOUSE_BUTTON, false)));
        assert!(outputs(&mut km).is_empty());
    }

    #[test]
    fn debug_toggle() {
        let mut km = keymap();
        assert!(!km.is_debug());
        assert!(!tap(&mut km, Layer::Fun, DEBUG_TOGGLE));
        assert!(km.is_debug());
        tap(&mut km, Layer::Base, J);
        tap(&mut km, Layer::Fun, DEBUG_TOGGLE);
        assert!(!km.is_debug());
    }

    #[test]
    fn layer_status_led() {
        let mut km = keymap();
        km.on_layer_change(Layer::Sym as u8);
        assert!(!km.host().status(StatusLed::Layer));
        km.on_layer_change(Layer::Nav as u8);
        assert!(km.host().status(StatusLed::Layer));
        km.on_layer_change(Layer::Ext as u8);
        km.on_layer_change(Layer::Base as u8);
        assert!(!km.host().status(StatusLed::Layer));
    }

    #[test]
    fn status_leds_written_on_change_only() {
        let mut km = keymap();
        let writes = km.host().status_writes;
        advance(&mut km, 100);
        tap(&mut km, Layer::Base, J);
        assert_eq!(km.host().status_writes, writes);
        tap(&mut km, Layer::Base, CAPS_WORD);
        assert_eq!(km.host().status_writes, writes + 1);
    }

    #[test]
    fn tap_hold_policy() {
        let km = keymap();
        assert_eq!(km.tapping_term(TapHoldKey::HrmE), TAPPING_TERM - 45);
        assert_eq!(km.quick_tap_term(TapHoldKey::HrmH), TAPPING_TERM);
        let hrm_a = key(Layer::Base, A, true);
        assert!(km.chordal_hold(&hrm_a, &key(Layer::Base, J, true)));
        assert!(!km.chordal_hold(&hrm_a, &key(Layer::Base, (1, 2), true)));
    }

    #[test]
    fn layout_starts_on_base_layer() {
        let km = keymap();
        assert_eq!(km.layout().current_layer(), Layer::Base as usize);
    }
}
