use crate::host::{Effect, Hsv, RgbMatrix};
use crate::keyboard::actions::LightingAction;
use crate::lib8tion::{ease8_in_out_cubic, lerp8by8};
use crate::utils::{time_reached, Rand};

/// Configuration of the RGB matrix brightness controller
#[derive(Clone, Copy, Debug)]
pub struct LightingConfig {
    /// Full brightness, the dim level is 40% of it
    pub max_brightness: u8,
    /// Hue difference between neighbouring palettes
    pub hue_step: u8,
    /// Animation speed used by presets
    pub speed: u8,
    /// Duration of a brightness transition in ms
    pub fade_time: u16,
    /// Idle time before fading out after little activity, in ms
    pub idle_short: u32,
    /// Idle time before fading out when typing a lot, in ms
    pub idle_long: u32,
    /// Number of key events after which `idle_long` is used
    pub busy_events: u8,
}

/// Brightness transition in progress
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
struct Fade {
    start: u32,
    from: u8,
    to: u8,
}

/// Idle-aware brightness controller
///
/// Brightness is cycled between off, dim and full. When the keyboard is idle the
/// lights fade out and the next key event fades them back in. The idle time is
/// longer when there has been a lot of typing since the lights woke up.
///
/// "Off" selected with [`Lighting::cycle`] stays off regardless of activity;
/// going to sleep keeps the selected level so that it can be restored.
pub struct Lighting {
    config: LightingConfig,
    /// Brightness selected by the user
    level: u8,
    /// Brightness that is or will be shown when no fade is running
    target: u8,
    fade: Option<Fade>,
    /// Time at which to start fading out
    deadline: Option<u32>,
    event_count: u8,
    effect: Effect,
}

impl Lighting {
    pub const fn new(config: LightingConfig) -> Self {
        Self {
            config,
            level: 0,
            target: 0,
            fade: None,
            deadline: None,
            event_count: 0,
            effect: Effect::Flow,
        }
    }

    /// Brightness level selected by the user
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Brightness towards which the lights are fading (or at which they settled)
    pub fn target(&self) -> u8 {
        self.target
    }

    pub fn deadline(&self) -> Option<u32> {
        self.deadline
    }

    pub fn event_count(&self) -> u8 {
        self.event_count
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Lights are off because of inactivity but will wake on next key event
    pub fn is_asleep(&self) -> bool {
        self.level > 0 && self.target == 0
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    /// Dim brightness level, 40% of maximum
    pub const fn dim_level(&self) -> u8 {
        ((self.config.max_brightness as u16 * 2 + 2) / 5) as u8
    }

    /// Initialize lighting to a random preset and fade in to full brightness
    pub fn init(&mut self, matrix: &mut impl RgbMatrix, rand: &mut Rand, now: u32) {
        let hsv = matrix.hsv();
        matrix.set_hsv(Hsv { v: 0, ..hsv });
        let effect = Effect::from_index(Effect::Flow as u8 + rand.next(now) % 4);
        let palette = rand.next(now);
        self.preset(matrix, effect, palette, now);
        self.set_level(matrix, self.config.max_brightness, now);
        info!("Lighting init: effect={=u8} palette={=u8}", effect as u8, palette);
    }

    /// Cycle brightness between off, dim and full
    pub fn cycle(&mut self, matrix: &mut impl RgbMatrix, now: u32) {
        let max = self.config.max_brightness;
        let level = if self.level == 0 {
            self.dim_level()
        } else if self.level < max {
            max
        } else {
            0
        };
        self.set_level(matrix, level, now);
    }

    /// Select color palette, turning the lights on if they were off
    pub fn set_palette(&mut self, matrix: &mut impl RgbMatrix, palette: u8, now: u32) {
        if self.level == 0 {
            self.cycle(matrix, now);
        }
        matrix.enable();
        let v = matrix.hsv().v;
        matrix.set_hsv(Hsv::new(self.config.hue_step.wrapping_mul(palette), 255, v));
    }

    /// Select palette and effect at the default speed
    pub fn preset(&mut self, matrix: &mut impl RgbMatrix, effect: Effect, palette: u8, now: u32) {
        self.set_palette(matrix, palette, now);
        self.set_effect(matrix, effect);
        matrix.set_speed(self.config.speed);
    }

    pub fn next_effect(&mut self, matrix: &mut impl RgbMatrix) {
        self.set_effect(matrix, self.effect.next());
    }

    pub fn hue_up(&mut self, matrix: &mut impl RgbMatrix) {
        let hsv = matrix.hsv();
        matrix.set_hsv(Hsv { h: hsv.h.wrapping_add(self.config.hue_step), ..hsv });
    }

    pub fn random_hue(&mut self, matrix: &mut impl RgbMatrix, rand: &mut Rand, now: u32) {
        let hsv = matrix.hsv();
        matrix.set_hsv(Hsv { h: rand.next(now), ..hsv });
    }

    /// Handle a lighting key
    pub fn perform(&mut self, action: LightingAction, matrix: &mut impl RgbMatrix, rand: &mut Rand, now: u32) {
        debug!("Lighting action: {=u8}", action as u8);
        match action {
            LightingAction::Brightness => self.cycle(matrix, now),
            LightingAction::NextEffect => self.next_effect(matrix),
            LightingAction::HueUp => self.hue_up(matrix),
            LightingAction::HueRandom => self.random_hue(matrix, rand, now),
            LightingAction::Preset1 => self.preset(matrix, Effect::Flow, 0, now),
            LightingAction::Preset2 => self.preset(matrix, Effect::Ripple, 6, now),
        }
    }

    /// Keep the lights awake; to be called on every key event
    pub fn activity(&mut self, matrix: &mut impl RgbMatrix, now: u32) {
        if self.level == 0 {
            return;
        }
        self.event_count = self.event_count.saturating_add(1);
        if self.target == 0 {
            debug!("Lighting wake");
            self.fade_to(&*matrix, self.level, now);
        }
        self.arm_deadline(now);
    }

    /// Advance transitions and idle timeout; to be called periodically
    pub fn tick(&mut self, matrix: &mut impl RgbMatrix, now: u32) {
        if let Some(fade) = self.fade {
            let t = self.fade_progress(now.wrapping_sub(fade.start));
            let v = if t == u8::MAX {
                fade.to
            } else {
                lerp8by8(fade.from, fade.to, ease8_in_out_cubic(t))
            };
            let hsv = matrix.hsv();
            matrix.set_hsv(Hsv { v, ..hsv });

            if t == u8::MAX {
                self.fade = None;
                self.target = v;
                if v == 0 {
                    debug!("Lighting asleep");
                    self.deadline = None;
                    self.event_count = 0;
                } else {
                    self.arm_deadline(now);
                }
            }
        } else if let Some(deadline) = self.deadline {
            if time_reached(now, deadline) {
                debug!("Lighting idle");
                self.deadline = None;
                self.fade_to(&*matrix, 0, now);
            }
        }
    }

    /// Map time elapsed since start of a fade to 0..=255
    fn fade_progress(&self, elapsed: u32) -> u8 {
        let window = self.config.fade_time as u32;
        if elapsed > window {
            u8::MAX
        } else {
            (elapsed * 256 / (window + 1)).min(u8::MAX as u32) as u8
        }
    }

    fn set_level(&mut self, matrix: &mut impl RgbMatrix, level: u8, now: u32) {
        self.level = level;
        self.fade_to(&*matrix, level, now);
    }

    fn fade_to(&mut self, matrix: &impl RgbMatrix, to: u8, now: u32) {
        let from = matrix.hsv().v;
        self.target = to;
        self.fade = Some(Fade { start: now, from, to });
    }

    fn arm_deadline(&mut self, now: u32) {
        let duration = if self.event_count <= self.config.busy_events {
            self.config.idle_short
        } else {
            self.config.idle_long
        };
        self.deadline = Some(now.wrapping_add(duration));
    }

    fn set_effect(&mut self, matrix: &mut impl RgbMatrix, effect: Effect) {
        self.effect = effect;
        matrix.set_effect(effect);
    }
}
