use rgb::RGB8;

use crate::host::{Effect, Hsv, RgbMatrix};

/// Storage for LED colors driven by a global HSV color
///
/// Minimal [`RgbMatrix`] implementation: every LED shows the same color, the
/// effect and speed are only recorded. Firmware with a real animation engine
/// replaces it with its own driver.
pub struct Leds<const N: usize> {
    colors: [RGB8; N],
    hsv: Hsv,
    enabled: bool,
    effect: Effect,
    speed: u8,
}

impl<const N: usize> Leds<N> {
    pub const fn new() -> Self {
        Self {
            colors: [RGB8::new(0, 0, 0); N],
            hsv: Hsv::new(0, 0, 0),
            enabled: false,
            effect: Effect::Flow,
            speed: 0,
        }
    }

    /// Colors ready to be sent to the LEDs
    pub fn colors(&self) -> &[RGB8; N] {
        &self.colors
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    pub fn speed(&self) -> u8 {
        self.speed
    }

    fn render(&mut self) {
        let color = if self.enabled { hsv_to_rgb(self.hsv) } else { RGB8::default() };
        self.colors.iter_mut().for_each(|c| *c = color);
    }
}

impl<const N: usize> Default for Leds<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RgbMatrix for Leds<N> {
    fn enable(&mut self) {
        self.enabled = true;
        self.render();
    }

    fn hsv(&self) -> Hsv {
        self.hsv
    }

    fn set_hsv(&mut self, hsv: Hsv) {
        self.hsv = hsv;
        self.render();
    }

    fn set_effect(&mut self, effect: Effect) {
        self.effect = effect;
    }

    fn set_speed(&mut self, speed: u8) {
        self.speed = speed;
    }
}

/// Convert color from HSV to RGB using integer math
///
/// The hue circle is split into 6 regions of ~43 steps.
pub fn hsv_to_rgb(hsv: Hsv) -> RGB8 {
    let Hsv { h, s, v } = hsv;
    if s == 0 {
        return RGB8::new(v, v, v);
    }

    let (h, s, v) = (h as u16, s as u16, v as u16);
    let region = h * 6 / 255;
    let remainder = (h * 2 - region * 85) * 3;

    let p = ((v * (255 - s)) >> 8) as u8;
    let q = ((v * (255 - ((s * remainder) >> 8))) >> 8) as u8;
    let t = ((v * (255 - ((s * (255 - remainder)) >> 8))) >> 8) as u8;
    let v = v as u8;

    match region {
        0 | 6 => RGB8::new(v, t, p),
        1 => RGB8::new(q, v, p),
        2 => RGB8::new(p, v, t),
        3 => RGB8::new(p, q, v),
        4 => RGB8::new(t, p, v),
        _ => RGB8::new(v, p, q),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_colors() {
        assert_eq!(hsv_to_rgb(Hsv::new(0, 255, 255)), RGB8::new(255, 0, 0));
        assert_eq!(hsv_to_rgb(Hsv::new(85, 255, 255)), RGB8::new(0, 255, 0));
        assert_eq!(hsv_to_rgb(Hsv::new(170, 255, 255)), RGB8::new(0, 0, 255));
    }

    #[test]
    fn gray_and_black() {
        assert_eq!(hsv_to_rgb(Hsv::new(123, 0, 77)), RGB8::new(77, 77, 77));
        for h in 0..=255 {
            assert_eq!(hsv_to_rgb(Hsv::new(h, 255, 0)), RGB8::new(0, 0, 0));
        }
    }

    #[test]
    fn value_limits_all_channels() {
        for h in (0..=255).step_by(3) {
            let c = hsv_to_rgb(Hsv::new(h, 200, 120));
            assert!(c.r <= 120 && c.g <= 120 && c.b <= 120, "h={} {:?}", h, c);
        }
    }

    #[test]
    fn dark_until_enabled() {
        let mut leds = Leds::<3>::new();
        leds.set_hsv(Hsv::new(0, 255, 255));
        assert_eq!(leds.colors(), &[RGB8::new(0, 0, 0); 3]);
        leds.enable();
        assert!(leds.is_enabled());
        assert_eq!(leds.colors(), &[RGB8::new(255, 0, 0); 3]);
    }

    #[test]
    fn records_effect_and_speed() {
        let mut leds = Leds::<1>::new();
        leds.set_effect(Effect::Vortex);
        leds.set_speed(100);
        assert_eq!(leds.effect(), Effect::Vortex);
        assert_eq!(leds.speed(), 100);
    }
}
