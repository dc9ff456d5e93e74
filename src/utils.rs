/// Cheap pseudorandom generator seeded from the timer
///
/// Every call mixes in the current time, so the sequence depends on when the
/// user presses keys. Good enough for picking colors, nothing else.
pub struct Rand {
    state: u16,
}

impl Rand {
    const MULTIPLIER: u16 = 36563;

    pub const fn new() -> Self {
        Self { state: 1 }
    }

    /// Generate next pseudorandom byte mixing in current time
    pub fn next(&mut self, time: u32) -> u8 {
        // Only the low bits of time matter, the timer wraps anyway
        self.state = self.state.wrapping_add(time as u16);
        self.state = self.state.wrapping_mul(Self::MULTIPLIER);
        (self.state >> 8) as u8
    }
}

impl Default for Rand {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrapping timestamp comparison: true if `time` is at or after `deadline`
///
/// Timestamps wrap at 32 bits, so anything less than half the range after
/// `deadline` counts as reached.
pub fn time_reached(time: u32, deadline: u32) -> bool {
    time.wrapping_sub(deadline) < u32::MAX / 2
}
