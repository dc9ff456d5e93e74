use core::fmt::{self, Write};

use heapless::String;

use super::event::{Action, KeyRecord};

/// Single line of the key event log
pub type LogLine = String<64>;

/// Format key event as a log line
///
/// `L<layer> (<row>,<col>) <tap|hold> <press|release> <key>`, with fixed-width
/// columns. Combos have no position and show `combo` instead. Lines that do not
/// fit are truncated.
pub fn format_record(record: &KeyRecord) -> LogLine {
    let mut line = LogLine::new();
    if write_record(&mut line, record).is_err() {
        warn!("Key event log line truncated");
    }
    line
}

fn write_record(w: &mut impl Write, record: &KeyRecord) -> fmt::Result {
    write!(w, "L{:<2} ", record.layer)?;
    match record.position {
        Some((row, col)) => write!(w, "({:2},{:2}) ", row, col)?,
        None => w.write_str("combo   ")?,
    }
    let tap_hold = match (record.is_tap_hold(), record.tap_count) {
        (false, _) => "",
        (true, 0) => "hold",
        (true, _) => "tap",
    };
    let press = if record.pressed { "press" } else { "release" };
    write!(w, "{:<4} {:<7} {}", tap_hold, press, ActionName(record.action))
}

/// Displays a key action in a short, keymap-like notation
pub struct ActionName<'a>(pub &'a Action);

impl fmt::Display for ActionName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Action::NoOp => f.write_str("XXXXXXX"),
            Action::Trans => f.write_str("_______"),
            Action::KeyCode(kc) => write!(f, "{:?}", kc),
            Action::MultipleKeyCodes(kcs) => {
                for (i, kc) in kcs.iter().enumerate() {
                    if i > 0 {
                        f.write_str("+")?;
                    }
                    write!(f, "{:?}", kc)?;
                }
                Ok(())
            },
            Action::MultipleActions(_) => f.write_str("MULTI"),
            Action::Layer(l) => write!(f, "MO({})", l),
            Action::DefaultLayer(l) => write!(f, "DF({})", l),
            Action::HoldTap { hold, tap, .. } => write!(f, "{}_T({})", ActionName(hold), ActionName(tap)),
            Action::Custom(action) => f.write_str(action.name()),
        }
    }
}
