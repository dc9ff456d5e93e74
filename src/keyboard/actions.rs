use keyberon::key_code::KeyCode;

use super::event::Mods;

/// Additional key actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Toggle Caps Word
    CapsWord,
    /// Modifier applied to the next key only (handled by the firmware)
    OneShot(KeyCode),
    /// Modify RGB matrix lighting
    Lighting(LightingAction),
    /// Use mouse emulation (handled by the firmware)
    Mouse(MouseAction),
    /// Type a sequence of keys
    Macro(Macro),
    /// Toggle debug logging of key events
    DebugToggle,
}

/// Actions for RGB matrix lighting control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightingAction {
    /// Cycle through off, dim and full brightness
    Brightness,
    /// Switch to the next animation effect
    NextEffect,
    /// Shift hue by one step
    HueUp,
    /// Pick a random hue
    HueRandom,
    /// First preset of effect and palette
    Preset1,
    /// Second preset of effect and palette
    Preset2,
}

/// Actions related to mouse emulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAction {
    /// Key emulates a mouse key
    Click(MouseButton),
    /// Key performs mouse movement when held
    Move(MouseMovement),
    /// Slow down movement while held
    Slow,
}

/// Emulate a mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

/// Emulate mouse (or mouse wheel) movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseMovement {
    Up,
    Down,
    Left,
    Right,
    WheelUp,
    WheelDown,
}

/// Predefined key sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Macro {
    /// Select the current line
    SelectLine,
    /// Search the selected text in a new browser tab
    SearchSelection,
}

/// Single step of a [`Macro`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroStep {
    /// Press and release the key with given modifiers held
    Tap(KeyCode, Mods),
    /// Wait for given number of milliseconds
    Delay(u16),
}

impl Macro {
    pub fn steps(&self) -> &'static [MacroStep] {
        use KeyCode::*;
        use MacroStep::*;
        match self {
            Macro::SelectLine => &[
                Tap(Home, Mods::NONE),
                Tap(End, Mods::LSHIFT),
            ],
            Macro::SearchSelection => &[
                Tap(C, Mods::LCTRL),
                Tap(T, Mods::LCTRL),
                // let the browser open the tab
                Delay(100),
                Tap(V, Mods::LCTRL),
                Tap(Enter, Mods::NONE),
            ],
        }
    }
}

impl Action {
    /// Short name used in debug logs
    pub fn name(&self) -> &'static str {
        match self {
            Action::CapsWord => "CW_TOGG",
            Action::OneShot(KeyCode::LShift) => "OS_LSFT",
            Action::OneShot(KeyCode::RShift) => "OS_RSFT",
            Action::OneShot(_) => "OSM",
            Action::Lighting(lighting) => match lighting {
                LightingAction::Brightness => "RGBBRI",
                LightingAction::NextEffect => "RGBNEXT",
                LightingAction::HueUp => "RGBHUP",
                LightingAction::HueRandom => "RGBHRND",
                LightingAction::Preset1 => "RGBDEF1",
                LightingAction::Preset2 => "RGBDEF2",
            },
            Action::Mouse(mouse) => match mouse {
                MouseAction::Click(MouseButton::Left) => "MS_BTN1",
                MouseAction::Click(MouseButton::Right) => "MS_BTN2",
                MouseAction::Move(MouseMovement::Up) => "OM_U",
                MouseAction::Move(MouseMovement::Down) => "OM_D",
                MouseAction::Move(MouseMovement::Left) => "OM_L",
                MouseAction::Move(MouseMovement::Right) => "OM_R",
                MouseAction::Move(MouseMovement::WheelUp) => "OM_W_U",
                MouseAction::Move(MouseMovement::WheelDown) => "OM_W_D",
                MouseAction::Slow => "OM_SLOW",
            },
            Action::Macro(Macro::SelectLine) => "SELLINE",
            Action::Macro(Macro::SearchSelection) => "SRCHSEL",
            Action::DebugToggle => "DB_TOGG",
        }
    }
}
