//! Layout and functions of keys on the keyboard
//!
//! Each half has four rows of six keys plus two thumb keys. Halves are placed
//! side by side giving 12 columns; the thumb keys are in the middle of the last
//! row and the remaining cells of that row do not exist on the keyboard.

use keyberon::{
    action::{self, k, l, m, Action::*, HoldTapConfig},
    key_code::KeyCode::*,
    layout,
};

use crate::keyboard::Action as CustomAction;
use crate::keyboard::actions::{LightingAction, Macro, MouseAction, MouseButton, MouseMovement};
use crate::keyboard::tap_hold::TapHoldKey;

pub const N_COLS: usize = 12;
pub const N_ROWS: usize = 5;
pub const N_LAYERS: usize = 6;

pub type Layout = layout::Layout<N_COLS, N_ROWS, N_LAYERS, CustomAction>;
pub type Layers = layout::Layers<N_COLS, N_ROWS, N_LAYERS, CustomAction>;
type Action = action::Action<CustomAction>;

/// Keyboard layers, in the order of their indices in [`LAYERS`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Layer {
    Base,
    Sym,
    Nav,
    Num,
    Fun,
    Ext,
}

/// Get keyboard layout
pub fn layout() -> Layout {
    Layout::new(&LAYERS)
}

macro_rules! ht {
    ($key:expr, $hold:expr, $tap:expr) => {
        HoldTap {
            timeout: TapHoldKey::tapping_term($key),
            hold: &$hold,
            tap: &$tap,
            tap_hold_interval: TapHoldKey::quick_tap_term($key),
            config: HoldTapConfig::Default,
        }
    };
}

// Home row mods
const HRM_A: Action = ht!(TapHoldKey::HrmA, k(LGui), k(A));
const HRM_R: Action = ht!(TapHoldKey::HrmR, k(LAlt), k(R));
const HRM_S: Action = ht!(TapHoldKey::HrmS, k(LCtrl), k(S));
const HRM_T: Action = ht!(TapHoldKey::HrmT, k(LShift), k(T));
const HRM_D: Action = ht!(TapHoldKey::HrmD, l(Layer::Num as usize), k(D));

const HRM_N: Action = ht!(TapHoldKey::HrmN, k(RShift), k(N));
const HRM_E: Action = ht!(TapHoldKey::HrmE, k(RCtrl), k(E));
const HRM_I: Action = ht!(TapHoldKey::HrmI, k(LAlt), k(I));
const HRM_O: Action = ht!(TapHoldKey::HrmO, k(RGui), k(O));
const HRM_H: Action = ht!(TapHoldKey::HrmH, l(Layer::Ext as usize), k(H));

// Thumb keys
const NAV_BSP: Action = ht!(TapHoldKey::NavBsp, l(Layer::Nav as usize), k(BSpace));
const SYM_SPC: Action = ht!(TapHoldKey::SymSpc, l(Layer::Sym as usize), k(Space));
const FUN_ESC: Action = ht!(TapHoldKey::FunEsc, l(Layer::Fun as usize), k(Escape));
const EXT_ENT: Action = ht!(TapHoldKey::ExtEnt, l(Layer::Ext as usize), k(Enter));

const ZOOMIN: Action = ht!(TapHoldKey::ZoomIn, k(LGui), k(Equal));
const ZOOMOUT: Action = ht!(TapHoldKey::ZoomOut, k(LGui), k(Minus));

const OS_LSFT: Action = Custom(CustomAction::OneShot(LShift));
const OS_RSFT: Action = Custom(CustomAction::OneShot(RShift));
const CW_TOGG: Action = Custom(CustomAction::CapsWord);
const DB_TOGG: Action = Custom(CustomAction::DebugToggle);

const _______: Action = Trans;
const XXXXXXX: Action = NoOp;

// Shifted symbols (US layout)
const EXLM: Action = m(&[LShift, Kb1]);
const AT: Action = m(&[LShift, Kb2]);
const HASH: Action = m(&[LShift, Kb3]);
const DLR: Action = m(&[LShift, Kb4]);
const PERC: Action = m(&[LShift, Kb5]);
const CIRC: Action = m(&[LShift, Kb6]);
const AMPR: Action = m(&[LShift, Kb7]);
const ASTR: Action = m(&[LShift, Kb8]);
const LPRN: Action = m(&[LShift, Kb9]);
const RPRN: Action = m(&[LShift, Kb0]);
const UNDS: Action = m(&[LShift, Minus]);
const PLUS: Action = m(&[LShift, Equal]);
const LCBR: Action = m(&[LShift, LBracket]);
const RCBR: Action = m(&[LShift, RBracket]);
const PIPE: Action = m(&[LShift, Bslash]);
const COLN: Action = m(&[LShift, SColon]);
const DQUO: Action = m(&[LShift, Quote]);
const TILD: Action = m(&[LShift, Grave]);
const LABK: Action = m(&[LShift, Comma]);
const RABK: Action = m(&[LShift, Dot]);
const QUES: Action = m(&[LShift, Slash]);

// Editing chords
const C_PGUP: Action = m(&[LCtrl, PgUp]);
const C_PGDN: Action = m(&[LCtrl, PgDown]);
const C_A: Action = m(&[LCtrl, A]);
const C_C: Action = m(&[LCtrl, C]);
const C_V: Action = m(&[LCtrl, V]);
const C_X: Action = m(&[LCtrl, X]);
const C_Y: Action = m(&[LCtrl, Y]);
const C_Z: Action = m(&[LCtrl, Z]);

// Mouse
const MS_BTN1: Action = Custom(CustomAction::Mouse(MouseAction::Click(MouseButton::Left)));
const MS_BTN2: Action = Custom(CustomAction::Mouse(MouseAction::Click(MouseButton::Right)));
const OM_U: Action = Custom(CustomAction::Mouse(MouseAction::Move(MouseMovement::Up)));
const OM_D: Action = Custom(CustomAction::Mouse(MouseAction::Move(MouseMovement::Down)));
const OM_L: Action = Custom(CustomAction::Mouse(MouseAction::Move(MouseMovement::Left)));
const OM_R: Action = Custom(CustomAction::Mouse(MouseAction::Move(MouseMovement::Right)));
const OM_W_U: Action = Custom(CustomAction::Mouse(MouseAction::Move(MouseMovement::WheelUp)));
const OM_W_D: Action = Custom(CustomAction::Mouse(MouseAction::Move(MouseMovement::WheelDown)));
const OM_SLOW: Action = Custom(CustomAction::Mouse(MouseAction::Slow));

// Macros
const SELLINE: Action = Custom(CustomAction::Macro(Macro::SelectLine));
const SRCHSEL: Action = Custom(CustomAction::Macro(Macro::SearchSelection));

// Lighting
const RGBBRI: Action = Custom(CustomAction::Lighting(LightingAction::Brightness));
const RGBNEXT: Action = Custom(CustomAction::Lighting(LightingAction::NextEffect));
const RGBHUP: Action = Custom(CustomAction::Lighting(LightingAction::HueUp));
const RGBHRND: Action = Custom(CustomAction::Lighting(LightingAction::HueRandom));
const RGBDEF1: Action = Custom(CustomAction::Lighting(LightingAction::Preset1));
const RGBDEF2: Action = Custom(CustomAction::Lighting(LightingAction::Preset2));

#[rustfmt::skip]
pub static LAYERS: Layers = [
    // Base layer: Colemak DH
    [
        [k(Equal), k(Kb1),  k(Kb2),  k(Kb3),  k(Kb4),  k(Kb5),   k(Kb6),  k(Kb7),  k(Kb8),   k(Kb9),  k(Kb0),    k(Minus)],
        [k(Tab),   k(Q),    k(W),    k(F),    k(P),    k(B),     k(J),    k(L),    k(U),     k(Y),    k(SColon), k(Bslash)],
        [CW_TOGG,  HRM_A,   HRM_R,   HRM_S,   HRM_T,   k(G),     k(M),    HRM_N,   HRM_E,    HRM_I,   HRM_O,     k(Quote)],
        [OS_LSFT,  k(Z),    k(X),    k(C),    HRM_D,   k(V),     k(K),    HRM_H,   k(Comma), k(Dot),  k(Slash),  OS_RSFT],
        [XXXXXXX,  XXXXXXX, XXXXXXX, XXXXXXX, NAV_BSP, FUN_ESC,  EXT_ENT, SYM_SPC, XXXXXXX,  XXXXXXX, XXXXXXX,   XXXXXXX],
    ],
    // Symbol layer
    [
        [k(Grave), k(LBracket), LPRN, RPRN,     k(RBracket), AT,        _______, k(Home),   k(Up),    k(End),   k(PgUp),   _______],
        [EXLM,     k(Comma),    LCBR, RCBR,     PERC,        QUES,      k(Grave), k(Left),  k(Down),  k(Right), k(PgDown), _______],
        [HASH,     CIRC,        k(Equal), UNDS, DLR,         ASTR,      DQUO,    k(BSpace), k(Tab),   k(Space), k(Enter),  _______],
        [TILD,     LABK,        PIPE, k(Minus), RABK,        k(Slash),  k(Quote), k(Minus), AMPR,     PLUS,     _______,   _______],
        [XXXXXXX,  XXXXXXX,     XXXXXXX, XXXXXXX, COLN,      k(Bslash), _______, _______,   XXXXXXX,  XXXXXXX,  XXXXXXX,   XXXXXXX],
    ],
    // Navigation layer
    [
        [_______,  _______,  _______, _______, _______,  _______,     _______, _______,  _______, _______,  _______,   _______],
        [_______,  XXXXXXX,  C_PGUP,  C_PGDN,  XXXXXXX,  XXXXXXX,     C_X,     k(Home),  k(Up),   k(End),   k(PgUp),   _______],
        [_______,  k(LGui),  k(LAlt), k(LCtrl), k(LShift), MS_BTN1,   C_C,     k(Left),  k(Down), k(Right), k(PgDown), _______],
        [_______,  XXXXXXX,  XXXXXXX, XXXXXXX, XXXXXXX,  XXXXXXX,     C_V,     C_Z,      k(BSpace), C_Y,    XXXXXXX,   _______],
        [XXXXXXX,  XXXXXXX,  XXXXXXX, XXXXXXX, _______,  _______,     _______, XXXXXXX,  XXXXXXX, XXXXXXX,  XXXXXXX,   XXXXXXX],
    ],
    // Number layer
    [
        [k(Escape), XXXXXXX, XXXXXXX, XXXXXXX, XXXXXXX, XXXXXXX,     TILD,    CIRC,    HASH,    DLR,     EXLM,        AT],
        [k(A),      XXXXXXX, XXXXXXX, XXXXXXX, XXXXXXX, XXXXXXX,     XXXXXXX, k(Kp7),  k(Kp8),  k(Kp9),  COLN,        PERC],
        [k(B),      XXXXXXX, XXXXXXX, XXXXXXX, XXXXXXX, XXXXXXX,     XXXXXXX, k(Kp4),  k(Kp5),  k(Kp6),  k(KpMinus),  k(KpPlus)],
        [k(C),      XXXXXXX, XXXXXXX, XXXXXXX, XXXXXXX, XXXXXXX,     XXXXXXX, k(Kp1),  k(Kp2),  k(Kp3),  k(KpSlash),  k(KpAsterisk)],
        [XXXXXXX,   XXXXXXX, XXXXXXX, XXXXXXX, _______, _______,     k(Kp0),  k(KpEqual), XXXXXXX, XXXXXXX, XXXXXXX,  XXXXXXX],
    ],
    // Function layer, also holds lighting controls
    [
        [k(Escape), XXXXXXX, XXXXXXX, XXXXXXX, XXXXXXX, XXXXXXX,     k(F16),  k(MediaPlayPause), k(MediaPreviousSong), k(MediaNextSong), k(MediaStop), k(MediaEjectCD)],
        [k(A),      RGBBRI,  RGBNEXT, RGBHUP,  RGBHRND, XXXXXXX,     k(F17),  k(F7),   k(F8),   k(F9),   k(F10),  k(F13)],
        [k(B),      RGBDEF1, RGBDEF2, XXXXXXX, XXXXXXX, XXXXXXX,     ZOOMIN,  k(F4),   k(F5),   k(F6),   k(F11),  k(F14)],
        [k(C),      DB_TOGG, XXXXXXX, XXXXXXX, XXXXXXX, XXXXXXX,     ZOOMOUT, k(F1),   k(F2),   k(F3),   k(F12),  k(F15)],
        [XXXXXXX,   XXXXXXX, XXXXXXX, XXXXXXX, _______, _______,     k(MediaVolDown), k(MediaVolUp), XXXXXXX, XXXXXXX, XXXXXXX, XXXXXXX],
    ],
    // Mouse and extras
    [
        [_______,  _______, _______, _______,  _______, _______,     _______, _______, _______, _______, _______, _______],
        [_______,  XXXXXXX, XXXXXXX, XXXXXXX,  XXXXXXX, XXXXXXX,     OM_W_U,  MS_BTN1, OM_U,    MS_BTN2, SRCHSEL, _______],
        [OM_SLOW,  k(LAlt), k(LCtrl), k(LShift), SELLINE, XXXXXXX,   OM_W_D,  OM_L,    OM_D,    OM_R,    OM_SLOW, _______],
        [_______,  k(LGui), C_V,     C_A,      C_C,     C_X,         XXXXXXX, XXXXXXX, XXXXXXX, XXXXXXX, XXXXXXX, _______],
        [XXXXXXX,  XXXXXXX, XXXXXXX, XXXXXXX,  k(Delete), MS_BTN1,   MS_BTN1, XXXXXXX, XXXXXXX, XXXXXXX, XXXXXXX, XXXXXXX],
    ],
];

#[cfg(test)]
mod tests {
    use super::*;
    use keyberon::key_code::KeyCode as Kc;

    fn at(layer: Layer, row: usize, col: usize) -> &'static Action {
        &LAYERS[layer as usize][row][col]
    }

    #[test]
    fn layer_indices() {
        assert_eq!(Layer::Base as usize, 0);
        assert_eq!(Layer::Ext as usize, N_LAYERS - 1);
        assert!(Layer::Nav > Layer::Sym);
    }

    #[test]
    fn base_is_colemak_dh() {
        let row: std::vec::Vec<Option<Kc>> = LAYERS[0][1].iter()
            .map(|a| match a {
                action::Action::KeyCode(kc) => Some(*kc),
                _ => None,
            })
            .collect();
        assert_eq!(&row[1..6], &[Some(Kc::Q), Some(Kc::W), Some(Kc::F), Some(Kc::P), Some(Kc::B)]);
        assert_eq!(&row[6..11], &[Some(Kc::J), Some(Kc::L), Some(Kc::U), Some(Kc::Y), Some(Kc::SColon)]);
    }

    #[test]
    fn thumb_keys_switch_layers() {
        let expect = [(4, Layer::Nav), (5, Layer::Fun), (6, Layer::Ext), (7, Layer::Sym)];
        for (col, layer) in expect {
            match at(Layer::Base, 4, col) {
                HoldTap { hold, .. } => assert!(
                    matches!(**hold, action::Action::Layer(n) if n == layer as usize),
                    "col {}", col
                ),
                _ => panic!("thumb key at col {} is not a tap-hold", col),
            }
        }
    }

    #[test]
    fn unused_thumb_cells_are_noop() {
        for layer in 0..N_LAYERS {
            for col in [0, 1, 2, 3, 8, 9, 10, 11] {
                assert!(matches!(LAYERS[layer][4][col], NoOp), "layer {} col {}", layer, col);
            }
        }
    }

    #[test]
    fn lighting_keys_on_fun_layer() {
        assert!(matches!(
            at(Layer::Fun, 1, 1),
            Custom(CustomAction::Lighting(LightingAction::Brightness))
        ));
        assert!(matches!(at(Layer::Fun, 3, 1), Custom(CustomAction::DebugToggle)));
    }

    #[test]
    fn layout_starts_on_base() {
        let layout = layout();
        assert_eq!(layout.current_layer(), Layer::Base as usize);
    }
}
