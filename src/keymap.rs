//! Defines key functions (here called [Thing]s) and the three layers of mapping from physical
//! keys to these [Thing]s.
//!
//! Physical keyboard layout:
//!
//! ```text
//! ESC   F1  F2  F3  F4  F5  F6  F7  F8  F9  F10 F11 F12 Home      Rotary(Mute)
//! ~     1   2   3   4   5   6   7   8   9   0   -   =   BackSpc   Ins
//! Tab   Q   W   E   R   T   Y   U   I   O   P   [   ]   \         Del
//! Caps  A   S   D   F   G   H   J   K   L   ;   "       Enter     PgUp
//! Sh_L      Z   X   C   V   B   N   M   ,   .   ?       Sh_R  Up  PgDn
//! Ct_L  Win Alt         SPACE           Alt_R FN  Ct_R  Left Down Right
//! ```
//!
//! The matrix follows the physical rows; the holes in them are [Thing::Inactive] on every layer.
//! Used by [crate::engine], which resolves presses against these tables.

use crate::keycode::ConsumerCode::{self, *};
use crate::keycode::KeyCode::{self, *};

type HidKeyCode = u8;
type Modifiers = u8;
pub type Key = (HidKeyCode, Modifiers);
pub type LayerIndex = u8;

/// A Thing which a keypress should Do
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Thing {
    RealKey(Key),
    MediaKey(ConsumerCode),
    /// Layer active while held
    Momentary(LayerIndex),
    /// Layer while held, key when tapped
    LayerTap(LayerIndex, HidKeyCode),
    /// Escape, or grave while shift or GUI is held
    GraveEscape,
    /// Right shift while held, enter when tapped
    ShiftEnter,
    Bootloader,
    /// Win+Shift+S, for Windows snipping
    Snip,
    /// Falls through to the next active layer down
    Transparent,
    #[default]
    Inactive,
}

/// How many physical rows there are
pub const ROWS: usize = 6;
/// How many physical columns there are
pub const COLUMNS: usize = 15;

/// Array of [Thing]s that a row of keys do
pub type Row = [Thing; COLUMNS];
/// 2D Array of [Thing]s that the whole set of keys do
pub type Layer = [Row; ROWS];

pub const LAYER_MEDIA: LayerIndex = 1;
pub const LAYER_ERGONOMIC: LayerIndex = 2;

/// Translate a [KeyCode] into a valid [Thing]
const fn k(k: KeyCode) -> Thing {
    let maybe_modifier_key = k.modifier_bit();
    if maybe_modifier_key != 0 {
        return Thing::RealKey((0, maybe_modifier_key));
    }
    Thing::RealKey((k as u8, 0))
}

/// Translate a [ConsumerCode] into a valid [Thing]
const fn m(c: ConsumerCode) -> Thing {
    Thing::MediaKey(c)
}

const fn lt(layer: LayerIndex, k: KeyCode) -> Thing {
    assert!(!k.is_modifier());
    Thing::LayerTap(layer, k as u8)
}

const fn mo(layer: LayerIndex) -> Thing {
    Thing::Momentary(layer)
}

const DFA: Thing = Thing::Inactive;
const ___: Thing = Thing::Transparent;
const GESC: Thing = Thing::GraveEscape;
const SFTENT: Thing = Thing::ShiftEnter;
const RESET: Thing = Thing::Bootloader;
const SNIP: Thing = Thing::Snip;

/// Behaves exactly as the physical keycaps suggest, except that ESC is grave-escape, CAPS
/// switches to the ergonomic layer while held, and right shift taps as enter.
#[rustfmt::skip]
pub const LAYER_0: Layer = [
    [GESC,              k(F1),  k(F2),  k(F3),  k(F4),  k(F5),  k(F6),  k(F7),     k(F8),  k(F9),   k(F10),       k(F11),         k(F12),          k(Home),      m(Mute)],
    [k(Grave),          k(Kc1), k(Kc2), k(Kc3), k(Kc4), k(Kc5), k(Kc6), k(Kc7),    k(Kc8), k(Kc9),  k(Kc0),       k(Minus),       k(Equal),        k(Backspace), k(Insert)],
    [k(Tab),            k(Q),   k(W),   k(E),   k(R),   k(T),   k(Y),   k(U),      k(I),   k(O),    k(P),         k(LeftBracket), k(RightBracket), k(Backslash), k(Delete)],
    [lt(2, CapsLock),   k(A),   k(S),   k(D),   k(F),   k(G),   k(H),   k(J),      k(K),   k(L),    k(Semicolon), k(Quote),       DFA,             k(Enter),     k(PageUp)],
    [k(LShift),         DFA,    k(Z),   k(X),   k(C),   k(V),   k(B),   k(N),      k(M),   k(Comma), k(Dot),      k(Slash),       SFTENT,          k(Up),        k(PageDown)],
    [k(LCtrl),          k(LGui), k(LAlt), DFA,  DFA,    k(Space), DFA,  DFA,       DFA,    k(RAlt), mo(1),        k(RCtrl),       k(Left),         k(Down),      k(Right)],
];

/// Media keys on the F-row and the inverse of the vertical keys (INS->DEL, HOME->END).
/// Active while FN is held. Backslash enters the bootloader.
#[rustfmt::skip]
pub const LAYER_1: Layer = [
    [SNIP, m(Mute), m(VolumeDown), m(VolumeUp), ___, m(PlayPause), m(Stop), m(PrevTrack), m(NextTrack), ___, ___, ___, ___, k(End),    k(PrintScreen)],
    [___,  ___,     ___,           ___,         ___, ___,          ___,     ___,          ___,          ___, ___, ___, ___, k(Delete), k(Delete)],
    [___,  ___,     ___,           ___,         ___, ___,          ___,     ___,          ___,          ___, ___, ___, ___, RESET,     k(Insert)],
    [___,  ___,     ___,           ___,         ___, ___,          ___,     ___,          ___,          ___, ___, ___, DFA, ___,       k(PageDown)],
    [___,  DFA,     ___,           ___,         ___, ___,          ___,     ___,          ___,          ___, ___, ___, ___, k(PageUp), k(PageUp)],
    [___,  ___,     ___,           DFA,         DFA, ___,          DFA,     DFA,          DFA,          ___, ___, ___, k(Home), k(PageDown), k(End)],
];

/// WASD as an arrow cluster and F13-F24 on the F-row. Active while CAPS is held.
#[rustfmt::skip]
pub const LAYER_2: Layer = [
    [SNIP, k(F13),  k(F14),  k(F15),  k(F16), k(F17), k(F18), k(F19), k(F20), k(F21), k(F22), k(F23), k(F24), k(End), ___],
    [___,  ___,     ___,     ___,     ___,    ___,    ___,    ___,    ___,    ___,    ___,    ___,    ___,    ___,    k(Delete)],
    [___,  ___,     k(Up),   ___,     ___,    ___,    ___,    ___,    ___,    ___,    ___,    ___,    ___,    RESET,  k(Insert)],
    [___,  k(Left), k(Down), k(Right), ___,   ___,    ___,    ___,    ___,    ___,    ___,    ___,    DFA,    ___,    k(PageDown)],
    [___,  DFA,     ___,     ___,     ___,    ___,    ___,    ___,    ___,    ___,    ___,    ___,    ___,    ___,    k(PageUp)],
    [___,  ___,     ___,     DFA,     DFA,    ___,    DFA,    DFA,    DFA,    ___,    ___,    ___,    ___,    ___,    ___],
];

/// All layers, indexed by [LayerIndex]
pub const LAYERS: [&Layer; 3] = [&LAYER_0, &LAYER_1, &LAYER_2];
