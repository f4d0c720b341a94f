//! USB HID usage IDs for the keyboard/keypad page (0x07) and the handful of consumer page
//! (0x0C) usages the keymap sends.

/// Keyboard/keypad page usages. Only the ones a 75% layout can produce are listed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum KeyCode {
    A = 0x04, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    Kc1 = 0x1e, Kc2, Kc3, Kc4, Kc5, Kc6, Kc7, Kc8, Kc9, Kc0,
    Enter = 0x28,
    Escape,
    Backspace,
    Tab,
    Space,
    Minus,
    Equal,
    LeftBracket,
    RightBracket,
    Backslash,
    NonusHash,
    Semicolon,
    Quote,
    Grave,
    Comma,
    Dot,
    Slash,
    CapsLock = 0x39,
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
    PrintScreen = 0x46,
    ScrollLock,
    Pause,
    Insert,
    Home,
    PageUp,
    Delete,
    End,
    PageDown,
    Right,
    Left,
    Down,
    Up,
    F13 = 0x68, F14, F15, F16, F17, F18, F19, F20, F21, F22, F23, F24,
    LCtrl = 0xe0,
    LShift,
    LAlt,
    LGui,
    RCtrl,
    RShift,
    RAlt,
    RGui,
}

impl KeyCode {
    pub const fn is_modifier(self) -> bool {
        self as u8 >= KeyCode::LCtrl as u8
    }

    /// The bit this key sets in the HID modifier byte, or 0 for any non-modifier.
    pub const fn modifier_bit(self) -> u8 {
        if self.is_modifier() {
            1 << (self as u8 - KeyCode::LCtrl as u8)
        } else {
            0
        }
    }
}

/// Consumer page usages
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u16)]
pub enum ConsumerCode {
    NextTrack = 0xb5,
    PrevTrack = 0xb6,
    Stop = 0xb7,
    PlayPause = 0xcd,
    Mute = 0xe2,
    VolumeUp = 0xe9,
    VolumeDown = 0xea,
}

pub const MOD_MASK_CTRL: u8 = KeyCode::LCtrl.modifier_bit() | KeyCode::RCtrl.modifier_bit();
pub const MOD_MASK_SHIFT: u8 = KeyCode::LShift.modifier_bit() | KeyCode::RShift.modifier_bit();
pub const MOD_MASK_ALT: u8 = KeyCode::LAlt.modifier_bit() | KeyCode::RAlt.modifier_bit();
pub const MOD_MASK_GUI: u8 = KeyCode::LGui.modifier_bit() | KeyCode::RGui.modifier_bit();
