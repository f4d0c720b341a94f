//! Key sequences sent by custom keycodes.

use crate::keycode::KeyCode::{self, *};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MacroStep {
    Down(KeyCode),
    Up(KeyCode),
    /// [MacroStep::Down] then [MacroStep::Up]
    Tap(KeyCode),
}

/// Win+Shift+S, which opens the Windows snipping tool
pub const SNIP: &[MacroStep] = &[
    MacroStep::Down(LGui),
    MacroStep::Down(LShift),
    MacroStep::Tap(S),
    MacroStep::Up(LShift),
    MacroStep::Up(LGui),
];

/// The modifier byte and keycodes a macro has down on top of whatever the user is holding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MacroKeys {
    pub modifier: u8,
    /// 0 when no key is down; a macro only ever holds one non-modifier at a time
    pub keycode: u8,
}

impl MacroKeys {
    fn press(&mut self, code: KeyCode) {
        if code.is_modifier() {
            self.modifier |= code.modifier_bit();
        } else {
            self.keycode = code as u8;
        }
    }

    fn release(&mut self, code: KeyCode) {
        if code.is_modifier() {
            self.modifier &= !code.modifier_bit();
        } else if self.keycode == code as u8 {
            self.keycode = 0;
        }
    }
}

/// Calls `emit` with the keys a macro holds after each change, one call per report to send.
pub fn play(steps: &[MacroStep], mut emit: impl FnMut(MacroKeys)) {
    let mut keys = MacroKeys::default();
    for step in steps {
        match *step {
            MacroStep::Down(code) => {
                keys.press(code);
                emit(keys);
            }
            MacroStep::Up(code) => {
                keys.release(code);
                emit(keys);
            }
            MacroStep::Tap(code) => {
                keys.press(code);
                emit(keys);
                keys.release(code);
                emit(keys);
            }
        }
    }
}
