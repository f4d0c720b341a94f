//! Rotary encoder: quadrature decoding, and what a detent does depending on held modifiers.
//!
//! Volume is normally controlled through an external DAC, so plain rotation scrolls instead.
//! The media layer still has volume on F1 to F3.
//!
//! * ALT: fast scrolling (the host does this with the modifier, so it is passed through)
//! * SHIFT: horizontal scrolling
//! * CTRL: volume

use crate::config::{ENCODER_FLIP, ENCODER_RESOLUTION};
use crate::keycode::{ConsumerCode, MOD_MASK_CTRL, MOD_MASK_SHIFT};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

/// Pulse per transition from (previous AB << 2 | current AB); invalid transitions count 0.
const ENCODER_LUT: [i8; 16] = [0, -1, 1, 0, 1, 0, 0, -1, -1, 0, 0, 1, 0, 1, -1, 0];

pub struct Decoder {
    state: u8,
    pulses: i8,
}

impl Decoder {
    pub fn new(a: bool, b: bool) -> Self {
        Decoder {
            state: reading(a, b),
            pulses: 0,
        }
    }

    /// Feed the current pin levels; returns a direction once a full detent has been turned.
    pub fn update(&mut self, a: bool, b: bool) -> Option<Direction> {
        self.state = ((self.state << 2) | reading(a, b)) & 0x0f;
        self.pulses += ENCODER_LUT[self.state as usize];

        let direction = if self.pulses >= ENCODER_RESOLUTION {
            Direction::CounterClockwise
        } else if self.pulses <= -ENCODER_RESOLUTION {
            Direction::Clockwise
        } else {
            return None;
        };
        self.pulses %= ENCODER_RESOLUTION;

        if ENCODER_FLIP {
            Some(match direction {
                Direction::Clockwise => Direction::CounterClockwise,
                Direction::CounterClockwise => Direction::Clockwise,
            })
        } else {
            Some(direction)
        }
    }
}

const fn reading(a: bool, b: bool) -> u8 {
    (a as u8) | ((b as u8) << 1)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncoderOutput {
    /// Tap a consumer usage
    Consumer(ConsumerCode),
    /// One wheel notch; positive is up and right
    Wheel { vertical: i8, horizontal: i8 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncoderAction {
    pub output: EncoderOutput,
    /// Modifiers to have down while the output is sent
    pub modifiers: u8,
}

/// Decide what one detent does, given the modifiers currently held.
pub fn encoder_action(modifiers: u8, direction: Direction) -> EncoderAction {
    let clockwise = direction == Direction::Clockwise;
    // clockwise is right, and down on a wheel that counts positive upwards
    let notch: i8 = if clockwise { 1 } else { -1 };
    if modifiers & MOD_MASK_CTRL != 0 {
        let volume = if clockwise { ConsumerCode::VolumeUp } else { ConsumerCode::VolumeDown };
        EncoderAction {
            output: EncoderOutput::Consumer(volume),
            modifiers: modifiers & !MOD_MASK_CTRL,
        }
    } else if modifiers & MOD_MASK_SHIFT != 0 {
        EncoderAction {
            output: EncoderOutput::Wheel { vertical: 0, horizontal: notch },
            modifiers: modifiers & !MOD_MASK_SHIFT,
        }
    } else {
        EncoderAction {
            output: EncoderOutput::Wheel { vertical: -notch, horizontal: 0 },
            modifiers,
        }
    }
}
