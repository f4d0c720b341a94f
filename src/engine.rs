//! Turns the set of pressed switches into a queue of [Update]s for the host: debouncing, the
//! layer stack, tap/hold keys, custom keycodes and the encoder. Knows nothing about pins or USB;
//! [crate::scan] feeds it and the USB task consumes what it produces.

use crate::config::{DEBOUNCE_SCANS, HELD_KEYS_LIMIT, TAPPING_TERM_MS, UPDATE_QUEUE_LEN};
use crate::encoder::{encoder_action, Direction, EncoderOutput};
use crate::keycode::{KeyCode, MOD_MASK_GUI, MOD_MASK_SHIFT};
use crate::keymap::{LayerIndex, Thing, LAYERS};
use crate::macros::{self, MacroStep};
use heapless::{Deque, Vec};

/// Used to uniquely identify each physical key which can be pressed.
pub type ScanCode = (u8, u8);

/// Contents of a boot keyboard report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyReport {
    pub modifier: u8,
    pub keycodes: [u8; 6],
}

impl KeyReport {
    /// Adds a keycode to the first free slot. Past six keys, further ones are dropped.
    fn add_key(&mut self, keycode: u8) {
        if self.keycodes.contains(&keycode) {
            return;
        }
        if let Some(slot) = self.keycodes.iter_mut().find(|slot| **slot == 0) {
            *slot = keycode;
        }
    }
}

/// Something to send to the host, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Update {
    Keyboard(KeyReport),
    /// Consumer usage now down, or 0 for none
    Consumer(u16),
    /// One wheel notch, to be followed by an idle mouse report
    Wheel { vertical: i8, horizontal: i8 },
    /// Reboot into the ROM's USB bootloader
    Bootloader,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Decision {
    /// Could still turn out to be a tap
    #[default]
    Pending,
    Hold,
}

pub struct Engine {
    held_keys: HeldKeys,
    updates: Deque<Update, UPDATE_QUEUE_LEN>,
    last_report: KeyReport,
    last_consumer: u16,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub const fn new() -> Self {
        Engine {
            held_keys: HeldKeys::new(),
            updates: Deque::new(),
            last_report: KeyReport { modifier: 0, keycodes: [0; 6] },
            last_consumer: 0,
        }
    }

    /// Process one pass over the matrix. `now` is a millisecond timestamp, `pressed` the
    /// switches that read as closed in this pass.
    pub fn scan(&mut self, now: u32, pressed: &[ScanCode]) {
        // keys seen in this pass must not count down before they are refreshed
        for &code in pressed {
            self.held_keys.refresh(code, now);
        }
        for hold in self.held_keys.decrement_holds() {
            self.release(hold);
        }
        self.held_keys.settle_expired();

        for &code in pressed {
            if !self.held_keys.is_held(code) {
                self.press(code, now);
            }
        }

        let report = self.report();
        if report != self.last_report {
            self.push_report(report);
        }
        let consumer = self.consumer();
        if consumer != self.last_consumer {
            self.push_consumer(consumer);
        }
    }

    /// Handle one encoder detent.
    pub fn rotate(&mut self, direction: Direction) {
        let current = self.report();
        let action = encoder_action(current.modifier, direction);
        let masked = action.modifiers != current.modifier;

        if masked {
            self.push_report(KeyReport { modifier: action.modifiers, ..current });
        }
        match action.output {
            EncoderOutput::Consumer(code) => {
                self.push(Update::Consumer(code as u16));
                self.push(Update::Consumer(self.last_consumer));
            }
            EncoderOutput::Wheel { vertical, horizontal } => {
                self.push(Update::Wheel { vertical, horizontal });
            }
        }
        if masked {
            self.push_report(current);
        }
    }

    pub fn next_update(&mut self) -> Option<Update> {
        self.updates.pop_front()
    }

    /// The topmost layer in effect, for indication
    pub fn highest_layer(&self) -> LayerIndex {
        let active = self.held_keys.active_layers();
        (u8::BITS - 1 - active.leading_zeros()) as LayerIndex
    }

    fn press(&mut self, code: ScanCode, now: u32) {
        if self.held_keys.is_full() {
            warn!("too many keys held, ignoring ({}, {})", code.0, code.1);
            return;
        }
        // a tap/hold key with another key pressed during it is a hold
        self.held_keys.hold_pending();

        let mapping = match self.resolve(code) {
            Thing::GraveEscape => {
                let shifted = self.report().modifier & (MOD_MASK_SHIFT | MOD_MASK_GUI) != 0;
                let key = if shifted { KeyCode::Grave } else { KeyCode::Escape };
                Thing::RealKey((key as u8, 0))
            }
            Thing::Snip => {
                self.play_macro(macros::SNIP);
                Thing::Snip
            }
            Thing::Bootloader => {
                info!("bootloader requested");
                self.push(Update::Bootloader);
                Thing::Bootloader
            }
            thing => thing,
        };
        debug!("press ({}, {})", code.0, code.1);

        self.held_keys.insert(KeyHold {
            debounce_count: DEBOUNCE_SCANS,
            in_scancode: code,
            mapping,
            pressed_at: now,
            last_seen: now,
            seen: false,
            decision: Decision::Pending,
        });
    }

    fn release(&mut self, hold: KeyHold) {
        debug!("release ({}, {})", hold.in_scancode.0, hold.in_scancode.1);
        if hold.decision != Decision::Pending {
            return;
        }
        match hold.mapping {
            Thing::LayerTap(_, keycode) => self.tap(keycode),
            Thing::ShiftEnter => self.tap(KeyCode::Enter as u8),
            _ => {}
        }
    }

    /// The mapping of a switch on the highest active layer that is not transparent there.
    fn resolve(&self, (row, column): ScanCode) -> Thing {
        let active = self.held_keys.active_layers();
        for (index, layer) in LAYERS.iter().enumerate().rev() {
            if active & (1 << index) == 0 {
                continue;
            }
            match layer.get(row as usize).and_then(|r| r.get(column as usize)) {
                Some(Thing::Transparent) => continue,
                Some(thing) => return *thing,
                None => return Thing::Inactive,
            }
        }
        Thing::Inactive
    }

    /// What the held keys add up to
    fn report(&self) -> KeyReport {
        let mut report = KeyReport::default();
        for thing in self.held_keys.iter_pressed_things() {
            match *thing {
                Thing::RealKey((keycode, mods)) => {
                    report.modifier |= mods;
                    if keycode != 0 {
                        report.add_key(keycode);
                    }
                }
                Thing::ShiftEnter => {
                    report.modifier |= KeyCode::RShift.modifier_bit();
                }
                _ => {}
            }
        }
        report
    }

    fn consumer(&self) -> u16 {
        self.held_keys
            .iter_pressed_things()
            .find_map(|thing| match thing {
                Thing::MediaKey(code) => Some(*code as u16),
                _ => None,
            })
            .unwrap_or(0)
    }

    fn tap(&mut self, keycode: u8) {
        let base = self.report();
        let mut pressed = base;
        pressed.add_key(keycode);
        self.push_report(pressed);
        self.push_report(base);
    }

    fn play_macro(&mut self, steps: &[MacroStep]) {
        let base = self.report();
        macros::play(steps, |keys| {
            let mut report = base;
            report.modifier |= keys.modifier;
            if keys.keycode != 0 {
                report.add_key(keys.keycode);
            }
            self.push_report(report);
        });
    }

    fn push_report(&mut self, report: KeyReport) {
        self.last_report = report;
        self.push(Update::Keyboard(report));
    }

    fn push_consumer(&mut self, usage: u16) {
        self.last_consumer = usage;
        self.push(Update::Consumer(usage));
    }

    fn push(&mut self, update: Update) {
        if self.updates.push_back(update).is_err() {
            warn!("update queue full, dropping update");
        }
    }
}

/// An array for tracking the currently-held keys.
/// Invariant: Always consists of active [KeyHold]s in order of when they were pressed, followed by
/// only inactive [KeyHold]s (those whose [KeyHold::debounce_count] has reached 0).
struct HeldKeys([KeyHold; HELD_KEYS_LIMIT]);

#[derive(Clone, Copy)]
struct KeyHold {
    debounce_count: u8,
    in_scancode: ScanCode,
    /// Resolved at press time, so releasing a layer key cannot strand this one
    mapping: Thing,
    pressed_at: u32,
    /// Timestamp of the last pass that read this switch closed
    last_seen: u32,
    /// Refreshed in the current pass, so not counted down in it
    seen: bool,
    decision: Decision,
}

impl KeyHold {
    const INACTIVE: KeyHold = KeyHold {
        debounce_count: 0,
        in_scancode: (0, 0),
        mapping: Thing::Inactive,
        pressed_at: 0,
        last_seen: 0,
        seen: false,
        decision: Decision::Pending,
    };

    fn is_tap_hold(&self) -> bool {
        matches!(self.mapping, Thing::LayerTap(..) | Thing::ShiftEnter)
    }
}

impl HeldKeys {
    const fn new() -> Self {
        HeldKeys([KeyHold::INACTIVE; HELD_KEYS_LIMIT])
    }

    /// Restarts the debounce countdown of a key already held.
    fn refresh(&mut self, code: ScanCode, now: u32) {
        for key in self.0.iter_mut().take_while(|key| key.debounce_count > 0) {
            if key.in_scancode == code {
                key.debounce_count = DEBOUNCE_SCANS;
                key.last_seen = now;
                key.seen = true;
                return;
            }
        }
    }

    fn is_held(&self, code: ScanCode) -> bool {
        self.iter_pressed().any(|key| key.in_scancode == code)
    }

    fn insert(&mut self, hold: KeyHold) {
        if let Some(slot) = self.0.iter_mut().find(|key| key.debounce_count == 0) {
            *slot = hold;
        }
    }

    fn is_full(&self) -> bool {
        self.0[HELD_KEYS_LIMIT - 1].debounce_count > 0
    }

    fn iter_pressed(&self) -> impl Iterator<Item = &KeyHold> {
        self.0.iter().take_while(|key_hold| key_hold.debounce_count > 0)
    }

    fn iter_pressed_things(&self) -> impl Iterator<Item = &Thing> {
        self.iter_pressed().map(|key_hold| &key_hold.mapping)
    }

    fn is_all_released(&self) -> bool {
        self.0[0].debounce_count == 0
    }

    /// Bitmask of layers in effect; the default layer always is.
    fn active_layers(&self) -> u8 {
        self.iter_pressed().fold(1, |active, key| match (key.mapping, key.decision) {
            (Thing::Momentary(layer), _) => active | 1 << layer,
            (Thing::LayerTap(layer, _), Decision::Hold) => active | 1 << layer,
            _ => active,
        })
    }

    fn hold_pending(&mut self) {
        for key in self.0.iter_mut().take_while(|key| key.debounce_count > 0) {
            if key.is_tap_hold() {
                key.decision = Decision::Hold;
            }
        }
    }

    /// Tap/hold keys physically held past the tapping term become holds. Measured up to the
    /// last pass that saw them, not the debounced release.
    fn settle_expired(&mut self) {
        for key in self.0.iter_mut().take_while(|key| key.debounce_count > 0) {
            let held_for = key.last_seen.wrapping_sub(key.pressed_at);
            if key.is_tap_hold() && held_for >= TAPPING_TERM_MS {
                key.decision = Decision::Hold;
            }
        }
    }

    /// Counts down every held key not seen in this pass, returning those that reached zero (were
    /// released) in press order.
    fn decrement_holds(&mut self) -> Vec<KeyHold, HELD_KEYS_LIMIT> {
        let mut released = Vec::new();
        'each_position: for key_idx in 0..HELD_KEYS_LIMIT {
            'each_rotation: loop {
                let key = &mut self.0[key_idx];
                if key.debounce_count > 0 {
                    if key.seen {
                        key.seen = false;
                        continue 'each_position;
                    }
                    key.debounce_count -= 1;
                    if key.debounce_count == 0 {
                        // can't overflow, there are only HELD_KEYS_LIMIT holds to release
                        let _ = released.push(*key);
                        self.0[key_idx..].rotate_left(1);
                            // move to end of array to preserve invariant.
                            // now next key has taken its place at current index, so look again:
                        continue 'each_rotation;
                    } else {
                        continue 'each_position;
                    }
                } else {
                    break 'each_position;
                }
            }
        }
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keycode::ConsumerCode;
    use crate::keycode::KeyCode::*;
    use std::vec::Vec;

    const ESC: ScanCode = (0, 0);
    const F1: ScanCode = (0, 1);
    const HOME: ScanCode = (0, 13);
    const KNOB: ScanCode = (0, 14);
    const W: ScanCode = (2, 2);
    const BACKSLASH: ScanCode = (2, 13);
    const CAPS: ScanCode = (3, 0);
    const A: ScanCode = (3, 1);
    const LSHIFT: ScanCode = (4, 0);
    const RSHIFT: ScanCode = (4, 12);
    const LCTRL: ScanCode = (5, 0);
    const FN: ScanCode = (5, 10);

    const NOTHING: [Update; 0] = [];

    struct Rig {
        engine: Engine,
        now: u32,
    }

    impl Rig {
        fn new() -> Self {
            Rig { engine: Engine::new(), now: 0 }
        }

        fn scan(&mut self, pressed: &[ScanCode]) -> Vec<Update> {
            self.now += 1;
            self.engine.scan(self.now, pressed);
            self.drain()
        }

        /// Scans with `pressed` held until everything else has debounced out.
        fn release_to(&mut self, pressed: &[ScanCode]) -> Vec<Update> {
            (0..DEBOUNCE_SCANS).flat_map(|_| self.scan(pressed)).collect()
        }

        fn drain(&mut self) -> Vec<Update> {
            core::iter::from_fn(|| self.engine.next_update()).collect()
        }
    }

    fn keys(modifier: u8, codes: &[KeyCode]) -> Update {
        let mut report = KeyReport { modifier, ..Default::default() };
        for (slot, code) in report.keycodes.iter_mut().zip(codes) {
            *slot = *code as u8;
        }
        Update::Keyboard(report)
    }

    #[test]
    fn plain_key_is_reported_until_debounced_out() {
        let mut rig = Rig::new();
        assert_eq!(rig.scan(&[A]), [keys(0, &[KeyCode::A])]);
        assert_eq!(rig.scan(&[A]), NOTHING);
        assert_eq!(rig.release_to(&[]), [keys(0, &[])]);
        assert!(rig.engine.held_keys.is_all_released());
    }

    #[test]
    fn chatter_shorter_than_the_debounce_is_ignored() {
        let mut rig = Rig::new();
        assert_eq!(rig.scan(&[A]), [keys(0, &[KeyCode::A])]);
        assert_eq!(rig.scan(&[]), NOTHING);
        assert_eq!(rig.scan(&[]), NOTHING);
        assert_eq!(rig.scan(&[A]), NOTHING);
    }

    #[test]
    fn caps_bouncing_just_under_the_debounce_stays_held() {
        let mut rig = Rig::new();
        assert_eq!(rig.scan(&[CAPS]), NOTHING);
        for _ in 1..DEBOUNCE_SCANS {
            assert_eq!(rig.scan(&[]), NOTHING);
        }
        assert_eq!(rig.scan(&[CAPS]), NOTHING);
        assert!(!rig.engine.held_keys.is_all_released());
    }

    #[test]
    fn key_is_released_after_exactly_the_debounce() {
        let mut rig = Rig::new();
        rig.scan(&[A]);
        for _ in 1..DEBOUNCE_SCANS {
            assert_eq!(rig.scan(&[]), NOTHING);
        }
        assert_eq!(rig.scan(&[]), [keys(0, &[])]);
    }

    #[test]
    fn only_six_keys_are_reported() {
        let mut rig = Rig::new();
        let row: Vec<ScanCode> = (1..=8).map(|column| (3, column)).collect();
        assert_eq!(rig.scan(&row), [keys(0, &[KeyCode::A, S, D, F, G, H])]);
    }

    #[test]
    fn modifiers_go_in_the_modifier_byte() {
        let mut rig = Rig::new();
        assert_eq!(rig.scan(&[LCTRL, A]), [keys(0x01, &[KeyCode::A])]);
    }

    #[test]
    fn fn_selects_the_media_layer() {
        let mut rig = Rig::new();
        assert_eq!(rig.scan(&[FN]), NOTHING);
        assert_eq!(rig.engine.highest_layer(), 1);
        assert_eq!(rig.scan(&[FN, HOME]), [keys(0, &[End])]);
    }

    #[test]
    fn transparent_keys_fall_through_to_the_default_layer() {
        let mut rig = Rig::new();
        rig.scan(&[FN]);
        assert_eq!(rig.scan(&[FN, W]), [keys(0, &[KeyCode::W])]);
    }

    #[test]
    fn keys_keep_their_layer_until_released() {
        let mut rig = Rig::new();
        rig.scan(&[FN]);
        assert_eq!(rig.scan(&[FN, HOME]), [keys(0, &[End])]);
        assert_eq!(rig.release_to(&[HOME]), NOTHING);
        assert_eq!(rig.engine.highest_layer(), 0);
        assert_eq!(rig.release_to(&[]), [keys(0, &[])]);
    }

    #[test]
    fn media_keys_go_out_as_consumer_usages() {
        let mut rig = Rig::new();
        rig.scan(&[FN]);
        assert_eq!(rig.scan(&[FN, F1]), [Update::Consumer(ConsumerCode::Mute as u16)]);
        assert_eq!(rig.release_to(&[]), [Update::Consumer(0)]);
        assert_eq!(rig.scan(&[KNOB]), [Update::Consumer(ConsumerCode::Mute as u16)]);
    }

    #[test]
    fn tapping_caps_lock_taps_caps_lock() {
        let mut rig = Rig::new();
        assert_eq!(rig.scan(&[CAPS]), NOTHING);
        assert_eq!(rig.release_to(&[]), [keys(0, &[CapsLock]), keys(0, &[])]);
    }

    #[test]
    fn caps_with_another_key_is_the_ergonomic_layer() {
        let mut rig = Rig::new();
        rig.scan(&[CAPS]);
        assert_eq!(rig.scan(&[CAPS, W]), [keys(0, &[KeyCode::Up])]);
        assert_eq!(rig.engine.highest_layer(), 2);
        assert_eq!(rig.release_to(&[]), [keys(0, &[])]);
    }

    #[test]
    fn caps_held_past_the_tapping_term_is_a_hold() {
        let mut rig = Rig::new();
        rig.scan(&[CAPS]);
        rig.now += TAPPING_TERM_MS;
        assert_eq!(rig.scan(&[CAPS]), NOTHING);
        assert_eq!(rig.engine.highest_layer(), 2);
        assert_eq!(rig.release_to(&[]), NOTHING);
    }

    #[test]
    fn caps_released_just_inside_the_tapping_term_taps() {
        let mut rig = Rig::new();
        rig.scan(&[CAPS]);
        rig.now += TAPPING_TERM_MS - 10;
        assert_eq!(rig.scan(&[CAPS]), NOTHING);
        // the debounced release lands past the term, the physical one did not
        rig.now += 20;
        assert_eq!(rig.release_to(&[]), [keys(0, &[CapsLock]), keys(0, &[])]);
    }

    #[test]
    fn right_shift_held_past_the_tapping_term_is_only_shift() {
        let mut rig = Rig::new();
        assert_eq!(rig.scan(&[RSHIFT]), [keys(0x20, &[])]);
        rig.now += TAPPING_TERM_MS;
        assert_eq!(rig.scan(&[RSHIFT]), NOTHING);
        assert_eq!(rig.release_to(&[]), [keys(0, &[])]);
    }

    #[test]
    fn tapping_right_shift_sends_enter() {
        let mut rig = Rig::new();
        assert_eq!(rig.scan(&[RSHIFT]), [keys(0x20, &[])]);
        assert_eq!(rig.release_to(&[]), [keys(0, &[Enter]), keys(0, &[])]);
    }

    #[test]
    fn right_shift_with_another_key_is_only_shift() {
        let mut rig = Rig::new();
        rig.scan(&[RSHIFT]);
        assert_eq!(rig.scan(&[RSHIFT, A]), [keys(0x20, &[KeyCode::A])]);
        assert_eq!(rig.release_to(&[]), [keys(0, &[])]);
    }

    #[test]
    fn escape_is_grave_under_shift() {
        let mut rig = Rig::new();
        assert_eq!(rig.scan(&[ESC]), [keys(0, &[Escape])]);
        rig.release_to(&[]);
        assert_eq!(rig.scan(&[LSHIFT]), [keys(0x02, &[])]);
        assert_eq!(rig.scan(&[LSHIFT, ESC]), [keys(0x02, &[Grave])]);
    }

    #[test]
    fn snip_sends_win_shift_s_once() {
        let mut rig = Rig::new();
        rig.scan(&[FN]);
        assert_eq!(
            rig.scan(&[FN, ESC]),
            [
                keys(0x08, &[]),
                keys(0x0a, &[]),
                keys(0x0a, &[KeyCode::S]),
                keys(0x0a, &[]),
                keys(0x08, &[]),
                keys(0x00, &[]),
            ]
        );
        assert_eq!(rig.scan(&[FN, ESC]), NOTHING);
        assert_eq!(rig.release_to(&[]), NOTHING);
    }

    #[test]
    fn snip_keeps_modifiers_already_held() {
        let mut rig = Rig::new();
        rig.scan(&[LSHIFT, FN]);
        assert_eq!(
            rig.scan(&[LSHIFT, FN, ESC]),
            [
                keys(0x0a, &[]),
                keys(0x0a, &[]),
                keys(0x0a, &[KeyCode::S]),
                keys(0x0a, &[]),
                keys(0x0a, &[]),
                keys(0x02, &[]),
            ]
        );
    }

    #[test]
    fn snip_does_not_repeat_across_a_bounce() {
        let mut rig = Rig::new();
        rig.scan(&[FN]);
        assert_eq!(rig.scan(&[FN, ESC]).len(), 6);
        for _ in 1..DEBOUNCE_SCANS {
            assert_eq!(rig.scan(&[FN]), NOTHING);
        }
        assert_eq!(rig.scan(&[FN, ESC]), NOTHING);
    }

    #[test]
    fn fn_backslash_requests_the_bootloader() {
        let mut rig = Rig::new();
        rig.scan(&[FN]);
        assert_eq!(rig.scan(&[FN, BACKSLASH]), [Update::Bootloader]);
        assert_eq!(rig.scan(&[FN, BACKSLASH]), NOTHING);
    }

    #[test]
    fn plain_rotation_scrolls() {
        let mut rig = Rig::new();
        rig.engine.rotate(Direction::Clockwise);
        rig.engine.rotate(Direction::CounterClockwise);
        assert_eq!(
            rig.drain(),
            [
                Update::Wheel { vertical: -1, horizontal: 0 },
                Update::Wheel { vertical: 1, horizontal: 0 },
            ]
        );
    }

    #[test]
    fn ctrl_rotation_taps_volume_without_ctrl() {
        let mut rig = Rig::new();
        assert_eq!(rig.scan(&[LCTRL]), [keys(0x01, &[])]);
        rig.engine.rotate(Direction::Clockwise);
        assert_eq!(
            rig.drain(),
            [
                keys(0x00, &[]),
                Update::Consumer(ConsumerCode::VolumeUp as u16),
                Update::Consumer(0),
                keys(0x01, &[]),
            ]
        );
        assert_eq!(rig.scan(&[LCTRL]), NOTHING);
    }

    #[test]
    fn shift_rotation_scrolls_sideways_without_shift() {
        let mut rig = Rig::new();
        rig.scan(&[LSHIFT, A]);
        rig.engine.rotate(Direction::CounterClockwise);
        assert_eq!(
            rig.drain(),
            [
                keys(0x00, &[KeyCode::A]),
                Update::Wheel { vertical: 0, horizontal: -1 },
                keys(0x02, &[KeyCode::A]),
            ]
        );
    }

    #[test]
    fn ctrl_rotation_restores_a_held_media_key() {
        let mut rig = Rig::new();
        rig.scan(&[LCTRL, FN]);
        assert_eq!(
            rig.scan(&[LCTRL, FN, F1]),
            [Update::Consumer(ConsumerCode::Mute as u16)]
        );
        rig.engine.rotate(Direction::CounterClockwise);
        assert_eq!(
            rig.drain(),
            [
                keys(0x00, &[]),
                Update::Consumer(ConsumerCode::VolumeDown as u16),
                Update::Consumer(ConsumerCode::Mute as u16),
                keys(0x01, &[]),
            ]
        );
    }

    #[test]
    fn updates_past_the_queue_length_are_dropped() {
        let mut rig = Rig::new();
        for _ in 0..UPDATE_QUEUE_LEN + 5 {
            rig.engine.rotate(Direction::Clockwise);
        }
        let updates = rig.drain();
        assert_eq!(updates.len(), UPDATE_QUEUE_LEN);
        let notch = Update::Wheel { vertical: -1, horizontal: 0 };
        assert!(updates.iter().all(|update| *update == notch));
        assert_eq!(rig.engine.next_update(), None);
    }

    #[test]
    fn keys_past_the_hold_limit_are_ignored() {
        let mut rig = Rig::new();
        let many: Vec<ScanCode> = (0..HELD_KEYS_LIMIT as u8 + 2)
            .map(|column| (1, column % 15))
            .chain([(2, 1), (2, 3)])
            .collect();
        rig.scan(&many);
        assert!(rig.engine.held_keys.is_full());
        rig.release_to(&[]);
        assert!(rig.engine.held_keys.is_all_released());
    }
}
