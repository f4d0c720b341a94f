//! Implements the key matrix and encoder pins: scans for closed switches and encoder detents,
//! hands them to [crate::engine], and shows the active layer on the status LED.

use crate::config::{
    LED_DUTY_DEFAULT, LED_DUTY_ERGONOMIC, LED_DUTY_MEDIA, SCAN_LED_DUTY_IDLE, SCAN_LED_DUTY_PRESSED,
};
use crate::encoder::Decoder;
use crate::engine::{Engine, ScanCode, Update};
use crate::keymap::{COLUMNS, LAYER_ERGONOMIC, LAYER_MEDIA, ROWS};
use embassy_rp::{
    gpio::{Input, OutputOpenDrain},
    pwm::{Pwm, SetDutyCycle},
};
use embassy_time::{
    block_for,
    Duration,
    Instant,
};
use heapless::Vec;

pub struct Matrix<'a> {
    engine: Engine,
    decoder: Decoder,
    pins: Pins<'a>,
}

pub struct Pins<'a> {
    pub scan_led: Pwm<'a>,
    pub status_led: Pwm<'a>,
    pub rows: [OutputOpenDrain<'a>; ROWS],
    pub columns: [Input<'a>; COLUMNS],
    pub encoder_a: Input<'a>,
    pub encoder_b: Input<'a>,
}

trait ConvenientPwm {
    fn off(&mut self);
    fn pwm_duty_u16(&mut self, duty: u16);
}
impl ConvenientPwm for Pwm<'_> {
    fn off(&mut self) {
        if self.set_duty_cycle_fully_off().is_err() {
            warn!("pwm off failed");
        }
    }
    fn pwm_duty_u16(&mut self, duty: u16) {
        if self.set_duty_cycle(duty).is_err() {
            warn!("pwm duty {} failed", duty);
        }
    }
}

impl<'a> Matrix<'a> {
    pub fn new(pins: Pins<'a>) -> Self {
        let decoder = Decoder::new(pins.encoder_a.is_low(), pins.encoder_b.is_low());
        Matrix {
            engine: Engine::new(),
            decoder,
            pins,
        }
    }

    fn show_layer(&mut self) {
        let duty = match self.engine.highest_layer() {
            LAYER_MEDIA => LED_DUTY_MEDIA,
            LAYER_ERGONOMIC => LED_DUTY_ERGONOMIC,
            _ => LED_DUTY_DEFAULT,
        };
        if duty == 0 {
            self.pins.status_led.off()
        } else {
            self.pins.status_led.pwm_duty_u16(duty)
        }
    }

    /// Polls the encoder, which is wired active-low like the switches.
    fn poll_encoder(&mut self) {
        let a = self.pins.encoder_a.is_low();
        let b = self.pins.encoder_b.is_low();
        if let Some(direction) = self.decoder.update(a, b) {
            self.engine.rotate(direction);
        }
    }

    /// One pass over the matrix. Follow with [Matrix::next_update] until it runs dry.
    pub fn scan(&mut self) {
        let mut pressed: Vec<ScanCode, { ROWS * COLUMNS }> = Vec::new();

        self.pins.scan_led.pwm_duty_u16(SCAN_LED_DUTY_IDLE);
        for row_idx in 0..ROWS {
            self.pins.rows[row_idx].set_low();
            block_for(Duration::from_micros(100));
            for (column_idx, column) in self.pins.columns.iter().enumerate() {
                if column.is_low() {
                    // cannot overflow: one entry per switch at most
                    let _ = pressed.push((row_idx as u8, column_idx as u8));
                    self.pins.scan_led.pwm_duty_u16(SCAN_LED_DUTY_PRESSED);
                }
            }
            self.pins.rows[row_idx].set_high();
            block_for(Duration::from_micros(100));
            self.poll_encoder();
        }
        self.pins.scan_led.off();

        let now = Instant::now().as_millis() as u32;
        self.engine.scan(now, &pressed);
        self.show_layer();
    }

    pub fn next_update(&mut self) -> Option<Update> {
        self.engine.next_update()
    }
}
