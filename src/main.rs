//! Firmware for a 75% USB keyboard with a rotary encoder, based on the Raspberry Pi Pico, using
//! the [embassy_rp] framework.

#![no_main]
#![no_std]

// must come first so the other modules see its macros
mod fmt;

mod config;
mod encoder;
mod engine;
mod keycode;
mod keymap;
mod macros;
mod scan;
mod usb;

use embassy_executor::Spawner;
use embassy_futures::yield_now;
use embassy_rp::{
    gpio::{Input, OutputOpenDrain, Level, Pull},
    pwm::Pwm,
};
use embassy_sync::channel::Channel;

use defmt_rtt as _;
use panic_reset as _;

macro_rules! row_pins {
    ($dev:ident; $($pin:ident),*) => {[ $(OutputOpenDrain::new($dev.$pin, Level::High)),* ]}
}
macro_rules! column_pins {
    ($dev:ident; $($pin:ident),*) => {[ $(Input::new($dev.$pin, Pull::Up)),* ]}
}

/// Channel for [scan] to send keyboard updates to [usb], and ultimately to the host.
pub(crate) static UPDATES_CHANNEL: Channel<RawMutex, engine::Update, 8> = Channel::new();
type RawMutex = embassy_sync::blocking_mutex::raw::ThreadModeRawMutex;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("{} starting", config::USB_PRODUCT);

    let led_pin_onboard = Pwm::new_output_b(p.PWM_SLICE4, p.PIN_25, Default::default());
    let led_pin_front = Pwm::new_output_a(p.PWM_SLICE3, p.PIN_22, Default::default());

    let row_pins: [OutputOpenDrain; keymap::ROWS] = row_pins!(p;
        PIN_0, PIN_1, PIN_2, PIN_3, PIN_4, PIN_5
    );
    let mut column_pins: [Input; keymap::COLUMNS] = column_pins!(p;
        PIN_6, PIN_7, PIN_8, PIN_9, PIN_10, PIN_11, PIN_12, PIN_13,
        PIN_14, PIN_15, PIN_16, PIN_17, PIN_18, PIN_19, PIN_20
    );
    for pin in &mut column_pins {
        pin.set_schmitt(true);
    }
    let mut encoder_a = Input::new(p.PIN_26, Pull::Up);
    let mut encoder_b = Input::new(p.PIN_27, Pull::Up);
    encoder_a.set_schmitt(true);
    encoder_b.set_schmitt(true);

    let matrix = scan::Matrix::new(scan::Pins {
        scan_led: led_pin_onboard,
        status_led: led_pin_front,
        rows: row_pins,
        columns: column_pins,
        encoder_a,
        encoder_b,
    });
    spawner.spawn(run_matrix(matrix)).expect("spawn matrix");

    let usb_driver = embassy_rp::usb::Driver::new(p.USB, usb::Irqs);
    let (usb_device, interfaces) = usb::get_device(usb_driver);
    spawner.spawn(usb::run(usb_device, interfaces)).expect("spawn usb");
}

#[embassy_executor::task]
async fn run_matrix(mut matrix: scan::Matrix<'static>) {
    loop {
        matrix.scan();
        // scanning only busy-waits; give the USB task its turn even when nothing changed
        yield_now().await;
        while let Some(update) = matrix.next_update() {
            if update == engine::Update::Bootloader {
                info!("rebooting into the USB bootloader");
                #[allow(unused_unsafe)]
                unsafe {
                    embassy_rp::rom_data::reset_to_usb_boot(0, 0);
                }
            }
            UPDATES_CHANNEL.send(update).await;
        }
    }
}
