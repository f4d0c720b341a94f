//! Implements the USB device and the task that turns [Update]s into HID reports on three
//! interfaces: boot keyboard, consumer control (media keys) and mouse (wheel only).
//! Mostly lifted from [embassy_usb] examples.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::config::{
    HID_POLL_MS, USB_MANUFACTURER, USB_MAX_POWER, USB_PID, USB_PRODUCT, USB_SERIAL, USB_VID,
};
use crate::engine::{KeyReport, Update};
use crate::UPDATES_CHANNEL;

use embassy_futures::join::join;
use embassy_rp::{
    peripherals::USB,
    usb::{Driver, InterruptHandler},
    bind_interrupts,
};
use embassy_usb::{
    class::hid::{HidReaderWriter, HidWriter, ReportId, RequestHandler, State as HidState},
    control::OutResponse,
    Builder, Handler, UsbDevice,
};
use usbd_hid::descriptor::{KeyboardReport, MediaKeyboardReport, MouseReport, SerializedDescriptor};

use static_cell::StaticCell;

type MyDriver = Driver<'static, USB>;
type MyUsbDevice = UsbDevice<'static, MyDriver>;
type MyHidReaderWriter = HidReaderWriter<'static, MyDriver, 1, 8>;
type MyHidWriter = HidWriter<'static, MyDriver, 8>;

bind_interrupts!(pub(crate) struct Irqs {
    USBCTRL_IRQ => InterruptHandler<USB>;
});

pub struct Interfaces {
    pub keyboard: MyHidReaderWriter,
    pub media: MyHidWriter,
    pub mouse: MyHidWriter,
}

fn hid_config(report_descriptor: &'static [u8]) -> embassy_usb::class::hid::Config<'static> {
    embassy_usb::class::hid::Config {
        report_descriptor,
        request_handler: None,
        poll_ms: HID_POLL_MS,
        max_packet_size: 8,
    }
}

pub fn get_device(driver: MyDriver) -> (MyUsbDevice, Interfaces) {
    let mut config = embassy_usb::Config::new(USB_VID, USB_PID);
    config.manufacturer = Some(USB_MANUFACTURER);
    config.product = Some(USB_PRODUCT);
    config.serial_number = Some(USB_SERIAL);
    config.max_power = USB_MAX_POWER;
    config.max_packet_size_0 = 64;

    static DEVICE_HANDLER: StaticCell<MyDeviceHandler> = StaticCell::new();

    // Create embassy-usb DeviceBuilder using the driver and config.
    static CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
    static BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
    static CONTROL_BUF: StaticCell<[u8; 128]> = StaticCell::new();
    let mut builder = Builder::new(
        driver,
        config,
        &mut CONFIG_DESC.init([0; 256])[..],
        &mut BOS_DESC.init([0; 256])[..],
        &mut [], // no msos descriptors
        &mut CONTROL_BUF.init([0; 128])[..],
    );

    builder.handler(DEVICE_HANDLER.init(MyDeviceHandler::new()));

    static KEYBOARD_STATE: StaticCell<HidState> = StaticCell::new();
    static MEDIA_STATE: StaticCell<HidState> = StaticCell::new();
    static MOUSE_STATE: StaticCell<HidState> = StaticCell::new();

    let keyboard = HidReaderWriter::<_, 1, 8>::new(
        &mut builder,
        KEYBOARD_STATE.init(HidState::new()),
        hid_config(KeyboardReport::desc()),
    );
    let media = HidWriter::<_, 8>::new(
        &mut builder,
        MEDIA_STATE.init(HidState::new()),
        hid_config(MediaKeyboardReport::desc()),
    );
    let mouse = HidWriter::<_, 8>::new(
        &mut builder,
        MOUSE_STATE.init(HidState::new()),
        hid_config(MouseReport::desc()),
    );

    (builder.build(), Interfaces { keyboard, media, mouse })
}

fn keyboard_report(report: KeyReport) -> KeyboardReport {
    KeyboardReport {
        modifier: report.modifier,
        reserved: 0,
        leds: 0,
        keycodes: report.keycodes,
    }
}

fn wheel_report(vertical: i8, horizontal: i8) -> MouseReport {
    MouseReport {
        buttons: 0,
        x: 0,
        y: 0,
        wheel: vertical,
        pan: horizontal,
    }
}

#[embassy_executor::task]
pub async fn run(mut usb: MyUsbDevice, interfaces: Interfaces)
{
    // Run the USB device.
    let usb_fut = usb.run();

    let Interfaces { keyboard, mut media, mut mouse } = interfaces;
    let (reader, mut writer) = keyboard.split();

    let in_fut = async {
        loop {
            match UPDATES_CHANNEL.receive().await {
                Update::Keyboard(report) => {
                    if writer.write_serialize(&keyboard_report(report)).await.is_err() {
                        warn!("failed to send keyboard report");
                    }
                }
                Update::Consumer(usage_id) => {
                    if media.write_serialize(&MediaKeyboardReport { usage_id }).await.is_err() {
                        warn!("failed to send consumer report {=u16:x}", usage_id);
                    }
                }
                Update::Wheel { vertical, horizontal } => {
                    for report in [wheel_report(vertical, horizontal), wheel_report(0, 0)] {
                        if mouse.write_serialize(&report).await.is_err() {
                            warn!("failed to send mouse report");
                        }
                    }
                }
                // handled by the matrix task before it gets here
                Update::Bootloader => {}
            }
        }
    };

    let out_fut = async {
        static REQUEST_HANDLER: StaticCell<MyRequestHandler> = StaticCell::new();
        reader.run(false, REQUEST_HANDLER.init(MyRequestHandler {})).await;
    };

    // Run everything concurrently.
    // If we had made everything `'static` above instead, we could do this using separate tasks
    // instead.
    join(usb_fut, join(in_fut, out_fut)).await;
}

struct MyRequestHandler;

impl RequestHandler for MyRequestHandler {
    fn get_report(&mut self, _id: ReportId, _buf: &mut [u8]) -> Option<usize> {
        None
    }

    fn set_report(&mut self, _id: ReportId, data: &[u8]) -> OutResponse {
        // keyboard LEDs; nothing on the board shows them
        if let Some(leds) = data.first() {
            debug!("host LEDs {=u8:b}", *leds);
        }
        OutResponse::Accepted
    }

    fn set_idle_ms(&mut self, _id: Option<ReportId>, dur: u32) {
        debug!("set idle rate to {} ms", dur);
    }

    fn get_idle_ms(&mut self, _id: Option<ReportId>) -> Option<u32> {
        None
    }
}

struct MyDeviceHandler {
    configured: AtomicBool,
}

impl MyDeviceHandler {
    fn new() -> Self {
        MyDeviceHandler {
            configured: AtomicBool::new(false),
        }
    }
}

impl Handler for MyDeviceHandler {
    fn enabled(&mut self, enabled: bool) {
        self.configured.store(false, Ordering::Relaxed);
        if enabled {
            info!("device enabled");
        } else {
            info!("device disabled");
        }
    }

    fn reset(&mut self) {
        self.configured.store(false, Ordering::Relaxed);
        info!("bus reset, the Vbus current limit is 100mA");
    }

    fn addressed(&mut self, addr: u8) {
        self.configured.store(false, Ordering::Relaxed);
        info!("USB address set to {}", addr);
    }

    fn configured(&mut self, configured: bool) {
        self.configured.store(configured, Ordering::Relaxed);
        if configured {
            info!("device configured, it may now draw up to the configured current limit");
        } else {
            info!("device is no longer configured, the Vbus current limit is 100mA");
        }
    }
}
