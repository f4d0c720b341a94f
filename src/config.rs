//! Compile-time settings for the board.

// USB identity
pub const USB_VID: u16 = 0xfeed;
pub const USB_PID: u16 = 0x5044;
pub const USB_MANUFACTURER: &str = "sajust";
pub const USB_PRODUCT: &str = "Pico 75% Keyboard";
pub const USB_SERIAL: &str = "001";
// mA
pub const USB_MAX_POWER: u16 = 100;
pub const HID_POLL_MS: u8 = 10;

/// Scans a key must go unseen before it counts as released
pub const DEBOUNCE_SCANS: u8 = 5;
/// How many keys can be held at once, including ones still being debounced
pub const HELD_KEYS_LIMIT: usize = 16;
/// Longest press of a tap/hold key that still counts as a tap
pub const TAPPING_TERM_MS: u32 = 200;

/// Quadrature pulses per detent
pub const ENCODER_RESOLUTION: i8 = 4;
/// Swap clockwise and counterclockwise, for encoders wired the other way round
pub const ENCODER_FLIP: bool = false;

/// Updates that can wait in the engine between scans
pub const UPDATE_QUEUE_LEN: usize = 64;

// status LED duty per active layer, standing in for red (media) and cyan (ergonomic) backlighting
pub const LED_DUTY_DEFAULT: u16 = 0;
pub const LED_DUTY_MEDIA: u16 = 3400;
pub const LED_DUTY_ERGONOMIC: u16 = 1400;
// scan LED, idle and while a key is down
pub const SCAN_LED_DUTY_IDLE: u16 = 400;
pub const SCAN_LED_DUTY_PRESSED: u16 = 30000;
