pub const NUM_DIGITS: usize = 4;
pub const MAX_BRIGHTNESS: u8 = 7; // 3 bits
pub const MAX_VALUE: i32 = 9999;
pub const MIN_VALUE: i32 = -999;
pub const DEFAULT_BRIGHTNESS: u8 = 1;
pub const DEFAULT_ACK_TIMEOUT_US: u32 = 100;

//     A
//    ---
// F |   | B
//    -G-
// E |   | C
//    ---
//     D
pub const DIGITS: [u8; 16] = [
    // XGFEDCBA
    0b00111111, // 0
    0b00000110, // 1
    0b01011011, // 2
    0b01001111, // 3
    0b01100110, // 4
    0b01101101, // 5
    0b01111101, // 6
    0b00000111, // 7
    0b01111111, // 8
    0b01101111, // 9
    0b01110111, // A
    0b01111100, // b
    0b00111001, // C
    0b01011110, // d
    0b01111001, // E
    0b01110001, // F
];

/// Segment pattern for a 4-bit digit value (0-9, A-F). Only the low nibble is used.
pub const fn digit_to_pattern(nibble: u8) -> u8 {
    DIGITS[(nibble & 0x0F) as usize]
}

/// Named segment patterns, combinable with `|`. `DOTS` only lights anything on the
/// second digit from the left, where the controller wires the colon.
pub mod symbols {
    pub const D0: u8 = 0b00111111;
    pub const D1: u8 = 0b00000110;
    pub const D2: u8 = 0b01011011;
    pub const D3: u8 = 0b01001111;
    pub const D4: u8 = 0b01100110;
    pub const D5: u8 = 0b01101101;
    pub const D6: u8 = 0b01111101;
    pub const D7: u8 = 0b00000111;
    pub const D8: u8 = 0b01111111;
    pub const D9: u8 = 0b01101111;
    pub const A: u8 = 0b01110111;
    pub const B_LOWER: u8 = 0b01111100;
    pub const C: u8 = 0b00111001;
    pub const D_LOWER: u8 = 0b01011110;
    pub const E: u8 = 0b01111001;
    pub const F: u8 = 0b01110001;
    pub const H: u8 = 0b01110110;
    pub const H_LOWER: u8 = 0b01110100;
    pub const I: u8 = 0b00110000;
    pub const L: u8 = 0b00111000;
    pub const O_LOWER: u8 = 0b01011100;
    pub const P: u8 = 0b01110011;
    pub const Q_LOWER: u8 = 0b01100111;
    pub const R_LOWER: u8 = 0b00110001;
    pub const U: u8 = 0b00111110;
    pub const Y_LOWER: u8 = 0b01101110;
    pub const MINUS: u8 = 0b01000000;
    pub const UNDER: u8 = 0b00001000;
    pub const ABOVE: u8 = 0b00000001;
    pub const DEGREE: u8 = 0b01100011;
    pub const DOTS: u8 = 0b10000000; // 2nd digit only
    pub const CLEAR: u8 = 0b00000000;
}

#[allow(dead_code)]
pub mod command {
    // command set selector, bits 7:6
    pub const DATA: u8 = 0b01 << 6;
    pub const DISPLAY: u8 = 0b10 << 6;
    pub const ADDRESS: u8 = 0b11 << 6;

    pub mod data {
        pub const READ_KEYS: u8 = 1 << 1; // bit 1: read key scan data instead of writing
        pub const FIXED_ADDRESS: u8 = 1 << 2; // bit 2: disable address auto increment
    }

    pub mod display {
        pub const BRIGHTNESS_MASK: u8 = 0x07; // bits 2:0: pulse width
        pub const ON_BIT: u8 = 3; // bit 3: display switch
    }

    pub mod address {
        pub const MASK: u8 = 0x03; // bits 1:0 on a four digit display
    }

    /// Data-write command, auto increment mode.
    pub const fn data_write() -> u8 {
        DATA
    }

    pub const fn display_control(brightness: u8, on: bool) -> u8 {
        DISPLAY | (brightness & display::BRIGHTNESS_MASK) | (on as u8) << display::ON_BIT
    }

    pub const fn address_set(digit: u8) -> u8 {
        ADDRESS | (digit & address::MASK)
    }
}

// microseconds, minimum edge spacing the controller samples on
pub mod timing {
    pub const START_US: u32 = 2;
    pub const STOP_US: u32 = 2;
    pub const BIT_US: u32 = 3;
    pub const ACK_SETUP_US: u32 = 5;
    pub const ACK_CLOCK_US: u32 = 2;
    pub const ACK_POLL_US: u32 = 1;
}
