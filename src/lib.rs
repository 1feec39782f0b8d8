#![no_std]

mod bus;
mod constants;

pub use bus::Bus;
pub use constants::*;
use core::fmt;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use num_traits::ToPrimitive;

/// Initial display settings for a [`TM1637`] instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// 0-7, masked to 3 bits.
    pub brightness: u8,
    pub on: bool,
    /// Upper bound on the wait for each byte acknowledgment.
    pub ack_timeout_us: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            brightness: DEFAULT_BRIGHTNESS,
            on: true,
            ack_timeout_us: DEFAULT_ACK_TIMEOUT_US,
        }
    }
}

pub struct TM1637<CLK, DIO, D> {
    bus: Bus<CLK, DIO, D>,
    brightness: u8,
    on: bool,
}

impl<CLK, DIO, D, E> TM1637<CLK, DIO, D>
where
    CLK: OutputPin<Error = E>,
    DIO: InputPin<Error = E> + OutputPin<Error = E>,
    D: DelayNs,
{
    pub fn new(clk: CLK, dio: DIO, delay: D) -> Self {
        Self::with_config(clk, dio, delay, Config::default())
    }

    pub fn with_config(clk: CLK, dio: DIO, delay: D, config: Config) -> Self {
        Self {
            bus: Bus::with_ack_timeout(clk, dio, delay, config.ack_timeout_us),
            brightness: config.brightness & MAX_BRIGHTNESS,
            on: config.on,
        }
    }

    pub fn destroy(self) -> (CLK, DIO, D) {
        self.bus.destroy()
    }

    /// Idle the lines and push the configured brightness and state to the controller.
    pub fn init(&mut self) -> Result<(), TM1637Error<E>> {
        self.bus.idle()?;
        self.write_display_control()
    }

    pub fn clear(&mut self) -> Result<(), TM1637Error<E>> {
        self.display_content(&[symbols::CLEAR; NUM_DIGITS])
    }

    /// Show a decimal number, clamped to -999..=9999. `dots` lights the colon
    /// between the first and second digits.
    pub fn display_decimal<T>(&mut self, number: T, dots: bool) -> Result<(), TM1637Error<E>>
    where
        T: ToPrimitive,
    {
        let number = clamp_decimal(&number);
        let frame = decimal_frame(number, dots);

        self.bus.write_command(command::data_write())?;
        self.bus.write_many(&frame)
    }

    /// Show four raw segment patterns, left to right.
    pub fn display_content(&mut self, content: &[u8; NUM_DIGITS]) -> Result<(), TM1637Error<E>> {
        let mut frame = [0; NUM_DIGITS + 1];
        frame[0] = command::address_set(0);
        frame[1..].copy_from_slice(content);

        // mode command and payload are separate transactions
        self.bus.write_command(command::data_write())?;
        self.bus.write_many(&frame)
    }

    pub fn set_state(&mut self, on: bool) -> Result<(), TM1637Error<E>> {
        self.on = on;
        self.write_display_control()
    }

    pub fn state(&self) -> bool {
        self.on
    }

    /// Set brightness 0-7. Only the low 3 bits are used, so 8 wraps to 0.
    pub fn set_brightness(&mut self, brightness: u8) -> Result<(), TM1637Error<E>> {
        self.brightness = brightness & MAX_BRIGHTNESS;
        self.write_display_control()
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    fn write_display_control(&mut self) -> Result<(), TM1637Error<E>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("tm1637: brightness {} on {}", self.brightness, self.on);

        self.bus
            .write_command(command::display_control(self.brightness, self.on))
    }
}

fn clamp_decimal<T: ToPrimitive>(number: &T) -> i32 {
    match number.to_i64() {
        Some(n) => n.clamp(MIN_VALUE as i64, MAX_VALUE as i64) as i32,
        // beyond i64 (or NaN): clamp by sign
        None if number.to_f64().is_some_and(|n| n < 0.0) => MIN_VALUE,
        None => MAX_VALUE,
    }
}

/// Address command followed by the four digit patterns for `number`,
/// which must already be within -999..=9999.
fn decimal_frame(number: i32, dots: bool) -> [u8; NUM_DIGITS + 1] {
    let mut frame = [0; NUM_DIGITS + 1];
    frame[0] = command::address_set(0);

    let mut num = number;
    if num < 0 {
        frame[1] = symbols::MINUS;
        num = -num;
    } else {
        frame[1] = digit_to_pattern((num / 1000) as u8);
        num %= 1000;
    }
    frame[2] = digit_to_pattern((num / 100) as u8);
    num %= 100;
    frame[3] = digit_to_pattern((num / 10) as u8);
    frame[4] = digit_to_pattern((num % 10) as u8);

    if dots {
        frame[2] |= symbols::DOTS;
    }
    frame
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TM1637Error<E> {
    PinError(E),
    AckTimeout,
}

impl<E> From<E> for TM1637Error<E> {
    fn from(error: E) -> Self {
        TM1637Error::PinError(error)
    }
}

impl<E: fmt::Debug> fmt::Display for TM1637Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TM1637Error::PinError(e) => write!(f, "pin error: {:?}", e),
            TM1637Error::AckTimeout => write!(f, "no acknowledgment from TM1637"),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for TM1637Error<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            TM1637Error::PinError(e) => defmt::write!(f, "pin error: {}", e),
            TM1637Error::AckTimeout => defmt::write!(f, "no acknowledgment from TM1637"),
        }
    }
}
