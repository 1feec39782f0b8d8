//! Two-wire clock/data link to the controller.
//!
//! The protocol looks like I2C but is not: there is no device address, bytes
//! go out least significant bit first, and the controller acknowledges each
//! byte by pulling the data line low during a ninth clock.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::constants::{timing, DEFAULT_ACK_TIMEOUT_US};
use crate::TM1637Error;

/// Bit-banged transport over a clock pin and an open-drain data pin.
///
/// Every transfer is a framed sequence: start condition, one or more bytes
/// each followed by an acknowledgment, stop condition.
pub struct Bus<CLK, DIO, D> {
    clk: CLK,
    dio: DIO,
    delay: D,
    ack_timeout_us: u32,
}

impl<CLK, DIO, D, E> Bus<CLK, DIO, D>
where
    CLK: OutputPin<Error = E>,
    DIO: InputPin<Error = E> + OutputPin<Error = E>,
    D: DelayNs,
{
    pub fn new(clk: CLK, dio: DIO, delay: D) -> Self {
        Self::with_ack_timeout(clk, dio, delay, DEFAULT_ACK_TIMEOUT_US)
    }

    pub fn with_ack_timeout(clk: CLK, dio: DIO, delay: D, ack_timeout_us: u32) -> Self {
        Self {
            clk,
            dio,
            delay,
            ack_timeout_us,
        }
    }

    pub fn destroy(self) -> (CLK, DIO, D) {
        (self.clk, self.dio, self.delay)
    }

    /// Release both lines to their idle-high state.
    pub fn idle(&mut self) -> Result<(), TM1637Error<E>> {
        self.clk.set_high()?;
        self.dio.set_high()?;
        Ok(())
    }

    /// Send one command byte as its own framed sequence.
    pub fn write_command(&mut self, command: u8) -> Result<(), TM1637Error<E>> {
        self.write_many(&[command])
    }

    /// Send `bytes` in order inside a single start/stop frame.
    ///
    /// If a byte fails the remaining bytes are dropped, but the stop condition
    /// is still attempted so the link is left idle. The first error wins.
    pub fn write_many(&mut self, bytes: &[u8]) -> Result<(), TM1637Error<E>> {
        self.start()?;
        let result = bytes.iter().try_for_each(|byte| self.write_byte(*byte));
        let stopped = self.stop();
        result.and(stopped)
    }

    // falling data edge while clock is high
    fn start(&mut self) -> Result<(), TM1637Error<E>> {
        self.clk.set_high()?;
        self.dio.set_high()?;
        self.delay.delay_us(timing::START_US);
        self.dio.set_low()?;
        Ok(())
    }

    // rising data edge while clock is high
    fn stop(&mut self) -> Result<(), TM1637Error<E>> {
        self.clk.set_low()?;
        self.delay.delay_us(timing::STOP_US);
        self.dio.set_low()?;
        self.delay.delay_us(timing::STOP_US);
        self.clk.set_high()?;
        self.delay.delay_us(timing::STOP_US);
        self.dio.set_high()?;
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), TM1637Error<E>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("tm1637: write {=u8:#x}", byte);

        let mut data = byte;
        for _ in 0..8 {
            self.clk.set_low()?;
            if data & 1 != 0 {
                self.dio.set_high()?;
            } else {
                self.dio.set_low()?;
            }
            self.delay.delay_us(timing::BIT_US);
            data >>= 1;
            self.clk.set_high()?;
            self.delay.delay_us(timing::BIT_US);
        }
        self.check_ack()
    }

    fn check_ack(&mut self) -> Result<(), TM1637Error<E>> {
        self.clk.set_low()?;
        self.delay.delay_us(timing::ACK_SETUP_US);
        // release so the controller can pull the line low
        self.dio.set_high()?;

        let mut waited = 0;
        while self.dio.is_high()? {
            if waited >= self.ack_timeout_us {
                #[cfg(feature = "defmt")]
                defmt::warn!("tm1637: no ack after {} us", waited);
                return Err(TM1637Error::AckTimeout);
            }
            self.delay.delay_us(timing::ACK_POLL_US);
            waited += timing::ACK_POLL_US;
        }

        self.clk.set_high()?;
        self.delay.delay_us(timing::ACK_CLOCK_US);
        self.clk.set_low()?;
        Ok(())
    }
}
