#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::digital::ErrorKind;
use tm1637::{Config, TM1637};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Clk(bool),
    Dio(bool),
    Delay(u32),
    Sample,
}

/// Line-level trace shared by the mock pins, plus how the simulated
/// controller answers acknowledgment polls. With `failing_low` set, the data
/// pin refuses every `set_low` after that many successful ones.
#[derive(Default)]
pub struct Wire {
    pub events: Vec<Event>,
    pub silent: bool,
    pub failing_low: Option<usize>,
    low_count: usize,
}

pub type SharedWire = Rc<RefCell<Wire>>;

pub fn wire() -> SharedWire {
    Rc::new(RefCell::new(Wire::default()))
}

pub fn silent_wire() -> SharedWire {
    Rc::new(RefCell::new(Wire {
        silent: true,
        ..Wire::default()
    }))
}

pub fn failing_wire(silent: bool, successful_lows: usize) -> SharedWire {
    Rc::new(RefCell::new(Wire {
        silent,
        failing_low: Some(successful_lows),
        ..Wire::default()
    }))
}

pub struct MockClk(pub SharedWire);
pub struct MockDio(pub SharedWire);
pub struct MockDelay(pub SharedWire);

impl embedded_hal::digital::ErrorType for MockClk {
    type Error = ErrorKind;
}

impl embedded_hal::digital::OutputPin for MockClk {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().events.push(Event::Clk(false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().events.push(Event::Clk(true));
        Ok(())
    }
}

impl embedded_hal::digital::ErrorType for MockDio {
    type Error = ErrorKind;
}

impl embedded_hal::digital::OutputPin for MockDio {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let mut wire = self.0.borrow_mut();
        if matches!(wire.failing_low, Some(limit) if wire.low_count >= limit) {
            return Err(ErrorKind::Other);
        }
        wire.low_count += 1;
        wire.events.push(Event::Dio(false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().events.push(Event::Dio(true));
        Ok(())
    }
}

impl embedded_hal::digital::InputPin for MockDio {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let mut wire = self.0.borrow_mut();
        wire.events.push(Event::Sample);
        Ok(wire.silent)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().events.push(Event::Delay(ns.div_ceil(1000)));
    }

    fn delay_us(&mut self, us: u32) {
        self.0.borrow_mut().events.push(Event::Delay(us));
    }
}

pub type MockDisplay = TM1637<MockClk, MockDio, MockDelay>;

pub fn display(wire: &SharedWire) -> MockDisplay {
    TM1637::new(
        MockClk(wire.clone()),
        MockDio(wire.clone()),
        MockDelay(wire.clone()),
    )
}

pub fn display_with_config(wire: &SharedWire, config: Config) -> MockDisplay {
    TM1637::with_config(
        MockClk(wire.clone()),
        MockDio(wire.clone()),
        MockDelay(wire.clone()),
        config,
    )
}

pub fn events(wire: &SharedWire) -> Vec<Event> {
    wire.borrow().events.clone()
}

/// Number of frames whose start condition went out, completed or not.
pub fn starts(events: &[Event]) -> usize {
    events
        .windows(4)
        .filter(|w| *w == [Event::Clk(true), Event::Dio(true), Event::Delay(2), Event::Dio(false)])
        .count()
}

pub fn reset(wire: &SharedWire) {
    wire.borrow_mut().events.clear();
}

/// Rebuild the framed byte sequences from the trace. A frame opens on a
/// falling data edge with clock high and closes on a rising one; every
/// clock rising edge inside samples one bit, nine per byte (8 data + ack).
pub fn frames(events: &[Event]) -> Vec<Vec<u8>> {
    let (mut clk, mut dio) = (true, true);
    let mut bits: Option<Vec<bool>> = None;
    let mut frames = Vec::new();

    for event in events {
        match *event {
            Event::Clk(level) => {
                if level && !clk {
                    if let Some(bits) = bits.as_mut() {
                        bits.push(dio);
                    }
                }
                clk = level;
            }
            Event::Dio(level) => {
                if clk && dio && !level {
                    bits = Some(Vec::new());
                } else if clk && !dio && level {
                    if let Some(bits) = bits.take() {
                        frames.push(to_bytes(&bits));
                    }
                }
                dio = level;
            }
            Event::Delay(_) | Event::Sample => {}
        }
    }
    frames
}

fn to_bytes(bits: &[bool]) -> Vec<u8> {
    bits.chunks_exact(9)
        .map(|chunk| {
            chunk[..8]
                .iter()
                .enumerate()
                .fold(0u8, |byte, (i, &bit)| byte | (bit as u8) << i)
        })
        .collect()
}

/// Inverse of the segment table; the dots bit is ignored.
pub fn decode_digits(patterns: &[u8]) -> String {
    patterns
        .iter()
        .map(|&pattern| {
            let pattern = pattern & !tm1637::symbols::DOTS;
            if pattern == tm1637::symbols::MINUS {
                '-'
            } else {
                let value = tm1637::DIGITS
                    .iter()
                    .position(|&p| p == pattern)
                    .expect("unknown segment pattern");
                char::from_digit(value as u32, 16).unwrap()
            }
        })
        .collect()
}
