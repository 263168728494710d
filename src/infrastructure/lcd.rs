// Display backend - HD44780 character LCD bit-banged in 4-bit mode
use std::thread;
use std::time::Duration;

use rppal::gpio::{Gpio, OutputPin};

use crate::application::hardware::{DisplaySink, HardwareError};
use crate::infrastructure::settings::LcdPins;

// HD44780 command set (subset used here).
const CMD_CLEAR: u8 = 0x01;
const CMD_FUNCTION_SET_4BIT_2LINE: u8 = 0x28;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_ENTRY_MODE: u8 = 0x06;
const LINE_ADDR: [u8; 2] = [0x80, 0xC0];

pub struct CharLcd {
    rs: OutputPin,
    en: OutputPin,
    data: [OutputPin; 4],
    columns: usize,
}

impl CharLcd {
    pub fn new(pins: &LcdPins) -> Result<Self, HardwareError> {
        let gpio = Gpio::new().map_err(|e| HardwareError::Display(e.into()))?;
        let mut output = |bcm: u8| -> Result<OutputPin, HardwareError> {
            Ok(gpio
                .get(bcm)
                .map_err(|e| HardwareError::Display(e.into()))?
                .into_output_low())
        };

        let mut lcd = Self {
            rs: output(pins.rs)?,
            en: output(pins.en)?,
            data: [
                output(pins.d4)?,
                output(pins.d5)?,
                output(pins.d6)?,
                output(pins.d7)?,
            ],
            columns: pins.columns,
        };
        lcd.init();
        Ok(lcd)
    }

    // Standard power-on sequence for 4-bit operation: three 8-bit function
    // sets, then the switch to 4-bit before the real configuration.
    fn init(&mut self) {
        thread::sleep(Duration::from_millis(50));
        self.rs.set_low();

        self.write_nibble(0x03);
        thread::sleep(Duration::from_millis(5));
        self.write_nibble(0x03);
        thread::sleep(Duration::from_millis(5));
        self.write_nibble(0x03);
        thread::sleep(Duration::from_micros(150));
        self.write_nibble(0x02);

        self.command(CMD_FUNCTION_SET_4BIT_2LINE);
        self.command(CMD_DISPLAY_ON);
        self.command(CMD_ENTRY_MODE);
        self.clear();
    }

    fn clear(&mut self) {
        self.command(CMD_CLEAR);
        thread::sleep(Duration::from_millis(2));
    }

    fn command(&mut self, value: u8) {
        self.write_byte(value, false);
    }

    fn write_byte(&mut self, value: u8, is_data: bool) {
        if is_data {
            self.rs.set_high();
        } else {
            self.rs.set_low();
        }
        self.write_nibble(value >> 4);
        self.write_nibble(value & 0x0F);
        thread::sleep(Duration::from_micros(50));
    }

    fn write_nibble(&mut self, nibble: u8) {
        for (bit, pin) in self.data.iter_mut().enumerate() {
            if nibble >> bit & 1 == 1 {
                pin.set_high();
            } else {
                pin.set_low();
            }
        }
        self.pulse_enable();
    }

    fn pulse_enable(&mut self) {
        self.en.set_low();
        thread::sleep(Duration::from_micros(1));
        self.en.set_high();
        thread::sleep(Duration::from_micros(1));
        self.en.set_low();
        thread::sleep(Duration::from_micros(100));
    }

    fn print_line(&mut self, line: usize, text: &str) {
        self.command(LINE_ADDR[line]);
        for c in text.chars().take(self.columns) {
            let byte = if c.is_ascii() { c as u8 } else { b'?' };
            self.write_byte(byte, true);
        }
    }
}

impl DisplaySink for CharLcd {
    fn render(&mut self, line1: &str, line2: &str) -> Result<(), HardwareError> {
        self.clear();
        self.print_line(0, line1);
        self.print_line(1, line2);
        Ok(())
    }
}
