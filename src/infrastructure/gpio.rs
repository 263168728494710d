// Button backend - one GPIO input line
use rppal::gpio::{Gpio, InputPin};

use crate::application::hardware::{DigitalSource, HardwareError};

pub struct GpioButton {
    pin: InputPin,
}

impl GpioButton {
    pub fn new(bcm_pin: u8) -> Result<Self, HardwareError> {
        let gpio = Gpio::new().map_err(|e| HardwareError::DigitalLine(e.into()))?;
        let pin = gpio
            .get(bcm_pin)
            .map_err(|e| HardwareError::DigitalLine(e.into()))?
            .into_input();
        Ok(Self { pin })
    }
}

impl DigitalSource for GpioButton {
    fn read_line(&mut self) -> Result<bool, HardwareError> {
        Ok(self.pin.is_high())
    }
}
