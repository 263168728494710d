// MCP3008 backend - 10-bit ADC over SPI0/CE0
use rppal::spi::{Bus, Mode, SlaveSelect, Spi};

use crate::application::hardware::{AdcChannel, AnalogSource, HardwareError};
use crate::domain::selection::Reading;

const SPI_CLOCK_HZ: u32 = 1_350_000;
const ADC_VREF: f64 = 3.3;

pub struct Mcp3008 {
    spi: Spi,
}

impl Mcp3008 {
    pub fn new() -> Result<Self, HardwareError> {
        let spi = Spi::new(Bus::Spi0, SlaveSelect::Ss0, SPI_CLOCK_HZ, Mode::Mode0)
            .map_err(|e| HardwareError::Adc(e.into()))?;
        Ok(Self { spi })
    }

    /// Single-ended conversion frame: start bit, SGL/DIFF flag plus channel
    /// in the high nibble, one padding byte to clock the result out.
    fn command_frame(channel: AdcChannel) -> [u8; 3] {
        [0x01, (8 + channel.index()) << 4, 0x00]
    }
}

impl AnalogSource for Mcp3008 {
    fn read_channel(&mut self, channel: AdcChannel) -> Result<Reading, HardwareError> {
        let write = Self::command_frame(channel);
        let mut read = [0u8; 3];
        self.spi
            .transfer(&mut read, &write)
            .map_err(|e| HardwareError::Adc(e.into()))?;

        let reading = (u16::from(read[1] & 0x03) << 8) | u16::from(read[2]);
        tracing::debug!(
            "ADC reading ({}) = {}, volts = {}",
            channel.index(),
            reading,
            reading_to_volts(reading, 2)
        );
        Ok(reading)
    }
}

/// Reading expressed against the 3.3 V reference, rounded to `places`.
pub fn reading_to_volts(reading: Reading, places: u32) -> f64 {
    let volts = f64::from(reading) * ADC_VREF / 1023.0;
    let scale = 10f64.powi(places as i32);
    (volts * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_frames() {
        assert_eq!(Mcp3008::command_frame(AdcChannel::MachineRole), [0x01, 0x80, 0x00]);
        assert_eq!(
            Mcp3008::command_frame(AdcChannel::Environment),
            [0x01, 0x90, 0x00]
        );
    }

    #[test]
    fn test_reading_to_volts() {
        assert_eq!(reading_to_volts(0, 2), 0.0);
        assert_eq!(reading_to_volts(1023, 2), 3.3);
        assert_eq!(reading_to_volts(512, 2), 1.65);
    }
}
