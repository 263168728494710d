// Simulated bench for FAKE_MODE - line-oriented files stand in for the hardware
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::application::hardware::{
    AdcChannel, AnalogSource, DigitalSource, DisplaySink, HardwareError,
};
use crate::domain::selection::Reading;

/// Tails a file for values: each read consumes the next line, a blank line
/// or end-of-file keeps the previous value. Appending lines to the file
/// from another shell drives the simulated input.
struct TailedValue<T> {
    reader: BufReader<File>,
    value: T,
}

impl<T: Copy + std::str::FromStr> TailedValue<T> {
    fn open(path: &Path, initial: T) -> Result<Self, HardwareError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
            value: initial,
        })
    }

    fn next(&mut self) -> Result<T, HardwareError> {
        let mut line = String::new();
        self.reader
            .read_line(&mut line)
            .map_err(HardwareError::Io)?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            match trimmed.parse::<T>() {
                Ok(value) => self.value = value,
                Err(_) => tracing::warn!("Ignoring unparsable simulated value: {:?}", trimmed),
            }
        }
        Ok(self.value)
    }
}

pub struct FileAnalogSource {
    channels: [TailedValue<Reading>; 2],
}

impl FileAnalogSource {
    pub fn open(channel_0: impl AsRef<Path>, channel_1: impl AsRef<Path>) -> Result<Self, HardwareError> {
        Ok(Self {
            channels: [
                TailedValue::open(channel_0.as_ref(), 0)?,
                TailedValue::open(channel_1.as_ref(), 0)?,
            ],
        })
    }
}

impl AnalogSource for FileAnalogSource {
    fn read_channel(&mut self, channel: AdcChannel) -> Result<Reading, HardwareError> {
        let reading = self.channels[channel.index() as usize].next()?;
        tracing::debug!("Simulated ADC reading ({}) = {}", channel.index(), reading);
        Ok(reading)
    }
}

/// Simulated button: `0`/`1` lines in a file set the level. Starts high,
/// so the first `0` appended to the file reads as a press edge.
pub struct FileDigitalSource {
    level: TailedValue<u8>,
}

impl FileDigitalSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, HardwareError> {
        Ok(Self {
            level: TailedValue::open(path.as_ref(), 1)?,
        })
    }
}

impl DigitalSource for FileDigitalSource {
    fn read_line(&mut self) -> Result<bool, HardwareError> {
        Ok(self.level.next()? != 0)
    }
}

/// Logs frames instead of driving a panel.
pub struct ConsoleDisplay;

impl DisplaySink for ConsoleDisplay {
    fn render(&mut self, line1: &str, line2: &str) -> Result<(), HardwareError> {
        tracing::info!("[LCD] {} / {}", line1, line2);
        Ok(())
    }
}
