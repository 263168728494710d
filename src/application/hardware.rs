// Hardware capability traits - the seam between the control loop and the bench
use thiserror::Error;

use crate::domain::selection::Reading;

/// Converter inputs wired on the kiosk. Channel 0 carries the machine-role
/// pot, channel 1 the environment pot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdcChannel {
    MachineRole,
    Environment,
}

impl AdcChannel {
    pub fn index(self) -> u8 {
        match self {
            AdcChannel::MachineRole => 0,
            AdcChannel::Environment => 1,
        }
    }
}

/// Faults from the physical (or simulated) bench. There is no recovery
/// story for these; they end the process.
#[derive(Debug, Error)]
pub enum HardwareError {
    #[error("adc read failed: {0}")]
    Adc(#[source] anyhow::Error),
    #[error("digital line read failed: {0}")]
    DigitalLine(#[source] anyhow::Error),
    #[error("display write failed: {0}")]
    Display(#[source] anyhow::Error),
    #[error("simulated input failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Source of analog readings. Each handle is owned exclusively by the
/// single control loop for the process lifetime.
pub trait AnalogSource {
    fn read_channel(&mut self, channel: AdcChannel) -> Result<Reading, HardwareError>;
}

/// A single digital line sampled for the trigger button.
pub trait DigitalSource {
    fn read_line(&mut self) -> Result<bool, HardwareError>;
}

/// Two-line character display. Callers suppress redundant redraws; the
/// sink itself renders unconditionally.
pub trait DisplaySink {
    fn render(&mut self, line1: &str, line2: &str) -> Result<(), HardwareError>;
}
