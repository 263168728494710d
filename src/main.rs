// Main entry point - Dependency injection and control loop bootstrap
mod application;
mod domain;
mod infrastructure;

use tracing_subscriber::EnvFilter;

use crate::application::controller::{KioskController, Timing};
use crate::application::hardware::{AnalogSource, DigitalSource, DisplaySink};
use crate::domain::selection::{LabelDial, UNKNOWN_ENVIRONMENT, UNKNOWN_MACHINE_ROLE};
use crate::infrastructure::fake_hardware::{ConsoleDisplay, FileAnalogSource, FileDigitalSource};
use crate::infrastructure::gpio::GpioButton;
use crate::infrastructure::lcd::CharLcd;
use crate::infrastructure::mcp3008::Mcp3008;
use crate::infrastructure::provisioner_http::HttpProvisionerApi;
use crate::infrastructure::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let settings = Settings::load()?;
    tracing::info!("FAKE_MODE = {}", settings.fake_mode);

    // Build the two selector dials; a label list shorter than two entries
    // cannot be partitioned and fails here, not mid-loop.
    let role_dial = LabelDial::new(settings.machine_roles.clone(), UNKNOWN_MACHINE_ROLE)?;
    let environment_dial = LabelDial::new(settings.environments.clone(), UNKNOWN_ENVIRONMENT)?;

    // Select the hardware bench (infrastructure layer)
    let (analog, button, display): (
        Box<dyn AnalogSource>,
        Box<dyn DigitalSource>,
        Box<dyn DisplaySink>,
    ) = if settings.fake_mode {
        (
            Box::new(FileAnalogSource::open(
                &settings.fake.channel_0_file,
                &settings.fake.channel_1_file,
            )?),
            Box::new(FileDigitalSource::open(&settings.fake.button_file)?),
            Box::new(ConsoleDisplay),
        )
    } else {
        (
            Box::new(Mcp3008::new()?),
            Box::new(GpioButton::new(settings.hardware.button_pin)?),
            Box::new(CharLcd::new(&settings.hardware.lcd)?),
        )
    };

    let api = Box::new(HttpProvisionerApi::new(settings.api.base_url.clone()));

    // Run the control loop (application layer)
    let mut controller = KioskController::new(
        role_dial,
        environment_dial,
        analog,
        button,
        display,
        api,
        Timing {
            poll_interval: settings.poll_interval(),
            debounce: settings.debounce(),
            status_poll_interval: settings.status_poll_interval(),
        },
    );

    controller.run().await?;
    Ok(())
}
