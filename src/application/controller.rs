// Kiosk control loop - edge-triggered provisioning over injected hardware
use std::time::Duration;

use thiserror::Error;

use crate::application::hardware::{
    AdcChannel, AnalogSource, DigitalSource, DisplaySink, HardwareError,
};
use crate::application::provisioner::{ProvisionerApi, ProvisioningError};
use crate::domain::node::{NodeDefinition, NodeName};
use crate::domain::selection::{LabelDial, SelectionError};

#[derive(Debug, Error)]
pub enum KioskError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Hardware(#[from] HardwareError),
    #[error(transparent)]
    Provisioning(#[from] ProvisioningError),
}

/// Loop timing. `debounce` of zero passes raw edges through unfiltered;
/// a non-zero window requires a transition to survive one re-sample
/// before it fires.
#[derive(Debug, Clone, Copy)]
pub struct Timing {
    pub poll_interval: Duration,
    pub debounce: Duration,
    pub status_poll_interval: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            debounce: Duration::ZERO,
            status_poll_interval: Duration::from_secs(5),
        }
    }
}

/// Blocks until the monitored line leaves the level it had on entry, then
/// returns the new level. `on_idle` runs once per poll cycle between
/// samples; the controller uses it to keep the display fresh while waiting.
pub async fn wait_for_edge(
    line: &mut dyn DigitalSource,
    poll_interval: Duration,
    debounce: Duration,
    mut on_idle: impl FnMut() -> Result<(), KioskError>,
) -> Result<bool, KioskError> {
    let mut baseline = line.read_line()?;
    loop {
        on_idle()?;
        tokio::time::sleep(poll_interval).await;

        let sample = line.read_line()?;
        if sample == baseline {
            continue;
        }
        if debounce.is_zero() {
            return Ok(sample);
        }

        // A transition only counts if it still holds after the debounce
        // window; a glitch that has reverted becomes the new baseline.
        tokio::time::sleep(debounce).await;
        let settled = line.read_line()?;
        if settled == sample {
            return Ok(settled);
        }
        baseline = settled;
    }
}

/// Owns the two dials and every hardware handle for the process lifetime.
/// One sequential control flow: refresh display, poll the button, trigger
/// a provisioning run on a press edge, repeat.
pub struct KioskController {
    role_dial: LabelDial,
    environment_dial: LabelDial,
    analog: Box<dyn AnalogSource>,
    button: Box<dyn DigitalSource>,
    display: Box<dyn DisplaySink>,
    api: Box<dyn ProvisionerApi>,
    timing: Timing,
    last_rendered: Option<(String, String)>,
}

impl KioskController {
    pub fn new(
        role_dial: LabelDial,
        environment_dial: LabelDial,
        analog: Box<dyn AnalogSource>,
        button: Box<dyn DigitalSource>,
        display: Box<dyn DisplaySink>,
        api: Box<dyn ProvisionerApi>,
        timing: Timing,
    ) -> Self {
        Self {
            role_dial,
            environment_dial,
            analog,
            button,
            display,
            api,
            timing,
            last_rendered: None,
        }
    }

    /// Runs until a fatal error. A failed provisioning call aborts only the
    /// triggered action; hardware and configuration faults propagate.
    pub async fn run(&mut self) -> Result<(), KioskError> {
        loop {
            let level = {
                let Self {
                    role_dial,
                    environment_dial,
                    analog,
                    button,
                    display,
                    timing,
                    last_rendered,
                    ..
                } = self;
                wait_for_edge(button.as_mut(), timing.poll_interval, timing.debounce, || {
                    refresh_display(
                        analog.as_mut(),
                        display.as_mut(),
                        role_dial,
                        environment_dial,
                        last_rendered,
                    )
                })
                .await?
            };

            // The button pulls the line low; a rising edge is the release.
            if level {
                continue;
            }

            if let Err(error) = self.trigger_provisioning().await {
                match error {
                    KioskError::Provisioning(cause) => {
                        tracing::error!("Provisioning action aborted: {}", cause);
                    }
                    fatal => return Err(fatal),
                }
            }
        }
    }

    async fn trigger_provisioning(&mut self) -> Result<(), KioskError> {
        let name = NodeName::generate();
        let role_reading = self.analog.read_channel(AdcChannel::MachineRole)?;
        let environment_reading = self.analog.read_channel(AdcChannel::Environment)?;
        let definition = NodeDefinition::new(
            self.role_dial.label_for(role_reading).to_string(),
            self.environment_dial.label_for(environment_reading).to_string(),
        );

        tracing::info!(
            "Creating definition for {}: role={} environment={}",
            name,
            definition.machine_role,
            definition.environment
        );
        self.api.create_definition(&name, &definition).await?;
        tracing::info!("Definition created for {}", name);

        self.api.start_instance(&name).await?;
        tracing::info!("Provisioning instance for {}", name);

        loop {
            let status = self.api.instance_status(&name).await?;
            tracing::info!("Instance status for {}: {}", name, status);
            if !status.is_pending() {
                break;
            }
            tokio::time::sleep(self.timing.status_poll_interval).await;
        }

        tracing::info!("Instance provisioned for {}", name);
        Ok(())
    }
}

fn refresh_display(
    analog: &mut dyn AnalogSource,
    display: &mut dyn DisplaySink,
    role_dial: &LabelDial,
    environment_dial: &LabelDial,
    last_rendered: &mut Option<(String, String)>,
) -> Result<(), KioskError> {
    let role = role_dial
        .label_for(analog.read_channel(AdcChannel::MachineRole)?)
        .to_string();
    let environment = environment_dial
        .label_for(analog.read_channel(AdcChannel::Environment)?)
        .to_string();

    let current = (role, environment);
    if last_rendered.as_ref() == Some(&current) {
        return Ok(());
    }

    display.render(
        &format!("R: {}", current.0),
        &format!("E: {}", current.1),
    )?;
    *last_rendered = Some(current);
    Ok(())
}
