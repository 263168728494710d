// Kiosk configuration - optional TOML file plus environment overrides
use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Selects the file-backed simulated bench instead of real hardware.
    /// `FAKE_MODE=true` in the environment flips this without a config file.
    #[serde(default)]
    pub fake_mode: bool,
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// 0 passes raw button edges through unfiltered.
    #[serde(default)]
    pub debounce_ms: u64,
    #[serde(default = "default_status_poll_interval_secs")]
    pub status_poll_interval_secs: u64,
    #[serde(default = "default_machine_roles")]
    pub machine_roles: Vec<String>,
    #[serde(default = "default_environments")]
    pub environments: Vec<String>,
    #[serde(default)]
    pub hardware: HardwareSettings,
    #[serde(default)]
    pub fake: FakeSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HardwareSettings {
    /// BCM number of the button line.
    #[serde(default = "default_button_pin")]
    pub button_pin: u8,
    #[serde(default)]
    pub lcd: LcdPins,
}

impl Default for HardwareSettings {
    fn default() -> Self {
        Self {
            button_pin: default_button_pin(),
            lcd: LcdPins::default(),
        }
    }
}

/// BCM numbers of the HD44780 control and data lines (4-bit wiring).
#[derive(Debug, Deserialize, Clone)]
pub struct LcdPins {
    pub rs: u8,
    pub en: u8,
    pub d4: u8,
    pub d5: u8,
    pub d6: u8,
    pub d7: u8,
    #[serde(default = "default_lcd_columns")]
    pub columns: usize,
}

impl Default for LcdPins {
    fn default() -> Self {
        Self {
            rs: 26,
            en: 19,
            d4: 13,
            d5: 6,
            d6: 5,
            d7: 11,
            columns: default_lcd_columns(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FakeSettings {
    #[serde(default = "default_channel_0_file")]
    pub channel_0_file: String,
    #[serde(default = "default_channel_1_file")]
    pub channel_1_file: String,
    #[serde(default = "default_button_file")]
    pub button_file: String,
}

impl Default for FakeSettings {
    fn default() -> Self {
        Self {
            channel_0_file: default_channel_0_file(),
            channel_1_file: default_channel_1_file(),
            button_file: default_button_file(),
        }
    }
}

impl Settings {
    pub fn load() -> anyhow::Result<Settings> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/kiosk").required(false))
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn status_poll_interval(&self) -> Duration {
        Duration::from_secs(self.status_poll_interval_secs)
    }
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_status_poll_interval_secs() -> u64 {
    5
}

fn default_base_url() -> String {
    "http://provisioner-dev.hq.local:8080".to_string()
}

fn default_button_pin() -> u8 {
    24
}

fn default_lcd_columns() -> usize {
    16
}

fn default_channel_0_file() -> String {
    "spi_channel_0".to_string()
}

fn default_channel_1_file() -> String {
    "spi_channel_1".to_string()
}

fn default_button_file() -> String {
    "button_line".to_string()
}

fn default_machine_roles() -> Vec<String> {
    [
        "infra_bare",
        "provisioning_api",
        "puppetdb",
        "puppetmaster",
        "logstash_server",
        "mysql_server",
        "yum_server",
    ]
    .map(String::from)
    .to_vec()
}

fn default_environments() -> Vec<String> {
    [
        "infra_dev1",
        "infra_dev2",
        "development",
        "qa",
        "uat",
        "staging",
        "production",
    ]
    .map(String::from)
    .to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> Settings {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = from_toml("");

        assert!(!settings.fake_mode);
        assert_eq!(settings.poll_interval(), Duration::from_millis(100));
        assert_eq!(settings.debounce(), Duration::ZERO);
        assert_eq!(settings.status_poll_interval(), Duration::from_secs(5));
        assert_eq!(settings.api.base_url, "http://provisioner-dev.hq.local:8080");
        assert_eq!(settings.machine_roles.len(), 7);
        assert_eq!(settings.machine_roles[0], "infra_bare");
        assert_eq!(settings.environments.len(), 7);
        assert_eq!(settings.environments[6], "production");
        assert_eq!(settings.hardware.button_pin, 24);
        assert_eq!(settings.fake.channel_0_file, "spi_channel_0");
    }

    #[test]
    fn test_file_overrides() {
        let settings = from_toml(
            r#"
            fake_mode = true
            poll_interval_ms = 50
            debounce_ms = 20
            machine_roles = ["infra_bare", "mysql_server"]

            [api]
            base_url = "http://provisioner.example:9090"

            [hardware]
            button_pin = 18
            "#,
        );

        assert!(settings.fake_mode);
        assert_eq!(settings.poll_interval(), Duration::from_millis(50));
        assert_eq!(settings.debounce(), Duration::from_millis(20));
        assert_eq!(settings.api.base_url, "http://provisioner.example:9090");
        assert_eq!(settings.machine_roles.len(), 2);
        assert_eq!(settings.hardware.button_pin, 18);
        // Untouched sections keep their defaults.
        assert_eq!(settings.environments.len(), 7);
        assert_eq!(settings.hardware.lcd.columns, 16);
    }
}
