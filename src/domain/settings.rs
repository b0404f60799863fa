use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_level")]
    pub level: String, // "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_true")]
    pub console_logging_enabled: bool,
    #[serde(default = "default_false")]
    pub file_logging_enabled: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_prefix")]
    pub file_name_prefix: String,
    #[serde(default = "default_rotation")]
    pub rotation: String, // "daily", "hourly", "minutely", "never"
    #[serde(default = "default_false")]
    pub show_file_line: bool,
    #[serde(default = "default_true")]
    pub show_target: bool,
    #[serde(default = "default_true")]
    pub ansi_colors: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            console_logging_enabled: default_true(),
            file_logging_enabled: default_false(),
            log_dir: default_log_dir(),
            file_name_prefix: default_prefix(),
            rotation: default_rotation(),
            show_file_line: default_false(),
            show_target: default_true(),
            ansi_colors: default_true(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}
fn default_log_dir() -> String {
    "logs".to_string()
}
fn default_prefix() -> String {
    "thermal_printer_bridge".to_string()
}
fn default_rotation() -> String {
    "daily".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Channel the plugin registers its handler on.
    #[serde(default = "default_channel_name")]
    pub channel_name: String,
    /// Local socket the host listens on.
    #[serde(default = "default_socket_name")]
    pub socket_name: String,
    /// Document name shown in the spooler queue.
    #[serde(default = "default_document_name")]
    pub document_name: String,
    /// Bluetooth inquiry length, in units of 1.28 seconds.
    #[serde(default = "default_inquiry_timeout_multiplier")]
    pub inquiry_timeout_multiplier: u8,
    /// Answer `false` instead of `true` when the spooler rejects a job.
    #[serde(default = "default_false")]
    pub report_print_failures: bool,

    #[serde(default)]
    pub log_settings: LogSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            channel_name: default_channel_name(),
            socket_name: default_socket_name(),
            document_name: default_document_name(),
            inquiry_timeout_multiplier: default_inquiry_timeout_multiplier(),
            report_print_failures: false,
            log_settings: LogSettings::default(),
        }
    }
}

/// Longest inquiry the Bluetooth search accepts, in units of 1.28 seconds.
pub const MAX_INQUIRY_TIMEOUT_MULTIPLIER: u8 = 48;

impl Settings {
    /// The configured inquiry length clamped to `1..=48`.
    pub fn bounded_inquiry_timeout_multiplier(&self) -> u8 {
        let bounded = self
            .inquiry_timeout_multiplier
            .clamp(1, MAX_INQUIRY_TIMEOUT_MULTIPLIER);
        if bounded != self.inquiry_timeout_multiplier {
            tracing::warn!(
                "inquiry_timeout_multiplier {} out of range, using {}",
                self.inquiry_timeout_multiplier,
                bounded
            );
        }
        bounded
    }
}

fn default_channel_name() -> String {
    "thermal_printer_flutter".to_string()
}
fn default_socket_name() -> String {
    "@thermal_printer_bridge".to_string()
}
fn default_document_name() -> String {
    "ESC/POS Print Job".to_string()
}
fn default_inquiry_timeout_multiplier() -> u8 {
    2
}

pub struct SettingsService {
    settings: Settings,
    settings_path: PathBuf,
}

impl SettingsService {
    pub fn new() -> anyhow::Result<Self> {
        let settings_path = Self::default_path()?;
        Ok(Self::open(settings_path))
    }

    /// Load settings from `path`, keeping defaults if it is missing or invalid.
    pub fn open(settings_path: PathBuf) -> Self {
        let settings = match Self::load_from_file(&settings_path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::debug!(
                    "Using default settings ({}): {}",
                    settings_path.display(),
                    e
                );
                Settings::default()
            }
        };
        Self {
            settings,
            settings_path,
        }
    }

    fn default_path() -> anyhow::Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        path.push("ThermalPrinterBridge");
        path.push("settings.json");
        Ok(path)
    }

    fn load_from_file(path: &Path) -> anyhow::Result<Settings> {
        let contents = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&contents)?;
        Ok(settings)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(dir) = self.settings_path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(&self.settings)?;
        fs::write(&self.settings_path, json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.settings_path
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }

    pub fn get_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }
}
