//! Backend for hosts without a spooler or Bluetooth binding.

use crate::domain::error::{BridgeError, Result};
use crate::domain::models::{BluetoothDevice, PrintJob};
use crate::infrastructure::platform::PlatformBackend;

pub struct UnsupportedBackend;

impl PlatformBackend for UnsupportedBackend {
    fn platform_version(&self) -> String {
        match std::env::consts::OS {
            "macos" => "macOS".to_string(),
            "linux" => "Linux".to_string(),
            other => other.to_string(),
        }
    }

    fn printers(&self) -> Result<Vec<String>> {
        Err(BridgeError::Unsupported("printer enumeration"))
    }

    fn print_raw(&self, _job: &PrintJob) -> Result<()> {
        Err(BridgeError::Unsupported("raw printing"))
    }

    fn paired_devices(&self) -> Result<Vec<BluetoothDevice>> {
        Err(BridgeError::Unsupported("Bluetooth enumeration"))
    }

    fn bluetooth_radio_available(&self) -> bool {
        false
    }
}
