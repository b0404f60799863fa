//! Platform Backend
//!
//! The seam between the method dispatcher and the host OS. Each call
//! acquires and releases its own OS resources; nothing is cached between
//! calls.

use crate::domain::error::Result;
use crate::domain::models::{BluetoothDevice, PrintJob};
use crate::domain::settings::Settings;

pub trait PlatformBackend: Send + Sync {
    /// Human-readable OS family and version, e.g. `Windows 10+`.
    fn platform_version(&self) -> String;

    /// Display names of every printer the spooler knows about.
    fn printers(&self) -> Result<Vec<String>>;

    /// Send a raw job to the spooler, bytes untouched.
    fn print_raw(&self, job: &PrintJob) -> Result<()>;

    /// Fresh Bluetooth device enumeration.
    fn paired_devices(&self) -> Result<Vec<BluetoothDevice>>;

    /// True if at least one local Bluetooth radio is present.
    fn bluetooth_radio_available(&self) -> bool;
}

/// Re-enumerate and report the connected flag of the device at `address`.
///
/// Unknown addresses and enumeration failures both answer `false`.
pub fn is_device_connected(backend: &dyn PlatformBackend, address: &str) -> bool {
    match backend.paired_devices() {
        Ok(devices) => devices
            .iter()
            .find(|device| device.address.matches(address))
            .map(|device| device.connected)
            .unwrap_or(false),
        Err(e) => {
            tracing::warn!("Device enumeration failed during status lookup: {}", e);
            false
        }
    }
}

/// Backend for the host this binary was built for.
#[cfg(windows)]
pub fn default_backend(settings: &Settings) -> Box<dyn PlatformBackend> {
    Box::new(crate::infrastructure::win32::WindowsBackend::new(settings))
}

/// Backend for the host this binary was built for.
#[cfg(not(windows))]
pub fn default_backend(_settings: &Settings) -> Box<dyn PlatformBackend> {
    Box::new(crate::infrastructure::unsupported::UnsupportedBackend)
}
