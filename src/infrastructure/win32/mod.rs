//! Win32 Backend
//!
//! Printer access through the print spooler (`winspool`) and Bluetooth
//! Classic enumeration through `bthprops`, plus the version probe.
//!
//! ## Modules
//!
//! - [`spooler`] - printer enumeration and raw job submission
//! - [`bluetooth`] - paired device search and radio detection
//! - [`version`] - OS version string

pub mod bluetooth;
pub mod spooler;
pub mod version;

use crate::domain::error::{BridgeError, Result};
use crate::domain::models::{BluetoothDevice, PrintJob};
use crate::domain::settings::Settings;
use crate::infrastructure::platform::PlatformBackend;
use crate::infrastructure::spooler::submit_raw_job;
use tracing::info;

pub struct WindowsBackend {
    document_name: String,
    inquiry_timeout_multiplier: u8,
}

impl WindowsBackend {
    pub fn new(settings: &Settings) -> Self {
        Self {
            document_name: settings.document_name.clone(),
            inquiry_timeout_multiplier: settings.bounded_inquiry_timeout_multiplier(),
        }
    }
}

impl PlatformBackend for WindowsBackend {
    fn platform_version(&self) -> String {
        version::windows_version()
    }

    fn printers(&self) -> Result<Vec<String>> {
        spooler::enumerate_printers()
    }

    fn print_raw(&self, job: &PrintJob) -> Result<()> {
        info!(
            "Submitting {} bytes to printer {}",
            job.payload.len(),
            job.printer_name
        );
        submit_raw_job(&spooler::WinSpooler, job, &self.document_name)
    }

    fn paired_devices(&self) -> Result<Vec<BluetoothDevice>> {
        bluetooth::find_devices(self.inquiry_timeout_multiplier)
    }

    fn bluetooth_radio_available(&self) -> bool {
        bluetooth::radio_available()
    }
}

/// Wrap a failed Win32 call into a bridge error.
pub(crate) fn os_error(api: &'static str, err: windows::core::Error) -> BridgeError {
    BridgeError::Os {
        api,
        code: err.code().0 as u32,
    }
}

/// Error for calls that only report failure through `GetLastError`.
#[allow(unused_unsafe)]
pub(crate) fn last_error(api: &'static str) -> BridgeError {
    let code = unsafe { windows::Win32::Foundation::GetLastError() };
    BridgeError::Os { api, code: code.0 }
}

/// NUL-terminated UTF-16 copy of `s`.
pub(crate) fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}
