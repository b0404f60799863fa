//! Bluetooth Classic device search over the Win32 Bluetooth API.
//!
//! The Bluetooth API needs Winsock initialized for the duration of the
//! search; both the Winsock session and the search handle are held by
//! guards so they are released on every return path.

use super::os_error;
use crate::domain::error::{BridgeError, Result};
use crate::domain::models::{BluetoothDevice, MacAddress};
use tracing::{debug, info, warn};
use windows::Win32::Devices::Bluetooth::{
    BluetoothFindDeviceClose, BluetoothFindFirstDevice, BluetoothFindFirstRadio,
    BluetoothFindNextDevice, BluetoothFindRadioClose, BLUETOOTH_DEVICE_INFO,
    BLUETOOTH_DEVICE_SEARCH_PARAMS, BLUETOOTH_FIND_RADIO_PARAMS, HBLUETOOTH_DEVICE_FIND,
};
use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::Networking::WinSock::{WSACleanup, WSAStartup, WSADATA};

/// Winsock 2.2
const WINSOCK_VERSION: u16 = 0x0202;

struct WinsockSession;

impl WinsockSession {
    fn start() -> Result<Self> {
        let mut data = WSADATA::default();
        let rc = unsafe { WSAStartup(WINSOCK_VERSION, &mut data) };
        if rc != 0 {
            return Err(BridgeError::Os {
                api: "WSAStartup",
                code: rc as u32,
            });
        }
        Ok(Self)
    }
}

impl Drop for WinsockSession {
    fn drop(&mut self) {
        if unsafe { WSACleanup() } != 0 {
            warn!("WSACleanup failed");
        }
    }
}

struct DeviceSearch(HBLUETOOTH_DEVICE_FIND);

impl Drop for DeviceSearch {
    fn drop(&mut self) {
        if let Err(e) = unsafe { BluetoothFindDeviceClose(self.0) } {
            warn!("BluetoothFindDeviceClose failed: {}", e);
        }
    }
}

fn empty_device_info() -> BLUETOOTH_DEVICE_INFO {
    BLUETOOTH_DEVICE_INFO {
        dwSize: std::mem::size_of::<BLUETOOTH_DEVICE_INFO>() as u32,
        ..Default::default()
    }
}

fn to_device(info: &BLUETOOTH_DEVICE_INFO) -> BluetoothDevice {
    let len = info
        .szName
        .iter()
        .position(|&c| c == 0)
        .unwrap_or(info.szName.len());
    let address = unsafe { info.Address.Anonymous.ullLong };
    BluetoothDevice {
        name: String::from_utf16_lossy(&info.szName[..len]),
        address: MacAddress::from_u64(address),
        connected: info.fConnected.as_bool(),
    }
}

/// Search authenticated, remembered, unknown and connected devices,
/// issuing a fresh inquiry of `timeout_multiplier` x 1.28 s.
pub fn find_devices(timeout_multiplier: u8) -> Result<Vec<BluetoothDevice>> {
    let _winsock = WinsockSession::start()?;

    let params = BLUETOOTH_DEVICE_SEARCH_PARAMS {
        dwSize: std::mem::size_of::<BLUETOOTH_DEVICE_SEARCH_PARAMS>() as u32,
        fReturnAuthenticated: true.into(),
        fReturnRemembered: true.into(),
        fReturnUnknown: true.into(),
        fReturnConnected: true.into(),
        fIssueInquiry: true.into(),
        cTimeoutMultiplier: timeout_multiplier,
        hRadio: HANDLE::default(),
    };

    let mut info = empty_device_info();
    let search = match unsafe { BluetoothFindFirstDevice(&params, &mut info) } {
        Ok(handle) => DeviceSearch(handle),
        Err(e) => {
            // No radio, or no devices at all: both surface here.
            debug!("BluetoothFindFirstDevice found nothing: {}", e);
            return Err(os_error("BluetoothFindFirstDevice", e));
        }
    };

    let mut devices = vec![to_device(&info)];
    loop {
        let mut next = empty_device_info();
        if unsafe { BluetoothFindNextDevice(search.0, &mut next) }.is_err() {
            break;
        }
        devices.push(to_device(&next));
    }

    info!("Bluetooth search returned {} devices", devices.len());
    Ok(devices)
}

/// True if the system has at least one Bluetooth radio.
pub fn radio_available() -> bool {
    let params = BLUETOOTH_FIND_RADIO_PARAMS {
        dwSize: std::mem::size_of::<BLUETOOTH_FIND_RADIO_PARAMS>() as u32,
    };
    let mut radio = HANDLE::default();
    match unsafe { BluetoothFindFirstRadio(&params, &mut radio) } {
        Ok(find) => {
            if let Err(e) = unsafe { CloseHandle(radio) } {
                warn!("CloseHandle on radio failed: {}", e);
            }
            if let Err(e) = unsafe { BluetoothFindRadioClose(find) } {
                warn!("BluetoothFindRadioClose failed: {}", e);
            }
            true
        }
        Err(e) => {
            debug!("No Bluetooth radio: {}", e);
            false
        }
    }
}
