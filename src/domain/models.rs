use crate::domain::value::Value;
use crate::value_map;
use std::fmt;

/// Connection type reported for spooler printers.
pub const USB_PRINTER_TYPE: &str = "usb";
/// Tag existing callers expect on Bluetooth entries, spelling included.
pub const BLUETOOTH_PRINTER_TYPE: &str = "bluethoot";

/// Separator between name and address in the device wire encoding.
pub const DEVICE_SEPARATOR: char = '#';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterDescriptor {
    pub name: String,
    pub kind: &'static str,
    pub connected: bool,
}

impl PrinterDescriptor {
    /// Spooler printers are always reported as connected usb printers.
    pub fn usb(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: USB_PRINTER_TYPE,
            connected: true,
        }
    }

    pub fn to_value(&self) -> Value {
        value_map! {
            "name" => self.name.clone(),
            "type" => self.kind,
            "isConnected" => self.connected,
        }
    }
}

/// A 48-bit Bluetooth hardware address, most significant octet first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    /// Build from the packed 64-bit form; the top two bytes are ignored.
    pub fn from_u64(address: u64) -> Self {
        let b = address.to_be_bytes();
        Self([b[2], b[3], b[4], b[5], b[6], b[7]])
    }

    /// True if `text` names this address, ignoring hex digit case.
    pub fn matches(&self, text: &str) -> bool {
        self.to_string().eq_ignore_ascii_case(text.trim())
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            a, b, c, d, e, g
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BluetoothDevice {
    pub name: String,
    pub address: MacAddress,
    pub connected: bool,
}

impl BluetoothDevice {
    /// Wire form expected by existing callers: `name#AA:BB:CC:DD:EE:FF`.
    pub fn encode(&self) -> String {
        format!("{}{}{}", self.name, DEVICE_SEPARATOR, self.address)
    }

    /// Structured form used by the typed printer listing.
    pub fn to_printer_value(&self) -> Value {
        value_map! {
            "name" => self.name.clone(),
            "bleAddress" => self.address.to_string(),
            "type" => BLUETOOTH_PRINTER_TYPE,
            "isConnected" => self.connected,
        }
    }
}

/// A raw job bound for the spooler. The payload is passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintJob {
    pub printer_name: String,
    pub payload: Vec<u8>,
}
