//! Method Channel Protocol
//!
//! Names, argument decoding and response shapes for every call the
//! bridge answers.

use crate::domain::error::{BridgeError, Result};
use crate::domain::models::PrintJob;
use crate::domain::value::{decode_byte_list, Value};
use serde::{Deserialize, Serialize};

/// An incoming invocation: a method name plus its dynamic arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }
}

/// Outcome of a call, as the host channel distinguishes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MethodResponse {
    Success(Value),
    Error {
        code: String,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<Value>,
    },
    NotImplemented,
}

impl MethodResponse {
    pub fn success(value: impl Into<Value>) -> Self {
        Self::Success(value.into())
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }
}

impl From<BridgeError> for MethodResponse {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::InvalidArguments { code, message } => Self::error(code, message),
            other => Self::error("platform_error", other.to_string()),
        }
    }
}

/// Printer families accepted by the typed listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrinterType {
    Usb,
    Bluetooth,
}

impl PrinterType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "usb" => Some(Self::Usb),
            // "bluethoot" is what older callers send
            "bluetooth" | "bluethoot" => Some(Self::Bluetooth),
            _ => None,
        }
    }
}

/// Every operation the bridge recognizes, with decoded arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    PlatformVersion,
    ListPrinters,
    PrintBytes(PrintJob),
    PairedBluetooths,
    Connect(String),
    WriteBluetoothBytes(Vec<u8>),
    PrintString(String),
    Disconnect,
    IsConnected(String),
    IsBluetoothEnabled,
    CheckBluetoothPermissions,
    EnableBluetooth,
    GetPrinters(Option<PrinterType>),
    Unknown(String),
}

impl Method {
    /// Map a call to an operation, validating its arguments.
    ///
    /// Unknown names never fail here; they decode to `Unknown` so the
    /// dispatcher can answer not-implemented whatever the arguments.
    pub fn decode(call: &MethodCall) -> Result<Self> {
        let args = &call.arguments;
        let method = match call.method.as_str() {
            "getPlatformVersion" => Self::PlatformVersion,
            "usbprinters" => Self::ListPrinters,
            "writebytes" => Self::PrintBytes(decode_print_job(args)?),
            "pairedbluetooths" => Self::PairedBluetooths,
            "connect" => Self::Connect(decode_address(args)?),
            "writebluetoothbytes" => {
                let items = args.as_list().ok_or_else(BridgeError::missing_bytes)?;
                Self::WriteBluetoothBytes(decode_byte_list(items))
            }
            "printstring" => Self::PrintString(
                args.as_str()
                    .map(str::to_string)
                    .ok_or_else(BridgeError::missing_text)?,
            ),
            "disconnect" => Self::Disconnect,
            "isConnected" => Self::IsConnected(decode_address(args)?),
            "isBluetoothEnabled" => Self::IsBluetoothEnabled,
            "checkBluetoothPermissions" => Self::CheckBluetoothPermissions,
            "enableBluetooth" => Self::EnableBluetooth,
            "getPrinters" => Self::GetPrinters(
                args.get("printerType")
                    .and_then(Value::as_str)
                    .and_then(PrinterType::parse),
            ),
            other => Self::Unknown(other.to_string()),
        };
        Ok(method)
    }
}

fn decode_print_job(args: &Value) -> Result<PrintJob> {
    let bytes = args.get("bytes").and_then(Value::as_list);
    let printer_name = args.get("printerName").and_then(Value::as_str);
    match (bytes, printer_name) {
        (Some(items), Some(name)) => Ok(PrintJob {
            printer_name: name.to_string(),
            payload: decode_byte_list(items),
        }),
        _ => Err(BridgeError::invalid_print_job()),
    }
}

fn decode_address(args: &Value) -> Result<String> {
    args.as_str()
        .map(str::to_string)
        .ok_or_else(BridgeError::missing_address)
}
