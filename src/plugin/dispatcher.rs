//! Method Dispatcher
//!
//! Decodes each channel call, runs it against the platform backend and
//! encodes the answer. Enumeration failures answer empty lists; the
//! Bluetooth connection calls are not supported on any backend yet and
//! answer their fixed values.

use crate::domain::method::{Method, MethodCall, MethodResponse, PrinterType};
use crate::domain::models::{PrintJob, PrinterDescriptor};
use crate::domain::settings::Settings;
use crate::domain::value::Value;
use crate::infrastructure::platform::{default_backend, is_device_connected, PlatformBackend};
use tracing::{debug, info, warn};

pub struct ThermalPrinterPlugin {
    backend: Box<dyn PlatformBackend>,
    report_print_failures: bool,
}

impl ThermalPrinterPlugin {
    pub fn new(backend: Box<dyn PlatformBackend>, settings: &Settings) -> Self {
        Self {
            backend,
            report_print_failures: settings.report_print_failures,
        }
    }

    /// Answer one channel call. Never panics on malformed arguments.
    pub fn handle_method_call(&self, call: &MethodCall) -> MethodResponse {
        debug!("Method call: {}", call.method);
        let method = match Method::decode(call) {
            Ok(method) => method,
            Err(e) => {
                warn!("Rejected {}: {}", call.method, e);
                return e.into();
            }
        };

        match method {
            Method::PlatformVersion => MethodResponse::success(self.backend.platform_version()),
            Method::ListPrinters => MethodResponse::success(self.usb_printers()),
            Method::PrintBytes(job) => MethodResponse::success(self.print(&job)),
            Method::PairedBluetooths => MethodResponse::success(self.paired_bluetooths()),
            Method::Connect(address) => {
                warn!("Bluetooth connect to {} is not supported yet", address);
                MethodResponse::success(false)
            }
            Method::WriteBluetoothBytes(bytes) => {
                warn!(
                    "Bluetooth write of {} bytes is not supported yet",
                    bytes.len()
                );
                MethodResponse::success(false)
            }
            Method::PrintString(text) => {
                warn!(
                    "Bluetooth text write of {} bytes is not supported yet",
                    text.len()
                );
                MethodResponse::success(false)
            }
            Method::Disconnect => MethodResponse::success(true),
            Method::IsConnected(address) => {
                MethodResponse::success(is_device_connected(self.backend.as_ref(), &address))
            }
            Method::IsBluetoothEnabled | Method::EnableBluetooth => {
                MethodResponse::success(self.backend.bluetooth_radio_available())
            }
            // Desktop hosts have no runtime Bluetooth permission prompt.
            Method::CheckBluetoothPermissions => MethodResponse::success(true),
            Method::GetPrinters(kind) => MethodResponse::success(self.typed_printers(kind)),
            Method::Unknown(name) => {
                debug!("No handler for {}", name);
                MethodResponse::NotImplemented
            }
        }
    }

    fn printer_descriptors(&self) -> Vec<PrinterDescriptor> {
        match self.backend.printers() {
            Ok(names) => names.into_iter().map(PrinterDescriptor::usb).collect(),
            Err(e) => {
                warn!("Printer enumeration failed: {}", e);
                Vec::new()
            }
        }
    }

    fn usb_printers(&self) -> Vec<Value> {
        self.printer_descriptors()
            .iter()
            .map(PrinterDescriptor::to_value)
            .collect()
    }

    fn print(&self, job: &PrintJob) -> bool {
        match self.backend.print_raw(job) {
            Ok(()) => {
                info!("Printed {} bytes on {}", job.payload.len(), job.printer_name);
                true
            }
            Err(e) => {
                warn!("Print job for {} failed: {}", job.printer_name, e);
                !self.report_print_failures
            }
        }
    }

    fn paired_bluetooths(&self) -> Vec<String> {
        match self.backend.paired_devices() {
            Ok(devices) => devices.iter().map(|d| d.encode()).collect(),
            Err(e) => {
                warn!("Bluetooth enumeration failed: {}", e);
                Vec::new()
            }
        }
    }

    fn typed_printers(&self, kind: Option<PrinterType>) -> Vec<Value> {
        match kind {
            Some(PrinterType::Usb) => self.usb_printers(),
            Some(PrinterType::Bluetooth) => match self.backend.paired_devices() {
                Ok(devices) => devices.iter().map(|d| d.to_printer_value()).collect(),
                Err(e) => {
                    warn!("Bluetooth enumeration failed: {}", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        }
    }
}

/// Build the plugin with the backend for this host.
pub fn create_plugin(settings: &Settings) -> ThermalPrinterPlugin {
    ThermalPrinterPlugin::new(default_backend(settings), settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::{BridgeError, Result, INVALID_ARGUMENT, INVALID_ARGUMENTS};
    use crate::domain::models::{BluetoothDevice, MacAddress};
    use crate::value_map;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct FakeBackend {
        printers: Option<Vec<String>>,
        devices: Option<Vec<BluetoothDevice>>,
        print_fails: bool,
        radio: bool,
        jobs: Arc<Mutex<Vec<PrintJob>>>,
        enumerations: Arc<Mutex<usize>>,
    }

    impl PlatformBackend for FakeBackend {
        fn platform_version(&self) -> String {
            "Windows 10+".to_string()
        }

        fn printers(&self) -> Result<Vec<String>> {
            self.printers
                .clone()
                .ok_or(BridgeError::Os { api: "EnumPrintersW", code: 1722 })
        }

        fn print_raw(&self, job: &PrintJob) -> Result<()> {
            self.jobs.lock().unwrap().push(job.clone());
            if self.print_fails {
                Err(BridgeError::Os { api: "OpenPrinterW", code: 1801 })
            } else {
                Ok(())
            }
        }

        fn paired_devices(&self) -> Result<Vec<BluetoothDevice>> {
            *self.enumerations.lock().unwrap() += 1;
            self.devices
                .clone()
                .ok_or(BridgeError::Unsupported("Bluetooth enumeration"))
        }

        fn bluetooth_radio_available(&self) -> bool {
            self.radio
        }
    }

    fn devices() -> Vec<BluetoothDevice> {
        vec![
            BluetoothDevice {
                name: "MPT-II".to_string(),
                address: MacAddress([0x66, 0x22, 0x01, 0x2C, 0x3D, 0x4E]),
                connected: true,
            },
            BluetoothDevice {
                name: "RPP02N".to_string(),
                address: MacAddress([0x0A, 0x1B, 0x02, 0xFF, 0x00, 0x11]),
                connected: false,
            },
        ]
    }

    fn plugin(backend: FakeBackend) -> ThermalPrinterPlugin {
        ThermalPrinterPlugin::new(Box::new(backend), &Settings::default())
    }

    fn call(plugin: &ThermalPrinterPlugin, method: &str, arguments: Value) -> MethodResponse {
        plugin.handle_method_call(&MethodCall::new(method, arguments))
    }

    fn error_code(response: MethodResponse) -> String {
        match response {
            MethodResponse::Error { code, .. } => code,
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_platform_version() {
        let p = plugin(FakeBackend::default());
        assert_eq!(
            call(&p, "getPlatformVersion", Value::Null),
            MethodResponse::success("Windows 10+")
        );
    }

    #[test]
    fn test_usb_printers() {
        let p = plugin(FakeBackend {
            printers: Some(vec!["POS-80".to_string(), String::new()]),
            ..Default::default()
        });
        let MethodResponse::Success(Value::List(list)) = call(&p, "usbprinters", Value::Null)
        else {
            panic!("expected a list");
        };
        assert_eq!(list.len(), 2);
        for item in &list {
            assert!(item.get("name").and_then(Value::as_str).is_some());
            assert_eq!(item.get("type").and_then(Value::as_str), Some("usb"));
            assert_eq!(item.get("isConnected"), Some(&Value::Bool(true)));
        }
        assert_eq!(list[0].get("name").and_then(Value::as_str), Some("POS-80"));
    }

    #[test]
    fn test_usb_printers_failure_is_empty() {
        let p = plugin(FakeBackend::default());
        assert_eq!(
            call(&p, "usbprinters", Value::Null),
            MethodResponse::Success(Value::List(vec![]))
        );
    }

    #[test]
    fn test_print_drops_invalid_elements() {
        let backend = FakeBackend::default();
        let jobs = backend.jobs.clone();
        let p = plugin(backend);
        let args = value_map! {
            "bytes" => vec![
                Value::Int(0x1B),
                Value::String("x".into()),
                Value::Int(0x40),
                Value::Double(1.0),
                Value::Int(0x0A),
            ],
            "printerName" => "POS-80",
        };
        assert_eq!(call(&p, "writebytes", args), MethodResponse::success(true));
        let jobs = jobs.lock().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].printer_name, "POS-80");
        assert_eq!(jobs[0].payload, vec![0x1B, 0x40, 0x0A]);
    }

    #[test]
    fn test_print_missing_fields() {
        let backend = FakeBackend::default();
        let jobs = backend.jobs.clone();
        let p = plugin(backend);
        let no_bytes = value_map! { "printerName" => "POS-80" };
        let no_name = value_map! { "bytes" => vec![Value::Int(1)] };
        assert_eq!(error_code(call(&p, "writebytes", no_bytes)), INVALID_ARGUMENTS);
        assert_eq!(error_code(call(&p, "writebytes", no_name)), INVALID_ARGUMENTS);
        assert_eq!(
            error_code(call(&p, "writebytes", Value::String("POS-80".into()))),
            INVALID_ARGUMENTS
        );
        assert!(jobs.lock().unwrap().is_empty());
    }

    #[test]
    fn test_print_failure_policy() {
        let args = || value_map! { "bytes" => vec![Value::Int(1)], "printerName" => "Gone" };

        let lenient = plugin(FakeBackend {
            print_fails: true,
            ..Default::default()
        });
        assert_eq!(call(&lenient, "writebytes", args()), MethodResponse::success(true));

        let settings = Settings {
            report_print_failures: true,
            ..Settings::default()
        };
        let strict = ThermalPrinterPlugin::new(
            Box::new(FakeBackend {
                print_fails: true,
                ..Default::default()
            }),
            &settings,
        );
        assert_eq!(call(&strict, "writebytes", args()), MethodResponse::success(false));
    }

    #[test]
    fn test_paired_bluetooths() {
        let p = plugin(FakeBackend {
            devices: Some(devices()),
            ..Default::default()
        });
        assert_eq!(
            call(&p, "pairedbluetooths", Value::Null),
            MethodResponse::success(vec![
                "MPT-II#66:22:01:2C:3D:4E",
                "RPP02N#0A:1B:02:FF:00:11",
            ])
        );
    }

    #[test]
    fn test_paired_bluetooths_failure_is_empty() {
        let p = plugin(FakeBackend::default());
        assert_eq!(
            call(&p, "pairedbluetooths", Value::Null),
            MethodResponse::Success(Value::List(vec![]))
        );
    }

    #[test]
    fn test_connection_stubs() {
        let p = plugin(FakeBackend::default());
        assert_eq!(
            call(&p, "connect", "66:22:01:2C:3D:4E".into()),
            MethodResponse::success(false)
        );
        assert_eq!(
            call(&p, "writebluetoothbytes", vec![Value::Int(1)].into()),
            MethodResponse::success(false)
        );
        assert_eq!(
            call(&p, "printstring", "Total: 12.50\n".into()),
            MethodResponse::success(false)
        );
        assert_eq!(call(&p, "disconnect", Value::Null), MethodResponse::success(true));
        assert_eq!(error_code(call(&p, "connect", Value::Null)), INVALID_ARGUMENT);
        assert_eq!(
            error_code(call(&p, "writebluetoothbytes", Value::Null)),
            INVALID_ARGUMENT
        );
    }

    #[test]
    fn test_is_connected_rescans_every_time() {
        let backend = FakeBackend {
            devices: Some(devices()),
            ..Default::default()
        };
        let enumerations = backend.enumerations.clone();
        let p = plugin(backend);

        assert_eq!(
            call(&p, "isConnected", "66:22:01:2C:3D:4E".into()),
            MethodResponse::success(true)
        );
        assert_eq!(
            call(&p, "isConnected", "0a:1b:02:ff:00:11".into()),
            MethodResponse::success(false)
        );
        assert_eq!(
            call(&p, "isConnected", "00:00:00:00:00:00".into()),
            MethodResponse::success(false)
        );
        assert_eq!(*enumerations.lock().unwrap(), 3);
        assert_eq!(error_code(call(&p, "isConnected", Value::Null)), INVALID_ARGUMENT);
    }

    #[test]
    fn test_is_connected_when_enumeration_fails() {
        let p = plugin(FakeBackend::default());
        assert_eq!(
            call(&p, "isConnected", "66:22:01:2C:3D:4E".into()),
            MethodResponse::success(false)
        );
    }

    #[test]
    fn test_unknown_method() {
        let p = plugin(FakeBackend::default());
        for args in [Value::Null, Value::Int(1), value_map! { "bytes" => "x" }] {
            assert_eq!(call(&p, "printimage", args), MethodResponse::NotImplemented);
        }
    }

    #[test]
    fn test_radio_queries() {
        let p = plugin(FakeBackend {
            radio: true,
            ..Default::default()
        });
        assert_eq!(
            call(&p, "isBluetoothEnabled", Value::Null),
            MethodResponse::success(true)
        );
        assert_eq!(
            call(&p, "enableBluetooth", Value::Null),
            MethodResponse::success(true)
        );
        assert_eq!(
            call(&p, "checkBluetoothPermissions", Value::Null),
            MethodResponse::success(true)
        );
    }

    #[test]
    fn test_typed_printer_listing() {
        let p = plugin(FakeBackend {
            printers: Some(vec!["POS-80".to_string()]),
            devices: Some(devices()),
            ..Default::default()
        });

        let MethodResponse::Success(Value::List(bt)) =
            call(&p, "getPrinters", value_map! { "printerType" => "bluetooth" })
        else {
            panic!("expected a list");
        };
        assert_eq!(bt.len(), 2);
        assert_eq!(
            bt[0].get("bleAddress").and_then(Value::as_str),
            Some("66:22:01:2C:3D:4E")
        );
        assert_eq!(bt[0].get("type").and_then(Value::as_str), Some("bluethoot"));

        let MethodResponse::Success(Value::List(usb)) =
            call(&p, "getPrinters", value_map! { "printerType" => "usb" })
        else {
            panic!("expected a list");
        };
        assert_eq!(usb.len(), 1);

        assert_eq!(
            call(&p, "getPrinters", value_map! { "printerType" => "wifi" }),
            MethodResponse::Success(Value::List(vec![]))
        );
    }
}
