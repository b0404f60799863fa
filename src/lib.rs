//! Thermal Printer Bridge
//!
//! Exposes local printers and Bluetooth devices to a cross-platform
//! application over a named method channel.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │     Registrar (host channel / socket host)   │
//! └─────────────────────┬────────────────────────┘
//!                       │ MethodCall
//!                       ▼
//! ┌──────────────────────────────────────────────┐
//! │   ThermalPrinterPlugin (decode + dispatch)   │
//! └─────────────────────┬────────────────────────┘
//!                       │
//!                       ▼
//! ┌──────────────────────────────────────────────┐
//! │  PlatformBackend: Win32 spooler + Bluetooth  │
//! └──────────────────────────────────────────────┘
//! ```

pub mod domain;
pub mod infrastructure;
pub mod plugin;

pub use domain::error::{BridgeError, Result};
pub use domain::method::{MethodCall, MethodResponse};
pub use domain::settings::{Settings, SettingsService};
pub use domain::value::Value;
pub use plugin::{create_plugin, register_with, ChannelRegistry, Registrar, ThermalPrinterPlugin};
