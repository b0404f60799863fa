//! Plugin Surface
//!
//! ## Modules
//!
//! - [`dispatcher`] - the method-call handler and its factory
//! - [`registrar`] - channel registration and routing
//! - [`host`] - local socket server for a channel registry
//! - [`client`] - one-shot caller for a running host

pub mod client;
pub mod dispatcher;
pub mod host;
pub mod registrar;

pub use dispatcher::{create_plugin, ThermalPrinterPlugin};
pub use registrar::{register_with, ChannelRegistry, Registrar};
