//! Channel Registration
//!
//! The host owns channel plumbing; a plugin only hands it a handler for a
//! named channel. `ChannelRegistry` is the registrar the bundled socket
//! host uses.

use crate::domain::method::{MethodCall, MethodResponse};
use crate::domain::settings::Settings;
use crate::plugin::dispatcher::{create_plugin, ThermalPrinterPlugin};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

pub type MethodCallHandler = Box<dyn Fn(&MethodCall) -> MethodResponse + Send + Sync>;

/// Capability a host exposes for attaching method-call handlers.
pub trait Registrar {
    fn register_channel(&mut self, channel: &str, handler: MethodCallHandler);
}

/// Attach `plugin` to the configured channel of `registrar`.
pub fn register_plugin(registrar: &mut dyn Registrar, channel: &str, plugin: ThermalPrinterPlugin) {
    info!("Registering plugin on channel {}", channel);
    registrar.register_channel(
        channel,
        Box::new(move |call: &MethodCall| plugin.handle_method_call(call)),
    );
}

/// Build the platform plugin and register it.
pub fn register_with(registrar: &mut dyn Registrar, settings: &Settings) {
    register_plugin(registrar, &settings.channel_name, create_plugin(settings));
}

/// A call addressed to a channel, as carried over the socket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub channel: String,
    #[serde(flatten)]
    pub call: MethodCall,
}

#[derive(Default)]
pub struct ChannelRegistry {
    handlers: HashMap<String, MethodCallHandler>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a call. Channels with no handler answer not-implemented.
    pub fn dispatch(&self, envelope: &Envelope) -> MethodResponse {
        match self.handlers.get(&envelope.channel) {
            Some(handler) => handler(&envelope.call),
            None => {
                debug!("No handler on channel {}", envelope.channel);
                MethodResponse::NotImplemented
            }
        }
    }

    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}

impl Registrar for ChannelRegistry {
    fn register_channel(&mut self, channel: &str, handler: MethodCallHandler) {
        self.handlers.insert(channel.to_string(), handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value::Value;

    fn envelope(channel: &str, method: &str) -> Envelope {
        Envelope {
            channel: channel.to_string(),
            call: MethodCall::new(method, Value::Null),
        }
    }

    #[test]
    fn test_registered_handler_receives_calls() {
        let mut registry = ChannelRegistry::new();
        registry.register_channel(
            "echo",
            Box::new(|call: &MethodCall| MethodResponse::success(call.method.clone())),
        );
        assert_eq!(
            registry.dispatch(&envelope("echo", "ping")),
            MethodResponse::success("ping")
        );
    }

    #[test]
    fn test_unknown_channel_is_not_implemented() {
        let registry = ChannelRegistry::new();
        assert_eq!(
            registry.dispatch(&envelope("missing", "getPlatformVersion")),
            MethodResponse::NotImplemented
        );
    }

    #[test]
    fn test_register_with_uses_configured_channel() {
        let mut registry = ChannelRegistry::new();
        let settings = Settings::default();
        register_with(&mut registry, &settings);
        assert_eq!(
            registry.channels().collect::<Vec<_>>(),
            vec!["thermal_printer_flutter"]
        );
        assert_eq!(
            registry.dispatch(&envelope("thermal_printer_flutter", "nope")),
            MethodResponse::NotImplemented
        );
        assert_eq!(
            registry.dispatch(&envelope("thermal_printer_flutter", "disconnect")),
            MethodResponse::success(true)
        );
    }

    #[test]
    fn test_envelope_json() {
        let env: Envelope = serde_json::from_str(
            r#"{"channel":"c","method":"connect","arguments":"66:22:01:2C:3D:4E"}"#,
        )
        .unwrap();
        assert_eq!(env.call.method, "connect");
        assert_eq!(env.call.arguments, Value::from("66:22:01:2C:3D:4E"));

        let env: Envelope = serde_json::from_str(r#"{"channel":"c","method":"usbprinters"}"#).unwrap();
        assert!(env.call.arguments.is_null());
    }
}
