use anyhow::{Context, Result};
use thermal_printer_bridge::infrastructure::logging::init_logger;
use thermal_printer_bridge::plugin::client::ChannelClient;
use thermal_printer_bridge::plugin::host::run_host;
use thermal_printer_bridge::{register_with, ChannelRegistry, MethodCall, SettingsService, Value};
use tracing::info;

const USAGE: &str = "usage: thermal-printer-bridge [serve | call <method> [json-arguments]]";

fn main() -> Result<()> {
    let settings_service = SettingsService::new()?;
    let settings = settings_service.get().clone();
    let _log_guard = init_logger(&settings.log_settings)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("serve") => {
            info!(
                "Starting thermal printer bridge (settings: {})",
                settings_service.path().display()
            );
            let mut registry = ChannelRegistry::new();
            register_with(&mut registry, &settings);
            run_host(&registry, &settings.socket_name)
        }
        Some("call") => {
            let method = args.get(1).context(USAGE)?;
            let arguments = match args.get(2) {
                Some(json) => serde_json::from_str::<Value>(json)
                    .with_context(|| format!("Invalid JSON arguments: {}", json))?,
                None => Value::Null,
            };
            let mut client = ChannelClient::connect(&settings.socket_name)?;
            let response = client.invoke(
                &settings.channel_name,
                MethodCall::new(method.as_str(), arguments),
            )?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Some(other) => anyhow::bail!("unknown command {:?}\n{}", other, USAGE),
    }
}
