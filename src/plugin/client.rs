use crate::domain::method::{MethodCall, MethodResponse};
use crate::plugin::registrar::Envelope;
use anyhow::{Context, Result};
use interprocess::local_socket::{traits::Stream, GenericFilePath, Stream as LocalStream, ToFsName};
use std::io::{BufRead, BufReader, Write};
use tracing::info;

/// Connection to a running channel host.
pub struct ChannelClient {
    reader: BufReader<LocalStream>,
}

impl ChannelClient {
    pub fn connect(socket_name: &str) -> Result<Self> {
        let name = socket_name.to_fs_name::<GenericFilePath>()?;
        let stream = LocalStream::connect(name)
            .with_context(|| format!("No channel host on {}", socket_name))?;
        info!("Connected to channel host");
        Ok(Self {
            reader: BufReader::new(stream),
        })
    }

    /// Send one call and wait for its response.
    pub fn invoke(&mut self, channel: &str, call: MethodCall) -> Result<MethodResponse> {
        let envelope = Envelope {
            channel: channel.to_string(),
            call,
        };
        let line = serde_json::to_string(&envelope)? + "\n";

        let stream = self.reader.get_mut();
        stream.write_all(line.as_bytes())?;
        stream.flush()?;

        let mut buffer = String::new();
        if self.reader.read_line(&mut buffer)? == 0 {
            anyhow::bail!("Channel host closed the connection");
        }
        let response = serde_json::from_str(&buffer).context("Malformed host response")?;
        Ok(response)
    }
}
