use crate::domain::method::MethodResponse;
use crate::plugin::registrar::{ChannelRegistry, Envelope};
use anyhow::Result;
use interprocess::local_socket::{
    traits::ListenerExt, GenericFilePath, ListenerOptions, Stream as LocalStream, ToFsName,
};
use interprocess::TryClone;
use std::io::{BufRead, BufReader, Write};
use tracing::{error, info, warn};

/// Code answered for lines that are not a valid envelope.
pub const BAD_ENVELOPE: &str = "bad_envelope";

/// Serve `registry` on a local socket, one connection at a time.
pub fn run_host(registry: &ChannelRegistry, socket_name: &str) -> Result<()> {
    let name = socket_name.to_fs_name::<GenericFilePath>()?;
    let listener = ListenerOptions::new().name(name).create_sync()?;

    info!("Channel host listening on {}", socket_name);

    for conn in listener.incoming().filter_map(|x| x.ok()) {
        info!("Client connected");
        if let Err(e) = handle_connection(registry, conn) {
            error!("Connection error: {}", e);
        }
    }

    Ok(())
}

fn handle_connection(registry: &ChannelRegistry, mut stream: LocalStream) -> Result<()> {
    let reader = BufReader::new(stream.try_clone()?);
    serve_lines(registry, reader, &mut stream)
}

/// Answer every line of `reader` on `writer` until EOF.
///
/// Lines are read as raw bytes so a line that is not UTF-8 gets an error
/// response instead of ending the session.
pub fn serve_lines<R: BufRead, W: Write>(
    registry: &ChannelRegistry,
    mut reader: R,
    writer: &mut W,
) -> Result<()> {
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            info!("Client disconnected");
            break;
        }
        let response = match std::str::from_utf8(&buffer) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => handle_line(registry, line),
            Err(e) => {
                warn!("Line is not UTF-8: {}", e);
                MethodResponse::error(BAD_ENVELOPE, format!("line is not UTF-8: {}", e))
            }
        };
        let json = serde_json::to_string(&response)? + "\n";
        writer.write_all(json.as_bytes())?;
        writer.flush()?;
    }
    Ok(())
}

/// Decode one envelope line and dispatch it.
pub fn handle_line(registry: &ChannelRegistry, line: &str) -> MethodResponse {
    match serde_json::from_str::<Envelope>(line) {
        Ok(envelope) => {
            info!("{} <- {}", envelope.channel, envelope.call.method);
            registry.dispatch(&envelope)
        }
        Err(e) => {
            warn!("Bad envelope: {}", e);
            MethodResponse::error(BAD_ENVELOPE, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::method::MethodCall;
    use crate::plugin::registrar::Registrar;

    fn registry() -> ChannelRegistry {
        let mut registry = ChannelRegistry::new();
        registry.register_channel(
            "printer",
            Box::new(|call: &MethodCall| MethodResponse::success(call.arguments.clone())),
        );
        registry
    }

    #[test]
    fn test_line_dispatches() {
        let response = handle_line(
            &registry(),
            r#"{"channel":"printer","method":"echo","arguments":[1,2]}"#,
        );
        assert_eq!(response, MethodResponse::success(vec![1, 2]));
    }

    #[test]
    fn test_garbage_line_answers_error() {
        let response = handle_line(&registry(), "not json");
        assert!(matches!(
            response,
            MethodResponse::Error { ref code, .. } if code == BAD_ENVELOPE
        ));
    }

    #[test]
    fn test_invalid_utf8_line_keeps_session_open() {
        let registry = registry();
        let mut input = Vec::new();
        input.extend_from_slice(b"{\"channel\":\"printer\",\"method\":\"a\",\"arguments\":\"a\"}\n");
        input.extend_from_slice(b"\xff\xfe garbage\n");
        input.extend_from_slice(b"{\"channel\":\"printer\",\"method\":\"b\",\"arguments\":\"b\"}\n");

        let mut output = Vec::new();
        serve_lines(&registry, std::io::Cursor::new(input), &mut output).unwrap();

        let responses: Vec<MethodResponse> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0], MethodResponse::success("a"));
        assert!(matches!(
            responses[1],
            MethodResponse::Error { ref code, .. } if code == BAD_ENVELOPE
        ));
        assert_eq!(responses[2], MethodResponse::success("b"));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let mut output = Vec::new();
        serve_lines(&registry(), std::io::Cursor::new(b"\n  \n".to_vec()), &mut output).unwrap();
        assert!(output.is_empty());
    }
}
