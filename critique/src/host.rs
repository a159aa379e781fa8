//! Stdio transport for the host bridge.
//!
//! The editor extension spawns critique and speaks newline-delimited JSON:
//! host messages arrive on stdin, session messages leave on stdout. The TUI
//! draws on stderr (see `tui.rs`) so the protocol stream stays clean.
//!
//! Inbound lines are decoded and pushed onto the bridge's inbound queue in
//! arrival order. Unknown kinds are dropped here; malformed lines are logged
//! and skipped. When stdin closes the reader drops its sender, so the event
//! loop sees the inbound queue end.

use critique_core::bridge::{decode_line, encode_line, HostMessage, SessionMessage};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

/// Spawns the stdin reader and stdout writer tasks.
pub fn spawn_stdio_transport(
    inbound_tx: UnboundedSender<HostMessage>,
    outbound_rx: UnboundedReceiver<SessionMessage>,
) {
    tokio::spawn(read_host_messages(
        BufReader::new(tokio::io::stdin()),
        inbound_tx,
    ));
    tokio::spawn(write_session_messages(tokio::io::stdout(), outbound_rx));
}

/// Reads host lines until EOF, forwarding each recognised message.
///
/// Lines that are not UTF-8 are skipped like any other malformed line; only
/// EOF or a read error ends the loop.
pub async fn read_host_messages<R>(mut reader: R, inbound_tx: UnboundedSender<HostMessage>)
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let Ok(line) = std::str::from_utf8(&buf) else {
                    warn!(bytes = buf.len(), "skipping host line that is not valid UTF-8");
                    continue;
                };
                match decode_line(line.trim_end_matches(['\n', '\r'])) {
                    Some(HostMessage::Unknown) | None => {}
                    Some(msg) => {
                        if inbound_tx.send(msg).is_err() {
                            return;
                        }
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "host stdin read failed");
                break;
            }
        }
    }
    info!("host closed stdin");
}

/// Writes each session message as one JSON line, flushing after every line.
pub async fn write_session_messages<W>(mut writer: W, mut rx: UnboundedReceiver<SessionMessage>)
where
    W: AsyncWrite + Unpin,
{
    while let Some(msg) = rx.recv().await {
        let mut line = encode_line(&msg);
        line.push('\n');
        if let Err(e) = writer.write_all(line.as_bytes()).await {
            warn!(error = %e, "host stdout write failed");
            break;
        }
        if let Err(e) = writer.flush().await {
            warn!(error = %e, "host stdout flush failed");
            break;
        }
    }
}
