// Operator input: newline-delimited JSON commands forwarded to the session loop.

use super::protocol::OperatorMessage;
use crate::use_cases::MapCommand;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Reads commands until EOF, a read error, or the session hanging up.
///
/// Malformed lines are logged and skipped. Drawn shapes travel inside their
/// command, so nothing touches the session's tools ahead of the loop.
pub async fn read_operator_commands<R>(reader: R, command_tx: mpsc::Sender<MapCommand>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(error) => {
                warn!(%error, "failed to read operator input");
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let message: OperatorMessage = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(error) => {
                warn!(%error, line, "malformed operator command, skipping");
                continue;
            }
        };
        debug!(?message, "operator command");

        if command_tx.send(message.into()).await.is_err() {
            debug!("session closed, stop reading operator input");
            break;
        }
    }
}
