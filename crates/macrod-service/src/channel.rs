//! Channel transport between the UI layer and the bridge
//!
//! Line-oriented reader/writer tasks over any async byte streams; the
//! daemon binds them to stdin/stdout. There is at most one logical
//! channel per process, so ordering on these two tasks is the channel's
//! ordering.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use macrod_core::prelude::*;

use crate::protocol::{MethodCall, Reply};

/// Read channel lines and forward parsed calls
///
/// Unparseable lines are logged and dropped; the channel survives them.
pub async fn read_calls<R>(reader: R, tx: mpsc::Sender<MethodCall>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    while let Ok(Some(line)) = lines.next_line().await {
        trace!("channel in: {}", line);

        let Some(call) = MethodCall::parse(&line) else {
            if !line.trim().is_empty() {
                warn!("Dropping unparseable channel line");
            }
            continue;
        };

        if tx.send(call).await.is_err() {
            debug!("Call channel closed");
            break;
        }
    }

    info!("Channel reader finished");
}

/// Write replies back onto the channel, one bracket-wrapped line each
pub async fn write_replies<W>(mut writer: W, mut rx: mpsc::Receiver<Reply>)
where
    W: AsyncWrite + Unpin,
{
    while let Some(reply) = rx.recv().await {
        let encoded = reply.encode();
        debug!("channel out: {}", encoded);

        if let Err(e) = writer.write_all(encoded.as_bytes()).await {
            error!("Failed to write reply: {}", e);
            break;
        }
        if let Err(e) = writer.write_all(b"\n").await {
            error!("Failed to write newline: {}", e);
            break;
        }
        if let Err(e) = writer.flush().await {
            error!("Failed to flush channel: {}", e);
            break;
        }
    }

    debug!("Channel writer finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, BufReader};

    #[tokio::test]
    async fn test_read_calls_parses_lines() {
        let input = b"[{\"id\":1,\"method\":\"startService\"}]\n[{\"id\":2,\"method\":\"isServiceRunning\"}]\n";
        let (tx, mut rx) = mpsc::channel(8);

        read_calls(BufReader::new(&input[..]), tx).await;

        let first = rx.recv().await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(first.method, "startService");

        let second = rx.recv().await.unwrap();
        assert_eq!(second.id, 2);

        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_read_calls_drops_garbage() {
        let input = b"garbage line\n\n[{\"id\":3,\"method\":\"stopService\"}]\nnot even brackets\n";
        let (tx, mut rx) = mpsc::channel(8);

        read_calls(BufReader::new(&input[..]), tx).await;

        let only = rx.recv().await.unwrap();
        assert_eq!(only.id, 3);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_write_replies_bracket_wrapped_lines() {
        let (tx, rx) = mpsc::channel(8);
        let (mut read_half, write_half) = tokio::io::duplex(1024);

        let writer = tokio::spawn(write_replies(write_half, rx));

        tx.send(Reply::success(1, json!(true))).await.unwrap();
        tx.send(Reply::not_implemented(2, "nope")).await.unwrap();
        drop(tx);
        writer.await.unwrap();

        let mut out = String::new();
        read_half.read_to_string(&mut out).await.unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('[') && lines[0].ends_with(']'));
        assert!(lines[1].contains("NOT_IMPLEMENTED"));
    }
}
