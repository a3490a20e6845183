//! TCP channel: socket ownership, read loop, outbound queue.
//!
//! Each feed channel (admin, quotes, historical) is one `TcpChannel`
//! driven by its own task. The read loop never blocks on the handler
//! or on outbound sends; a socket error or peer close terminates only
//! the affected channel. Reconnection is deliberately not handled
//! here; it is a policy decision for an outer layer.

use crate::error::{NetError, NetResult};
use crate::state::ChannelState;
use parking_lot::RwLock;
use std::io::ErrorKind;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{lookup_host, TcpStream};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Read buffer size. Matches observed upstream framing; reads larger
/// than this simply complete across multiple loop iterations.
pub const READ_BUFFER_SIZE: usize = 8192;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Receives each completed socket read as a decoded chunk.
///
/// Handlers run synchronously inside the read loop and must stay
/// inexpensive; anything slow belongs on the far side of an event
/// channel.
pub trait ChunkHandler: Send + 'static {
    fn on_chunk(&mut self, chunk: &str);
}

/// Clonable sender for one channel's outbound queue.
///
/// Sends are fire-and-forget: a send after the channel has gone down
/// is logged and dropped, never an error for the caller.
#[derive(Clone)]
pub struct ChannelHandle {
    name: &'static str,
    tx: mpsc::UnboundedSender<String>,
    state: Arc<RwLock<ChannelState>>,
}

impl ChannelHandle {
    /// Build a handle from its parts.
    ///
    /// `TcpChannel::connect` does this for live channels; tests wire
    /// handles to loopback queues instead.
    pub fn new(
        name: &'static str,
        tx: mpsc::UnboundedSender<String>,
        state: Arc<RwLock<ChannelState>>,
    ) -> Self {
        Self { name, tx, state }
    }

    /// Queue a command for transmission.
    pub fn send(&self, command: impl Into<String>) {
        let command = command.into();
        if self.tx.send(command).is_err() {
            warn!(channel = self.name, "Send on closed channel dropped");
        }
    }

    pub fn state(&self) -> ChannelState {
        *self.state.read()
    }

    pub fn set_state(&self, state: ChannelState) {
        *self.state.write() = state;
    }

    pub fn is_connected(&self) -> bool {
        self.state() != ChannelState::Disconnected
    }
}

/// One TCP connection to the feed daemon.
pub struct TcpChannel {
    name: &'static str,
    stream: TcpStream,
    state: Arc<RwLock<ChannelState>>,
    outbound_rx: mpsc::UnboundedReceiver<String>,
    shutdown: CancellationToken,
}

impl TcpChannel {
    /// Connect to `host:port`.
    ///
    /// Refused, timed-out, and unresolvable targets are reported as
    /// distinct errors; all of them leave the channel `Disconnected`
    /// and none are fatal to the process.
    pub async fn connect(
        name: &'static str,
        host: &str,
        port: u16,
        shutdown: CancellationToken,
    ) -> NetResult<(TcpChannel, ChannelHandle)> {
        let target = format!("{host}:{port}");

        let addr = lookup_host(&target)
            .await
            .map_err(|e| NetError::Resolve(format!("{target}: {e}")))?
            .next()
            .ok_or_else(|| NetError::Resolve(target.clone()))?;

        let stream = match tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect(addr)).await {
            Err(_) => return Err(NetError::ConnectTimeout(target)),
            Ok(Err(e)) if e.kind() == ErrorKind::ConnectionRefused => {
                return Err(NetError::Refused(target))
            }
            Ok(Err(e)) => return Err(NetError::Io(e)),
            Ok(Ok(stream)) => stream,
        };
        // Quote traffic is latency sensitive; disable Nagle.
        let _ = stream.set_nodelay(true);

        info!(channel = name, target = %target, "Channel connected");

        let state = Arc::new(RwLock::new(ChannelState::Connected));
        let (tx, outbound_rx) = mpsc::unbounded_channel();
        let handle = ChannelHandle::new(name, tx, state.clone());
        let channel = TcpChannel {
            name,
            stream,
            state,
            outbound_rx,
            shutdown,
        };
        Ok((channel, handle))
    }

    /// Drive the channel until disconnect or shutdown.
    ///
    /// The loop awaits exactly one of: the next socket read, the next
    /// outbound command, or cancellation. Zero bytes read or a read
    /// error transitions the channel to `Disconnected` and ends the
    /// loop. A failed write is logged and does not stop reading.
    pub async fn run<H: ChunkHandler>(self, mut handler: H) {
        let TcpChannel {
            name,
            stream,
            state,
            mut outbound_rx,
            shutdown,
        } = self;
        let (mut reader, mut writer) = stream.into_split();
        let mut buf = vec![0u8; READ_BUFFER_SIZE];
        let mut outbound_open = true;

        loop {
            tokio::select! {
                () = shutdown.cancelled() => {
                    info!(channel = name, "Shutdown requested");
                    *state.write() = ChannelState::Disconnected;
                    return;
                }

                res = reader.read(&mut buf) => match res {
                    Ok(0) => {
                        info!(channel = name, "Peer closed connection");
                        *state.write() = ChannelState::Disconnected;
                        return;
                    }
                    Ok(n) => {
                        let chunk = String::from_utf8_lossy(&buf[..n]);
                        debug!(channel = name, bytes = n, "Read completed");
                        handler.on_chunk(&chunk);
                    }
                    Err(e) => {
                        error!(channel = name, error = %e, "Read failed");
                        *state.write() = ChannelState::Disconnected;
                        return;
                    }
                },

                cmd = outbound_rx.recv(), if outbound_open => match cmd {
                    Some(cmd) => {
                        if let Err(e) = writer.write_all(cmd.as_bytes()).await {
                            warn!(channel = name, error = %e, "Write failed");
                        }
                    }
                    None => outbound_open = false,
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use tokio::net::TcpListener;

    struct Collector {
        chunks: Arc<Mutex<Vec<String>>>,
    }

    impl ChunkHandler for Collector {
        fn on_chunk(&mut self, chunk: &str) {
            self.chunks.lock().push(chunk.to_string());
        }
    }

    async fn local_listener() -> (TcpListener, String, u16) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        (listener, addr.ip().to_string(), addr.port())
    }

    #[tokio::test]
    async fn test_connect_refused_is_nonfatal_error() {
        // Bind then drop to obtain a port with no listener.
        let (listener, host, port) = local_listener().await;
        drop(listener);

        let result = TcpChannel::connect("test", &host, port, CancellationToken::new()).await;
        assert!(matches!(result, Err(NetError::Refused(_))));
    }

    #[tokio::test]
    async fn test_resolve_failure() {
        let result =
            TcpChannel::connect("test", "no-such-host.invalid", 9999, CancellationToken::new())
                .await;
        assert!(matches!(result, Err(NetError::Resolve(_))));
    }

    #[tokio::test]
    async fn test_read_loop_delivers_chunks_and_detects_close() {
        let (listener, host, port) = local_listener().await;
        let server = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            sock.write_all(b"S,STATS,ok\r\n").await.unwrap();
            // Closing the socket ends the channel's read loop.
        });

        let (channel, handle) =
            TcpChannel::connect("test", &host, port, CancellationToken::new())
                .await
                .unwrap();
        assert_eq!(handle.state(), ChannelState::Connected);

        let chunks = Arc::new(Mutex::new(Vec::new()));
        let collector = Collector {
            chunks: chunks.clone(),
        };
        channel.run(collector).await;
        server.await.unwrap();

        let received: String = chunks.lock().concat();
        assert_eq!(received, "S,STATS,ok\r\n");
        assert_eq!(handle.state(), ChannelState::Disconnected);
    }

    #[tokio::test]
    async fn test_outbound_commands_reach_peer() {
        let (listener, host, port) = local_listener().await;
        let server = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 64];
            let n = sock.read(&mut buf).await.unwrap();
            String::from_utf8_lossy(&buf[..n]).to_string()
        });

        let shutdown = CancellationToken::new();
        let (channel, handle) = TcpChannel::connect("test", &host, port, shutdown.clone())
            .await
            .unwrap();
        let chunks = Arc::new(Mutex::new(Vec::new()));
        let task = tokio::spawn(channel.run(Collector {
            chunks: chunks.clone(),
        }));

        handle.send("wMSFT\r\n");
        let written = server.await.unwrap();
        assert_eq!(written, "wMSFT\r\n");

        shutdown.cancel();
        task.await.unwrap();
        assert_eq!(handle.state(), ChannelState::Disconnected);
    }

    #[tokio::test]
    async fn test_send_after_close_is_dropped() {
        let (listener, host, port) = local_listener().await;
        tokio::spawn(async move {
            let _ = listener.accept().await;
        });

        let shutdown = CancellationToken::new();
        let (channel, handle) = TcpChannel::connect("test", &host, port, shutdown.clone())
            .await
            .unwrap();
        let task = tokio::spawn(channel.run(Collector {
            chunks: Arc::new(Mutex::new(Vec::new())),
        }));
        shutdown.cancel();
        task.await.unwrap();

        // Must not panic or error; the failure is logged and swallowed.
        handle.send("wIBM\r\n");
    }
}
