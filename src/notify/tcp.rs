//! Notifications over TCP as 4-byte big-endian length-prefixed bincode frames.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::time::{timeout, Duration};

use super::{Notification, Notifier};

/// Default timeout for writing one frame.
const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Maximum frame size (64 KiB); notifications are a few hundred bytes.
pub const MAX_FRAME_SIZE: u32 = 64 * 1024;

fn io_error(e: std::io::Error) -> anyhow::Error {
    match e.kind() {
        std::io::ErrorKind::UnexpectedEof => anyhow::anyhow!("Connection closed by peer"),
        std::io::ErrorKind::BrokenPipe | std::io::ErrorKind::ConnectionReset => {
            anyhow::anyhow!("Connection reset by peer")
        }
        _ => anyhow::anyhow!("I/O error: {}", e),
    }
}

/// Serialize `note` into a frame (length prefix included).
pub fn encode_frame(note: &Notification, max_frame_size: u32) -> anyhow::Result<Vec<u8>> {
    let data =
        bincode::serialize(note).map_err(|e| anyhow::anyhow!("Serialization error: {}", e))?;
    if data.len() as u64 > max_frame_size as u64 {
        return Err(anyhow::anyhow!(
            "Notification too large: {} bytes (max: {})",
            data.len(),
            max_frame_size
        ));
    }
    let mut frame = Vec::with_capacity(4 + data.len());
    frame.extend_from_slice(&(data.len() as u32).to_be_bytes());
    frame.extend_from_slice(&data);
    Ok(frame)
}

/// Pushes notifications to one connected watcher.
pub struct TcpNotifier {
    stream: TcpStream,
    send_timeout: Duration,
    max_frame_size: u32,
    label: String,
}

impl TcpNotifier {
    pub fn new(stream: TcpStream) -> Self {
        Self::with_timeout(stream, DEFAULT_SEND_TIMEOUT)
    }

    pub fn with_timeout(stream: TcpStream, send_timeout: Duration) -> Self {
        let label = match stream.peer_addr() {
            Ok(addr) => format!("tcp watcher {}", addr),
            Err(_) => "tcp watcher".to_string(),
        };
        Self {
            stream,
            send_timeout,
            max_frame_size: MAX_FRAME_SIZE,
            label,
        }
    }
}

#[async_trait::async_trait]
impl Notifier for TcpNotifier {
    async fn notify(&mut self, note: &Notification) -> anyhow::Result<()> {
        let frame = encode_frame(note, self.max_frame_size)?;
        timeout(self.send_timeout, self.stream.write_all(&frame))
            .await
            .map_err(|_| anyhow::anyhow!("Send timeout after {:?}", self.send_timeout))?
            .map_err(io_error)
    }

    fn name(&self) -> &str {
        &self.label
    }
}

/// Watcher side: reads notifications pushed by a [`TcpNotifier`].
pub struct TcpSubscriber {
    stream: TcpStream,
    max_frame_size: u32,
}

impl TcpSubscriber {
    pub fn new(stream: TcpStream) -> Self {
        Self {
            stream,
            max_frame_size: MAX_FRAME_SIZE,
        }
    }

    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self::new(stream))
    }

    /// Wait for the next notification. Watchers may idle for a whole turn, so
    /// there is no read timeout.
    pub async fn recv(&mut self) -> anyhow::Result<Notification> {
        let mut len_buf = [0u8; 4];
        self.stream
            .read_exact(&mut len_buf)
            .await
            .map_err(io_error)?;
        let len = u32::from_be_bytes(len_buf);
        if len == 0 {
            return Err(anyhow::anyhow!("Invalid frame length: 0"));
        }
        if len > self.max_frame_size {
            return Err(anyhow::anyhow!(
                "Frame too large: {} bytes (max: {})",
                len,
                self.max_frame_size
            ));
        }
        let mut buf = vec![0u8; len as usize];
        self.stream.read_exact(&mut buf).await.map_err(io_error)?;
        bincode::deserialize(&buf).map_err(|e| anyhow::anyhow!("Deserialization error: {}", e))
    }
}
