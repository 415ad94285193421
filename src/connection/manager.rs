//! Session loop with automatic reconnection

use crate::command::CommandExecutor;
use crate::config::ExecutorConfig;
use crate::transport::TransportConnector;
use anyhow::{anyhow, Result};
use hexforge_shared::codec::{self, LineDecoder};
use hexforge_shared::Outbound;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Timing and framing parameters for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub heartbeat_interval: Duration,
    pub max_line_length: usize,
    pub reconnect_delay: Duration,
    pub max_reconnect_delay: Duration,
}

impl From<&ExecutorConfig> for SessionConfig {
    fn from(config: &ExecutorConfig) -> Self {
        Self {
            heartbeat_interval: config.heartbeat_interval,
            max_line_length: config.max_line_length,
            reconnect_delay: config.reconnect_delay,
            max_reconnect_delay: config.max_reconnect_delay,
        }
    }
}

/// Main connection loop with reconnection logic.
///
/// The executor outlives every session, so arm state and the rate-limit
/// baseline carry over a reconnect.
pub async fn connection_loop<C: TransportConnector>(
    connector: C,
    executor: &mut CommandExecutor,
    config: SessionConfig,
) {
    let mut reconnect_delay = config.reconnect_delay;

    loop {
        match connector.connect().await {
            Ok(stream) => {
                info!("Connected via {} ({})", connector.name(), connector.target());
                reconnect_delay = config.reconnect_delay;

                if let Err(reason) = handle_session(stream, executor, &config).await {
                    warn!("Disconnected: {}", reason);
                }
            }
            Err(e) => {
                error!("Connection failed via {}: {:#}", connector.name(), e);
            }
        }

        debug!("Reconnecting in {:?}", reconnect_delay);
        tokio::time::sleep(reconnect_delay).await;

        // Exponential backoff
        reconnect_delay = std::cmp::min(reconnect_delay * 2, config.max_reconnect_delay);
    }
}

/// Handle an active session until the stream closes or fails.
///
/// Lines are handled strictly one at a time. While an action dispatches the
/// heartbeat is not polled; a late tick fires once afterwards rather than
/// bursting.
pub async fn handle_session<S>(
    stream: S,
    executor: &mut CommandExecutor,
    config: &SessionConfig,
) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (mut reader, mut writer) = tokio::io::split(stream);

    let mut decoder = LineDecoder::with_max_len(config.max_line_length);
    let mut read_buf = vec![0u8; 1024];

    let mut heartbeat = interval(config.heartbeat_interval);
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = heartbeat.tick() => {
                write_message(&mut writer, &executor.heartbeat()).await?;
            }

            result = reader.read(&mut read_buf) => {
                let n = result?;
                if n == 0 {
                    return Err(anyhow!("Host closed stream"));
                }
                decoder.extend(&read_buf[..n]);

                while let Some(line) = decoder.decode_next() {
                    let response = executor.handle_line(&line).await;
                    write_message(&mut writer, &response).await?;
                }
            }
        }
    }
}

async fn write_message<W>(writer: &mut W, message: &Outbound) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let encoded = codec::encode(message)?;
    writer.write_all(&encoded).await?;
    writer.flush().await?;
    Ok(())
}
