mod command;
mod config;
mod connection;
mod hid;
mod safety;
mod transport;

use anyhow::Result;
use command::CommandExecutor;
use config::{ExecutorConfig, HidConfig, InterlockConfig, TransportConfig};
use connection::{connection_loop, SessionConfig};
use hexforge_shared::limits;
use hid::{GadgetSink, HidSink, LogSink};
use safety::{Interlock, SimulatedInterlock, SysfsInterlock};
use transport::{SerialConnector, TcpConnector};

use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = ExecutorConfig::from_env()?;

    info!("HID executor starting: {}", config.device_id);
    info!(
        "  Limits: min_delay={:?} max_text={} heartbeat={:?}",
        config.min_action_delay,
        limits::MAX_TEXT_LENGTH,
        config.heartbeat_interval
    );
    info!("  Transport: {:?}", config.transport);

    let interlock: Box<dyn Interlock> = match &config.interlock {
        InterlockConfig::Sysfs { path, active_high } => {
            Box::new(SysfsInterlock::new(path.clone(), *active_high))
        }
        InterlockConfig::Simulated { engaged } => {
            warn!("Using simulated interlock (engaged={})", engaged);
            Box::new(SimulatedInterlock::new(*engaged))
        }
    };
    info!("  Interlock: {}", interlock.name());

    let sink: Box<dyn HidSink> = match &config.hid {
        HidConfig::Gadget { keyboard, mouse } => Box::new(GadgetSink::open(keyboard, mouse).await?),
        HidConfig::Log => Box::new(LogSink),
    };
    info!("  HID output: {}", sink.name());

    let mut executor = CommandExecutor::new(&config, interlock, sink);
    info!("Executor ready, mode={:?}", executor.arm_state().mode());

    let session = SessionConfig::from(&config);
    let run = async {
        match &config.transport {
            TransportConfig::Serial { port, baud } => {
                connection_loop(SerialConnector::new(port.clone(), *baud), &mut executor, session).await
            }
            TransportConfig::Tcp { address } => {
                connection_loop(TcpConnector::new(address.clone()), &mut executor, session).await
            }
        }
    };

    tokio::select! {
        _ = run => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Shutdown requested");
        }
    }

    Ok(())
}
