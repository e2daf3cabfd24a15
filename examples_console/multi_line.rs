use multiline_console::format::{LevelPrefix, Timestamped};
use multiline_console::init::init_tracing;
use multiline_console::{MultiLineConsole, TransportConfig};
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let transport = MultiLineConsole::new(
        TransportConfig::from_env()
            .format(Timestamped::new(LevelPrefix::new().uppercase(true)))
            .stderr_levels(["error", "warn"]),
    )?;
    let transport = init_tracing(transport)?;

    let mut logged = transport.subscribe();
    tokio::spawn(async move {
        while let Some(record) = logged.recv().await {
            eprintln!("[logged] level={} target={:?}", record.level, record.target);
        }
    });

    info!("starting service\nlistening on 0.0.0.0:8080");
    warn!(retries = 3, "upstream slow\nfalling back to cache");
    error!("request failed:\n  caused by: connection reset\n  caused by: broken pipe");

    sleep(Duration::from_millis(100)).await;
    Ok(())
}
