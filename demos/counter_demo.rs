//! Interactive counter client session.
//!
//! Connects to a local counter service and mirrors the service's shared
//! counter on stdout. Type `i` + Enter to request an increment, `q` + Enter
//! to quit.
//!
//! ```bash
//! cargo run --example counter_demo
//! ```

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use counter_client::{ConnectionManager, ConsoleRenderer};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("counter_client=info")),
        )
        .init();

    let manager = ConnectionManager::builder()
        .renderer(ConsoleRenderer::new())
        .build()?;

    manager.start();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "i" => {
                if let Err(e) = manager.request_increment().await {
                    eprintln!("increment refused: {e}");
                }
            }
            "q" => break,
            "" => {}
            other => eprintln!("unknown input {other:?} (use 'i' or 'q')"),
        }
    }

    manager.shutdown();
    Ok(())
}
