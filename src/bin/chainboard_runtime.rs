//! Production runtime: SQLite event store + gateway + heartbeat
//!
//! Bridges one local client channel to stdin/stdout: each stdin line is
//! an inbound frame, each outbound frame is printed as a JSON line.
//! Remote transports terminate elsewhere and hand the same frame text to
//! `Gateway::connect` channels.

use chainboard::config::Config;
use chainboard::gateway::{start_heartbeat_scheduler, Gateway};
use chainboard::query::QueryDispatcher;
use chainboard::rollup_core::SqliteEventStore;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    log::info!("🚀 Starting chainboard runtime");
    log::info!("   ├─ Event DB: {}", config.db_path);
    log::info!("   ├─ Heartbeat interval: {}s", config.heartbeat_interval_secs);
    log::info!("   ├─ Query timeout: {}ms", config.query_timeout_ms);
    log::info!("   └─ Default source: {}", config.default_source);

    let store = Arc::new(SqliteEventStore::new(&config.db_path)?);
    let dispatcher = Arc::new(QueryDispatcher::new(store, config.default_source.clone()));
    let gateway = Gateway::new(dispatcher, config.query_timeout_ms, config.channel_buffer);

    let heartbeat =
        start_heartbeat_scheduler(gateway.registry(), config.heartbeat_interval_secs);

    let mut channel = gateway.connect("local");
    let mut stdin_lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = stdin_lines.next_line() => {
                match line? {
                    Some(raw) => {
                        if raw.trim().is_empty() {
                            continue;
                        }
                        if channel.inbound.send(raw).await.is_err() {
                            log::warn!("⚠️  Local channel closed, exiting");
                            break;
                        }
                    }
                    None => {
                        log::info!("🔌 stdin closed, shutting down");
                        break;
                    }
                }
            }

            frame = channel.outbound.recv() => {
                match frame {
                    Some(frame) => println!("{}", serde_json::to_string(&frame)?),
                    None => {
                        log::info!("🔌 Gateway closed the local channel, shutting down");
                        break;
                    }
                }
            }
        }
    }

    heartbeat.shutdown();
    log::info!("✅ chainboard runtime stopped");
    Ok(())
}
