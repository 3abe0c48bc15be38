use std::fs::{self, OpenOptions};
use std::io;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use calc_base::config::ClientConfig;
use calc_base::constants::LOGS_DIR;

/// Route `tracing` events to `{store}/logs/client.log`.
/// The terminal belongs to the UI, so nothing is written to stdout.
pub fn init(config: &ClientConfig) -> io::Result<()> {
    let dir = config.store_dir.join(LOGS_DIR);
    fs::create_dir_all(&dir)?;
    let file = OpenOptions::new().create(true).append(true).open(dir.join("client.log"))?;

    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(io::Error::other)
}
