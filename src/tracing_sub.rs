use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing::Level;

const LOG_BASENAME: &str = "term-desk.log";

/// Initialize the global tracing subscriber.
///
/// Logs go to a file under the config directory; the terminal itself is in
/// raw alternate-screen mode, so stderr is only a fallback for when the log
/// file cannot be opened. Safe to call more than once; later calls are
/// no-ops for the global subscriber.
pub fn init_default(dir: &Path) {
    let _ = fs::create_dir_all(dir);
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_BASENAME));
    match file {
        Ok(file) => {
            let _ = tracing_subscriber::fmt()
                .with_max_level(Level::DEBUG)
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .with_target(false)
                .try_init();
        }
        Err(_) => {
            let _ = tracing_subscriber::fmt()
                .with_max_level(Level::DEBUG)
                .with_writer(io::stderr)
                .with_target(false)
                .try_init();
        }
    }
}
