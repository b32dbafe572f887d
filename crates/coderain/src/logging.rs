//! File logging, enabled by `CODERAIN_LOG`.

use std::fs::{self, File};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `debug`.
const LOG_ENV: &str = "CODERAIN_LOG";

const LOG_FILE: &str = "coderain.log";

/// Install the global subscriber when `CODERAIN_LOG` is set.
///
/// The terminal belongs to the UI, so logs go to a file in the platform
/// data directory.
pub fn init() -> color_eyre::Result<()> {
    let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) else {
        return Ok(());
    };
    let Some(dirs) = coderain_config::project_dirs() else {
        return Ok(());
    };

    let dir = dirs.data_local_dir();
    fs::create_dir_all(dir)?;
    let file = File::create(dir.join(LOG_FILE))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
