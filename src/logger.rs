use anyhow::Result;

use crate::config::Log;

/// Installs the process-wide logger at the configured level.
///
/// Fails if a logger has already been installed.
pub fn init(config: &Log) -> Result<()> {
    simple_logger::init_with_level(config.level.as_level())?;
    Ok(())
}
