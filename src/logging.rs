use std::{error::Error, path::Path, time::SystemTime};

use log::LevelFilter;

/// Sends log records to stderr and, when given, to `log_file`. Panics are logged too.
pub fn init_logging(level: LevelFilter, log_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339_seconds(SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr());

    if let Some(path) = log_file {
        dispatch = dispatch.chain(fern::log_file(path)?);
    }

    dispatch.apply()?;
    log_panics::init();

    Ok(())
}
