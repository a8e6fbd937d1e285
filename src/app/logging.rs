//! logging stuff
use {
    crate::{config::options::LoggingFormat, getopt, utils::string_to_log_level},
    color_eyre::Result,
    tracing::{debug, subscriber},
    tracing_subscriber::FmtSubscriber,
};

/// setup logging from the loaded config
///
/// # Errors
///
/// returns an error if a global subscriber was already set
pub fn setup() -> Result<()> {
    if !getopt!(logging.enable) {
        return Ok(());
    }

    let max_level = string_to_log_level(&getopt!(logging.level));
    let subscriber = FmtSubscriber::builder()
        .with_max_level(max_level)
        .with_writer(std::io::stderr)
        .with_ansi(getopt!(logging.ansi))
        .with_line_number(getopt!(logging.line_numbers))
        .with_target(getopt!(logging.event_targets));

    match getopt!(logging.format) {
        LoggingFormat::Pretty => {
            subscriber::set_global_default(subscriber.pretty().finish())?;
        }
        LoggingFormat::Compact => {
            subscriber::set_global_default(subscriber.compact().finish())?;
        }
    }

    debug!("Logging setup successfully");
    Ok(())
}
