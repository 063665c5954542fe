use std::fs::File;

use colored::Colorize;
use middleware::logger::LoggerMiddleware;

pub mod middleware {
    pub mod logger;
}

const LOG_FILE: &str = "subscriptions.log";

/// Installs the global logger: colored lines on stdout plus a plain log file.
/// Production runs at `Info`, every other environment at `Debug`.
pub fn setup(is_production: bool) -> Result<(), fern::InitError> {
    File::create(LOG_FILE).map_err(fern::InitError::Io)?;

    fern::Dispatch::new()
        .format(|out, message, record| {
            let color = match record.level() {
                log::Level::Info => "green",
                log::Level::Warn => "yellow",
                log::Level::Error => "red",
                log::Level::Debug => "magenta",
                log::Level::Trace => "bright black",
            };
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%H:%M:%S]"),
                record.target(),
                record.level().to_string().color(color),
                message
            ))
        })
        .level(level_for(is_production))
        .level_for("sqlx", log::LevelFilter::Warn)
        .level_for("actix_server", log::LevelFilter::Warn)
        .level_for("hyper", log::LevelFilter::Off)
        .chain(std::io::stdout())
        .chain(fern::log_file(LOG_FILE)?)
        .apply()?;
    Ok(())
}

pub fn middleware(enabled: bool) -> LoggerMiddleware {
    LoggerMiddleware::new(enabled)
}

fn level_for(is_production: bool) -> log::LevelFilter {
    if is_production {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Debug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_environment() {
        assert_eq!(level_for(true), log::LevelFilter::Info);
        assert_eq!(level_for(false), log::LevelFilter::Debug);
    }
}
