use chrono::{Local, NaiveDateTime};
use fern::colors::{Color, ColoredLevelConfig};
use log::{Level, LevelFilter};

pub fn set_hook() {
    // setup a panic hook to easily exit the program on panic
    std::panic::set_hook(Box::new(|panic_info| {
        let message = if let Some(message) = panic_info.payload().downcast_ref::<String>() {
            message.clone()
        } else if let Some(message) = panic_info.payload().downcast_ref::<&str>() {
            (*message).to_string()
        } else {
            format!("{panic_info:?}")
        };

        log::error!("{message}");

        #[cfg(debug_assertions)]
        log::debug!("{panic_info}");

        std::process::exit(1);
    }));
}

pub fn logs(verbose: bool) {
    let colors = ColoredLevelConfig::new()
        .info(Color::BrightCyan)
        .error(Color::BrightRed)
        .warn(Color::BrightYellow)
        .debug(Color::BrightWhite);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            let level = record.level();

            match level {
                Level::Debug => out.finish(format_args!(
                    "{} [{}]: {}",
                    colors.color(Level::Debug).to_string().to_lowercase(),
                    record.target(),
                    message
                )),

                level => out.finish(format_args!(
                    "{}: {}",
                    colors.color(level).to_string().to_lowercase(),
                    message
                )),
            }
        })
        .level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .chain(
            fern::Dispatch::new()
                .filter(|metadata| !matches!(metadata.level(), Level::Error | Level::Warn))
                .chain(std::io::stdout()),
        )
        .chain(
            fern::Dispatch::new()
                .level(log::LevelFilter::Error)
                .level(log::LevelFilter::Warn)
                .chain(std::io::stderr()),
        )
        .apply()
        .ok();
}

pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats a clock reading the way the remote API expects `createdAt`
/// to be sent: zero padded, 24 hour time.
pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(CREATED_AT_FORMAT).to_string()
}

/// The `createdAt` value for a method created right now, from the local clock.
pub fn current_timestamp() -> String {
    format_timestamp(Local::now().naive_local())
}

/// Renders a stored `createdAt` string as a short human readable date.
/// Values that don't parse are shown as-is rather than dropped.
pub fn human_date(created_at: &str) -> String {
    NaiveDateTime::parse_from_str(created_at, CREATED_AT_FORMAT)
        .map(|at| at.format("%b %d, %Y").to_string())
        .unwrap_or_else(|_| created_at.to_string())
}
