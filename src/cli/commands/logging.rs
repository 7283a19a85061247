use clap::{builder::ValueParser, Arg, ArgAction, Command};

pub const ARG_VERBOSITY: &str = "verbosity";

/// Level names in verbosity order; the index is the `-v` count.
pub const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Accepts a level name or its index in [`LEVELS`].
#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(|level: &str| -> std::result::Result<u8, String> {
        let level = level.trim().to_lowercase();

        let index = match level.parse::<usize>() {
            Ok(index) if index < LEVELS.len() => Some(index),
            Ok(_) => None,
            Err(_) => LEVELS.iter().position(|name| *name == level),
        };

        index
            .and_then(|index| u8::try_from(index).ok())
            .ok_or_else(|| {
                format!(
                    "invalid log level {level}, expected one of {} or 0-{}",
                    LEVELS.join("|"),
                    LEVELS.len() - 1
                )
            })
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Log verbosity, repeat -v or set error|warn|info|debug|trace (0-4), default: error")
            .env("ENTRANCE_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}
