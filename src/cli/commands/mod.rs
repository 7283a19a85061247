pub mod logging;
pub mod storage;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const ARG_USERNAME: &str = "username";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_SUBMIT_DELAY_MS: &str = "submit-delay-ms";
pub const ARG_REDIRECT_DELAY_MS: &str = "redirect-delay-ms";
pub const ARG_REDIRECT_TO: &str = "redirect-to";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("entrance")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_USERNAME)
                .short('u')
                .long(ARG_USERNAME)
                .help("Username to log in with")
                .env("ENTRANCE_USERNAME"),
        )
        .arg(
            Arg::new(ARG_PASSWORD)
                .short('p')
                .long(ARG_PASSWORD)
                .help("Password to log in with")
                .env("ENTRANCE_PASSWORD")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_SUBMIT_DELAY_MS)
                .long(ARG_SUBMIT_DELAY_MS)
                .help("Simulated authentication latency in milliseconds")
                .env("ENTRANCE_SUBMIT_DELAY_MS")
                .default_value("1500")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_REDIRECT_DELAY_MS)
                .long(ARG_REDIRECT_DELAY_MS)
                .help("Delay between the success message and the redirect, in milliseconds")
                .env("ENTRANCE_REDIRECT_DELAY_MS")
                .default_value("1500")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_REDIRECT_TO)
                .long(ARG_REDIRECT_TO)
                .help("Resource opened after a successful login")
                .env("ENTRANCE_REDIRECT_TO")
                .default_value(crate::login::controller::DEFAULT_REDIRECT_TARGET),
        );

    let command = storage::with_args(command);
    logging::with_args(command)
}
