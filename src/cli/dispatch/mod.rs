//! Map parsed command-line arguments to the action the binary runs.

use crate::cli::actions::{login::Args, Action};
use crate::cli::commands::{
    storage, ARG_PASSWORD, ARG_REDIRECT_DELAY_MS, ARG_REDIRECT_TO, ARG_SUBMIT_DELAY_MS,
    ARG_USERNAME,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::time::Duration;

/// Map validated CLI matches to a login action.
///
/// Missing credentials are passed on empty so the form reports them.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let storage_opts = storage::Options::parse(matches)?;

    let ms = |name: &str| -> Result<Duration> {
        matches
            .get_one::<u64>(name)
            .copied()
            .map(Duration::from_millis)
            .with_context(|| format!("missing required argument: --{name}"))
    };

    Ok(Action::Login(Args {
        username: matches
            .get_one::<String>(ARG_USERNAME)
            .cloned()
            .unwrap_or_default(),
        password: SecretString::from(
            matches
                .get_one::<String>(ARG_PASSWORD)
                .cloned()
                .unwrap_or_default(),
        ),
        submit_delay: ms(ARG_SUBMIT_DELAY_MS)?,
        redirect_delay: ms(ARG_REDIRECT_DELAY_MS)?,
        redirect_to: matches
            .get_one::<String>(ARG_REDIRECT_TO)
            .cloned()
            .context("missing required argument: --redirect-to")?,
        policy: storage_opts.policy,
        storage_path: storage_opts.storage_path,
        request_timeout: storage_opts.request_timeout,
    }))
}
