use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;
use std::{path::PathBuf, time::Duration};

pub const ARG_POLICY: &str = "policy";
pub const ARG_REMOTE_URL: &str = "remote-url";
pub const ARG_REMOTE_KEY: &str = "remote-key";
pub const ARG_STORAGE: &str = "storage";
pub const ARG_REQUEST_TIMEOUT: &str = "request-timeout";

pub const POLICY_LOCAL: &str = "local";
pub const POLICY_REMOTE: &str = "remote";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_POLICY)
                .long(ARG_POLICY)
                .help("Where submitted credentials are kept: local storage only, or the remote store with local fallback")
                .env("ENTRANCE_POLICY")
                .value_parser([POLICY_LOCAL, POLICY_REMOTE])
                .default_value(POLICY_LOCAL),
        )
        .arg(
            Arg::new(ARG_REMOTE_URL)
                .long(ARG_REMOTE_URL)
                .help("Remote document store URL, example: https://store.tld/v3/b/<bin-id>")
                .env("ENTRANCE_REMOTE_URL")
                .required_if_eq(ARG_POLICY, POLICY_REMOTE),
        )
        .arg(
            Arg::new(ARG_REMOTE_KEY)
                .long(ARG_REMOTE_KEY)
                .help("Remote document store master key, sent as X-Master-Key")
                .env("ENTRANCE_REMOTE_KEY")
                .hide_env_values(true)
                .required_if_eq(ARG_POLICY, POLICY_REMOTE),
        )
        .arg(
            Arg::new(ARG_STORAGE)
                .long(ARG_STORAGE)
                .help("Path of the JSON file used as local storage")
                .env("ENTRANCE_STORAGE")
                .default_value("entrance-storage.json")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new(ARG_REQUEST_TIMEOUT)
                .long(ARG_REQUEST_TIMEOUT)
                .help("Remote store request timeout in seconds")
                .env("ENTRANCE_REQUEST_TIMEOUT")
                .default_value("10")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}

#[derive(Debug)]
pub enum Policy {
    Local,
    Remote {
        url: String,
        master_key: SecretString,
    },
}

#[derive(Debug)]
pub struct Options {
    pub policy: Policy,
    pub storage_path: PathBuf,
    pub request_timeout: Duration,
}

impl Options {
    /// # Errors
    /// Returns an error if the remote policy is selected without its URL or key.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let policy = match matches.get_one::<String>(ARG_POLICY).map(String::as_str) {
            Some(POLICY_REMOTE) => Policy::Remote {
                url: matches
                    .get_one::<String>(ARG_REMOTE_URL)
                    .cloned()
                    .context("missing required argument: --remote-url")?,
                master_key: matches
                    .get_one::<String>(ARG_REMOTE_KEY)
                    .cloned()
                    .map(SecretString::from)
                    .context("missing required argument: --remote-key")?,
            },
            _ => Policy::Local,
        };

        let storage_path = matches
            .get_one::<PathBuf>(ARG_STORAGE)
            .cloned()
            .context("missing required argument: --storage")?;

        let request_timeout = Duration::from_secs(
            matches
                .get_one::<u64>(ARG_REQUEST_TIMEOUT)
                .copied()
                .unwrap_or(10),
        );

        Ok(Self {
            policy,
            storage_path,
            request_timeout,
        })
    }
}
