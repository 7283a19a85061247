//! # Entrance (login flow)
//!
//! `entrance` implements a client-side login flow without a browser: field
//! validation, password visibility toggling, a simulated authentication step and
//! persistence of the submitted credentials.
//!
//! ## Ports
//!
//! The page and its storage are injected so the flow runs headless:
//!
//! - [`login::Page`] receives toasts, the invalid-form shake and navigation.
//! - [`storage::KeyValueStore`] stands in for browser local storage. It holds
//!   string values only, like the browser does.
//! - [`remote::RemoteStore`] talks to a remote JSON document store over HTTP,
//!   behind the [`remote::DocumentStore`] port.
//!
//! ## Persistence
//!
//! Submitted credentials are appended to an unbounded list, either remote-first
//! with a local fallback or local-only (see [`persistence::PersistencePolicy`]).
//! There is no deduplication and no concurrency control: concurrent writers race
//! and the last write wins.
//!
//! Passwords are persisted in clear text to stay compatible with existing
//! stored lists. Do not deploy this against real accounts.

pub mod cli;
pub mod login;
pub mod persistence;
pub mod remote;
pub mod storage;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
