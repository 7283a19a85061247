//! Authentication step of the submission pipeline.

use crate::persistence::{CredentialPersistence, Destination};
use crate::storage::{CredentialEntry, StorageError};
use secrecy::{ExposeSecret, SecretString};
use std::{future::Future, time::Duration};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{info, instrument};

/// Emulated network latency before credentials are accepted.
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(1500);

pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful!";

#[derive(Debug, Error)]
pub enum LoginError {
    /// Reserved for real backends; the simulated authenticator never rejects.
    #[error("{0}")]
    Authentication(String),
    #[error("could not save credentials: {0}")]
    Persistence(#[from] StorageError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub message: String,
    pub stored_in: Destination,
}

/// Accepts or rejects a validated username/password pair.
pub trait Authenticator {
    fn authenticate(
        &self,
        username: &str,
        password: &SecretString,
    ) -> impl Future<Output = Result<LoginOutcome, LoginError>> + Send;
}

/// Accepts any credentials after a fixed delay and records them.
#[derive(Debug, Clone)]
pub struct SimulatedAuthenticator {
    delay: Duration,
    persistence: CredentialPersistence,
    user_agent: Option<String>,
}

impl SimulatedAuthenticator {
    #[must_use]
    pub fn new(persistence: CredentialPersistence) -> Self {
        Self {
            delay: DEFAULT_SUBMIT_DELAY,
            persistence,
            user_agent: None,
        }
    }

    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// User agent recorded with each entry.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

impl Authenticator for SimulatedAuthenticator {
    #[instrument(skip(self, password), fields(password = "***"))]
    async fn authenticate(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<LoginOutcome, LoginError> {
        info!("login attempt");

        sleep(self.delay).await;

        let entry = CredentialEntry::new(username, password.expose_secret(), self.user_agent.clone());
        let stored_in = self.persistence.persist(entry).await?;

        Ok(LoginOutcome {
            message: LOGIN_SUCCESS_MESSAGE.to_string(),
            stored_in,
        })
    }
}
