use crate::cli::commands::storage::Policy;
use crate::login::{
    Field, FlowOptions, LoginController, NavigationError, Page, SimulatedAuthenticator,
    SubmitOutcome, Toast, ToastKind,
};
use crate::persistence::{CredentialPersistence, PersistencePolicy};
use crate::remote::RemoteStore;
use crate::storage::{FileStore, KeyValueStore};
use anyhow::{anyhow, Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::{path::PathBuf, sync::Arc, time::Duration};
use tracing::{debug, info};

#[derive(Debug)]
pub struct Args {
    pub username: String,
    pub password: SecretString,
    pub submit_delay: Duration,
    pub redirect_delay: Duration,
    pub redirect_to: String,
    pub policy: Policy,
    pub storage_path: PathBuf,
    pub request_timeout: Duration,
}

/// Prints page effects to the terminal.
#[derive(Debug, Default)]
pub struct TerminalPage;

impl Page for TerminalPage {
    fn toast(&mut self, toast: Toast) {
        match toast.kind {
            ToastKind::Success => println!("{}", toast.message),
            ToastKind::Error => eprintln!("{}", toast.message),
        }
    }

    fn shake(&mut self) {
        debug!("form shake");
    }

    fn navigate(&mut self, target: &str) -> Result<(), NavigationError> {
        println!("-> {target}");
        Ok(())
    }
}

/// Build the persistence policy from the parsed options.
///
/// # Errors
/// Returns an error if the remote store endpoint is invalid.
pub fn persistence_policy(policy: Policy, request_timeout: Duration) -> Result<PersistencePolicy> {
    match policy {
        Policy::Local => Ok(PersistencePolicy::LocalOnly),
        Policy::Remote { url, master_key } => {
            let remote = RemoteStore::new(&url, master_key, request_timeout)
                .context("invalid remote store configuration")?;
            Ok(PersistencePolicy::RemoteFirst(Arc::new(remote)))
        }
    }
}

/// Run one login attempt with the given credentials.
///
/// # Errors
/// Returns an error if the form is rejected, the login fails or configuration is invalid.
pub async fn execute(args: Args) -> Result<()> {
    let local: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&args.storage_path));
    let policy = persistence_policy(args.policy, args.request_timeout)?;

    debug!(
        "local storage at {}, policy {:?}",
        args.storage_path.display(),
        policy
    );

    let authenticator =
        SimulatedAuthenticator::new(CredentialPersistence::new(policy, Arc::clone(&local)))
            .with_delay(args.submit_delay)
            .with_user_agent(crate::APP_USER_AGENT);

    let mut controller = LoginController::new(authenticator, TerminalPage, local).with_options(
        FlowOptions {
            redirect_to: args.redirect_to,
            redirect_delay: args.redirect_delay,
        },
    );

    controller.input(Field::Username, args.username);
    controller.input(Field::Password, args.password.expose_secret());

    match controller.submit().await? {
        SubmitOutcome::Invalid(_) => {
            for (field, message) in controller.form().errors() {
                eprintln!("{field}: {message}");
            }
            Err(anyhow!("login form rejected"))
        }
        SubmitOutcome::Failed(err) => Err(err).context("login failed"),
        SubmitOutcome::Redirected { target, stored_in } => {
            info!("redirected to {}, credentials kept in {}", target, stored_in);
            Ok(())
        }
    }
}
