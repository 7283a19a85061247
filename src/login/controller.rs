use super::{
    form::LoginForm,
    page::{NavigationError, Page, Toast},
    pipeline::{Authenticator, LoginError},
    submit::SubmitControl,
    toggle::Visibility,
    validate::{validate, Field, ValidationError},
};
use crate::persistence::Destination;
use crate::storage::{KeyValueStore, USERNAME_KEY};
use secrecy::SecretString;
use std::{sync::Arc, time::Duration};
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

pub const DEFAULT_REDIRECT_TARGET: &str = "video.html";
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_millis(1500);
pub const REDIRECT_MESSAGE: &str = "Login successful! Redirecting...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowOptions {
    /// Resource opened after a successful login.
    pub redirect_to: String,
    /// Time the success toast stays up before leaving the page.
    pub redirect_delay: Duration,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            redirect_to: DEFAULT_REDIRECT_TARGET.to_string(),
            redirect_delay: DEFAULT_REDIRECT_DELAY,
        }
    }
}

/// Element holding keyboard focus when a key is pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Field(Field),
    Button,
    Other,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent or stored.
    Invalid(Vec<ValidationError>),
    /// The pipeline rejected the submission; the error toast is up.
    Failed(LoginError),
    Redirected {
        target: String,
        stored_in: Destination,
    },
}

/// Puts the submit control back to idle however the pipeline ends, including
/// when the submitting future is dropped.
struct RestoreOnDrop<'a>(&'a mut SubmitControl);

impl<'a> RestoreOnDrop<'a> {
    fn begin(control: &'a mut SubmitControl) -> Self {
        control.begin_submit();
        Self(control)
    }
}

impl Drop for RestoreOnDrop<'_> {
    fn drop(&mut self) {
        self.0.reset();
    }
}

/// Drives the login form: field events, the password toggle and submission.
pub struct LoginController<A, P> {
    form: LoginForm,
    authenticator: A,
    page: P,
    local: Arc<dyn KeyValueStore>,
    options: FlowOptions,
}

impl<A: Authenticator, P: Page> LoginController<A, P> {
    pub fn new(authenticator: A, page: P, local: Arc<dyn KeyValueStore>) -> Self {
        Self {
            form: LoginForm::new(),
            authenticator,
            page,
            local,
            options: FlowOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: FlowOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub const fn form(&self) -> &LoginForm {
        &self.form
    }

    #[must_use]
    pub const fn page(&self) -> &P {
        &self.page
    }

    pub fn input(&mut self, field: Field, value: impl Into<String>) {
        self.form.set_value(field, value);
    }

    pub fn focus(&mut self, field: Field) {
        self.form.clear_error(field);
    }

    /// Validate a single field when it loses focus.
    ///
    /// # Errors
    /// Returns the validation error now shown next to the field.
    pub fn blur(&mut self, field: Field) -> Result<(), ValidationError> {
        self.check(field)
    }

    pub fn toggle_password(&mut self) -> Visibility {
        self.form.toggle.toggle()
    }

    /// Enter submits the form unless a button has focus (the button handles it).
    ///
    /// # Errors
    /// Propagates navigation failures from [`Self::submit`].
    pub async fn key_down(
        &mut self,
        key: &str,
        focus: FocusTarget,
    ) -> Result<Option<SubmitOutcome>, NavigationError> {
        if key != "Enter" || focus == FocusTarget::Button {
            return Ok(None);
        }
        self.submit().await.map(Some)
    }

    /// Validate both fields and, when they pass, run the submission pipeline.
    ///
    /// # Errors
    /// Returns an error only if navigating away after a successful login fails.
    #[instrument(skip(self))]
    pub async fn submit(&mut self) -> Result<SubmitOutcome, NavigationError> {
        self.form.submit.begin_validation();
        self.form.clear_errors();

        let failures: Vec<ValidationError> = Field::ALL
            .into_iter()
            .filter_map(|field| self.check(field).err())
            .collect();

        if !failures.is_empty() {
            debug!("form rejected with {} field errors", failures.len());
            self.page.shake();
            self.form.submit.reset();
            return Ok(SubmitOutcome::Invalid(failures));
        }

        let username = self.form.field(Field::Username).value().to_string();
        let password = SecretString::from(self.form.field(Field::Password).value().to_string());

        let result = {
            let _restore = RestoreOnDrop::begin(&mut self.form.submit);
            self.authenticator.authenticate(&username, &password).await
        };

        match result {
            Ok(outcome) => {
                info!("login accepted, credentials kept in {}", outcome.stored_in);
                self.page.toast(Toast::success(REDIRECT_MESSAGE));

                if let Err(err) = self.local.set(USERNAME_KEY, &username) {
                    warn!("could not remember username: {}", err);
                }

                sleep(self.options.redirect_delay).await;
                self.page.navigate(&self.options.redirect_to)?;

                Ok(SubmitOutcome::Redirected {
                    target: self.options.redirect_to.clone(),
                    stored_in: outcome.stored_in,
                })
            }
            Err(err) => {
                error!("login failed: {}", err);
                self.page.toast(Toast::error(err.to_string()));
                Ok(SubmitOutcome::Failed(err))
            }
        }
    }

    fn check(&mut self, field: Field) -> Result<(), ValidationError> {
        let result = validate(field, self.form.field(field).value());
        match &result {
            Ok(()) => self.form.show_success(field),
            Err(err) => self.form.show_error(field, err.message()),
        }
        result
    }
}
