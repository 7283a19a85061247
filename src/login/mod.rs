//! Login form flow.
//!
//! [`LoginController`] owns the headless [`LoginForm`] and reacts to page events:
//! field focus and blur, the password visibility toggle, the Enter key and form
//! submission. Submission validates both fields, runs an [`Authenticator`] while
//! the submit control is disabled, then either redirects or shows an error toast.

pub mod controller;
pub mod form;
pub mod page;
pub mod pipeline;
pub mod submit;
pub mod toggle;
pub mod validate;

pub use self::controller::{FlowOptions, FocusTarget, LoginController, SubmitOutcome};
pub use self::form::{FieldState, LoginForm, Marker};
pub use self::page::{MemoryPage, NavigationError, Page, Toast, ToastKind};
pub use self::pipeline::{Authenticator, LoginError, LoginOutcome, SimulatedAuthenticator};
pub use self::submit::{SubmitControl, SubmitState};
pub use self::toggle::{PasswordToggle, Visibility};
pub use self::validate::{validate, Field, ValidationError};
