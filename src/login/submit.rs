/// Submit control state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitState {
    #[default]
    Idle,
    Validating,
    Submitting,
}

/// The submit button: enabled flag, label and loading indicator follow the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubmitControl {
    state: SubmitState,
}

impl SubmitControl {
    #[must_use]
    pub const fn state(&self) -> SubmitState {
        self.state
    }

    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        matches!(self.state, SubmitState::Submitting)
    }

    #[must_use]
    pub const fn label_visible(&self) -> bool {
        !self.is_disabled()
    }

    #[must_use]
    pub const fn loader_visible(&self) -> bool {
        self.is_disabled()
    }

    pub fn begin_validation(&mut self) {
        self.state = SubmitState::Validating;
    }

    /// Only a validated form may start submitting.
    pub fn begin_submit(&mut self) -> bool {
        if self.state == SubmitState::Validating {
            self.state = SubmitState::Submitting;
            true
        } else {
            false
        }
    }

    /// Back to idle from any state.
    pub fn reset(&mut self) {
        self.state = SubmitState::Idle;
    }
}
