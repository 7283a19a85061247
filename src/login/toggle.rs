/// Password field display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Masked,
    Visible,
}

impl Visibility {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Masked => Self::Visible,
            Self::Visible => Self::Masked,
        }
    }

    /// Input type the password field renders with.
    #[must_use]
    pub const fn input_type(self) -> &'static str {
        match self {
            Self::Masked => "password",
            Self::Visible => "text",
        }
    }
}

/// The toggle control: its state plus the two icons it swaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PasswordToggle {
    visibility: Visibility,
}

impl PasswordToggle {
    #[must_use]
    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// The open eye invites revealing the password, so it shows while masked.
    #[must_use]
    pub const fn eye_open_visible(&self) -> bool {
        matches!(self.visibility, Visibility::Masked)
    }

    #[must_use]
    pub const fn eye_closed_visible(&self) -> bool {
        matches!(self.visibility, Visibility::Visible)
    }

    pub fn toggle(&mut self) -> Visibility {
        self.visibility = self.visibility.toggled();
        self.visibility
    }
}
