//! Headless view model of the login form.
//!
//! Each field carries at most one error annotation. Showing an error replaces
//! the previous one, so every presenter call is idempotent.

use super::{submit::SubmitControl, toggle::PasswordToggle, validate::Field};

/// Visual validation marker on a field wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Marker {
    #[default]
    Neutral,
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldState {
    value: String,
    marker: Marker,
    annotation: Option<String>,
}

impl FieldState {
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub const fn marker(&self) -> Marker {
        self.marker
    }

    /// Error message currently shown next to the field.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.annotation.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoginForm {
    username: FieldState,
    password: FieldState,
    pub toggle: PasswordToggle,
    pub submit: SubmitControl,
}

impl LoginForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn field(&self, field: Field) -> &FieldState {
        match field {
            Field::Username => &self.username,
            Field::Password => &self.password,
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut FieldState {
        match field {
            Field::Username => &mut self.username,
            Field::Password => &mut self.password,
        }
    }

    pub fn set_value(&mut self, field: Field, value: impl Into<String>) {
        self.field_mut(field).value = value.into();
    }

    pub fn show_error(&mut self, field: Field, message: impl Into<String>) {
        let state = self.field_mut(field);
        state.marker = Marker::Error;
        state.annotation = Some(message.into());
    }

    pub fn show_success(&mut self, field: Field) {
        let state = self.field_mut(field);
        state.marker = Marker::Success;
        state.annotation = None;
    }

    pub fn clear_error(&mut self, field: Field) {
        let state = self.field_mut(field);
        state.marker = Marker::Neutral;
        state.annotation = None;
    }

    pub fn clear_errors(&mut self) {
        for field in Field::ALL {
            self.clear_error(field);
        }
    }

    /// Fields currently showing an error, in form order.
    #[must_use]
    pub fn errors(&self) -> Vec<(Field, &str)> {
        Field::ALL
            .into_iter()
            .filter_map(|field| self.field(field).error().map(|message| (field, message)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_error_replaces_previous_annotation() {
        let mut form = LoginForm::new();
        form.show_error(Field::Username, "Username is required");
        form.show_error(Field::Username, "Username must be at least 3 characters");

        let state = form.field(Field::Username);
        assert_eq!(state.marker(), Marker::Error);
        assert_eq!(state.error(), Some("Username must be at least 3 characters"));
        assert_eq!(form.errors().len(), 1);
    }

    #[test]
    fn clear_error_is_idempotent() {
        let mut form = LoginForm::new();
        form.show_error(Field::Password, "Password is required");
        form.clear_error(Field::Password);
        form.clear_error(Field::Password);

        let state = form.field(Field::Password);
        assert_eq!(state.marker(), Marker::Neutral);
        assert_eq!(state.error(), None);
    }

    #[test]
    fn success_drops_annotation() {
        let mut form = LoginForm::new();
        form.show_error(Field::Username, "Username is required");
        form.show_success(Field::Username);

        assert_eq!(form.field(Field::Username).marker(), Marker::Success);
        assert!(form.errors().is_empty());
    }

    #[test]
    fn values_are_per_field() {
        let mut form = LoginForm::new();
        form.set_value(Field::Username, "alice");
        form.set_value(Field::Password, "secret1");
        form.clear_errors();

        assert_eq!(form.field(Field::Username).value(), "alice");
        assert_eq!(form.field(Field::Password).value(), "secret1");
    }

    #[test]
    fn errors_in_form_order() {
        let mut form = LoginForm::new();
        form.show_error(Field::Password, "Password is required");
        form.show_error(Field::Username, "Username is required");

        let fields: Vec<Field> = form.errors().into_iter().map(|(field, _)| field).collect();
        assert_eq!(fields, vec![Field::Username, Field::Password]);
    }
}
