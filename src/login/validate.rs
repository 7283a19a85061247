use std::fmt;
use thiserror::Error;

pub const USERNAME_MIN_CHARS: usize = 3;
pub const PASSWORD_MIN_CHARS: usize = 6;

/// Form fields subject to validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Username,
    Password,
}

impl Field {
    pub const ALL: [Self; 2] = [Self::Username, Self::Password];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Username => "Username",
            Self::Password => "Password",
        }
    }

    const fn min_chars(self) -> usize {
        match self {
            Self::Username => USERNAME_MIN_CHARS,
            Self::Password => PASSWORD_MIN_CHARS,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Username => write!(f, "username"),
            Self::Password => write!(f, "password"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{} is required", .field.label())]
    Required { field: Field },
    #[error("{} must be at least {min} characters", .field.label())]
    TooShort { field: Field, min: usize },
}

impl ValidationError {
    #[must_use]
    pub const fn field(&self) -> Field {
        match self {
            Self::Required { field } | Self::TooShort { field, .. } => *field,
        }
    }

    /// Message shown next to the field.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Check one field's raw input.
///
/// The username must not be blank once trimmed, but its length is counted on
/// the raw value. The password is never trimmed.
///
/// Lengths count Unicode scalar values, not the UTF-16 code units a browser
/// reports for `value.length`. A character outside the Basic Multilingual
/// Plane counts once here and twice in a browser, so `"😀😀"` is too short
/// for a username here while a browser would accept it.
///
/// # Errors
/// Returns the first rule the value breaks.
pub fn validate(field: Field, value: &str) -> Result<(), ValidationError> {
    let blank = match field {
        Field::Username => value.trim().is_empty(),
        Field::Password => value.is_empty(),
    };
    if blank {
        return Err(ValidationError::Required { field });
    }

    let min = field.min_chars();
    if value.chars().count() < min {
        return Err(ValidationError::TooShort { field, min });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        for blank in ["", " ", "   ", "\t\n"] {
            assert_eq!(
                validate(Field::Username, blank),
                Err(ValidationError::Required {
                    field: Field::Username
                })
            );
        }
        for short in ["a", "ab", " a"] {
            assert_eq!(
                validate(Field::Username, short),
                Err(ValidationError::TooShort {
                    field: Field::Username,
                    min: 3
                })
            );
        }
        for ok in ["abc", "alice", " ab", "ééé"] {
            assert_eq!(validate(Field::Username, ok), Ok(()), "{ok:?}");
        }
    }

    #[test]
    fn astral_characters_count_once() {
        assert_eq!(
            validate(Field::Username, "😀😀"),
            Err(ValidationError::TooShort {
                field: Field::Username,
                min: 3
            })
        );
        assert_eq!(validate(Field::Username, "😀😀😀"), Ok(()));
    }

    #[test]
    fn password_rules() {
        assert_eq!(
            validate(Field::Password, ""),
            Err(ValidationError::Required {
                field: Field::Password
            })
        );
        for short in [" ", "a", "12345", "     "] {
            assert_eq!(
                validate(Field::Password, short),
                Err(ValidationError::TooShort {
                    field: Field::Password,
                    min: 6
                })
            );
        }
        for ok in ["secret", "secret1", "      ", "pässwörd"] {
            assert_eq!(validate(Field::Password, ok), Ok(()), "{ok:?}");
        }
    }

    #[test]
    fn messages() {
        let message = |field: Field, value: &str| validate(field, value).unwrap_err().message();
        assert_eq!(message(Field::Username, ""), "Username is required");
        assert_eq!(
            message(Field::Username, "ab"),
            "Username must be at least 3 characters"
        );
        assert_eq!(message(Field::Password, ""), "Password is required");
        assert_eq!(
            message(Field::Password, "abc"),
            "Password must be at least 6 characters"
        );
    }

    #[test]
    fn error_reports_its_field() {
        let err = validate(Field::Password, "abc").unwrap_err();
        assert_eq!(err.field(), Field::Password);
    }
}
