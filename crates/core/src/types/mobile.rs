//! Mobile phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Mobile`] number.
#[derive(thiserror::Error, Debug, Clone)]
pub enum MobileError {
    /// The input string is empty.
    #[error("mobile number cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("mobile number must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character other than digits or a leading +.
    #[error("mobile number may only contain digits and an optional leading +")]
    InvalidCharacter,
}

/// A mobile phone number.
///
/// Stored as entered (digits with an optional leading `+`), capped at 15
/// characters to match the column width. No country-code normalization is
/// performed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Mobile(String);

impl Mobile {
    /// Maximum length of a mobile number.
    pub const MAX_LENGTH: usize = 15;

    /// Parse a `Mobile` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 15 characters, or
    /// contains anything other than digits and an optional leading `+`.
    pub fn parse(s: &str) -> Result<Self, MobileError> {
        if s.is_empty() {
            return Err(MobileError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(MobileError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        let digits = s.strip_prefix('+').unwrap_or(s);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(MobileError::InvalidCharacter);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the mobile number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Mobile` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Mobile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Mobile {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_digits_with_optional_plus() {
        assert!(Mobile::parse("09121234567").is_ok());
        assert!(Mobile::parse("+989121234567").is_ok());
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(Mobile::parse(""), Err(MobileError::Empty)));
        assert!(matches!(
            Mobile::parse("0912-123-4567"),
            Err(MobileError::InvalidCharacter)
        ));
        assert!(matches!(
            Mobile::parse("+"),
            Err(MobileError::InvalidCharacter)
        ));
        assert!(matches!(
            Mobile::parse("1234567890123456"),
            Err(MobileError::TooLong { max: 15 })
        ));
    }
}
