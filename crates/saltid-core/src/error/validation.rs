use super::Error;

/// Error when a value fails codec validation.
#[derive(Debug)]
pub(super) struct ValidationError {
    pub(super) kind: ValidationErrorKind,
}

#[derive(Debug)]
pub(super) enum ValidationErrorKind {
    /// Salt is below zero
    NegativeSalt { salt: i64 },

    /// Salt digit count differs from the configured salt length
    SaltLength { salt: i64, expected: usize },

    /// Composed public id does not fit in 64 bits
    Overflow { real_id: i64, salt: i64 },
}

impl std::error::Error for ValidationError {}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self.kind {
            ValidationErrorKind::NegativeSalt { salt } => {
                write!(f, "invalid salt: {} is negative", salt)
            }
            ValidationErrorKind::SaltLength { salt, expected } => write!(
                f,
                "invalid salt: {} has {} digits, expected exactly {}",
                salt,
                crate::codec::digit_len(salt.unsigned_abs()),
                expected
            ),
            ValidationErrorKind::Overflow { real_id, salt } => write!(
                f,
                "public id overflow: salt {} and real id {} do not fit in 64 bits",
                salt, real_id
            ),
        }
    }
}

impl Error {
    /// Creates a validation error for a negative salt.
    pub fn negative_salt(salt: i64) -> Error {
        Error::from(super::ErrorKind::Validation(ValidationError {
            kind: ValidationErrorKind::NegativeSalt { salt },
        }))
    }

    /// Creates a validation error for a salt whose digit count does not
    /// match the configured salt length.
    pub fn salt_length(salt: i64, expected: usize) -> Error {
        Error::from(super::ErrorKind::Validation(ValidationError {
            kind: ValidationErrorKind::SaltLength { salt, expected },
        }))
    }

    /// Creates a validation error for a composition that overflows `i64`.
    pub fn public_id_overflow(real_id: i64, salt: i64) -> Error {
        Error::from(super::ErrorKind::Validation(ValidationError {
            kind: ValidationErrorKind::Overflow { real_id, salt },
        }))
    }

    /// Returns `true` if this error is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Validation(_))
    }
}
