use super::Error;

/// Error when a value expected to be an integer id is not one.
#[derive(Debug)]
pub(super) struct TypeMismatchError {
    what: &'static str,
    actual: Box<str>,
}

impl std::error::Error for TypeMismatchError {}

impl core::fmt::Display for TypeMismatchError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "type mismatch: expected an integer for {}, got {}",
            self.what, self.actual
        )
    }
}

impl Error {
    /// Creates a type mismatch error. `what` names the expected operand
    /// ("public id", "real id"), `actual` the type that was found.
    pub fn type_mismatch(what: &'static str, actual: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::TypeMismatch(TypeMismatchError {
            what,
            actual: actual.into().into(),
        }))
    }

    /// Returns `true` if this error is a type mismatch error.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::TypeMismatch(_))
    }
}
