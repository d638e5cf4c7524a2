use super::Error;

/// Error when the extension cannot be configured.
///
/// This occurs when:
/// - No schema descriptor was supplied and the driver cannot provide one
/// - The salt length is outside the supported range
/// - The salt suffix is empty
///
/// These errors are raised eagerly, the first time the configuration is
/// needed.
#[derive(Debug)]
pub(super) struct InvalidConfiguration {
    message: Box<str>,
}

impl std::error::Error for InvalidConfiguration {}

impl core::fmt::Display for InvalidConfiguration {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid configuration: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidConfiguration(InvalidConfiguration {
            message: message.into().into(),
        }))
    }

    /// Creates the error raised when no schema descriptor can be obtained.
    pub fn missing_schema_descriptor() -> Error {
        Error::invalid_configuration(
            "no schema descriptor available; the driver does not expose one, \
             pass it explicitly with `Builder::schema`",
        )
    }

    /// Returns `true` if this error is an invalid configuration error.
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidConfiguration(_))
    }
}
