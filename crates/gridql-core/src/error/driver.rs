use std::fmt;

/// A failure raised by the database while executing the compiled query.
///
/// The message is the underlying engine's, passed through without
/// interpretation.
#[derive(Debug)]
pub(crate) struct DriverError {
    message: String,
}

impl DriverError {
    pub(crate) fn new(message: String) -> Self {
        Self { message }
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "driver error: {}", self.message)
    }
}
