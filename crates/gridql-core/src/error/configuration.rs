use std::fmt;

/// Broken or unsupported metadata detected during compilation.
///
/// `subject` names the offending column or table so callers can surface
/// it in a 4xx/5xx response.
#[derive(Debug)]
pub(crate) struct ConfigurationError {
    subject: String,
    message: String,
}

impl ConfigurationError {
    pub(crate) fn new(subject: String, message: String) -> Self {
        Self { subject, message }
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid configuration for `{}`: {}",
            self.subject, self.message
        )
    }
}
