use std::fmt;

/// An error created from a formatted message.
#[derive(Debug)]
pub(crate) struct AdhocError {
    message: String,
}

impl AdhocError {
    pub(crate) fn new(message: String) -> Self {
        Self { message }
    }
}

impl fmt::Display for AdhocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
