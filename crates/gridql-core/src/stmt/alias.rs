/// A table or subquery alias. Always serialized as a quoted identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias(pub String);

impl Alias {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Alias {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Alias {
    fn from(value: String) -> Self {
        Self(value)
    }
}
