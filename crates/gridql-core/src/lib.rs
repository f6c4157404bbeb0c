pub mod driver;
pub use driver::Driver;

mod error;
pub use error::{Error, IntoError};

pub mod meta;
pub use meta::Meta;

pub mod stmt;

/// A Result type alias that uses gridql's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
