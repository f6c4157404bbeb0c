pub mod alias;
pub use alias::AliasAllocator;

pub mod args;
pub use args::{ListArgs, RawParams};

mod condition;
mod projector;
mod rollup;
mod sort;

pub mod list_query;
pub use list_query::{CompiledQuery, ListQuery};

pub mod serializer;
pub use serializer::{Params, Serializer};
