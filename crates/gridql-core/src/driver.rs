mod capability;
pub use capability::{Capability, Sql};

use crate::{stmt, Result};

use async_trait::async_trait;
use std::fmt::Debug;

/// One page of list results: the filtered row count plus the projected
/// rows as JSON objects.
#[derive(Debug)]
pub struct ListPage {
    pub count: i64,
    pub data: Vec<serde_json::Value>,
}

#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Describes the features the backing database supports.
    fn capability(&self) -> &Capability;

    /// Executes a compiled list statement and decodes its single result
    /// row into a page.
    async fn fetch_list(&self, sql: &str, params: &[stmt::Value]) -> Result<ListPage>;
}
