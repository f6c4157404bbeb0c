#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::Comma;

mod ident;
use ident::Ident;

// Fragment serializers
mod expr;
mod select;
mod value;

use gridql_core::stmt;

/// Serializes a statement to PostgreSQL text.
///
/// Only one dialect exists here: the capability gate refuses engines
/// without lateral joins and JSON aggregation before compilation starts.
/// Every identifier is quoted and every literal goes through the
/// parameter sink, so metadata-supplied names and caller-supplied values
/// never land in the SQL text itself.
#[derive(Debug)]
pub struct Serializer;

/// Sink for bound parameters. Pushing a value yields the placeholder
/// that stands in for it.
pub trait Params {
    fn push(&mut self, param: &stmt::Value) -> Placeholder;
}

/// A 1-based `$n` parameter reference.
pub struct Placeholder(pub usize);

impl Params for Vec<stmt::Value> {
    fn push(&mut self, value: &stmt::Value) -> Placeholder {
        self.push(value.clone());
        Placeholder(self.len())
    }
}

struct Formatter<'a, T> {
    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut T,
}

impl Serializer {
    pub fn serialize(&self, stmt: &stmt::Select, params: &mut impl Params) -> String {
        let mut ret = String::new();

        let mut fmt = Formatter {
            dst: &mut ret,
            params,
        };

        stmt.to_sql(&mut fmt);

        ret.push(';');
        ret
    }
}

impl ToSql for Placeholder {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        use std::fmt::Write;

        write!(&mut f.dst, "${}", self.0).unwrap();
    }
}
