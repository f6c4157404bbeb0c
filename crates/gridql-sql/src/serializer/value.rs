use super::{Formatter, Params, ToSql};

use gridql_core::stmt;

impl ToSql for &stmt::Value {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let placeholder = f.params.push(self);
        placeholder.to_sql(f);
    }
}
