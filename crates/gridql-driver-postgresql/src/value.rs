use gridql_core::stmt::Value as CoreValue;

use postgres_types::{accepts, private::BytesMut, to_sql_checked, IsNull, ToSql, Type};

#[derive(Debug)]
pub struct Value(CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

impl Value {
    /// The wire type the value is bound as. Nulls ride along as TEXT; the
    /// server only sees the null flag.
    pub(crate) fn pg_type(&self) -> Type {
        match &self.0 {
            CoreValue::Null | CoreValue::String(_) | CoreValue::List(_) => Type::TEXT,
            CoreValue::Bool(_) => Type::BOOL,
            CoreValue::I64(_) => Type::INT8,
            CoreValue::F64(_) => Type::FLOAT8,
        }
    }
}

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> std::result::Result<IsNull, Box<dyn std::error::Error + Sync + Send>>
    where
        Self: Sized,
    {
        match &self.0 {
            CoreValue::Null => Ok(IsNull::Yes),
            CoreValue::Bool(value) => value.to_sql(ty, out),
            CoreValue::I64(value) => match *ty {
                Type::INT4 => {
                    let value = *value as i32;
                    value.to_sql(ty, out)
                }
                _ => value.to_sql(ty, out),
            },
            CoreValue::F64(value) => value.to_sql(ty, out),
            CoreValue::String(value) => value.to_sql(ty, out),
            // Lists are expanded into individual parameters before the
            // statement is serialized; one reaching here is a bug.
            CoreValue::List(_) => Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "list values cannot be bound as a single parameter",
            ))),
        }
    }

    accepts!(BOOL, INT4, INT8, FLOAT4, FLOAT8, TEXT, VARCHAR);
    to_sql_checked!();
}
