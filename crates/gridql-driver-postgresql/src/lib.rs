mod value;
pub(crate) use value::Value;

use gridql_core::driver::{Capability, ListPage};
use gridql_core::{async_trait, err, stmt, Driver, Error, Result};

use postgres_types::{ToSql, Type};
use tokio_postgres::tls::MakeTlsConnect;
use tokio_postgres::{Client, Config, Socket};
use url::Url;

#[derive(Debug)]
pub struct PostgreSql {
    /// The PostgreSQL client.
    client: Client,
}

impl PostgreSql {
    /// Initializes a PostgreSQL driver using an initialized connection.
    pub fn new(connection: Client) -> Self {
        Self { client: connection }
    }

    /// Connects to a PostgreSQL database using a connection string.
    ///
    /// See [`tokio_postgres::Client`] for more information.
    pub async fn connect(url: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| anyhow::anyhow!("invalid connection URL; url={url}: {e}"))?;

        if url.scheme() != "postgresql" {
            return Err(anyhow::anyhow!(
                "connection URL does not have a `postgresql` scheme; url={}",
                url
            )
            .into());
        }

        let host = url
            .host_str()
            .ok_or_else(|| anyhow::anyhow!("missing host in connection URL; url={}", url))?;

        if url.path().is_empty() {
            return Err(anyhow::anyhow!(
                "no database specified - missing path in connection URL; url={}",
                url
            )
            .into());
        }

        let mut config = Config::new();
        config.host(host);
        config.dbname(url.path().trim_start_matches('/'));

        if let Some(port) = url.port() {
            config.port(port);
        }

        if !url.username().is_empty() {
            config.user(url.username());
        }

        if let Some(password) = url.password() {
            config.password(password);
        }

        Self::connect_with_config(config, tokio_postgres::NoTls).await
    }

    /// Connects to a PostgreSQL database using a [`tokio_postgres::Config`].
    pub async fn connect_with_config<T>(config: Config, tls: T) -> Result<Self>
    where
        T: MakeTlsConnect<Socket> + 'static,
        T::Stream: Send,
    {
        let (client, connection) = config.connect(tls).await.map_err(Error::driver)?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                eprintln!("connection error: {e}");
            }
        });

        Ok(Self::new(client))
    }
}

#[async_trait]
impl Driver for PostgreSql {
    fn capability(&self) -> &Capability {
        &Capability::POSTGRESQL
    }

    async fn fetch_list(&self, sql: &str, params: &[stmt::Value]) -> Result<ListPage> {
        let params: Vec<Value> = params.iter().cloned().map(Value::from).collect();

        // Parameter types are declared up front; nothing in a
        // json_build_object call site lets the server infer them.
        let typed: Vec<(&(dyn ToSql + Sync), Type)> = params
            .iter()
            .map(|value| (value as &(dyn ToSql + Sync), value.pg_type()))
            .collect();

        let rows = self
            .client
            .query_typed(sql, &typed)
            .await
            .map_err(|e| Error::driver(e).context(err!("list query execution failed")))?;

        let row = rows
            .first()
            .ok_or_else(|| Error::driver("list query returned no rows"))?;

        let count: i64 = row.try_get("count").map_err(Error::driver)?;
        let data: serde_json::Value = row.try_get("data").map_err(Error::driver)?;

        let data = match data {
            serde_json::Value::Array(items) => items,
            serde_json::Value::Null => vec![],
            other => {
                return Err(Error::driver(format!(
                    "expected a JSON array of rows, got {other}"
                )))
            }
        };

        Ok(ListPage { count, data })
    }
}
