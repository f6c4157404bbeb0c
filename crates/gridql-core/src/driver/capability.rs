/// Describes the database features the compiler may rely on.
#[derive(Debug, Clone, Copy)]
pub struct Capability {
    pub sql: Sql,
}

#[derive(Debug, Clone, Copy)]
pub struct Sql {
    /// Supports `LEFT OUTER JOIN LATERAL`.
    pub lateral_join: bool,

    /// Supports `json_agg` / `json_build_object`.
    pub json_agg: bool,
}

impl Capability {
    pub const POSTGRESQL: Capability = Capability {
        sql: Sql {
            lateral_join: true,
            json_agg: true,
        },
    };

    pub const MYSQL: Capability = Capability {
        sql: Sql {
            lateral_join: false,
            json_agg: false,
        },
    };

    pub const SQLITE: Capability = Capability {
        sql: Sql {
            lateral_join: false,
            json_agg: false,
        },
    };

    /// Whether the full page (rows, nested relations, count) can be
    /// fetched with one statement.
    pub fn supports_single_query(&self) -> bool {
        self.sql.lateral_join && self.sql.json_agg
    }
}
