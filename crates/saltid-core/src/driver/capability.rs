#[derive(Debug)]
pub struct Capability {
    /// Dialect used when rendering raw SQL fragments.
    pub sql_flavor: Flavor,
}

/// SQL dialect. Determines identifier quoting and placeholder syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flavor {
    #[default]
    Postgresql,
    Sqlite,
    Mysql,
}

impl Capability {
    /// PostgreSQL capabilities
    pub const POSTGRESQL: Self = Self {
        sql_flavor: Flavor::Postgresql,
    };

    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        sql_flavor: Flavor::Sqlite,
    };

    /// MySQL capabilities
    pub const MYSQL: Self = Self {
        sql_flavor: Flavor::Mysql,
    };
}

impl Flavor {
    pub fn is_postgresql(self) -> bool {
        matches!(self, Flavor::Postgresql)
    }

    pub fn is_sqlite(self) -> bool {
        matches!(self, Flavor::Sqlite)
    }

    pub fn is_mysql(self) -> bool {
        matches!(self, Flavor::Mysql)
    }

    /// Character used to quote identifiers.
    pub fn identifier_quote(self) -> char {
        match self {
            Flavor::Mysql => '`',
            Flavor::Postgresql | Flavor::Sqlite => '"',
        }
    }
}
