#[macro_use]
mod fmt;
use fmt::ToSql;

mod params;
pub use params::{Params, Placeholder};

use crate::{Flavor, Fragment, Part};

use saltid_core::stmt::Value;

/// Render a fragment in positional form: literal SQL text plus the ordered
/// list of bound values.
#[derive(Debug, Clone, PartialEq)]
pub struct UnsafeQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Serialize fragments to SQL text
#[derive(Debug, Clone, Copy)]
pub struct Serializer {
    /// Determines the placeholder syntax.
    flavor: Flavor,
}

struct Formatter<'a, T> {
    /// Handle to the serializer
    serializer: &'a Serializer,

    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut T,
}

/// Shorthand for `Serializer::new(flavor)` rendering into a fresh parameter
/// list.
pub fn to_unsafe(fragment: &Fragment, flavor: Flavor) -> UnsafeQuery {
    let mut params = vec![];
    let sql = Serializer::new(flavor).serialize(fragment, &mut params);
    UnsafeQuery { sql, params }
}

impl Serializer {
    pub fn new(flavor: Flavor) -> Serializer {
        Serializer { flavor }
    }

    pub fn postgresql() -> Serializer {
        Serializer::new(Flavor::Postgresql)
    }

    pub fn sqlite() -> Serializer {
        Serializer::new(Flavor::Sqlite)
    }

    pub fn mysql() -> Serializer {
        Serializer::new(Flavor::Mysql)
    }

    pub fn serialize(&self, fragment: &Fragment, params: &mut impl Params) -> String {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
            params,
        };

        fragment.to_sql(&mut fmt);
        ret
    }
}

impl ToSql for &Fragment {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        for part in self.parts() {
            part.to_sql(f);
        }
    }
}

impl ToSql for &Part {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Part::Sql(sql) => fmt!(f, sql.as_str()),
            Part::Param(value) => {
                let placeholder = f.params.push(value);
                fmt!(f, placeholder)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fragment() -> Fragment {
        let mut fragment = Fragment::raw("SELECT * FROM users WHERE id = ");
        fragment.push_param(5);
        fragment.push_str(" AND idSalt = ");
        fragment.push_param(1234);
        fragment
    }

    #[test]
    fn placeholders_per_flavor() {
        let pg = to_unsafe(&fragment(), Flavor::Postgresql);
        assert_eq!(pg.sql, "SELECT * FROM users WHERE id = $1 AND idSalt = $2");
        assert_eq!(pg.params, [Value::I64(5), Value::I64(1234)]);

        let mysql = to_unsafe(&fragment(), Flavor::Mysql);
        assert_eq!(mysql.sql, "SELECT * FROM users WHERE id = ? AND idSalt = ?");

        let sqlite = to_unsafe(&fragment(), Flavor::Sqlite);
        assert_eq!(sqlite.sql, "SELECT * FROM users WHERE id = ?1 AND idSalt = ?2");
    }

    #[test]
    fn numbering_continues_existing_params() {
        let mut params = vec![Value::from("earlier")];
        let sql = Serializer::postgresql().serialize(&fragment(), &mut params);

        assert_eq!(sql, "SELECT * FROM users WHERE id = $2 AND idSalt = $3");
        assert_eq!(params.len(), 3);
    }
}
