use saltid_core::stmt::Value;

/// A piece of SQL text interleaved with bound parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    /// Literal SQL text
    Sql(String),

    /// A value bound to a placeholder
    Param(Value),
}

impl Fragment {
    pub fn new() -> Fragment {
        Fragment::default()
    }

    /// A fragment of literal SQL. The text is not escaped.
    pub fn raw(sql: impl Into<String>) -> Fragment {
        Fragment {
            parts: vec![Part::Sql(sql.into())],
        }
    }

    /// A single bound parameter.
    pub fn param(value: impl Into<Value>) -> Fragment {
        Fragment {
            parts: vec![Part::Param(value.into())],
        }
    }

    /// Append another fragment.
    pub fn push(&mut self, other: Fragment) {
        for part in other.parts {
            match part {
                Part::Sql(sql) => self.push_str(&sql),
                Part::Param(value) => self.parts.push(Part::Param(value)),
            }
        }
    }

    /// Append literal SQL, merging with a trailing text part.
    pub fn push_str(&mut self, sql: &str) {
        if let Some(Part::Sql(last)) = self.parts.last_mut() {
            last.push_str(sql);
        } else {
            self.parts.push(Part::Sql(sql.to_string()));
        }
    }

    pub fn push_param(&mut self, value: impl Into<Value>) {
        self.parts.push(Part::Param(value.into()));
    }

    /// Concatenate fragments, separated by `separator`.
    pub fn join(fragments: impl IntoIterator<Item = Fragment>, separator: &str) -> Fragment {
        let mut ret = Fragment::new();
        let mut s = "";

        for fragment in fragments {
            ret.push_str(s);
            ret.push(fragment);
            s = separator;
        }

        ret
    }

    pub fn wrap_parens(self) -> Fragment {
        let mut ret = Fragment::raw("(");
        ret.push(self);
        ret.push_str(")");
        ret
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Bound parameters, in order.
    pub fn params(&self) -> impl Iterator<Item = &Value> + '_ {
        self.parts.iter().filter_map(|part| match part {
            Part::Param(value) => Some(value),
            Part::Sql(_) => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl From<&str> for Fragment {
    fn from(sql: &str) -> Self {
        Fragment::raw(sql)
    }
}
