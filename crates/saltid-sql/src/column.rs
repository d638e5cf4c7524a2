use crate::{Flavor, Fragment};

/// Quoted references to a base column and its salt column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    base: String,
    salt: String,
}

/// Shorthand for [`Column::new`].
pub fn col(alias: Option<&str>, base: &str, suffix: &str, flavor: Flavor) -> Column {
    Column::new(alias, base, suffix, flavor)
}

impl Column {
    /// Reference `base` and `base{suffix}`, qualified with `alias` when
    /// given.
    pub fn new(alias: Option<&str>, base: &str, suffix: &str, flavor: Flavor) -> Column {
        let salt = format!("{base}{suffix}");

        Column {
            base: qualified(alias, base, flavor),
            salt: qualified(alias, &salt, flavor),
        }
    }

    pub fn base(&self) -> Fragment {
        Fragment::raw(&self.base)
    }

    pub fn salt(&self) -> Fragment {
        Fragment::raw(&self.salt)
    }

    pub fn base_sql(&self) -> &str {
        &self.base
    }

    pub fn salt_sql(&self) -> &str {
        &self.salt
    }
}

fn qualified(alias: Option<&str>, name: &str, flavor: Flavor) -> String {
    match alias {
        Some(alias) => format!("{}.{}", quote(alias, flavor), quote(name, flavor)),
        None => quote(name, flavor),
    }
}

fn quote(ident: &str, flavor: Flavor) -> String {
    let q = flavor.identifier_quote();
    let mut ret = String::with_capacity(ident.len() + 2);

    ret.push(q);
    for c in ident.chars() {
        if c == q {
            ret.push(q);
        }
        ret.push(c);
    }
    ret.push(q);
    ret
}
