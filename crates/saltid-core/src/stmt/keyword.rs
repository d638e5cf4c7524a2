//! Reserved keys of argument trees.

// Operation arguments
pub const WHERE: &str = "where";
pub const DATA: &str = "data";
pub const SELECT: &str = "select";
pub const INCLUDE: &str = "include";
pub const ORDER_BY: &str = "orderBy";
pub const TAKE: &str = "take";
pub const SKIP: &str = "skip";
pub const COUNT: &str = "count";

// Logical combinators
pub const AND: &str = "AND";
pub const OR: &str = "OR";
pub const NOT: &str = "NOT";

// Filter operators
pub const EQUALS: &str = "equals";
pub const IN: &str = "in";
pub const NOT_IN: &str = "notIn";
pub const NOT_OP: &str = "not";
pub const GT: &str = "gt";
pub const GTE: &str = "gte";
pub const LT: &str = "lt";
pub const LTE: &str = "lte";

// Relation filters
pub const IS: &str = "is";
pub const IS_NOT: &str = "isNot";
pub const SOME: &str = "some";
pub const NONE: &str = "none";
pub const EVERY: &str = "every";

// Write verbs
pub const SET: &str = "set";
pub const INCREMENT: &str = "increment";
pub const CREATE: &str = "create";
pub const CREATE_MANY: &str = "createMany";
pub const CONNECT: &str = "connect";
pub const DISCONNECT: &str = "disconnect";
pub const CONNECT_OR_CREATE: &str = "connectOrCreate";
pub const UPSERT: &str = "upsert";
pub const UPDATE: &str = "update";
pub const DELETE: &str = "delete";

// Sort directions
pub const ASC: &str = "asc";
pub const DESC: &str = "desc";

/// Returns `true` for operators that compare by order. Salts are not
/// ordered, so these only ever see real ids.
pub fn is_range_operator(key: &str) -> bool {
    matches!(key, GT | GTE | LT | LTE)
}
