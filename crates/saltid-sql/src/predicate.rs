//! Predicates over a salted column pair.
//!
//! Equality and membership compare both the real id and the salt decoded
//! from a public id. Range predicates compare the real id alone: ordering is
//! defined over real ids, salts cannot be checked there.
//!
//! Every operand must be an integer. Anything else fails with a type
//! mismatch error instead of building a predicate that silently matches
//! nothing.

use crate::{Column, Fragment};

use saltid_core::{codec, stmt::Value, Error, Result};

/// `base = id AND salt = salt` for the decoded public id. A value too short
/// to carry a salt compares the base column only.
pub fn eq(column: &Column, public_id: impl Into<Value>, salt_len: usize) -> Result<Fragment> {
    let public_id = expect_int("public id", public_id.into())?;
    Ok(pair_eq(column, public_id, salt_len))
}

/// Negation of [`eq`].
pub fn ne(column: &Column, public_id: impl Into<Value>, salt_len: usize) -> Result<Fragment> {
    let public_id = expect_int("public id", public_id.into())?;
    let decoded = codec::decode(public_id, salt_len);

    Ok(if decoded.is_salted() {
        let mut ret = Fragment::raw("NOT ");
        ret.push(pair_eq(column, public_id, salt_len));
        ret
    } else {
        compare(column, " <> ", decoded.id)
    })
}

/// OR of [`eq`] over every element. An empty list matches nothing.
pub fn in_list<I>(column: &Column, public_ids: I, salt_len: usize) -> Result<Fragment>
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    let clauses = public_ids
        .into_iter()
        .map(|public_id| eq(column, public_id, salt_len))
        .collect::<Result<Vec<_>>>()?;

    if clauses.is_empty() {
        return Ok(Fragment::raw("1 = 0"));
    }

    Ok(Fragment::join(clauses, " OR ").wrap_parens())
}

pub fn gt_real_id(column: &Column, real_id: impl Into<Value>) -> Result<Fragment> {
    let real_id = expect_int("real id", real_id.into())?;
    Ok(compare(column, " > ", real_id))
}

pub fn lt_real_id(column: &Column, real_id: impl Into<Value>) -> Result<Fragment> {
    let real_id = expect_int("real id", real_id.into())?;
    Ok(compare(column, " < ", real_id))
}

/// Inclusive range over real ids.
pub fn between_real_id(
    column: &Column,
    low: impl Into<Value>,
    high: impl Into<Value>,
) -> Result<Fragment> {
    let low = expect_int("real id", low.into())?;
    let high = expect_int("real id", high.into())?;
    Ok(between(column, low, high))
}

/// Compare the base column against the real id decoded from `public_id`.
pub fn gt_from_salt_id(
    column: &Column,
    public_id: impl Into<Value>,
    salt_len: usize,
) -> Result<Fragment> {
    let real_id = decode_real_id(public_id.into(), salt_len)?;
    Ok(compare(column, " > ", real_id))
}

pub fn lt_from_salt_id(
    column: &Column,
    public_id: impl Into<Value>,
    salt_len: usize,
) -> Result<Fragment> {
    let real_id = decode_real_id(public_id.into(), salt_len)?;
    Ok(compare(column, " < ", real_id))
}

pub fn between_from_salt_ids(
    column: &Column,
    low: impl Into<Value>,
    high: impl Into<Value>,
    salt_len: usize,
) -> Result<Fragment> {
    let low = decode_real_id(low.into(), salt_len)?;
    let high = decode_real_id(high.into(), salt_len)?;
    Ok(between(column, low, high))
}

fn pair_eq(column: &Column, public_id: i64, salt_len: usize) -> Fragment {
    let decoded = codec::decode(public_id, salt_len);

    if !decoded.is_salted() {
        return compare(column, " = ", decoded.id);
    }

    let mut ret = compare(column, " = ", decoded.id);
    ret.push_str(" AND ");
    ret.push(column.salt());
    ret.push_str(" = ");
    ret.push_param(decoded.salt);
    ret.wrap_parens()
}

fn compare(column: &Column, op: &str, real_id: i64) -> Fragment {
    let mut ret = column.base();
    ret.push_str(op);
    ret.push_param(real_id);
    ret
}

fn between(column: &Column, low: i64, high: i64) -> Fragment {
    let mut ret = column.base();
    ret.push_str(" BETWEEN ");
    ret.push_param(low);
    ret.push_str(" AND ");
    ret.push_param(high);
    ret
}

fn decode_real_id(public_id: Value, salt_len: usize) -> Result<i64> {
    let public_id = expect_int("public id", public_id)?;
    Ok(codec::decode(public_id, salt_len).id)
}

fn expect_int(what: &'static str, value: Value) -> Result<i64> {
    match value {
        Value::I64(v) => Ok(v),
        other => Err(Error::type_mismatch(what, other.type_name())),
    }
}
