use saltid_core::{
    driver::{
        operation::{ModelOperation, OperationKind},
        Driver,
    },
    stmt::{keyword, Record, Value},
    Error, Result,
};

use tracing::debug;

/// Run a point lookup whose filter was decomposed as a `FindMany` limited
/// to one row, then check the row's salts against the decoded ones.
///
/// A missing row or a salt mismatch reads as `null`, or fails with a record
/// not found error for `FindUniqueOrThrow`.
pub(crate) async fn exec(
    driver: &dyn Driver,
    model: &str,
    kind: OperationKind,
    args: Value,
    salts: &[(String, i64)],
) -> Result<Value> {
    let mut args = match args {
        Value::Record(record) => record,
        _ => Record::new(),
    };

    let mut added = vec![];

    if let Some(Value::Record(select)) = args.get_raw_mut(keyword::SELECT) {
        for (salt_field, _) in salts {
            if !select.contains_key(salt_field) {
                select.insert(salt_field, true);
                added.push(salt_field.as_str());
            }
        }
    }

    args.insert(keyword::TAKE, 1);

    debug!(model, %kind, "point lookup downgraded to findMany");

    let rows = driver
        .exec(ModelOperation::new(model, OperationKind::FindMany, args).into())
        .await?;

    let row = match rows {
        Value::List(rows) => rows.into_iter().next(),
        Value::Null => None,
        other => Some(other),
    };

    let verified = match row {
        Some(Value::Record(row)) if salts_match(&row, salts) => Some(row),
        Some(_) => {
            debug!(model, "salt verification failed");
            None
        }
        None => None,
    };

    match verified {
        Some(mut row) => {
            for salt_field in added {
                row.remove(salt_field);
            }
            Ok(Value::Record(row))
        }
        None if kind == OperationKind::FindUniqueOrThrow => Err(Error::record_not_found(
            format!("model={model}; no row matched the public id"),
        )),
        None => Ok(Value::Null),
    }
}

fn salts_match(row: &Record, salts: &[(String, i64)]) -> bool {
    salts
        .iter()
        .all(|(salt_field, salt)| row.get_raw(salt_field) == Some(&Value::I64(*salt)))
}
