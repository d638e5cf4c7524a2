use saltid::{
    driver::{operation::RawKind, Capability, Driver, Operation},
    sql::Fragment,
    stmt::Value,
    Db,
};
use saltid_core::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex};
use tests::DbTest;

/// Answers every raw statement with the same rows.
#[derive(Debug)]
struct RowsDriver {
    capability: Capability,
    rows: Value,
    sent: Arc<Mutex<Vec<(RawKind, String, Vec<Value>)>>>,
}

impl RowsDriver {
    fn new(capability: Capability, rows: serde_json::Value) -> Self {
        Self {
            capability,
            rows: Value::from(rows),
            sent: Arc::default(),
        }
    }
}

#[async_trait]
impl Driver for RowsDriver {
    fn capability(&self) -> &Capability {
        &self.capability
    }

    async fn exec(&self, op: Operation) -> saltid::Result<Value> {
        let Operation::Raw(op) = op else {
            saltid::bail!("only raw statements are expected");
        };

        let response = match op.kind {
            RawKind::Query => self.rows.clone(),
            RawKind::Execute => Value::I64(1),
        };

        self.sent.lock().unwrap().push((op.kind, op.sql, op.params));
        Ok(response)
    }
}

#[tokio::test]
async fn query_raw_hijacks_salted_rows() {
    tests::init_tracing();

    let driver = RowsDriver::new(
        Capability::POSTGRESQL,
        json!([
            { "id": 5, "idSalt": 1234, "email": "a" },
            { "id": 6, "idSalt": null, "email": "b" },
        ]),
    );
    let sent = driver.sent.clone();
    let db = Db::builder().build(driver).unwrap();

    let raw = db.raw();
    let id = raw.col(Some("u"), "id");

    let mut query = Fragment::raw(r#"SELECT * FROM "User" AS "u" WHERE "#);
    query.push(raw.filter().in_list(&id, [12345, 6]).unwrap());

    let rows = db.query_raw(&query).await.unwrap();

    let (kind, sql, params) = sent.lock().unwrap()[0].clone();
    assert_eq!(kind, RawKind::Query);
    assert_eq!(
        sql,
        r#"SELECT * FROM "User" AS "u" WHERE (("u"."id" = $1 AND "u"."idSalt" = $2) OR "u"."id" = $3)"#
    );
    assert_eq!(params, [Value::I64(5), Value::I64(1234), Value::I64(6)]);

    // Rows without an integer salt are left as stored
    assert_eq!(
        rows.to_json(),
        json!([
            { "id": 12345, "email": "a" },
            { "id": 6, "idSalt": null, "email": "b" },
        ])
    );
}

#[tokio::test]
async fn raw_hijack_can_be_disabled() {
    let driver = RowsDriver::new(Capability::MYSQL, json!([{ "id": 5, "idSalt": 1234 }]));
    let db = Db::builder().raw_result_hijack(false).build(driver).unwrap();

    let rows = db
        .query_raw_unsafe("SELECT id, idSalt FROM User", vec![])
        .await
        .unwrap();
    assert_eq!(rows.to_json(), json!([{ "id": 5, "idSalt": 1234 }]));

    // Selective hijacking is still available
    let rows = db.raw().result(["id"]).apply(rows);
    assert_eq!(rows.to_json(), json!([{ "id": 12345 }]));
}

#[tokio::test]
async fn execute_raw_returns_affected_rows() {
    let driver = RowsDriver::new(Capability::SQLITE, json!([]));
    let sent = driver.sent.clone();
    let db = Db::builder().build(driver).unwrap();

    let raw = db.raw();
    let id = raw.col(None, "id");

    let mut stmt = Fragment::raw(r#"DELETE FROM "User" WHERE "#);
    stmt.push(raw.filter().eq(&id, 12345).unwrap());

    assert_eq!(db.execute_raw(&stmt).await.unwrap(), 1);

    let (kind, sql, _) = sent.lock().unwrap()[0].clone();
    assert_eq!(kind, RawKind::Execute);
    assert_eq!(sql, r#"DELETE FROM "User" WHERE ("id" = ?1 AND "idSalt" = ?2)"#);
}

#[test]
fn memory_driver_rejects_raw_sql() {
    let mut test = DbTest::new();
    let db = test.setup_db(Db::builder());

    let err = tests::block_on(db.query_raw_unsafe("SELECT 1", vec![])).unwrap_err();
    assert!(err.to_string().contains("raw SQL"), "err={err}");
}
