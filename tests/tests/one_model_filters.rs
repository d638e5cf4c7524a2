use saltid::Db;
use pretty_assertions::assert_eq;
use serde_json::json;
use tests::{public_id, tests, DbTest};

async fn setup(test: &mut DbTest) -> (Db, Vec<i64>) {
    let db = test.setup_db(Db::builder());

    for email in ["a", "b", "c", "d"] {
        db.model("User")
            .create(json!({ "data": { "email": email } }))
            .await
            .unwrap();
    }

    let ids = test
        .stored("User")
        .iter()
        .map(|row| public_id(row, "id"))
        .collect();

    (db, ids)
}

async fn emails(db: &Db, args: serde_json::Value) -> serde_json::Value {
    let mut args = args;
    args["select"] = json!({ "email": true });
    args["orderBy"] = json!({ "email": "asc" });

    db.model("User").find_many(args).await.unwrap().to_json()
}

async fn in_list_mixes_public_and_real_ids(test: &mut DbTest) {
    let (db, ids) = setup(test).await;

    let found = emails(&db, json!({ "where": { "id": { "in": [ids[0], ids[2], 4] } } })).await;
    assert_eq!(found, json!([{ "email": "a" }, { "email": "c" }, { "email": "d" }]));

    let found = emails(&db, json!({ "where": { "id": { "notIn": [ids[1], ids[3]] } } })).await;
    assert_eq!(found, json!([{ "email": "a" }, { "email": "c" }]));
}

async fn range_on_public_ids_uses_real_ids(test: &mut DbTest) {
    let (db, ids) = setup(test).await;

    // Salts are random, so only the real id part may carry order
    let found = emails(&db, json!({ "where": { "id": { "gt": ids[1] } } })).await;
    assert_eq!(found, json!([{ "email": "c" }, { "email": "d" }]));

    let found = emails(&db, json!({ "where": { "id": { "gte": ids[1], "lt": ids[3] } } })).await;
    assert_eq!(found, json!([{ "email": "b" }, { "email": "c" }]));
}

async fn negation_and_equals(test: &mut DbTest) {
    let (db, ids) = setup(test).await;

    let found = emails(&db, json!({ "where": { "id": { "equals": ids[3] } } })).await;
    assert_eq!(found, json!([{ "email": "d" }]));

    let found = emails(
        &db,
        json!({ "where": { "id": { "not": { "in": [ids[0], ids[1]] } } } }),
    )
    .await;
    assert_eq!(found, json!([{ "email": "c" }, { "email": "d" }]));

    let found = emails(
        &db,
        json!({ "where": { "OR": [{ "id": ids[0] }, { "email": "d" }] } }),
    )
    .await;
    assert_eq!(found, json!([{ "email": "a" }, { "email": "d" }]));
}

async fn order_and_paginate(test: &mut DbTest) {
    let (db, ids) = setup(test).await;

    let users = db
        .model("User")
        .find_many(json!({
            "orderBy": { "id": "desc" },
            "skip": 1,
            "take": 2,
            "select": { "id": true },
        }))
        .await
        .unwrap()
        .to_json();

    assert_eq!(users, json!([{ "id": ids[2] }, { "id": ids[1] }]));
}

tests!(
    in_list_mixes_public_and_real_ids,
    range_on_public_ids_uses_real_ids,
    negation_and_equals,
    order_and_paginate,
);
