use saltid::{driver::operation::OperationKind, Db};
use pretty_assertions::assert_eq;
use serde_json::json;
use tests::{public_id, tests, DbTest};

async fn create_returns_public_id(test: &mut DbTest) {
    let db = test.setup_db(Db::builder());

    let user = db
        .model("User")
        .create(json!({ "data": { "email": "alice@example.com" } }))
        .await
        .unwrap()
        .to_json();

    let stored = &test.stored("User")[0];
    assert_eq!(stored["id"], json!(1));

    // A four digit salt was generated before the row reached the driver
    let salt = stored["idSalt"].as_i64().unwrap();
    assert!((1000..=9999).contains(&salt), "salt={salt}");

    // The salt is hidden and the id is the composed public id
    assert_eq!(
        user,
        json!({
            "id": salt * 10 + 1,
            "email": "alice@example.com",
            "name": null,
        })
    );
}

async fn find_unique_by_public_id(test: &mut DbTest) {
    let db = test.setup_db(Db::builder());

    for email in ["a@example.com", "b@example.com"] {
        db.model("User")
            .create(json!({ "data": { "email": email } }))
            .await
            .unwrap();
    }

    let second = public_id(&test.stored("User")[1], "id");
    test.log().clear();

    let user = db
        .model("User")
        .find_unique(json!({ "where": { "id": second }, "select": { "email": true } }))
        .await
        .unwrap()
        .to_json();

    assert_eq!(user, json!({ "email": "b@example.com" }));

    // The lookup was downgraded so the salt can be checked
    assert_eq!(test.log().count(OperationKind::FindMany), 1);
    assert_eq!(test.log().count(OperationKind::FindUnique), 0);

    let op = test.log().last_model();
    assert_eq!(op.kind, OperationKind::FindMany);
    assert_eq!(op.args.to_json()["where"]["id"], json!(2));
    assert_eq!(op.args.to_json()["take"], json!(1));
}

async fn forged_salt_is_not_found(test: &mut DbTest) {
    let db = test.setup_db(Db::builder());

    db.model("User")
        .create(json!({ "data": { "email": "a@example.com" } }))
        .await
        .unwrap();

    let stored = &test.stored("User")[0];
    let salt = stored["idSalt"].as_i64().unwrap();
    let forged = if salt == 9999 { 10001 } else { (salt + 1) * 10 + 1 };

    let user = db
        .model("User")
        .find_unique(json!({ "where": { "id": forged } }))
        .await
        .unwrap();
    assert!(user.is_null());

    let err = db
        .model("User")
        .find_unique_or_throw(json!({ "where": { "id": forged } }))
        .await
        .unwrap_err();
    assert!(err.is_record_not_found());
}

async fn short_id_is_a_real_id(test: &mut DbTest) {
    let db = test.setup_db(Db::builder());

    db.model("User")
        .create(json!({ "data": { "email": "a@example.com" } }))
        .await
        .unwrap();

    let expected = public_id(&test.stored("User")[0], "id");

    let user = db
        .model("User")
        .find_unique(json!({ "where": { "id": 1 } }))
        .await
        .unwrap()
        .to_json();

    assert_eq!(user["id"], json!(expected));
    assert_eq!(test.log().last_model().kind, OperationKind::FindUnique);
}

async fn update_and_delete_by_public_id(test: &mut DbTest) {
    let db = test.setup_db(Db::builder());

    db.model("User")
        .create(json!({ "data": { "email": "a@example.com" } }))
        .await
        .unwrap();

    let id = public_id(&test.stored("User")[0], "id");

    let user = db
        .model("User")
        .update(json!({ "where": { "id": id }, "data": { "name": "Alice" } }))
        .await
        .unwrap()
        .to_json();
    assert_eq!(user["id"], json!(id));
    assert_eq!(user["name"], json!("Alice"));

    // Updates never receive a fresh salt
    assert_eq!(public_id(&test.stored("User")[0], "id"), id);

    let deleted = db
        .model("User")
        .delete(json!({ "where": { "id": id } }))
        .await
        .unwrap()
        .to_json();
    assert_eq!(deleted["id"], json!(id));
    assert!(test.stored("User").is_empty());
}

async fn count_and_create_many(test: &mut DbTest) {
    let db = test.setup_db(Db::builder());

    let created = db
        .model("User")
        .create_many(json!({ "data": [{ "email": "a" }, { "email": "b" }, { "email": "c" }] }))
        .await
        .unwrap()
        .to_json();
    assert_eq!(created, json!({ "count": 3 }));

    // Every row carries its own salt
    for row in test.stored("User") {
        assert!(row["idSalt"].is_i64(), "row={row}");
    }

    let first = public_id(&test.stored("User")[0], "id");
    let count = db
        .model("User")
        .count(json!({ "where": { "id": { "not": first } } }))
        .await
        .unwrap()
        .to_json();
    assert_eq!(count, json!(2));
}

tests!(
    create_returns_public_id,
    find_unique_by_public_id,
    forged_salt_is_not_found,
    short_id_is_a_real_id,
    update_and_delete_by_public_id,
    count_and_create_many,
);
