use saltid::{codec, Config, Db};
use serde_json::json;
use tests::{fixtures, tests, DbTest};

async fn custom_salt_length_and_suffix(test: &mut DbTest) {
    let mut builder = Db::builder();
    builder.salt_length(6).salt_suffix("_salt");

    let db = test.setup_db_with_schema(fixtures::accounts("_salt"), builder);

    let account = db
        .model("Account")
        .create(json!({ "data": { "owner": "alice" } }))
        .await
        .unwrap()
        .to_json();

    let stored = &test.stored("Account")[0];
    let salt = stored["id_salt"].as_i64().unwrap();
    assert_eq!(codec::digit_len(salt as u64), 6);

    let id = codec::encode(1, salt, 6).unwrap();
    assert_eq!(account, json!({ "id": id, "owner": "alice" }));

    let found = db
        .model("Account")
        .find_unique_or_throw(json!({ "where": { "id": id } }))
        .await
        .unwrap()
        .to_json();
    assert_eq!(found, account);

    let raw = db.raw();
    assert_eq!(raw.col(None, "id").salt_sql(), r#""id_salt""#);
}

async fn config_from_json(test: &mut DbTest) {
    let config = Config::from_json(r#"{ "saltLength": 3, "rawResultHijack": false }"#).unwrap();
    assert_eq!(config.salt_length, 3);
    assert_eq!(config.salt_suffix, "Salt");
    assert!(!config.raw_result_hijack);

    let mut builder = Db::builder();
    builder.config(config);

    let db = test.setup_db(builder);
    db.model("User")
        .create(json!({ "data": { "email": "a" } }))
        .await
        .unwrap();

    let salt = test.stored("User")[0]["idSalt"].as_i64().unwrap();
    assert!((100..=999).contains(&salt), "salt={salt}");
}

#[test]
fn invalid_configuration_is_rejected() {
    for salt_length in [0, codec::MAX_SALT_LENGTH + 1] {
        let mut builder = Db::builder();
        builder.salt_length(salt_length);

        let driver = saltid::driver::MemoryDriver::new(fixtures::blog());
        let err = builder.build(driver).unwrap_err();
        assert!(err.is_invalid_configuration(), "err={err}");
    }

    let err = Config::from_json(r#"{ "saltSuffix": "" }"#).unwrap_err();
    assert!(err.is_invalid_configuration(), "err={err}");
}

tests!(custom_salt_length_and_suffix, config_from_json);
