use saltid_core::{
    codec,
    driver::operation::OperationKind,
    stmt::{keyword, Record, Value},
    Registry,
};

use tracing::debug;

struct Inject<'a> {
    registry: &'a Registry,
    salt_len: usize,
}

/// Generate salts for write payloads that do not carry one.
///
/// Create payloads receive a fresh salt for every pair whose base will hold a
/// value. Update payloads are left alone, but creates nested in them are
/// still handled.
pub(crate) fn apply(
    registry: &Registry,
    entity: &str,
    kind: OperationKind,
    args: &mut Value,
    salt_len: usize,
) {
    let Some(args) = args.as_record_mut() else {
        return;
    };

    let inject = Inject { registry, salt_len };

    match kind {
        OperationKind::Create | OperationKind::CreateMany => {
            if let Some(data) = args.get_raw_mut(keyword::DATA) {
                inject.payload(entity, data);
            }
        }
        OperationKind::Update | OperationKind::UpdateMany => {
            if let Some(Value::Record(data)) = args.get_raw_mut(keyword::DATA) {
                inject.nested(entity, data);
            }
        }
        OperationKind::Upsert => {
            if let Some(create) = args.get_raw_mut(keyword::CREATE) {
                inject.payload(entity, create);
            }

            if let Some(Value::Record(update)) = args.get_raw_mut(keyword::UPDATE) {
                inject.nested(entity, update);
            }
        }
        _ => {}
    }
}

impl Inject<'_> {
    /// A create payload, or a list of them.
    fn payload(&self, entity: &str, data: &mut Value) {
        match data {
            Value::Record(record) => {
                self.salts(entity, record);
                self.nested(entity, record);
            }
            Value::List(items) => {
                for item in items {
                    self.payload(entity, item);
                }
            }
            _ => {}
        }
    }

    fn salts(&self, entity: &str, record: &mut Record) {
        for pair in self.registry.salt_fields(entity) {
            if record.get_raw(&pair.salt).is_some_and(|salt| !salt.is_null()) {
                continue;
            }

            if pair.salt_has_default {
                continue;
            }

            let base_provided = record
                .get_raw(&pair.base)
                .is_some_and(|base| !base.is_null());

            if !base_provided && !pair.base_has_default {
                continue;
            }

            let salt = codec::generate_salt(self.salt_len);
            debug!(entity, field = %pair.salt, "generated salt");
            record.insert(&pair.salt, salt);
        }
    }

    /// Creates reached through relation fields of `record`.
    fn nested(&self, entity: &str, record: &mut Record) {
        for (key, value) in record.raw_iter_mut() {
            let Some(relation) = self.registry.relation(entity, key) else {
                continue;
            };

            let Value::Record(verbs) = value else {
                continue;
            };

            let target = relation.target.as_str();

            for (verb, arg) in verbs.raw_iter_mut() {
                match verb {
                    keyword::CREATE => self.payload(target, arg),
                    keyword::CREATE_MANY => {
                        if let Some(data) = arg
                            .as_record_mut()
                            .and_then(|create_many| create_many.get_raw_mut(keyword::DATA))
                        {
                            self.payload(target, data);
                        }
                    }
                    keyword::CONNECT_OR_CREATE => {
                        for_each_record(arg, |item| {
                            if let Some(create) = item.get_raw_mut(keyword::CREATE) {
                                self.payload(target, create);
                            }
                        });
                    }
                    keyword::UPSERT => {
                        for_each_record(arg, |item| {
                            if let Some(create) = item.get_raw_mut(keyword::CREATE) {
                                self.payload(target, create);
                            }

                            if let Some(Value::Record(update)) = item.get_raw_mut(keyword::UPDATE)
                            {
                                self.nested(target, update);
                            }
                        });
                    }
                    _ => {}
                }
            }
        }
    }
}

fn for_each_record(value: &mut Value, mut f: impl FnMut(&mut Record)) {
    match value {
        Value::Record(record) => f(record),
        Value::List(items) => {
            for item in items {
                if let Value::Record(record) = item {
                    f(record);
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use saltid_core::schema::descriptor::{Descriptor, Field, Model};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn registry() -> Registry {
        let registry = Registry::default();
        registry.init(Some(
            &Descriptor::new()
                .model(
                    Model::new("User")
                        .field(Field::int("id").id().auto_increment())
                        .field(Field::int("idSalt").nullable())
                        .field(Field::int("code"))
                        .field(Field::int("codeSalt").default_value(1000))
                        .field(Field::relation("posts", "Post").list()),
                )
                .model(
                    Model::new("Post")
                        .field(Field::int("id").id().auto_increment())
                        .field(Field::int("idSalt").nullable())
                        .field(Field::int("authorId").nullable())
                        .field(Field::int("authorIdSalt").nullable())
                        .field(
                            Field::relation("author", "User")
                                .references(["authorId", "authorIdSalt"], ["id", "idSalt"]),
                        ),
                ),
        ));
        registry
    }

    fn run(entity: &str, kind: OperationKind, args: serde_json::Value) -> Value {
        let mut args = Value::from(args);
        apply(&registry(), entity, kind, &mut args, 4);
        args
    }

    fn salt_of(record: &Record, field: &str) -> i64 {
        let salt = record.get_raw(field).and_then(Value::as_i64).unwrap();
        assert_eq!(codec::digit_len(salt as u64), 4, "salt={salt}");
        salt
    }

    #[test]
    fn create_generates_salt_for_defaulted_base() {
        let args = run("User", OperationKind::Create, json!({ "data": { "code": 1 } }));
        let data = args.expect_record().get_raw("data").unwrap().expect_record();

        salt_of(data, "idSalt");

        // Salt field has a storage default
        assert!(!data.contains_key("codeSalt"));
    }

    #[test]
    fn base_without_value_gets_no_salt() {
        let args = run("Post", OperationKind::Create, json!({ "data": { "authorId": null } }));
        let data = args.expect_record().get_raw("data").unwrap().expect_record();

        salt_of(data, "idSalt");
        assert!(!data.contains_key("authorIdSalt"));
    }

    #[test]
    fn existing_salt_is_kept() {
        let args = run(
            "Post",
            OperationKind::Create,
            json!({ "data": { "idSalt": 4321, "authorId": 5, "authorIdSalt": 1234 } }),
        );

        assert_eq!(
            args.to_json(),
            json!({ "data": { "idSalt": 4321, "authorId": 5, "authorIdSalt": 1234 } })
        );
    }

    #[test]
    fn create_many_payloads() {
        let args = run(
            "Post",
            OperationKind::CreateMany,
            json!({ "data": [{ "authorId": 5 }, {}] }),
        );

        let data = args.expect_record().get_raw("data").unwrap().expect_list();
        salt_of(data[0].expect_record(), "authorIdSalt");
        salt_of(data[1].expect_record(), "idSalt");
        assert!(!data[1].expect_record().contains_key("authorIdSalt"));
    }

    #[test]
    fn nested_creates() {
        let args = run(
            "User",
            OperationKind::Create,
            json!({
                "data": {
                    "posts": {
                        "create": [{ "title": "a" }],
                        "createMany": { "data": [{ "title": "b" }] },
                        "connectOrCreate": { "where": { "id": 1 }, "create": { "title": "c" } },
                        "connect": { "id": 7 },
                    }
                }
            }),
        );

        let posts = args
            .expect_record()
            .get_raw("data")
            .unwrap()
            .expect_record()
            .get_raw("posts")
            .unwrap()
            .expect_record();

        salt_of(posts.get_raw("create").unwrap().expect_list()[0].expect_record(), "idSalt");

        let create_many = posts.get_raw("createMany").unwrap().expect_record();
        salt_of(create_many.get_raw("data").unwrap().expect_list()[0].expect_record(), "idSalt");

        let connect_or_create = posts.get_raw("connectOrCreate").unwrap().expect_record();
        salt_of(connect_or_create.get_raw("create").unwrap().expect_record(), "idSalt");
        assert!(!connect_or_create.get_raw("where").unwrap().expect_record().contains_key("idSalt"));

        assert_eq!(posts.get_raw("connect").unwrap().to_json(), json!({ "id": 7 }));
    }

    #[test]
    fn update_skips_root_payload() {
        let args = run(
            "User",
            OperationKind::Update,
            json!({
                "where": { "id": 1 },
                "data": { "code": 9, "posts": { "create": { "title": "x" } } }
            }),
        );

        let data = args.expect_record().get_raw("data").unwrap().expect_record();
        assert!(!data.contains_key("idSalt"));

        let create = data.get_raw("posts").unwrap().expect_record().get_raw("create").unwrap();
        salt_of(create.expect_record(), "idSalt");
    }

    #[test]
    fn upsert_create_branch() {
        let args = run(
            "User",
            OperationKind::Upsert,
            json!({ "where": { "id": 1 }, "create": {}, "update": { "code": 2 } }),
        );

        let record = args.expect_record();
        salt_of(record.get_raw("create").unwrap().expect_record(), "idSalt");
        assert_eq!(record.get_raw("update").unwrap().to_json(), json!({ "code": 2 }));
    }

    #[test]
    fn reads_are_untouched() {
        let args = run("User", OperationKind::FindMany, json!({ "data": {} }));
        assert_eq!(args.to_json(), json!({ "data": {} }));
    }
}
