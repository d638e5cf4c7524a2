use saltid::Db;
use pretty_assertions::assert_eq;
use serde_json::json;
use tests::{public_id, tests, DbTest};

async fn nested_create_links_salted_key(test: &mut DbTest) {
    let db = test.setup_db(Db::builder());

    let user = db
        .model("User")
        .create(json!({
            "data": {
                "email": "alice@example.com",
                "posts": { "create": [{ "title": "one" }, { "title": "two" }] },
            },
            "include": { "posts": true },
        }))
        .await
        .unwrap()
        .to_json();

    let user_id = public_id(&test.stored("User")[0], "id");
    let posts = test.stored("Post");

    // Each post got its own salt and references both parts of the author id
    for post in &posts {
        assert!(post["idSalt"].is_i64(), "post={post}");
        assert_eq!(post["authorId"], json!(1));
        assert_eq!(post["authorIdSalt"], test.stored("User")[0]["idSalt"]);
    }

    assert_eq!(user["id"], json!(user_id));
    assert_eq!(
        user["posts"],
        json!([
            {
                "id": public_id(&posts[0], "id"),
                "title": "one",
                "views": 0,
                "authorId": user_id,
            },
            {
                "id": public_id(&posts[1], "id"),
                "title": "two",
                "views": 0,
                "authorId": user_id,
            },
        ])
    );
}

async fn connect_by_public_id(test: &mut DbTest) {
    let db = test.setup_db(Db::builder());

    db.model("User")
        .create(json!({ "data": { "email": "alice@example.com" } }))
        .await
        .unwrap();
    let user_id = public_id(&test.stored("User")[0], "id");

    let post = db
        .model("Post")
        .create(json!({
            "data": { "title": "hello", "author": { "connect": { "id": user_id } } },
            "select": { "title": true, "authorId": true, "author": { "select": { "email": true } } },
        }))
        .await
        .unwrap()
        .to_json();

    assert_eq!(
        post,
        json!({
            "title": "hello",
            "authorId": user_id,
            "author": { "email": "alice@example.com" },
        })
    );
}

async fn create_child_with_public_fk(test: &mut DbTest) {
    let db = test.setup_db(Db::builder());

    db.model("User")
        .create(json!({ "data": { "email": "alice@example.com" } }))
        .await
        .unwrap();

    let user = test.stored("User")[0].clone();
    let uid = public_id(&user, "id");

    let post = db
        .model("Post")
        .create(json!({
            "data": { "title": "hello", "authorId": uid },
            "include": { "author": true },
        }))
        .await
        .unwrap()
        .to_json();

    // The foreign key was split before the write, and its salt was kept
    let args = test.log().last_args();
    assert_eq!(args["data"]["authorId"], json!(1));
    assert_eq!(args["data"]["authorIdSalt"], user["idSalt"]);

    let stored = test.stored("Post");
    assert_eq!(stored[0]["authorIdSalt"], user["idSalt"]);

    assert_eq!(post["authorId"], json!(uid));
    assert_eq!(post["author"]["id"], json!(uid));
    assert_eq!(post["author"]["email"], json!("alice@example.com"));
}

async fn filter_through_relation(test: &mut DbTest) {
    let db = test.setup_db(Db::builder());

    for email in ["a", "b"] {
        db.model("User")
            .create(json!({
                "data": { "email": email, "posts": { "create": { "title": email } } },
            }))
            .await
            .unwrap();
    }

    let b = public_id(&test.stored("User")[1], "id");

    let posts = db
        .model("Post")
        .find_many(json!({
            "where": { "author": { "is": { "id": b } } },
            "select": { "title": true },
        }))
        .await
        .unwrap()
        .to_json();
    assert_eq!(posts, json!([{ "title": "b" }]));

    // Foreign keys are matched as public ids too
    let posts = db
        .model("Post")
        .find_many(json!({ "where": { "authorId": b }, "select": { "title": true } }))
        .await
        .unwrap()
        .to_json();
    assert_eq!(posts, json!([{ "title": "b" }]));

    let users = db
        .model("User")
        .find_many(json!({
            "where": { "posts": { "some": { "title": "a" } } },
            "select": { "email": true },
        }))
        .await
        .unwrap()
        .to_json();
    assert_eq!(users, json!([{ "email": "a" }]));
}

async fn reassign_author_by_public_id(test: &mut DbTest) {
    let db = test.setup_db(Db::builder());

    db.model("User")
        .create(json!({
            "data": { "email": "a", "posts": { "create": { "title": "p" } } },
        }))
        .await
        .unwrap();
    db.model("User")
        .create(json!({ "data": { "email": "b" } }))
        .await
        .unwrap();

    let post_id = public_id(&test.stored("Post")[0], "id");
    let b = public_id(&test.stored("User")[1], "id");

    let post = db
        .model("Post")
        .update(json!({
            "where": { "id": post_id },
            "data": { "authorId": { "set": b } },
        }))
        .await
        .unwrap()
        .to_json();

    assert_eq!(post["authorId"], json!(b));
    assert_eq!(test.stored("Post")[0]["authorId"], json!(2));
    assert_eq!(
        test.stored("Post")[0]["authorIdSalt"],
        test.stored("User")[1]["idSalt"]
    );
}

tests!(
    nested_create_links_salted_key,
    connect_by_public_id,
    create_child_with_public_fk,
    filter_through_relation,
    reassign_author_by_public_id,
);
