//! Schemas shared by the integration tests.

use saltid::schema::descriptor::{Descriptor, Field, Model};

/// Users and their posts. Both ids are salted, and so is the post's
/// reference to its author.
pub fn blog() -> Descriptor {
    Descriptor::new()
        .model(
            Model::new("User")
                .field(Field::int("id").id().auto_increment())
                .field(Field::int("idSalt").nullable())
                .field(Field::string("email").unique())
                .field(Field::string("name").nullable())
                .field(Field::relation("posts", "Post").list()),
        )
        .model(
            Model::new("Post")
                .field(Field::int("id").id().auto_increment())
                .field(Field::int("idSalt").nullable())
                .field(Field::string("title"))
                .field(Field::int("views").default_value(0))
                .field(Field::int("authorId").nullable())
                .field(Field::int("authorIdSalt").nullable())
                .field(
                    Field::relation("author", "User")
                        .references(["authorId", "authorIdSalt"], ["id", "idSalt"]),
                ),
        )
}

/// A single model with a configurable salt suffix.
pub fn accounts(suffix: &str) -> Descriptor {
    Descriptor::new().model(
        Model::new("Account")
            .field(Field::int("id").id().auto_increment())
            .field(Field::int(format!("id{suffix}")).nullable())
            .field(Field::string("owner")),
    )
}
