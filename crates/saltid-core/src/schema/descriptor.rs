//! Description of the application schema, as supplied by the data-access
//! layer.
//!
//! The descriptor is plain data. It can be deserialized (for example from a
//! JSON dump produced by schema introspection) or assembled in code:
//!
//! ```
//! use saltid_core::schema::descriptor::{Descriptor, Field, Model};
//!
//! let descriptor = Descriptor::new()
//!     .model(
//!         Model::new("User")
//!             .field(Field::int("id").id().auto_increment())
//!             .field(Field::int("idSalt").nullable())
//!             .field(Field::relation("posts", "Post").list()),
//!     )
//!     .model(
//!         Model::new("Post")
//!             .field(Field::int("id").id().auto_increment())
//!             .field(Field::int("idSalt").nullable())
//!             .field(Field::int("authorId"))
//!             .field(Field::int("authorIdSalt").nullable())
//!             .field(
//!                 Field::relation("author", "User")
//!                     .references(["authorId", "authorIdSalt"], ["id", "idSalt"]),
//!             ),
//!     );
//!
//! assert!(descriptor.get("Post").is_some());
//! ```

use crate::stmt::Value;

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Descriptor {
    #[serde(default)]
    pub models: Vec<Model>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Model {
    /// Entity name, as used in operations
    pub name: String,

    #[serde(default)]
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Field {
    pub name: String,

    #[serde(flatten)]
    pub kind: FieldKind,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FieldKind {
    Scalar(Scalar),
    Relation(Relation),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scalar {
    #[serde(rename = "type")]
    pub ty: ScalarType,

    /// True if the field is the model's primary key
    #[serde(default)]
    pub id: bool,

    #[serde(default)]
    pub unique: bool,

    #[serde(default)]
    pub nullable: bool,

    /// Storage-layer default, if any
    #[serde(default)]
    pub default: Option<FieldDefault>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ScalarType {
    Int,
    BigInt,
    Float,
    Decimal,
    String,
    Boolean,
    DateTime,
    Json,
    Bytes,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldDefault {
    /// Assigned sequentially by the storage engine
    AutoIncrement,

    /// A static value
    Value(Value),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Relation {
    /// Name of the related model
    pub target: String,

    /// True for to-many relations
    #[serde(default)]
    pub list: bool,

    /// Foreign key fields on this model. Empty on the side that does not own
    /// the foreign key.
    #[serde(default)]
    pub fields: Vec<String>,

    /// Fields of the target referenced by `fields`, position by position
    #[serde(default)]
    pub references: Vec<String>,
}

impl Descriptor {
    pub fn new() -> Descriptor {
        Descriptor::default()
    }

    pub fn from_json(json: &str) -> crate::Result<Descriptor> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn model(mut self, model: Model) -> Descriptor {
        self.models.push(model);
        self
    }

    /// Find a model by name.
    pub fn get(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|model| model.name == name)
    }
}

impl Model {
    pub fn new(name: impl Into<String>) -> Model {
        Model {
            name: name.into(),
            fields: vec![],
        }
    }

    pub fn field(mut self, field: Field) -> Model {
        self.fields.push(field);
        self
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn scalars(&self) -> impl Iterator<Item = (&Field, &Scalar)> + '_ {
        self.fields.iter().filter_map(|field| match &field.kind {
            FieldKind::Scalar(scalar) => Some((field, scalar)),
            FieldKind::Relation(_) => None,
        })
    }

    pub fn relations(&self) -> impl Iterator<Item = (&Field, &Relation)> + '_ {
        self.fields.iter().filter_map(|field| match &field.kind {
            FieldKind::Relation(relation) => Some((field, relation)),
            FieldKind::Scalar(_) => None,
        })
    }

    /// The primary key field, if the model declares one.
    pub fn primary_key(&self) -> Option<&Field> {
        self.scalars()
            .find(|(_, scalar)| scalar.id)
            .map(|(field, _)| field)
    }
}

impl Field {
    pub fn scalar(name: impl Into<String>, ty: ScalarType) -> Field {
        Field {
            name: name.into(),
            kind: FieldKind::Scalar(Scalar {
                ty,
                id: false,
                unique: false,
                nullable: false,
                default: None,
            }),
        }
    }

    pub fn int(name: impl Into<String>) -> Field {
        Field::scalar(name, ScalarType::Int)
    }

    pub fn big_int(name: impl Into<String>) -> Field {
        Field::scalar(name, ScalarType::BigInt)
    }

    pub fn string(name: impl Into<String>) -> Field {
        Field::scalar(name, ScalarType::String)
    }

    pub fn relation(name: impl Into<String>, target: impl Into<String>) -> Field {
        Field {
            name: name.into(),
            kind: FieldKind::Relation(Relation {
                target: target.into(),
                list: false,
                fields: vec![],
                references: vec![],
            }),
        }
    }

    /// Mark as primary key. Primary keys are unique.
    pub fn id(self) -> Field {
        self.map_scalar("id", |scalar| {
            scalar.id = true;
            scalar.unique = true;
        })
    }

    pub fn unique(self) -> Field {
        self.map_scalar("unique", |scalar| scalar.unique = true)
    }

    pub fn nullable(self) -> Field {
        self.map_scalar("nullable", |scalar| scalar.nullable = true)
    }

    pub fn auto_increment(self) -> Field {
        self.map_scalar("auto_increment", |scalar| {
            scalar.default = Some(FieldDefault::AutoIncrement)
        })
    }

    pub fn default_value(self, value: impl Into<Value>) -> Field {
        let value = value.into();
        self.map_scalar("default_value", |scalar| {
            scalar.default = Some(FieldDefault::Value(value))
        })
    }

    /// Mark a relation as to-many.
    pub fn list(mut self) -> Field {
        match &mut self.kind {
            FieldKind::Relation(relation) => relation.list = true,
            FieldKind::Scalar(_) => panic!("`list` called on scalar field `{}`", self.name),
        }
        self
    }

    /// Set the foreign key mapping of a relation.
    pub fn references<F, R>(
        mut self,
        fields: impl IntoIterator<Item = F>,
        references: impl IntoIterator<Item = R>,
    ) -> Field
    where
        F: Into<String>,
        R: Into<String>,
    {
        match &mut self.kind {
            FieldKind::Relation(relation) => {
                relation.fields = fields.into_iter().map(Into::into).collect();
                relation.references = references.into_iter().map(Into::into).collect();
            }
            FieldKind::Scalar(_) => panic!("`references` called on scalar field `{}`", self.name),
        }
        self
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match &self.kind {
            FieldKind::Scalar(scalar) => Some(scalar),
            FieldKind::Relation(_) => None,
        }
    }

    pub fn as_relation(&self) -> Option<&Relation> {
        match &self.kind {
            FieldKind::Relation(relation) => Some(relation),
            FieldKind::Scalar(_) => None,
        }
    }

    pub fn is_integer(&self) -> bool {
        self.as_scalar().is_some_and(|scalar| scalar.ty.is_integer())
    }

    fn map_scalar(mut self, what: &str, f: impl FnOnce(&mut Scalar)) -> Field {
        match &mut self.kind {
            FieldKind::Scalar(scalar) => f(scalar),
            FieldKind::Relation(_) => panic!("`{what}` called on relation field `{}`", self.name),
        }
        self
    }
}

impl Scalar {
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

impl ScalarType {
    pub fn is_integer(self) -> bool {
        matches!(self, ScalarType::Int | ScalarType::BigInt)
    }
}
