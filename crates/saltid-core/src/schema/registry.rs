use super::descriptor::{Descriptor, Model};

use indexmap::IndexMap;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Suffix appended to a base field name to form its salt field name.
pub const DEFAULT_SALT_SUFFIX: &str = "Salt";

/// Lookup tables of salt pairs and relations, per entity.
///
/// The tables are computed from a [`Descriptor`] the first time
/// [`init`](Registry::init) is called with one, and are immutable afterwards.
#[derive(Debug)]
pub struct Registry {
    suffix: String,
    tables: OnceLock<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    salt_fields: IndexMap<String, Vec<SaltField>>,
    relations: IndexMap<String, IndexMap<String, RelationField>>,
}

/// A base field and its salt sibling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaltField {
    pub base: String,
    pub salt: String,

    /// The storage layer fills the base when a write omits it
    pub base_has_default: bool,

    /// The storage layer fills the salt when a write omits it
    pub salt_has_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationField {
    pub name: String,
    pub target: String,
    pub is_list: bool,
    pub fields: Vec<String>,
    pub references: Vec<String>,
}

impl Registry {
    pub fn new(suffix: impl Into<String>) -> Registry {
        Registry {
            suffix: suffix.into(),
            tables: OnceLock::new(),
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Build the lookup tables. Only the first call with a descriptor has an
    /// effect.
    pub fn init(&self, descriptor: Option<&Descriptor>) {
        let Some(descriptor) = descriptor else {
            return;
        };

        self.tables
            .get_or_init(|| Tables::build(descriptor, &self.suffix));
    }

    /// Build the lookup tables from a JSON descriptor. Unparseable input
    /// leaves the registry initialized with empty tables.
    pub fn init_from_json(&self, json: &str) {
        self.tables.get_or_init(|| match Descriptor::from_json(json) {
            Ok(descriptor) => Tables::build(&descriptor, &self.suffix),
            Err(err) => {
                warn!(%err, "cannot parse schema descriptor; salt handling disabled");
                Tables::default()
            }
        });
    }

    pub fn is_initialized(&self) -> bool {
        self.tables.get().is_some()
    }

    /// Salt pairs declared on `entity`, in field order.
    pub fn salt_fields(&self, entity: &str) -> &[SaltField] {
        self.tables
            .get()
            .and_then(|tables| tables.salt_fields.get(entity))
            .map_or(&[], Vec::as_slice)
    }

    /// The pair whose base field is `base`, if any.
    pub fn salt_field(&self, entity: &str, base: &str) -> Option<&SaltField> {
        self.salt_fields(entity)
            .iter()
            .find(|field| field.base == base)
    }

    pub fn is_pair(&self, entity: &str, base: &str, salt: &str) -> bool {
        self.salt_field(entity, base)
            .is_some_and(|field| field.salt == salt)
    }

    pub fn relation(&self, entity: &str, field: &str) -> Option<&RelationField> {
        self.tables.get()?.relations.get(entity)?.get(field)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new(DEFAULT_SALT_SUFFIX)
    }
}

impl Tables {
    fn build(descriptor: &Descriptor, suffix: &str) -> Tables {
        let mut tables = Tables::default();

        for model in &descriptor.models {
            if tables.salt_fields.contains_key(&model.name) {
                warn!(model = %model.name, "duplicate model in schema descriptor; skipping");
                continue;
            }

            tables
                .salt_fields
                .insert(model.name.clone(), salt_fields(model, suffix));
            tables
                .relations
                .insert(model.name.clone(), relations(model, descriptor));
        }

        debug!(
            models = tables.salt_fields.len(),
            pairs = tables.salt_fields.values().map(Vec::len).sum::<usize>(),
            "salt registry built"
        );

        tables
    }
}

fn salt_fields(model: &Model, suffix: &str) -> Vec<SaltField> {
    let mut pairs = vec![];

    for (base, base_scalar) in model.scalars() {
        if !base_scalar.ty.is_integer() {
            continue;
        }

        let salt_name = format!("{}{suffix}", base.name);

        let Some(salt_scalar) = model
            .field_by_name(&salt_name)
            .and_then(|field| field.as_scalar())
        else {
            continue;
        };

        if !salt_scalar.ty.is_integer() {
            warn!(
                model = %model.name,
                field = %salt_name,
                "salt field is not an integer; ignoring pair"
            );
            continue;
        }

        pairs.push(SaltField {
            base: base.name.clone(),
            salt: salt_name,
            base_has_default: base_scalar.has_default(),
            salt_has_default: salt_scalar.has_default(),
        });
    }

    pairs
}

fn relations(model: &Model, descriptor: &Descriptor) -> IndexMap<String, RelationField> {
    let mut relations = IndexMap::new();

    for (field, relation) in model.relations() {
        if descriptor.get(&relation.target).is_none() {
            warn!(
                model = %model.name,
                field = %field.name,
                target = %relation.target,
                "relation targets an unknown model; skipping"
            );
            continue;
        }

        relations.insert(
            field.name.clone(),
            RelationField {
                name: field.name.clone(),
                target: relation.target.clone(),
                is_list: relation.list,
                fields: relation.fields.clone(),
                references: relation.references.clone(),
            },
        );
    }

    relations
}
