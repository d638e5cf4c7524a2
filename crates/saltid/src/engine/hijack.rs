use saltid_core::{
    stmt::{Record, Value},
    Registry,
};

/// Settings shared by every hijacking pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HijackConfig {
    pub salt_length: usize,
    pub suffix: String,
}

#[derive(Clone, Copy)]
enum Context<'a> {
    /// Records of a known entity; only registered pairs are hijacked
    Entity {
        registry: &'a Registry,
        name: &'a str,
    },

    /// Reached through a field that is not a relation
    Lost,

    /// No registry: pairs are guessed from the suffix
    Unchecked,
}

/// Hide salt fields and install public id views in a result tree.
///
/// With both `entity` and `registry`, only pairs registered for the entity
/// (and for entities reached through relation fields) are touched, and
/// anything reached through another field is left alone. Without a registry
/// every `X` / `X{suffix}` pair present in a record is treated as salted.
pub fn deep_hijack_result(
    mut value: Value,
    config: &HijackConfig,
    entity: Option<&str>,
    registry: Option<&Registry>,
) -> Value {
    let cx = match (registry, entity) {
        (Some(registry), Some(name)) => Context::Entity { registry, name },
        (Some(_), None) => Context::Lost,
        (None, _) => Context::Unchecked,
    };

    visit(&mut value, config, cx);
    value
}

fn visit(value: &mut Value, config: &HijackConfig, cx: Context<'_>) {
    match value {
        Value::Record(record) => hijack_record(record, config, cx),
        Value::List(items) => {
            for item in items {
                visit(item, config, cx);
            }
        }
        _ => {}
    }
}

fn hijack_record(record: &mut Record, config: &HijackConfig, cx: Context<'_>) {
    match cx {
        Context::Entity { registry, name } => {
            for pair in registry.salt_fields(name) {
                if record.contains_key(&pair.salt) {
                    hijack_pair(record, &pair.base, &pair.salt, config.salt_length);
                }
            }
        }
        Context::Unchecked => {
            let pairs: Vec<(String, String)> = record
                .keys()
                .filter_map(|salt| {
                    let base = salt
                        .strip_suffix(config.suffix.as_str())
                        .filter(|base| !base.is_empty())?;
                    record
                        .contains_key(base)
                        .then(|| (base.to_string(), salt.to_string()))
                })
                .collect();

            for (base, salt) in pairs {
                hijack_pair(record, &base, &salt, config.salt_length);
            }
        }
        Context::Lost => return,
    }

    for (key, value) in record.raw_iter_mut() {
        let child = match cx {
            Context::Entity { registry, name } => match registry.relation(name, key) {
                Some(relation) => Context::Entity {
                    registry,
                    name: &relation.target,
                },
                None => continue,
            },
            other => other,
        };

        visit(value, config, child);
    }
}

/// The salt is always hidden. The base becomes a public id view when both
/// stored values are integers, and is left as stored otherwise.
fn hijack_pair(record: &mut Record, base: &str, salt: &str, salt_length: usize) {
    record.hide(salt);
    record.derive_public_id(base, salt, salt_length);
}
