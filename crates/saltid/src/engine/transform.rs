use saltid_core::{
    codec::{self, Decoded},
    schema::SaltField,
    stmt::{keyword, Record, Value},
    Registry,
};

use tracing::debug;

/// Result of decomposing public ids in an argument tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    /// The rewritten arguments
    pub args: Value,

    /// True if at least one public id was split into (real id, salt)
    pub decomposed: bool,

    /// `(salt field, salt)` decoded at the top level of `where`
    pub salts: Vec<(String, i64)>,
}

struct Transform<'a> {
    registry: &'a Registry,
    salt_len: usize,
    decomposed: bool,
    salts: Vec<(String, i64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// The operation's argument record
    Args,

    /// The `where` record directly under the arguments
    RootWhere,

    Nested,
}

/// Rewrite `args`, replacing every public id found under a salted base field
/// of `entity` (or of an entity reached through relations) by its real id
/// and salt.
pub fn apply(registry: &Registry, entity: &str, args: &Value, salt_len: usize) -> Transformed {
    let mut transform = Transform {
        registry,
        salt_len,
        decomposed: false,
        salts: vec![],
    };

    let args = match args {
        Value::Record(record) => Value::Record(transform.record(entity, record, Scope::Args)),
        other => transform.value(entity, other),
    };

    Transformed {
        args,
        decomposed: transform.decomposed,
        salts: transform.salts,
    }
}

impl Transform<'_> {
    fn value(&mut self, entity: &str, value: &Value) -> Value {
        match value {
            Value::Record(record) => Value::Record(self.record(entity, record, Scope::Nested)),
            Value::List(items) => Value::List(
                items
                    .iter()
                    .map(|item| self.value(entity, item))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    fn record(&mut self, entity: &str, input: &Record, scope: Scope) -> Record {
        let registry = self.registry;
        let mut out = Record::new();
        let mut clauses = vec![];

        for (key, value) in input.raw_iter() {
            if key == keyword::ORDER_BY {
                out.insert(key, value.clone());
            } else if let Some(pair) = registry.salt_field(entity, key) {
                self.base_field(pair, input, value, scope, &mut out, &mut clauses);
            } else if let Some(relation) = registry.relation(entity, key) {
                out.insert(key, self.value(&relation.target, value));
            } else if key == keyword::WHERE && scope == Scope::Args {
                let value = match value {
                    Value::Record(filter) => {
                        Value::Record(self.record(entity, filter, Scope::RootWhere))
                    }
                    other => self.value(entity, other),
                };
                out.insert(key, value);
            } else {
                out.insert(key, self.value(entity, value));
            }
        }

        if !clauses.is_empty() {
            and_append(&mut out, clauses);
        }

        out
    }

    fn base_field(
        &mut self,
        pair: &SaltField,
        input: &Record,
        value: &Value,
        scope: Scope,
        out: &mut Record,
        clauses: &mut Vec<Value>,
    ) {
        match value {
            Value::I64(public_id) => {
                let Some(decoded) = self.decode(*public_id) else {
                    out.insert(&pair.base, value.clone());
                    return;
                };

                out.insert(&pair.base, decoded.id);
                if !input.contains_key(&pair.salt) {
                    out.insert(&pair.salt, decoded.salt);
                }

                if scope == Scope::RootWhere {
                    self.salts.push((pair.salt.clone(), decoded.salt));
                }
            }
            Value::Bool(true) => {
                out.insert(&pair.base, true);
                if !input.contains_key(&pair.salt) {
                    out.insert(&pair.salt, true);
                }
            }
            Value::Record(operators) => {
                let (rest, salt_set) = self.operators(pair, operators, scope, clauses);

                if !rest.is_empty() {
                    out.insert(&pair.base, rest);
                }

                if let Some(salt) = salt_set {
                    if !input.contains_key(&pair.salt) {
                        out.insert(
                            &pair.salt,
                            Value::record_from_iter([(keyword::SET, salt)]),
                        );
                    }
                }
            }
            other => {
                out.insert(&pair.base, other.clone());
            }
        }
    }

    /// Rewrite the operator record of a base field. Returns the operators to
    /// keep under the base and, for an update assignment, the salt to assign
    /// alongside.
    fn operators(
        &mut self,
        pair: &SaltField,
        operators: &Record,
        scope: Scope,
        clauses: &mut Vec<Value>,
    ) -> (Record, Option<i64>) {
        let mut rest = Record::new();
        let mut salt_set = None;

        for (op, value) in operators.raw_iter() {
            match (op, value) {
                (keyword::EQUALS, Value::I64(public_id)) => match self.decode(*public_id) {
                    Some(decoded) => {
                        rest.insert(op, decoded.id);
                        clauses.push(Value::record_from_iter([(&pair.salt, decoded.salt)]));

                        if scope == Scope::RootWhere {
                            self.salts.push((pair.salt.clone(), decoded.salt));
                        }
                    }
                    None => {
                        rest.insert(op, value.clone());
                    }
                },
                (keyword::SET, Value::I64(public_id)) => match self.decode(*public_id) {
                    Some(decoded) => {
                        rest.insert(op, decoded.id);
                        salt_set = Some(decoded.salt);
                    }
                    None => {
                        rest.insert(op, value.clone());
                    }
                },
                (op, Value::I64(public_id)) if keyword::is_range_operator(op) => {
                    let id = self.decode(*public_id).map_or(*public_id, |decoded| decoded.id);
                    rest.insert(op, id);
                }
                (keyword::IN, Value::List(items)) => match self.membership(pair, items) {
                    Some(clause) => clauses.push(clause),
                    None => {
                        rest.insert(op, value.clone());
                    }
                },
                (keyword::NOT_IN, Value::List(items)) => {
                    let (residual, salted) = self.partition(items);

                    if salted.is_empty() {
                        rest.insert(op, value.clone());
                        continue;
                    }

                    clauses.push(not(Value::record_from_iter([(
                        keyword::OR,
                        Value::List(salted.iter().map(|d| pair_clause(pair, d)).collect()),
                    )])));

                    if !residual.is_empty() {
                        rest.insert(op, Value::List(residual));
                    }
                }
                (keyword::NOT_OP, Value::I64(public_id)) => match self.decode(*public_id) {
                    Some(decoded) => clauses.push(not(pair_clause(pair, &decoded))),
                    None => {
                        rest.insert(op, value.clone());
                    }
                },
                (keyword::NOT_OP, Value::Record(negated)) => {
                    let kept = self.negated_operators(pair, negated, clauses);

                    if !kept.is_empty() {
                        rest.insert(op, kept);
                    }
                }
                _ => {
                    rest.insert(op, value.clone());
                }
            }
        }

        (rest, salt_set)
    }

    /// Operators nested under `not`. Equality and membership become negated
    /// clauses, while `notIn` and a nested `not` cancel the negation and
    /// become plain clauses. Range operators are decoded in place.
    fn negated_operators(
        &mut self,
        pair: &SaltField,
        operators: &Record,
        clauses: &mut Vec<Value>,
    ) -> Record {
        let mut kept = Record::new();

        for (op, value) in operators.raw_iter() {
            match (op, value) {
                (keyword::EQUALS, Value::I64(public_id)) => match self.decode(*public_id) {
                    Some(decoded) => clauses.push(not(pair_clause(pair, &decoded))),
                    None => {
                        kept.insert(op, value.clone());
                    }
                },
                (keyword::IN, Value::List(items)) => match self.membership(pair, items) {
                    Some(clause) => clauses.push(not(clause)),
                    None => {
                        kept.insert(op, value.clone());
                    }
                },
                (keyword::NOT_IN, Value::List(items)) => match self.membership(pair, items) {
                    Some(clause) => clauses.push(clause),
                    None => {
                        kept.insert(op, value.clone());
                    }
                },
                (keyword::NOT_OP, Value::I64(public_id)) => match self.decode(*public_id) {
                    Some(decoded) => clauses.push(pair_clause(pair, &decoded)),
                    None => {
                        kept.insert(op, value.clone());
                    }
                },
                (keyword::NOT_OP, Value::Record(inner)) => {
                    let (rest, _) = self.operators(pair, inner, Scope::Nested, clauses);

                    if !rest.is_empty() {
                        kept.insert(op, rest);
                    }
                }
                (op, Value::I64(public_id)) if keyword::is_range_operator(op) => {
                    let id = self.decode(*public_id).map_or(*public_id, |decoded| decoded.id);
                    kept.insert(op, id);
                }
                _ => {
                    kept.insert(op, value.clone());
                }
            }
        }

        kept
    }

    /// `{OR: [{B: {in: residual}}, {B: id, S: salt}, ...]}`, or `None` when
    /// no element is salted.
    fn membership(&mut self, pair: &SaltField, items: &[Value]) -> Option<Value> {
        let (residual, salted) = self.partition(items);

        if salted.is_empty() {
            return None;
        }

        let mut branches = vec![];

        if !residual.is_empty() {
            branches.push(Value::record_from_iter([(
                &pair.base,
                Value::record_from_iter([(keyword::IN, Value::List(residual))]),
            )]));
        }

        branches.extend(salted.iter().map(|decoded| pair_clause(pair, decoded)));

        Some(Value::record_from_iter([(keyword::OR, Value::List(branches))]))
    }

    /// Split a membership list into values kept as-is and decoded public ids.
    fn partition(&mut self, items: &[Value]) -> (Vec<Value>, Vec<Decoded>) {
        let mut residual = vec![];
        let mut salted = vec![];

        for item in items {
            match item.as_i64().and_then(|public_id| self.decode(public_id)) {
                Some(decoded) => salted.push(decoded),
                None => residual.push(item.clone()),
            }
        }

        (residual, salted)
    }

    fn decode(&mut self, public_id: i64) -> Option<Decoded> {
        if !codec::is_potential_salt_id(public_id, self.salt_len) {
            return None;
        }

        let decoded = codec::decode(public_id, self.salt_len);
        debug!(public_id, id = decoded.id, "decomposed public id");
        self.decomposed = true;
        Some(decoded)
    }
}

fn pair_clause(pair: &SaltField, decoded: &Decoded) -> Value {
    Value::record_from_iter([
        (pair.base.as_str(), decoded.id),
        (pair.salt.as_str(), decoded.salt),
    ])
}

fn not(clause: Value) -> Value {
    Value::record_from_iter([(keyword::NOT, clause)])
}

/// Add `clauses` to the record's `AND` combinator, creating it if needed.
fn and_append(record: &mut Record, clauses: Vec<Value>) {
    let and = match record.remove(keyword::AND) {
        Some(Value::List(mut existing)) => {
            existing.extend(clauses);
            existing
        }
        Some(existing) => {
            let mut and = vec![existing];
            and.extend(clauses);
            and
        }
        None => clauses,
    };

    record.insert(keyword::AND, Value::List(and));
}
