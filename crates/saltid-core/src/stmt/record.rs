use super::Value;
use crate::codec;

use indexmap::IndexMap;
use std::borrow::Cow;

/// An insertion-ordered set of named fields.
///
/// Besides plain fields, a record can carry two kinds of slots installed by
/// result hijacking:
///
/// * **hidden** slots are left out of [`keys`](Record::keys),
///   [`iter`](Record::iter) and serialization, but can still be read with
///   [`get`](Record::get) and overwritten with [`set`](Record::set).
/// * **public id** slots store the real id but read as the composed public
///   id. Writes through [`set`](Record::set) are ignored.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Record {
    slots: IndexMap<String, Slot>,
}

#[derive(Debug, Clone, PartialEq)]
struct Slot {
    value: Value,
    hidden: bool,
    public_id: Option<PublicId>,
}

#[derive(Debug, Clone, PartialEq)]
struct PublicId {
    salt_field: String,
    salt_length: usize,
}

impl Slot {
    fn new(value: Value) -> Slot {
        Slot {
            value,
            hidden: false,
            public_id: None,
        }
    }
}

impl Record {
    pub fn new() -> Record {
        Record::default()
    }

    /// Number of visible fields.
    pub fn len(&self) -> usize {
        self.slots.values().filter(|slot| !slot.hidden).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the field exists, hidden or not.
    pub fn contains_key(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Read a field as the application sees it. Public id slots are composed
    /// from the stored real id and the current value of their salt field.
    pub fn get(&self, name: &str) -> Option<Cow<'_, Value>> {
        let slot = self.slots.get(name)?;

        Some(match &slot.public_id {
            Some(public_id) => self.compose(name, &slot.value, public_id),
            None => Cow::Borrowed(&slot.value),
        })
    }

    /// Read the stored value of a field, bypassing public id composition.
    pub fn get_raw(&self, name: &str) -> Option<&Value> {
        self.slots.get(name).map(|slot| &slot.value)
    }

    pub fn get_raw_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.slots.get_mut(name).map(|slot| &mut slot.value)
    }

    /// Write a field as the application would. Returns `false`, leaving the
    /// record untouched, when the field is a public id.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> bool {
        let name = name.into();

        match self.slots.get_mut(&name) {
            Some(slot) if slot.public_id.is_some() => {
                tracing::debug!(field = %name, "ignoring write to public id field");
                false
            }
            Some(slot) => {
                slot.value = value.into();
                true
            }
            None => {
                self.slots.insert(name, Slot::new(value.into()));
                true
            }
        }
    }

    /// Store a value, replacing any previous slot with a plain visible one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.slots
            .insert(name.into(), Slot::new(value.into()))
            .map(|slot| slot.value)
    }

    /// Remove a field, preserving the order of the remaining ones.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.slots.shift_remove(name).map(|slot| slot.value)
    }

    /// Names of the visible fields.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.slots
            .iter()
            .filter(|(_, slot)| !slot.hidden)
            .map(|(name, _)| name.as_str())
    }

    /// Visible fields with the values the application sees.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Cow<'_, Value>)> + '_ {
        self.slots
            .iter()
            .filter(|(_, slot)| !slot.hidden)
            .map(move |(name, slot)| {
                let value = match &slot.public_id {
                    Some(public_id) => self.compose(name, &slot.value, public_id),
                    None => Cow::Borrowed(&slot.value),
                };
                (name.as_str(), value)
            })
    }

    /// All fields, hidden ones included, with their stored values.
    pub fn raw_iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.slots
            .iter()
            .map(|(name, slot)| (name.as_str(), &slot.value))
    }

    /// All fields, hidden ones included, with mutable stored values.
    pub fn raw_iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Value)> + '_ {
        self.slots
            .iter_mut()
            .map(|(name, slot)| (name.as_str(), &mut slot.value))
    }

    /// Consume the record, yielding every field with its stored value.
    pub fn into_raw_iter(self) -> impl Iterator<Item = (String, Value)> {
        self.slots.into_iter().map(|(name, slot)| (name, slot.value))
    }

    pub fn is_hidden(&self, name: &str) -> bool {
        self.slots.get(name).is_some_and(|slot| slot.hidden)
    }

    pub fn is_public_id(&self, name: &str) -> bool {
        self.slots
            .get(name)
            .is_some_and(|slot| slot.public_id.is_some())
    }

    /// Hide a field from enumeration and serialization. Returns `false` if
    /// the field does not exist.
    pub fn hide(&mut self, name: &str) -> bool {
        match self.slots.get_mut(name) {
            Some(slot) => {
                slot.hidden = true;
                true
            }
            None => false,
        }
    }

    /// Turn `base` into a public id view over itself and `salt_field`.
    ///
    /// Only installed when both stored values are integers; returns whether
    /// the view was installed.
    pub fn derive_public_id(&mut self, base: &str, salt_field: &str, salt_length: usize) -> bool {
        let salt_is_int = matches!(self.get_raw(salt_field), Some(Value::I64(_)));

        match self.slots.get_mut(base) {
            Some(slot) if salt_is_int && matches!(slot.value, Value::I64(_)) => {
                slot.public_id = Some(PublicId {
                    salt_field: salt_field.to_string(),
                    salt_length,
                });
                true
            }
            _ => false,
        }
    }

    /// Converts to JSON as the application sees the record.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.iter()
                .map(|(name, value)| (name.to_string(), value.to_json()))
                .collect(),
        )
    }

    fn compose<'a>(&'a self, name: &str, stored: &'a Value, public_id: &PublicId) -> Cow<'a, Value> {
        let (Value::I64(id), Some(Value::I64(salt))) = (stored, self.get_raw(&public_id.salt_field))
        else {
            return Cow::Borrowed(stored);
        };

        match codec::encode(*id, *salt, public_id.salt_length) {
            Ok(composed) => Cow::Owned(Value::I64(composed)),
            Err(err) => {
                tracing::warn!(field = %name, %err, "cannot compose public id; reading stored value");
                Cow::Borrowed(stored)
            }
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Record {
            slots: iter
                .into_iter()
                .map(|(name, value)| (name.into(), Slot::new(value)))
                .collect(),
        }
    }
}

impl<K: Into<String>> Extend<(K, Value)> for Record {
    fn extend<T: IntoIterator<Item = (K, Value)>>(&mut self, iter: T) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}
