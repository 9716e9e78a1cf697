use crate::error::{Error, Result};
use crate::ids::RecordId;
use serde_json::{Map, Value};

use super::schema::{value_kind, Schema};

/// Schema-bound attribute storage embedded in every record.
///
/// Holds the identity (absent until first save) and exactly one value per
/// declared attribute, in declaration order. Undeclared names are rejected on
/// both read and write.
#[derive(Debug, Clone, PartialEq)]
pub struct Fields {
    schema: &'static Schema,
    id: Option<RecordId>,
    values: Vec<Value>,
}

impl Fields {
    /// Unsaved fields: no identity, every attribute `null`.
    #[must_use]
    pub fn new(schema: &'static Schema) -> Self {
        Self {
            schema,
            id: None,
            values: vec![Value::Null; schema.attributes().len()],
        }
    }

    /// Fields for a record whose identity is already known (fixtures,
    /// imports). `save` keeps this identity.
    #[must_use]
    pub fn with_id(schema: &'static Schema, id: impl Into<RecordId>) -> Self {
        let mut fields = Self::new(schema);
        fields.id = Some(id.into());
        fields
    }

    #[must_use]
    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    #[must_use]
    pub fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    /// Assign the identity if none is set. Returns whether it was assigned.
    pub(crate) fn assign_id(&mut self, id: RecordId) -> bool {
        if self.id.is_some() {
            return false;
        }
        self.id = Some(id);
        true
    }

    pub fn get(&self, name: &str) -> Result<&Value> {
        let idx = self.position(name)?;
        Ok(&self.values[idx])
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let idx = self.position(name)?;
        let value = value.into();
        self.check(idx, &value)?;
        self.values[idx] = value;
        Ok(())
    }

    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).ok().and_then(Value::as_str)
    }

    #[must_use]
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).ok().and_then(Value::as_bool)
    }

    #[must_use]
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).ok().and_then(Value::as_i64)
    }

    /// Apply a payload to the declared attributes.
    ///
    /// An attribute is eligible when `replace` is set or the payload names it.
    /// An eligible attribute is overwritten only when the payload carries a
    /// value for it: there is no reset-to-default step, so `merge(&{}, true)`
    /// changes nothing. Undeclared payload keys (including `"id"`) are
    /// ignored. All eligible values are kind-checked before any is applied.
    pub fn merge(&mut self, data: &Map<String, Value>, replace: bool) -> Result<()> {
        let mut updates = Vec::new();
        for (idx, attr) in self.schema.attributes().iter().enumerate() {
            if !(replace || data.contains_key(attr.name)) {
                continue;
            }
            let Some(value) = data.get(attr.name) else {
                continue;
            };
            self.check(idx, value)?;
            updates.push((idx, value.clone()));
        }
        for (idx, value) in updates {
            self.values[idx] = value;
        }
        Ok(())
    }

    /// JSON object of every attribute plus `"id"` (null while unsaved).
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut object = Map::with_capacity(self.values.len() + 1);
        object.insert(
            "id".to_string(),
            self.id
                .as_ref()
                .map_or(Value::Null, |id| Value::String(id.to_string())),
        );
        for (attr, value) in self.schema.attributes().iter().zip(&self.values) {
            object.insert(attr.name.to_string(), value.clone());
        }
        Value::Object(object)
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.schema
            .position(name)
            .ok_or_else(|| Error::UnknownAttribute {
                model: self.schema.model(),
                attribute: name.to_string(),
            })
    }

    fn check(&self, idx: usize, value: &Value) -> Result<()> {
        let attr = &self.schema.attributes()[idx];
        if attr.kind.accepts(value) {
            Ok(())
        } else {
            Err(Error::AttributeType {
                model: self.schema.model(),
                attribute: attr.name,
                expected: attr.kind,
                found: value_kind(value),
            })
        }
    }
}

/// A storable domain record.
///
/// Implementors embed a [`Fields`] and usually add hand-written typed
/// accessors over it. `before_save` and `after_save` are override points,
/// no-ops by default.
pub trait Record: Clone + Send + Sync + 'static {
    fn schema() -> &'static Schema;

    fn from_fields(fields: Fields) -> Self;

    fn fields(&self) -> &Fields;

    fn fields_mut(&mut self) -> &mut Fields;

    /// Runs after the identity is assigned and before the record is stored.
    fn before_save(&mut self) {}

    /// Runs after the record is stored.
    fn after_save(&self) {}

    /// An unsaved record with every attribute `null`.
    #[must_use]
    fn build() -> Self {
        Self::from_fields(Fields::new(Self::schema()))
    }

    fn id(&self) -> Option<&RecordId> {
        self.fields().id()
    }

    fn get(&self, name: &str) -> Result<&Value> {
        self.fields().get(name)
    }

    fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.fields_mut().set(name, value)
    }

    /// See [`Fields::merge`].
    fn merge(&mut self, data: &Map<String, Value>, replace: bool) -> Result<()> {
        self.fields_mut().merge(data, replace)
    }

    fn to_json(&self) -> Value {
        self.fields().to_json()
    }
}
