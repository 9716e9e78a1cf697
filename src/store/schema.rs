use serde_json::Value;
use std::fmt;

/// Value kind an attribute accepts. `null` is accepted by every kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind {
    String,
    Integer,
    Float,
    Boolean,
    /// Any JSON value (arrays, objects, mixed)
    Any,
}

impl AttrKind {
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) | (AttrKind::Any, _) => true,
            (AttrKind::String, Value::String(_)) => true,
            (AttrKind::Boolean, Value::Bool(_)) => true,
            (AttrKind::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (AttrKind::Float, Value::Number(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for AttrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttrKind::String => "string",
            AttrKind::Integer => "integer",
            AttrKind::Float => "float",
            AttrKind::Boolean => "boolean",
            AttrKind::Any => "any",
        };
        f.write_str(name)
    }
}

/// Name of a JSON value's kind, for error messages
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: &'static str,
    pub kind: AttrKind,
}

/// Declared attribute set of one record type.
///
/// Built once, usually into a `once_cell::sync::Lazy` static, and shared by
/// every instance of the type. Declaration order is preserved and is the
/// order attributes are serialized in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    model: &'static str,
    attributes: Vec<Attribute>,
}

impl Schema {
    #[must_use]
    pub fn new(model: &'static str) -> Self {
        Self {
            model,
            attributes: Vec::new(),
        }
    }

    /// Declare an attribute. Re-declaring a name keeps its position and
    /// replaces its kind.
    #[must_use]
    pub fn attribute(mut self, name: &'static str, kind: AttrKind) -> Self {
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.kind = kind,
            None => self.attributes.push(Attribute { name, kind }),
        }
        self
    }

    /// Start a schema for a subtype from a snapshot of this one.
    ///
    /// Attributes declared on `self` afterwards are not seen by the subtype.
    #[must_use]
    pub fn extend(&self, model: &'static str) -> Self {
        Self {
            model,
            attributes: self.attributes.clone(),
        }
    }

    #[must_use]
    pub fn model(&self) -> &'static str {
        self.model
    }

    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name == name)
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}
