//! Core record types for the field registry.
//!
//! A field is an open-ended bag of attributes. The only attribute with a
//! fixed meaning is `name`, which identifies the field inside one
//! operation's field list.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{CrudFieldsError, Result};

/// Value of a single field attribute (string, number, bool, nested structure).
pub type AttributeValue = serde_json::Value;

/// The reserved attribute that identifies a field record.
pub const NAME_ATTRIBUTE: &str = "name";

/// A field definition as stored in a panel: attribute name to value.
///
/// Serializes as a plain map. Equality ignores attribute order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct FieldRecord {
    attributes: IndexMap<String, AttributeValue>,
}

impl FieldRecord {
    /// An empty record with no attributes, not even a name.
    pub fn new() -> Self {
        Self {
            attributes: IndexMap::new(),
        }
    }

    /// A record holding only `{name: <name>}`.
    pub fn named(name: impl Into<String>) -> Self {
        let name: String = name.into();
        Self::new().with(NAME_ATTRIBUTE, name)
    }

    /// Chainable attribute assignment, handy for literals and defaults.
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.set(attribute, value);
        self
    }

    /// The `name` attribute, if present and a string.
    pub fn name(&self) -> Option<&str> {
        self.attributes
            .get(NAME_ATTRIBUTE)
            .and_then(AttributeValue::as_str)
    }

    pub fn get(&self, attribute: &str) -> Option<&AttributeValue> {
        self.attributes.get(attribute)
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.attributes.contains_key(attribute)
    }

    /// Set an attribute, returning the previous value if any.
    pub fn set(
        &mut self,
        attribute: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.attributes.insert(attribute.into(), value.into())
    }

    /// Remove an attribute, keeping the order of the remaining ones.
    pub fn remove(&mut self, attribute: &str) -> Option<AttributeValue> {
        self.attributes.shift_remove(attribute)
    }

    /// True when `attribute` is present and equal to `value`.
    pub fn matches(&self, attribute: &str, value: &AttributeValue) -> bool {
        self.attributes.get(attribute) == Some(value)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttributeValue)> {
        self.attributes.iter()
    }
}

impl From<IndexMap<String, AttributeValue>> for FieldRecord {
    fn from(attributes: IndexMap<String, AttributeValue>) -> Self {
        Self { attributes }
    }
}

impl<K: Into<String>> FromIterator<(K, AttributeValue)> for FieldRecord {
    fn from_iter<I: IntoIterator<Item = (K, AttributeValue)>>(iter: I) -> Self {
        Self {
            attributes: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// The CRUD operation a list of fields belongs to.
///
/// Operation names double as file stems in a `PanelStore`, so a custom
/// operation can only be built through `Operation::custom` (or parsing),
/// which maps built-in names to their variants and rejects names that are
/// not a plain file stem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Operation {
    List,
    #[default]
    Create,
    Update,
    Show,
    /// Any operation registered by the application itself.
    Custom(CustomOperation),
}

/// Name of an application-defined operation. Never a built-in name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomOperation(String);

impl CustomOperation {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Operation {
    /// Operation for `name`, normalizing built-in names.
    pub fn custom(name: &str) -> Result<Self> {
        match name {
            "list" => Ok(Operation::List),
            "create" => Ok(Operation::Create),
            "update" => Ok(Operation::Update),
            "show" => Ok(Operation::Show),
            other => {
                if other.is_empty()
                    || other.starts_with('.')
                    || other.contains(['/', '\\'])
                {
                    return Err(CrudFieldsError::InvalidOperationName {
                        name: other.to_string(),
                    });
                }
                Ok(Operation::Custom(CustomOperation(other.to_string())))
            }
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Show => "show",
            Operation::Custom(name) => name.as_str(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = CrudFieldsError;

    fn from_str(s: &str) -> Result<Self> {
        Operation::custom(s)
    }
}

impl TryFrom<String> for Operation {
    type Error = CrudFieldsError;

    fn try_from(s: String) -> Result<Self> {
        Operation::custom(&s)
    }
}

impl From<Operation> for String {
    fn from(op: Operation) -> Self {
        op.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn named_record_holds_only_name() {
        let record = FieldRecord::named("price");
        assert_eq!(record.len(), 1);
        assert_eq!(record.name(), Some("price"));
    }

    #[test]
    fn non_string_name_is_not_a_name() {
        let record = FieldRecord::new().with("name", 42);
        assert!(record.contains("name"));
        assert_eq!(record.name(), None);
    }

    #[test]
    fn set_overwrites_and_returns_previous() {
        let mut record = FieldRecord::named("price");
        assert_eq!(record.set("type", "text"), None);
        assert_eq!(record.set("type", "number"), Some(json!("text")));
        assert_eq!(record.get("type"), Some(&json!("number")));
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let mut record = FieldRecord::named("price")
            .with("type", "number")
            .with("label", "Price")
            .with("tab", "Pricing");
        record.remove("type");
        let keys: Vec<&str> = record.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["name", "label", "tab"]);
    }

    #[test]
    fn equality_ignores_attribute_order() {
        let a = FieldRecord::named("price").with("type", "number");
        let b = FieldRecord::new().with("type", "number").with("name", "price");
        assert_eq!(a, b);
    }

    #[test]
    fn record_yaml_is_a_plain_map() {
        let record = FieldRecord::named("price")
            .with("type", "number")
            .with("attributes", json!({"step": "any"}));
        let yaml = serde_yaml_ng::to_string(&record).unwrap();
        assert!(yaml.contains("name: price"));
        assert!(yaml.contains("step: any"));
        let parsed: FieldRecord = serde_yaml_ng::from_str(&yaml).unwrap();
        assert_eq!(record, parsed);
    }

    #[test]
    fn record_from_index_map_keeps_attributes() {
        let mut map = IndexMap::new();
        map.insert("name".to_string(), json!("price"));
        map.insert("type".to_string(), json!("number"));
        let record = FieldRecord::from(map);
        assert_eq!(record.name(), Some("price"));
        assert_eq!(record, FieldRecord::named("price").with("type", "number"));
    }

    #[test]
    fn record_collects_from_pairs() {
        let record: FieldRecord = [("name", json!("price")), ("label", json!("Price"))]
            .into_iter()
            .collect();
        assert_eq!(record, FieldRecord::named("price").with("label", "Price"));
    }

    #[test]
    fn operation_names() {
        assert_eq!("update".parse::<Operation>().unwrap(), Operation::Update);
        let reorder = Operation::custom("reorder").unwrap();
        assert!(matches!(reorder, Operation::Custom(_)));
        assert_eq!(reorder.to_string(), "reorder");
        assert_eq!(Operation::default(), Operation::Create);
    }

    #[test]
    fn custom_built_in_name_normalizes_to_variant() {
        assert_eq!(Operation::custom("create").unwrap(), Operation::Create);
        assert_eq!(Operation::custom("show").unwrap(), Operation::Show);
    }

    #[test]
    fn custom_name_must_be_a_plain_file_stem() {
        for bad in ["", "a/b", "../x", "a\\b", ".hidden"] {
            let err = Operation::custom(bad).unwrap_err();
            assert!(
                matches!(err, CrudFieldsError::InvalidOperationName { ref name } if name == bad),
                "expected rejection of {bad:?}"
            );
        }
    }

    #[test]
    fn operation_serializes_as_string() {
        let yaml = serde_yaml_ng::to_string(&Operation::Show).unwrap();
        assert_eq!(yaml.trim(), "show");
        let parsed: Operation = serde_yaml_ng::from_str("reorder").unwrap();
        assert_eq!(parsed, Operation::custom("reorder").unwrap());
        assert!(serde_yaml_ng::from_str::<Operation>("../escape").is_err());
    }
}
