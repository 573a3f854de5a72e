//! CrudField: fluent syntax for configuring panel fields.
//!
//! Instead of handing a full attribute map to the panel:
//!
//! ```rust,ignore
//! panel.add_field(FieldRecord::named("price").with("type", "number"));
//! ```
//!
//! callers chain one attribute at a time:
//!
//! ```rust,ignore
//! panel.field("price")?.field_type("number")?.label("Price")?;
//! ```
//!
//! Every call writes the whole working record back into the registry, so
//! the registry is up to date as soon as each call returns.

use std::fmt;

use serde::Serialize;
use tracing::trace;

use crate::context::PanelContext;
use crate::error::{CrudFieldsError, Result};
use crate::registry::{find_by_name, CrudPanel, FieldRegistry};
use crate::types::{AttributeValue, FieldRecord, NAME_ATTRIBUTE};

/// Builder bound to one field of a registry.
///
/// Holds the registry mutably for its whole lifetime and a working copy of
/// the field's attributes that is re-saved after every mutation.
pub struct CrudField<'r, R: FieldRegistry + ?Sized = CrudPanel> {
    registry: &'r mut R,
    attributes: FieldRecord,
}

impl<'r> CrudField<'r, CrudPanel> {
    /// Builder for `name` on the single panel held by `context`.
    pub fn name(context: &'r mut PanelContext, name: &str) -> Result<Self> {
        CrudField::new(context.panel_mut()?, name)
    }
}

impl<'r, R: FieldRegistry + ?Sized> CrudField<'r, R> {
    /// Load the field named `name` from `registry`, creating it if missing.
    ///
    /// An existing record is copied in full; otherwise the working copy is
    /// `{name: <name>}`. Either way the record is saved before returning.
    pub fn new(registry: &'r mut R, name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(CrudFieldsError::EmptyFieldName);
        }
        let attributes = find_by_name(&*registry, name)
            .cloned()
            .unwrap_or_else(|| FieldRecord::named(name));
        Self {
            registry,
            attributes,
        }
        .save()
    }

    /// Set `attribute` to `value` and save.
    ///
    /// Setting `name` renames the working copy; the next save is keyed by
    /// the new name and the record under the old name is left as it was.
    pub fn set(
        mut self,
        attribute: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Result<Self> {
        let attribute = attribute.into();
        let value = value.into();
        trace!(field = ?self.attributes.name(), %attribute, %value, "set field attribute");
        self.attributes.set(attribute, value);
        self.save()
    }

    /// Set `attribute` to any serializable value.
    pub fn set_serialized<T: Serialize + ?Sized>(
        self,
        attribute: impl Into<String>,
        value: &T,
    ) -> Result<Self> {
        let value = serde_json::to_value(value)?;
        self.set(attribute, value)
    }

    /// Method-name-as-key dispatch.
    ///
    /// `remove` and `forget` run their own operations; any other method
    /// name becomes an attribute set to the first argument. Extra arguments
    /// are ignored. Returns `None` once the field has been removed.
    pub fn call(self, method: &str, args: Vec<AttributeValue>) -> Result<Option<Self>> {
        if method == "remove" {
            self.remove()?;
            return Ok(None);
        }
        let Some(value) = args.into_iter().next() else {
            return Err(CrudFieldsError::MissingArgument {
                method: method.to_string(),
            });
        };
        if method == "forget" {
            let attribute = match value {
                AttributeValue::String(s) => s,
                other => other.to_string(),
            };
            return self.forget(&attribute).map(Some);
        }
        self.set(method, value).map(Some)
    }

    /// Remove the field from the registry.
    ///
    /// Consumes the builder: attributes set afterwards could not reach the
    /// registry anyway.
    pub fn remove(self) -> Result<()> {
        let key = self.key()?.to_owned();
        self.registry.remove_field(&key);
        Ok(())
    }

    /// Remove one attribute from the stored record and from the working copy.
    ///
    /// Forgetting an attribute the field does not have is a no-op. The
    /// `name` attribute cannot be forgotten.
    pub fn forget(mut self, attribute: &str) -> Result<Self> {
        if attribute == NAME_ATTRIBUTE {
            return Err(CrudFieldsError::ReservedAttribute {
                attribute: attribute.to_string(),
            });
        }
        let key = self.key()?.to_owned();
        self.registry.remove_field_attribute(&key, attribute);
        self.attributes.remove(attribute);
        Ok(self)
    }

    // --- Common attributes ---

    /// Set the field `type` (e.g. `text`, `number`, `select`).
    pub fn field_type(self, value: impl Into<AttributeValue>) -> Result<Self> {
        self.set("type", value)
    }

    pub fn label(self, value: impl Into<AttributeValue>) -> Result<Self> {
        self.set("label", value)
    }

    /// Set the `default` value shown for a new entry.
    pub fn default_value(self, value: impl Into<AttributeValue>) -> Result<Self> {
        self.set("default", value)
    }

    pub fn hint(self, value: impl Into<AttributeValue>) -> Result<Self> {
        self.set("hint", value)
    }

    pub fn tab(self, value: impl Into<AttributeValue>) -> Result<Self> {
        self.set("tab", value)
    }

    /// HTML attributes for the input element.
    pub fn attributes(self, value: impl Into<AttributeValue>) -> Result<Self> {
        self.set("attributes", value)
    }

    /// HTML attributes for the wrapping element.
    pub fn wrapper(self, value: impl Into<AttributeValue>) -> Result<Self> {
        self.set("wrapper", value)
    }

    // --- Accessors ---

    /// The working copy's name.
    pub fn field_name(&self) -> Option<&str> {
        self.attributes.name()
    }

    /// The working copy of the field's attributes.
    pub fn record(&self) -> &FieldRecord {
        &self.attributes
    }

    /// The registry this builder writes to.
    pub fn registry(&self) -> &R {
        &*self.registry
    }

    pub fn into_record(self) -> FieldRecord {
        self.attributes
    }

    // --- Internal ---

    fn key(&self) -> Result<&str> {
        self.attributes
            .name()
            .ok_or(CrudFieldsError::MissingNameAttribute)
    }

    /// Write the working copy into the registry: modify when the name is
    /// already present, add otherwise.
    fn save(self) -> Result<Self> {
        let key = self.key()?.to_owned();
        let key_value = AttributeValue::from(key.as_str());
        if self.registry.has_field_where(NAME_ATTRIBUTE, &key_value) {
            self.registry.modify_field(&key, self.attributes.clone());
        } else {
            self.registry.add_field(self.attributes.clone());
        }
        Ok(self)
    }
}

impl<R: FieldRegistry + ?Sized> fmt::Debug for CrudField<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrudField")
            .field("attributes", &self.attributes)
            .finish_non_exhaustive()
    }
}
