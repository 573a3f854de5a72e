//! Field registries: the storage a `CrudField` builder writes through.
//!
//! `FieldRegistry` is the contract the builder needs. `CrudPanel` is the
//! in-memory implementation, holding one ordered field list per CRUD
//! operation and answering every call against the current operation.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::builder::CrudField;
use crate::error::Result;
use crate::types::{AttributeValue, FieldRecord, Operation, NAME_ATTRIBUTE};

/// Ordered collection of field records keyed by their `name` attribute.
pub trait FieldRegistry {
    /// First record whose `attribute` equals `value`.
    fn first_field_where(&self, attribute: &str, value: &AttributeValue) -> Option<&FieldRecord>;

    /// Whether any record has `attribute` equal to `value`.
    fn has_field_where(&self, attribute: &str, value: &AttributeValue) -> bool {
        self.first_field_where(attribute, value).is_some()
    }

    /// Append a record. A record whose name is already present replaces it in place.
    fn add_field(&mut self, record: FieldRecord);

    /// Overwrite every attribute of the record named `name`.
    fn modify_field(&mut self, name: &str, attributes: FieldRecord);

    /// Delete the record named `name`.
    fn remove_field(&mut self, name: &str);

    /// Delete one attribute from the record named `name`.
    fn remove_field_attribute(&mut self, name: &str, attribute: &str);
}

/// In-memory CRUD panel: field lists per operation plus a current operation.
#[derive(Debug, Clone, Default)]
pub struct CrudPanel {
    operation: Operation,
    fields: HashMap<Operation, Vec<FieldRecord>>,
}

impl CrudPanel {
    /// An empty panel whose current operation is `create`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operation = operation;
        self
    }

    /// Switch the operation subsequent field calls apply to.
    pub fn set_operation(&mut self, operation: Operation) {
        self.operation = operation;
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    /// Fields of the current operation, in order.
    pub fn fields(&self) -> &[FieldRecord] {
        self.fields_for(&self.operation)
    }

    /// Fields of any operation, in order.
    pub fn fields_for(&self, operation: &Operation) -> &[FieldRecord] {
        self.fields.get(operation).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Names of the current operation's fields, in order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields().iter().filter_map(FieldRecord::name).collect()
    }

    /// Operations that currently hold at least one field.
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.fields
            .iter()
            .filter(|(_, records)| !records.is_empty())
            .map(|(op, _)| op)
    }

    /// Fluent builder for `name` on the current operation.
    ///
    /// ```rust,ignore
    /// panel.field("price")?.field_type("number")?.label("Price")?;
    /// ```
    pub fn field(&mut self, name: &str) -> Result<CrudField<'_, Self>> {
        CrudField::new(self, name)
    }

    /// Add a field that only has a name.
    pub fn add_field_named(&mut self, name: impl Into<String>) {
        self.add_field(FieldRecord::named(name));
    }

    pub fn add_fields(&mut self, records: impl IntoIterator<Item = FieldRecord>) {
        for record in records {
            self.add_field(record);
        }
    }

    pub fn remove_fields<S: AsRef<str>>(&mut self, names: impl IntoIterator<Item = S>) {
        for name in names {
            self.remove_field(name.as_ref());
        }
    }

    fn current_mut(&mut self) -> &mut Vec<FieldRecord> {
        self.fields.entry(self.operation.clone()).or_default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields()
            .iter()
            .position(|record| record.name() == Some(name))
    }
}

impl FieldRegistry for CrudPanel {
    fn first_field_where(&self, attribute: &str, value: &AttributeValue) -> Option<&FieldRecord> {
        self.fields()
            .iter()
            .find(|record| record.matches(attribute, value))
    }

    fn add_field(&mut self, record: FieldRecord) {
        let Some(name) = record.name().map(str::to_owned) else {
            warn!(operation = %self.operation, "ignoring field without a name attribute");
            return;
        };
        match self.position(&name) {
            Some(idx) => {
                debug!(operation = %self.operation, %name, "replacing field");
                self.current_mut()[idx] = record;
            }
            None => {
                debug!(operation = %self.operation, %name, "adding field");
                self.current_mut().push(record);
            }
        }
    }

    fn modify_field(&mut self, name: &str, attributes: FieldRecord) {
        match self.position(name) {
            Some(idx) => {
                debug!(operation = %self.operation, %name, "modifying field");
                self.current_mut()[idx] = attributes;
            }
            None => {
                warn!(operation = %self.operation, %name, "cannot modify missing field");
            }
        }
    }

    fn remove_field(&mut self, name: &str) {
        if let Some(idx) = self.position(name) {
            debug!(operation = %self.operation, %name, "removing field");
            self.current_mut().remove(idx);
        }
    }

    fn remove_field_attribute(&mut self, name: &str, attribute: &str) {
        if let Some(idx) = self.position(name) {
            if self.current_mut()[idx].remove(attribute).is_some() {
                debug!(operation = %self.operation, %name, %attribute, "removed field attribute");
            }
        }
    }
}

/// Look up a field by its `name` attribute.
pub(crate) fn find_by_name<'r, R: FieldRegistry + ?Sized>(
    registry: &'r R,
    name: &str,
) -> Option<&'r FieldRecord> {
    registry.first_field_where(NAME_ATTRIBUTE, &AttributeValue::from(name))
}
