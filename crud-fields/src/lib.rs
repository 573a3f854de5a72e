//! Fluent field builder for CRUD admin panels
//!
//! `crud-fields` lets application code configure panel fields one attribute
//! at a time instead of passing whole attribute maps:
//!
//! ```rust,ignore
//! let mut panel = CrudPanel::new();
//! panel.field("price")?.field_type("number")?.label("Price")?;
//! ```
//!
//! # Architecture
//!
//! - **Open attributes**: a field is a map of attribute name to JSON value;
//!   only `name` has a fixed meaning
//! - **Write-through**: every builder call saves the full record into the
//!   registry before returning, there is no commit step
//! - **Per-operation panels**: `CrudPanel` keeps one ordered field list per
//!   CRUD operation (create, update, list, ...)
//! - **YAML on disk**: `PanelStore` loads and saves panels, one file per operation

pub mod builder;
pub mod context;
pub mod error;
pub mod registry;
pub mod store;
pub mod types;

pub use builder::CrudField;
pub use context::PanelContext;
pub use error::{CrudFieldsError, Result};
pub use registry::{CrudPanel, FieldRegistry};
pub use store::{PanelDefaults, PanelStore, PanelStoreBuilder};
pub use types::{AttributeValue, CustomOperation, FieldRecord, Operation, NAME_ATTRIBUTE};
