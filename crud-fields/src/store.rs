//! PanelStore: field definitions for a panel kept as YAML on disk.
//!
//! Each operation's field list lives in its own file:
//! ```text
//! panel/
//!   create.yaml   ← list of field records for the create form
//!   update.yaml
//!   list.yaml
//! ```
//! Loading builds a `CrudPanel`; saving writes every operation back.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tokio::fs;
use tracing::{debug, warn};
use ulid::Ulid;

use crate::error::Result;
use crate::registry::CrudPanel;
use crate::types::{FieldRecord, Operation};

/// Default field definitions, seeded for operations that have no file yet.
pub struct PanelDefaults {
    fields: IndexMap<Operation, Vec<FieldRecord>>,
}

impl PanelDefaults {
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
        }
    }

    /// Add a default field to `operation`.
    pub fn field(mut self, operation: Operation, record: FieldRecord) -> Self {
        self.fields.entry(operation).or_default().push(record);
        self
    }

    /// Default fields of `operation`, in insertion order.
    pub fn fields_for(&self, operation: &Operation) -> &[FieldRecord] {
        self.fields.get(operation).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for PanelDefaults {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `PanelStore`. Created by `PanelStore::open()`.
pub struct PanelStoreBuilder {
    root: PathBuf,
    defaults: Option<PanelDefaults>,
}

impl PanelStoreBuilder {
    /// Provide default fields. An operation's defaults are written only
    /// when that operation has no file yet, so edits on disk survive.
    pub fn with_defaults(mut self, defaults: PanelDefaults) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Create the directory and seed defaults.
    pub async fn build(self) -> Result<PanelStore> {
        fs::create_dir_all(&self.root).await?;
        let store = PanelStore { root: self.root };
        if let Some(defaults) = self.defaults {
            store.seed_defaults(&defaults).await?;
        }
        debug!(root = %store.root.display(), "panel store opened");
        Ok(store)
    }
}

pub struct PanelStore {
    root: PathBuf,
}

impl PanelStore {
    /// Open or create a panel directory.
    ///
    /// ```rust,ignore
    /// let store = PanelStore::open(path)
    ///     .with_defaults(my_defaults())
    ///     .build()
    ///     .await?;
    /// let mut panel = store.load().await?;
    /// ```
    pub fn open(root: impl Into<PathBuf>) -> PanelStoreBuilder {
        PanelStoreBuilder {
            root: root.into(),
            defaults: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn operation_path(&self, operation: &Operation) -> PathBuf {
        self.root.join(format!("{operation}.yaml"))
    }

    /// Read every operation file into a new panel.
    ///
    /// Unparseable files are skipped. Records without a string `name` are
    /// dropped, and a repeated name keeps the last record.
    pub async fn load(&self) -> Result<CrudPanel> {
        let mut panel = CrudPanel::new();
        for (operation, path) in self.operation_files().await? {
            let content = fs::read_to_string(&path).await?;
            match serde_yaml_ng::from_str::<Vec<FieldRecord>>(&content) {
                Ok(records) => {
                    panel.set_operation(operation);
                    panel.add_fields(records);
                }
                Err(e) => {
                    warn!(?path, %e, "skipping invalid panel definition");
                }
            }
        }
        panel.set_operation(Operation::default());
        debug!(
            operations = panel.operations().count(),
            "panel loaded"
        );
        Ok(panel)
    }

    /// Write every operation of `panel` to disk.
    ///
    /// Files of operations that no longer have fields are removed. A file
    /// that does not parse was never loaded, so it is left untouched.
    pub async fn save(&self, panel: &CrudPanel) -> Result<()> {
        let mut written = HashSet::new();
        for operation in panel.operations() {
            let yaml = serde_yaml_ng::to_string(panel.fields_for(operation))?;
            atomic_write(&self.operation_path(operation), yaml.as_bytes()).await?;
            written.insert(operation.clone());
        }
        for (operation, path) in self.operation_files().await? {
            if written.contains(&operation) {
                continue;
            }
            let content = fs::read_to_string(&path).await?;
            if serde_yaml_ng::from_str::<Vec<FieldRecord>>(&content).is_err() {
                warn!(?path, "keeping unparseable panel definition");
                continue;
            }
            fs::remove_file(&path).await?;
            debug!(%operation, "removed empty operation file");
        }
        debug!(operations = written.len(), "panel saved");
        Ok(())
    }

    async fn seed_defaults(&self, defaults: &PanelDefaults) -> Result<()> {
        for (operation, records) in &defaults.fields {
            let path = self.operation_path(operation);
            if path.exists() {
                continue;
            }
            let yaml = serde_yaml_ng::to_string(records)?;
            atomic_write(&path, yaml.as_bytes()).await?;
            debug!(%operation, fields = records.len(), "seeded default fields");
        }
        Ok(())
    }

    /// `.yaml` files in the root, paired with the operation named by their stem.
    async fn operation_files(&self) -> Result<Vec<(Operation, PathBuf)>> {
        let mut files = Vec::new();
        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match stem.parse::<Operation>() {
                Ok(operation) => files.push((operation, path.clone())),
                Err(e) => warn!(?path, %e, "skipping file with invalid operation name"),
            }
        }
        Ok(files)
    }
}

/// Write to a temp file then rename for atomic persistence.
async fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "no parent dir"))?;
    let tmp = dir.join(format!(".tmp_{}", Ulid::new()));
    fs::write(&tmp, data).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}
