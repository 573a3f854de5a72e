//! PanelContext holds the panels an application has set up.
//!
//! `CrudField::name()` binds to the context's panel instead of looking one
//! up from global state. The context must hold exactly one panel for that
//! lookup to succeed.

use tracing::debug;

use crate::error::{CrudFieldsError, Result};
use crate::registry::CrudPanel;

#[derive(Debug, Default)]
pub struct PanelContext {
    panels: Vec<CrudPanel>,
}

impl PanelContext {
    pub fn new() -> Self {
        Self { panels: Vec::new() }
    }

    /// A context holding just `panel`.
    pub fn with_panel(panel: CrudPanel) -> Self {
        Self {
            panels: vec![panel],
        }
    }

    pub fn register(&mut self, panel: CrudPanel) {
        self.panels.push(panel);
        debug!(panels = self.panels.len(), "registered panel");
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// The single registered panel.
    pub fn panel(&self) -> Result<&CrudPanel> {
        match self.panels.as_slice() {
            [panel] => Ok(panel),
            [] => Err(CrudFieldsError::NoRegistry),
            panels => Err(CrudFieldsError::AmbiguousRegistry {
                count: panels.len(),
            }),
        }
    }

    /// The single registered panel, mutably.
    pub fn panel_mut(&mut self) -> Result<&mut CrudPanel> {
        match self.panels.as_mut_slice() {
            [panel] => Ok(panel),
            [] => Err(CrudFieldsError::NoRegistry),
            panels => Err(CrudFieldsError::AmbiguousRegistry {
                count: panels.len(),
            }),
        }
    }

    /// Take the single registered panel out of the context.
    pub fn into_panel(mut self) -> Result<CrudPanel> {
        self.panel()?;
        self.panels.pop().ok_or(CrudFieldsError::NoRegistry)
    }
}
