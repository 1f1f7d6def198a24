use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::debug;

use crate::{analyze::DEFAULT_PREVIEW_ROWS, columns::RequiredColumns};

/// Runtime settings. Every key is optional in the YAML file; absent keys
/// fall back to the defaults.
///
/// ```yaml
/// preview_rows: 25
/// columns:
///   equipment_name: Asset
///   type: Category
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub columns: RequiredColumns,
    pub preview_rows: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            columns: RequiredColumns::default(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl Settings {
    /// Load from `path`, or return the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let settings = Self::from_yaml(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        debug!(path = %path.display(), ?settings, "loaded settings");
        Ok(settings)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Settings = serde_yaml::from_str(text)?;
        settings.validated()
    }

    /// Trim the configured column names and reject blank or repeated ones.
    fn validated(mut self) -> Result<Self> {
        let c = &mut self.columns;
        for name in [
            &mut c.equipment_name,
            &mut c.kind,
            &mut c.flowrate,
            &mut c.pressure,
            &mut c.temperature,
        ] {
            *name = name.trim().to_string();
        }

        let names = self.columns.ordered();
        if let Some(pos) = names.iter().position(|n| n.is_empty()) {
            bail!("required column #{} has an empty name", pos + 1);
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                bail!("required column `{}` is listed more than once", name);
            }
        }
        Ok(self)
    }
}
