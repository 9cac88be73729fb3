//! Binding storage in a chart's `values.yaml`
//!
//! The document is held as a generic YAML mapping so keys kubebind does not
//! manage survive a rewrite. Writes go to a temporary file next to the target
//! and are renamed over it, so a failed write never leaves the chart without
//! its values file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use tempfile::NamedTempFile;
use tracing::info;

use kubebind_types::{
    BindError, BindingKind, BindingRecord, Result, ServiceBinding, ServiceCatalogBinding,
};

/// Values file inside a chart directory
pub const VALUES_FILE: &str = "values.yaml";

/// A loaded `values.yaml`
#[derive(Clone, Debug)]
pub struct ChartManifest {
    path: PathBuf,
    doc: Mapping,
}

impl ChartManifest {
    /// Load `values.yaml` from a chart directory
    pub fn load(chart_dir: &Path) -> Result<Self> {
        let path = chart_dir.join(VALUES_FILE);
        let content = fs::read_to_string(&path).map_err(|e| {
            BindError::NotFound(format!("Could not read {}: {}", path.display(), e))
        })?;

        Self::parse(path, &content)
    }

    /// Parse manifest content that belongs at `path`
    pub fn parse(path: PathBuf, content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self {
                path,
                doc: Mapping::new(),
            });
        }

        let value: Value = serde_yaml::from_str(content)
            .map_err(|e| BindError::Parse(format!("{} is not valid YAML: {}", path.display(), e)))?;

        let doc = match value {
            Value::Mapping(doc) => doc,
            Value::Null => Mapping::new(),
            _ => {
                return Err(BindError::Parse(format!(
                    "{} must contain a mapping at the top level",
                    path.display()
                )));
            }
        };

        Ok(Self { path, doc })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a binding of `kind` named `name` is recorded
    pub fn exists(&self, kind: BindingKind, name: &str) -> Result<bool> {
        Ok(self
            .entries(kind)?
            .iter()
            .any(|entry| entry_name(entry) == Some(name)))
    }

    /// Names of recorded bindings of `kind`, in file order
    pub fn binding_names(&self, kind: BindingKind) -> Result<Vec<String>> {
        Ok(self
            .entries(kind)?
            .iter()
            .filter_map(entry_name)
            .map(str::to_string)
            .collect())
    }

    /// Plain service bindings
    pub fn service_bindings(&self) -> Result<Vec<ServiceBinding>> {
        self.typed_entries(BindingKind::ServiceEnv)
    }

    /// Service-catalog bindings
    pub fn catalog_bindings(&self) -> Result<Vec<ServiceCatalogBinding>> {
        self.typed_entries(BindingKind::ServiceCatalogEnv)
    }

    /// Add a binding to its section and write the file
    pub fn append(&mut self, record: &BindingRecord) -> Result<()> {
        let kind = record.kind();
        let value = record.to_yaml()?;

        let mut entries = self.entries(kind)?;
        entries.push(value);
        self.doc
            .insert(Value::from(kind.key()), Value::Sequence(entries));

        self.save()?;
        info!(kind = kind.key(), name = record.name(), path = %self.path.display(), "binding added");
        Ok(())
    }

    /// Drop the binding of `kind` named `name` and write the file.
    ///
    /// Returns whether a binding was removed; the file is rewritten either way.
    pub fn remove(&mut self, kind: BindingKind, name: &str) -> Result<bool> {
        let entries = self.entries(kind)?;
        let before = entries.len();
        let kept: Vec<Value> = entries
            .into_iter()
            .filter(|entry| entry_name(entry) != Some(name))
            .collect();
        let removed = kept.len() != before;

        self.doc.insert(Value::from(kind.key()), Value::Sequence(kept));

        self.save()?;
        info!(kind = kind.key(), name, removed, path = %self.path.display(), "binding removed");
        Ok(removed)
    }

    /// Replace the values file with the current document
    pub fn save(&self) -> Result<()> {
        let content = serde_yaml::to_string(&self.doc)?;

        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;

        // Keep the original file mode rather than the temp file's 0600
        if let Ok(meta) = fs::metadata(&self.path) {
            tmp.as_file().set_permissions(meta.permissions())?;
        }

        tmp.persist(&self.path).map_err(|e| BindError::Io(e.error))?;
        Ok(())
    }

    /// Entries of a section; a missing or null section is empty
    fn entries(&self, kind: BindingKind) -> Result<Vec<Value>> {
        match self.doc.get(kind.key()) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Sequence(entries)) => Ok(entries.clone()),
            Some(_) => Err(BindError::Parse(format!(
                "`{}` in {} is not a list",
                kind.key(),
                self.path.display()
            ))),
        }
    }

    fn typed_entries<T: serde::de::DeserializeOwned>(&self, kind: BindingKind) -> Result<Vec<T>> {
        self.entries(kind)?
            .into_iter()
            .map(|entry| {
                serde_yaml::from_value(entry).map_err(|e| {
                    BindError::Parse(format!(
                        "Malformed `{}` entry in {}: {}",
                        kind.key(),
                        self.path.display(),
                        e
                    ))
                })
            })
            .collect()
    }
}

fn entry_name(entry: &Value) -> Option<&str> {
    entry.get("name").and_then(Value::as_str)
}
