//! The document store.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde_json::Value;
use walkdir::WalkDir;

use gridforge_core::catalog::ReferenceCatalog;
use gridforge_core::schema::enums::EnumDocument;
use gridforge_core::schema::table::TableDocument;
use gridforge_core::schema::validate_document_name;

use crate::error::{StoreError, StoreResult};
use crate::layout::{DocumentKind, ListEntry};

/// Store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub root: PathBuf,
}

impl StoreConfig {
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

/// Filesystem-backed document store.
///
/// Every mutation takes the store-wide lock: list index and document files
/// must move together, and the callers (API handlers, CLI commands) are
/// oblivious to each other.
pub struct Store {
    root: PathBuf,
    lock: Mutex<()>,
}

impl Store {
    /// Open a store, creating the root and every namespace directory.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        for kind in DocumentKind::ALL {
            fs::create_dir_all(config.root.join(kind.dir_name()))?;
        }
        Ok(Self {
            root: config.root,
            lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn list_path(&self, kind: DocumentKind) -> PathBuf {
        self.root.join(kind.dir_name()).join(kind.list_file_name())
    }

    fn document_dir(&self, kind: DocumentKind, name: &str) -> PathBuf {
        self.root.join(kind.dir_name()).join(name)
    }

    fn document_path(&self, kind: DocumentKind, name: &str) -> PathBuf {
        self.document_dir(kind, name).join(format!("{name}.json"))
    }

    fn read_list(&self, kind: DocumentKind) -> StoreResult<Vec<ListEntry>> {
        let path = self.list_path(kind);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn write_json(&self, path: &Path, value: &Value) -> StoreResult<()> {
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(value)?)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    fn write_list(&self, kind: DocumentKind, entries: &[ListEntry]) -> StoreResult<()> {
        let value = serde_json::to_value(entries)?;
        self.write_json(&self.list_path(kind), &value)
    }

    /// Index entries for a kind, in stored order. A missing index reads as
    /// an empty list.
    pub fn list(&self, kind: DocumentKind) -> StoreResult<Vec<ListEntry>> {
        let _guard = self.lock.lock();
        self.read_list(kind)
    }

    pub fn exists(&self, kind: DocumentKind, name: &str) -> bool {
        self.document_path(kind, name).exists()
    }

    /// Create a named document: index entry (id = max+1), document
    /// directory, and the kind's empty content.
    pub fn create(&self, kind: DocumentKind, entry_seed: ListEntry) -> StoreResult<ListEntry> {
        validate_document_name(&entry_seed.name)
            .map_err(|e| StoreError::InvalidName(e.to_string()))?;

        let _guard = self.lock.lock();
        let mut entries = self.read_list(kind)?;
        if entries.iter().any(|e| e.name == entry_seed.name) {
            return Err(StoreError::already_exists(kind.dir_name(), entry_seed.name));
        }

        let id = entries.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        let entry = ListEntry { id, ..entry_seed };

        fs::create_dir_all(self.document_dir(kind, &entry.name))?;
        self.write_json(
            &self.document_path(kind, &entry.name),
            &kind.empty_document(&entry),
        )?;

        entries.push(entry.clone());
        self.write_list(kind, &entries)?;
        Ok(entry)
    }

    /// Load a document as raw JSON.
    pub fn load(&self, kind: DocumentKind, name: &str) -> StoreResult<Value> {
        let path = self.document_path(kind, name);
        if !path.exists() {
            return Err(StoreError::not_found(kind.dir_name(), name));
        }
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Save a document. The document must have been created first.
    pub fn save(&self, kind: DocumentKind, name: &str, value: &Value) -> StoreResult<()> {
        let _guard = self.lock.lock();
        let path = self.document_path(kind, name);
        if !path.exists() {
            return Err(StoreError::not_found(kind.dir_name(), name));
        }
        self.write_json(&path, value)
    }

    /// Remove a document's index entry without touching its files. The
    /// editors expose this as a softer alternative to a full delete; the
    /// directory stays on disk and `verify` reports it as orphaned.
    pub fn remove_list_entry(&self, kind: DocumentKind, name: &str) -> StoreResult<()> {
        let _guard = self.lock.lock();
        let mut entries = self.read_list(kind)?;
        entries.retain(|e| e.name != name);
        self.write_list(kind, &entries)
    }

    /// Delete a document directory (including generated artifacts) and its
    /// index entry.
    pub fn delete(&self, kind: DocumentKind, name: &str) -> StoreResult<()> {
        let _guard = self.lock.lock();
        let dir = self.document_dir(kind, name);
        if !dir.exists() {
            return Err(StoreError::not_found(kind.dir_name(), name));
        }
        fs::remove_dir_all(dir)?;

        let mut entries = self.read_list(kind)?;
        entries.retain(|e| e.name != name);
        self.write_list(kind, &entries)
    }

    /// Place a generated artifact next to its source document.
    pub fn write_artifact(
        &self,
        kind: DocumentKind,
        name: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> StoreResult<PathBuf> {
        let _guard = self.lock.lock();
        let dir = self.document_dir(kind, name);
        if !dir.exists() {
            return Err(StoreError::not_found(kind.dir_name(), name));
        }
        let path = dir.join(file_name);
        let tmp = dir.join(format!("{file_name}.tmp"));
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;
        Ok(path)
    }

    /// Place a generated artifact at the namespace root, for artifacts that
    /// span every document of a kind.
    pub fn write_index_artifact(
        &self,
        kind: DocumentKind,
        file_name: &str,
        bytes: &[u8],
    ) -> StoreResult<PathBuf> {
        let _guard = self.lock.lock();
        let dir = self.root.join(kind.dir_name());
        let path = dir.join(file_name);
        let tmp = dir.join(format!("{file_name}.tmp"));
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;
        Ok(path)
    }

    /// Build the reference catalog coercion needs: every enum document
    /// contributes its properties, every keyed table its record keys.
    /// Documents that fail to parse contribute nothing; a stale reference
    /// then resolves to the coercion fallback instead of blocking the
    /// caller.
    pub fn reference_catalog(&self) -> StoreResult<ReferenceCatalog> {
        let mut catalog = ReferenceCatalog::new();
        for entry in self.list(DocumentKind::Enum)? {
            let Ok(value) = self.load(DocumentKind::Enum, &entry.name) else {
                continue;
            };
            let Ok(doc) = serde_json::from_value::<EnumDocument>(value) else {
                continue;
            };
            catalog.insert(entry.name, doc.properties());
        }
        for entry in self.list(DocumentKind::ClassDataId)? {
            let Ok(value) = self.load(DocumentKind::ClassDataId, &entry.name) else {
                continue;
            };
            let Ok(doc) = serde_json::from_value::<TableDocument>(value) else {
                continue;
            };
            catalog.insert(entry.name, doc.keys());
        }
        Ok(catalog)
    }

    /// Consistency report: index entries without a document file, and
    /// document directories missing from the index.
    pub fn verify(&self) -> StoreResult<Vec<String>> {
        let _guard = self.lock.lock();
        let mut findings = Vec::new();

        for kind in DocumentKind::ALL {
            let entries = self.read_list(kind)?;
            for entry in &entries {
                if !self.document_path(kind, &entry.name).exists() {
                    findings.push(format!(
                        "{}: listed document {} has no file",
                        kind.dir_name(),
                        entry.name
                    ));
                }
            }

            let namespace = self.root.join(kind.dir_name());
            for dir in WalkDir::new(&namespace)
                .min_depth(1)
                .max_depth(1)
                .into_iter()
                .filter_map(Result::ok)
                .filter(|e| e.file_type().is_dir())
            {
                let name = dir.file_name().to_string_lossy().to_string();
                if !entries.iter().any(|e| e.name == name) {
                    findings.push(format!(
                        "{}: directory {} is not in the index",
                        kind.dir_name(),
                        name
                    ));
                }
            }
        }
        Ok(findings)
    }
}
