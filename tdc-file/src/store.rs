//! JSON array import/export with first-run seeding.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tdc_core::ServiceResult;
use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};

use crate::config::FileStoreConfig;
use crate::error::{FileResult, FileStoreError};

/// Records of type `T` kept in a JSON file.
///
/// In transient mode every import is empty and every export is a no-op.
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use tdc_file::{FileStoreConfig, JsonFileStore};
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// struct Company {
///     title: String,
/// }
///
/// let store: JsonFileStore<Company> = JsonFileStore::new(FileStoreConfig::transient());
/// assert!(store.import_or_seed().unwrap().is_empty());
/// ```
pub struct JsonFileStore<T> {
    config: FileStoreConfig,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonFileStore<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for JsonFileStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonFileStore")
            .field("config", &self.config)
            .finish()
    }
}

impl<T> JsonFileStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Create a store for `config`.
    pub fn new(config: FileStoreConfig) -> Self {
        if config.persistent {
            info!(
                data = %config.data_path().display(),
                seed = %config.seed_path().display(),
                "File store is persistent"
            );
        } else {
            info!("File store is transient");
        }
        Self {
            config,
            _marker: PhantomData,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &FileStoreConfig {
        &self.config
    }

    /// Whether records are kept on disk.
    pub fn is_persistent(&self) -> bool {
        self.config.persistent
    }

    /// Path of the persistent data file.
    pub fn data_path(&self) -> PathBuf {
        self.config.data_path()
    }

    /// Path of the seed file.
    pub fn seed_path(&self) -> PathBuf {
        self.config.seed_path()
    }

    /// Read the records stored in `path`.
    ///
    /// A missing or unreadable file yields no records; malformed JSON or a
    /// failed read is an internal error.
    pub fn import_from(&self, path: &Path) -> ServiceResult<Vec<T>> {
        if !self.is_persistent() {
            debug!(path = %path.display(), "import_from(): transient, not importing");
            return Ok(Vec::new());
        }

        let records = read_records(path).map_err(|e| {
            error!(path = %path.display(), error = %e, "import_from() failed");
            e
        })?;

        if let Some(ref records) = records {
            info!(path = %path.display(), count = records.len(), "import_from(): imported");
        }
        Ok(records.unwrap_or_default())
    }

    /// Import the persistent data, seeding it from the seed file on first run.
    pub fn import_or_seed(&self) -> ServiceResult<Vec<T>> {
        if !self.is_persistent() {
            debug!("import_or_seed(): transient, not importing");
            return Ok(Vec::new());
        }

        let data = self.data_path();
        if data.exists() {
            debug!(path = %data.display(), "import_or_seed(): persistent data exists");
            return self.import_from(&data);
        }

        let seed = self.seed_path();
        info!(
            data = %data.display(),
            seed = %seed.display(),
            "import_or_seed(): persistent data missing, seeding"
        );
        let records = self.import_from(&seed)?;
        self.export_to(&records)?;

        info!(count = records.len(), "import_or_seed(): seeded");
        Ok(records)
    }

    /// Overwrite the persistent data file with `records` as pretty-printed JSON.
    ///
    /// The file is replaced atomically: readers see either the old or the new
    /// contents, never a partial write.
    pub fn export_to(&self, records: &[T]) -> ServiceResult<()> {
        if !self.is_persistent() {
            debug!("export_to(): transient, not exporting");
            return Ok(());
        }

        let path = self.data_path();
        write_records(&path, records).map_err(|e| {
            error!(path = %path.display(), error = %e, "export_to() failed");
            e
        })?;

        info!(path = %path.display(), count = records.len(), "export_to(): exported");
        Ok(())
    }
}

fn read_records<T: DeserializeOwned>(path: &Path) -> FileResult<Option<Vec<T>>> {
    if path.is_dir() {
        warn!(path = %path.display(), "file is not readable (directory)");
        return Ok(None);
    }

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "file does not exist");
            return Ok(None);
        }
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            warn!(path = %path.display(), "file is not readable");
            return Ok(None);
        }
        Err(e) => return Err(FileStoreError::io(path, e)),
    };

    serde_json::from_reader(BufReader::new(file))
        .map(Some)
        .map_err(|e| {
            if e.is_io() {
                FileStoreError::io(path, std::io::Error::from(e))
            } else {
                FileStoreError::json(path, e)
            }
        })
}

fn write_records<T: Serialize>(path: &Path, records: &[T]) -> FileResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| FileStoreError::io(dir, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| FileStoreError::io(dir, e))?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, records)
            .map_err(|e| FileStoreError::json(path, e))?;
        writer.flush().map_err(|e| FileStoreError::io(path, e))?;
    }
    tmp.as_file()
        .sync_all()
        .map_err(|e| FileStoreError::io(path, e))?;

    tmp.persist(path).map_err(|e| FileStoreError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Company {
        title: String,
        employees: u32,
    }

    /// A record type that is neither `Clone` nor `Debug`.
    #[derive(Serialize, Deserialize)]
    struct Opaque {
        payload: String,
    }

    #[test]
    fn test_store_clones_without_record_bounds() {
        let dir = TempDir::new().unwrap();
        let store: JsonFileStore<Opaque> =
            JsonFileStore::new(FileStoreConfig::persistent(dir.path()).with_prefix("opaque-"));

        let copy = store.clone();
        assert_eq!(copy.config(), store.config());
        assert!(format!("{:?}", copy).contains("opaque-"));

        copy.export_to(&[Opaque {
            payload: "x".into(),
        }])
        .unwrap();
        let records = store.import_from(&store.data_path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].payload, "x");
    }

    fn company(title: &str, employees: u32) -> Company {
        Company {
            title: title.to_string(),
            employees,
        }
    }

    fn store(dir: &TempDir) -> JsonFileStore<Company> {
        JsonFileStore::new(FileStoreConfig::persistent(dir.path()))
    }

    #[test]
    fn test_missing_file_imports_nothing() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let records = store.import_from(&dir.path().join("absent.json")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_directory_imports_nothing() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        assert!(store.import_from(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_json_is_internal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "[{\"title\": ").unwrap();

        let err = store(&dir).import_from(&path).unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_export_then_import_preserves_order() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let records = vec![company("b", 2), company("a", 1), company("c", 3)];

        store.export_to(&records).unwrap();
        let imported = store.import_from(&store.data_path()).unwrap();
        assert_eq!(imported, records);
    }

    #[test]
    fn test_export_is_pretty_printed() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.export_to(&[company("a", 1)]).unwrap();

        let text = std::fs::read_to_string(store.data_path()).unwrap();
        assert!(text.starts_with("[\n"));
        assert!(text.contains("  \"title\": \"a\""));
    }

    #[test]
    fn test_export_creates_prefix_directory() {
        let dir = TempDir::new().unwrap();
        let store: JsonFileStore<Company> =
            JsonFileStore::new(FileStoreConfig::persistent(dir.path()).with_prefix("companies/"));

        store.export_to(&[company("a", 1)]).unwrap();
        assert!(dir.path().join("companies/data.json").exists());
    }

    #[test]
    fn test_transient_touches_nothing() {
        let dir = TempDir::new().unwrap();
        let mut config = FileStoreConfig::persistent(dir.path());
        config.persistent = false;
        let store: JsonFileStore<Company> = JsonFileStore::new(config);

        std::fs::write(store.seed_path(), r#"[{"title": "x", "employees": 1}]"#).unwrap();

        assert!(store.import_from(&store.seed_path()).unwrap().is_empty());
        assert!(store.import_or_seed().unwrap().is_empty());
        store.export_to(&[company("a", 1)]).unwrap();
        assert!(!store.data_path().exists());
    }
}
