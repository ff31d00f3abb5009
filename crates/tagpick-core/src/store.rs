use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

const TABLE_VERSION: i64 = 1;

/// Placeholder vocabulary substituted whenever the real source cannot be
/// read. The widget must always reach a usable state, so a broken or
/// missing source degrades to these entries instead of failing.
pub const FALLBACK_VOCABULARY: &[&str] = &["No Options Retrieved", "Test 1", "Test 2"];

pub fn fallback_vocabulary() -> Vec<String> {
    FALLBACK_VOCABULARY
        .iter()
        .map(|value| (*value).to_string())
        .collect()
}

/// One row of a vocabulary table. `text` is the tag token offered as an
/// option; `created_at` is informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRecord {
    pub text: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct TableFile {
    version: i64,
    #[serde(rename = "tag", default)]
    records: Vec<TagRecord>,
}

impl Default for TableFile {
    fn default() -> Self {
        Self {
            version: TABLE_VERSION,
            records: Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no vocabulary table '{table}' at {path}")]
    MissingTable { table: String, path: PathBuf },
    #[error("failed to read vocabulary table at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse vocabulary table at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to write vocabulary table at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize vocabulary table: {0}")]
    Serialize(toml::ser::Error),
    #[error("unsupported vocabulary table version {found} at {path}")]
    UnsupportedVersion { found: i64, path: PathBuf },
    #[error("failed to format record timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}

/// Boundary to the shared vocabulary store. The widget reads the option
/// universe through `fetch_vocabulary` and appends user-created tags
/// through `create_record`; each call is independent and carries no
/// transactional guarantees across a batch.
pub trait TagStore {
    fn fetch_vocabulary(&self, source: &str) -> Result<Vec<TagRecord>, StoreError>;
    fn create_record(&self, source: &str, text: &str) -> Result<(), StoreError>;
}

/// TOML-file-backed store: one table file per source identifier under a
/// base directory. Appends rewrite the whole file.
#[derive(Debug, Clone)]
pub struct FileTagStore {
    base_dir: PathBuf,
}

impl FileTagStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn table_path(&self, source: &str) -> PathBuf {
        self.base_dir.join(format!("{source}.toml"))
    }

    fn load_table(&self, source: &str) -> Result<TableFile, StoreError> {
        let path = self.table_path(source);
        if !path.exists() {
            return Err(StoreError::MissingTable {
                table: source.to_string(),
                path,
            });
        }

        let raw = fs::read_to_string(&path).map_err(|error| StoreError::Read {
            path: path.clone(),
            source: error,
        })?;

        let parsed: TableFile = toml::from_str(&raw).map_err(|error| StoreError::Parse {
            path: path.clone(),
            source: error,
        })?;

        if parsed.version != TABLE_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: parsed.version,
                path,
            });
        }

        Ok(parsed)
    }

    fn write_table(&self, source: &str, table: &TableFile) -> Result<(), StoreError> {
        let path = self.table_path(source);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|error| StoreError::Write {
                path: path.clone(),
                source: error,
            })?;
        }

        let raw = toml::to_string_pretty(table).map_err(StoreError::Serialize)?;
        fs::write(&path, raw).map_err(|error| StoreError::Write {
            path: path.clone(),
            source: error,
        })
    }
}

impl TagStore for FileTagStore {
    fn fetch_vocabulary(&self, source: &str) -> Result<Vec<TagRecord>, StoreError> {
        Ok(self.load_table(source)?.records)
    }

    fn create_record(&self, source: &str, text: &str) -> Result<(), StoreError> {
        let mut table = match self.load_table(source) {
            Ok(table) => table,
            Err(StoreError::MissingTable { .. }) => TableFile::default(),
            Err(error) => return Err(error),
        };

        // Duplicates are tolerated here and collapsed on fetch; the store
        // is append-only from the widget's point of view.
        table.records.push(TagRecord {
            text: text.to_string(),
            created_at: created_at_stamp()?,
        });

        self.write_table(source, &table)
    }
}

fn created_at_stamp() -> Result<String, time::error::Format> {
    OffsetDateTime::now_utc().format(&Rfc3339)
}

/// Resolves the default base directory for table files next to the config.
pub fn default_store_dir(config_path: &Path) -> Option<PathBuf> {
    config_path.parent().map(|dir| dir.join("tables"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &Path) -> FileTagStore {
        FileTagStore::new(dir.to_path_buf())
    }

    #[test]
    fn fetch_from_missing_table_reports_missing() {
        let temp = tempfile::tempdir().expect("temp dir");
        let store = store_in(temp.path());

        let error = store
            .fetch_vocabulary("tags")
            .expect_err("missing table should fail");
        assert!(matches!(error, StoreError::MissingTable { .. }));
    }

    #[test]
    fn create_then_fetch_roundtrips_records() {
        let temp = tempfile::tempdir().expect("temp dir");
        let store = store_in(temp.path());

        store.create_record("tags", "urgent").expect("first create");
        store.create_record("tags", "review").expect("second create");

        let records = store.fetch_vocabulary("tags").expect("fetch");
        let texts: Vec<&str> = records.iter().map(|record| record.text.as_str()).collect();
        assert_eq!(texts, vec!["urgent", "review"]);
        assert!(records.iter().all(|record| !record.created_at.is_empty()));
    }

    #[test]
    fn created_records_carry_rfc3339_utc_timestamps() {
        let temp = tempfile::tempdir().expect("temp dir");
        let store = store_in(temp.path());

        store.create_record("tags", "urgent").expect("create");

        let records = store.fetch_vocabulary("tags").expect("fetch");
        let stamp = &records[0].created_at;
        assert!(stamp.contains('T'));
        assert!(stamp.ends_with('Z'));
    }

    #[test]
    fn create_tolerates_duplicate_text() {
        let temp = tempfile::tempdir().expect("temp dir");
        let store = store_in(temp.path());

        store.create_record("tags", "urgent").expect("first create");
        store
            .create_record("tags", "urgent")
            .expect("duplicate create");

        let records = store.fetch_vocabulary("tags").expect("fetch");
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn fetch_rejects_malformed_table() {
        let temp = tempfile::tempdir().expect("temp dir");
        let store = store_in(temp.path());
        std::fs::write(store.table_path("tags"), "not = [valid").expect("write junk");

        let error = store
            .fetch_vocabulary("tags")
            .expect_err("malformed table should fail");
        assert!(matches!(error, StoreError::Parse { .. }));
    }

    #[test]
    fn fetch_rejects_unsupported_version() {
        let temp = tempfile::tempdir().expect("temp dir");
        let store = store_in(temp.path());
        std::fs::write(store.table_path("tags"), "version = 9\n").expect("write table");

        let error = store
            .fetch_vocabulary("tags")
            .expect_err("future version should fail");
        assert!(matches!(
            error,
            StoreError::UnsupportedVersion { found: 9, .. }
        ));
    }

    #[test]
    fn tables_are_isolated_per_source() {
        let temp = tempfile::tempdir().expect("temp dir");
        let store = store_in(temp.path());

        store.create_record("a", "one").expect("create in a");
        store.create_record("b", "two").expect("create in b");

        let from_a = store.fetch_vocabulary("a").expect("fetch a");
        assert_eq!(from_a.len(), 1);
        assert_eq!(from_a[0].text, "one");
    }

    #[test]
    fn fallback_vocabulary_matches_fixed_set() {
        assert_eq!(
            fallback_vocabulary(),
            vec!["No Options Retrieved", "Test 1", "Test 2"]
        );
    }
}
