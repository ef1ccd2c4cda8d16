use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{BatchOperation, KeyValueStore, ScanResult};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

type Entries = BTreeMap<Vec<u8>, Vec<u8>>;

/// File-backed key-value store.
///
/// Keeps every entry in memory and rewrites a single file on each mutation
/// through a temp file and rename, so a crash leaves either the old or the new
/// contents on disk. Suitable for the small volume of report data.
pub struct FileBackedKVStore {
    data: Entries,
    path: PathBuf,
}

impl FileBackedKVStore {
    /// Open the store at `path`, loading existing contents.
    ///
    /// A missing file is an empty store. A truncated or garbled file is an
    /// error: silently starting empty would lose the payout baseline.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, KVStoreError> {
        let path = path.as_ref().to_path_buf();
        let data = load_entries(&path)?;
        info!(
            path = %path.display(),
            keys = data.len(),
            "[mlm-02] Opened report storage"
        );
        Ok(Self { data, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, data: &Entries) -> Result<(), KVStoreError> {
        let io_err = |e: std::io::Error| KVStoreError::IOError {
            message: e.to_string(),
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        // Format: [key_len:u32][key][value_len:u32][value]...
        let mut bytes = Vec::new();
        for (key, value) in data {
            bytes.extend_from_slice(&(key.len() as u32).to_le_bytes());
            bytes.extend_from_slice(key);
            bytes.extend_from_slice(&(value.len() as u32).to_le_bytes());
            bytes.extend_from_slice(value);
        }

        let temp_path = self.path.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path).map_err(io_err)?;
        file.write_all(&bytes).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        std::fs::rename(&temp_path, &self.path).map_err(io_err)?;
        Ok(())
    }

    /// Apply `change` to a copy, persist it, then swap it in.
    fn commit(&mut self, change: impl FnOnce(&mut Entries)) -> Result<(), KVStoreError> {
        let mut next = self.data.clone();
        change(&mut next);
        self.save(&next)?;
        self.data = next;
        Ok(())
    }
}

/// Current file contents; empty when the file does not exist yet.
fn load_entries(path: &Path) -> Result<Entries, KVStoreError> {
    match std::fs::read(path) {
        Ok(bytes) => decode_entries(&bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Entries::new()),
        Err(e) => Err(KVStoreError::IOError {
            message: e.to_string(),
        }),
    }
}

fn decode_entries(bytes: &[u8]) -> Result<Entries, KVStoreError> {
    let corrupt = |what: &str| KVStoreError::CorruptionError {
        message: format!("truncated {} at end of storage file", what),
    };

    let mut data = Entries::new();
    let mut cursor = 0;
    let read_chunk = |cursor: &mut usize, what: &str| -> Result<Vec<u8>, KVStoreError> {
        let len_end = *cursor + 4;
        let len_bytes: [u8; 4] = bytes
            .get(*cursor..len_end)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| corrupt(what))?;
        let len = u32::from_le_bytes(len_bytes) as usize;
        let chunk = bytes
            .get(len_end..len_end + len)
            .ok_or_else(|| corrupt(what))?
            .to_vec();
        *cursor = len_end + len;
        Ok(chunk)
    };

    while cursor < bytes.len() {
        let key = read_chunk(&mut cursor, "key")?;
        let value = read_chunk(&mut cursor, "value")?;
        data.insert(key, value);
    }
    Ok(data)
}

impl KeyValueStore for FileBackedKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.commit(|d| {
            d.insert(key.to_vec(), value.to_vec());
        })
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        self.commit(|d| {
            d.remove(key);
        })
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        self.commit(|d| {
            for op in operations {
                match op {
                    BatchOperation::Put { key, value } => {
                        d.insert(key, value);
                    }
                    BatchOperation::Delete { key } => {
                        d.remove(&key);
                    }
                }
            }
        })
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        Ok(self.data.contains_key(key))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError> {
        Ok(self
            .data
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn refresh(&mut self) -> Result<(), KVStoreError> {
        self.data = load_entries(&self.path)?;
        debug!(path = %self.path.display(), keys = self.data.len(), "[mlm-02] Reloaded report storage");
        Ok(())
    }
}
