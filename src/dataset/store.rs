use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    sync::Arc,
};

use serde_json::Value;

use crate::{
    dataset::{adapter::RawRecord, DatasetKey},
    error::{AnalyticsError, Result},
};

/// Lazy, per-call stream of raw records.
pub type RecordStream<'a> = Box<dyn Iterator<Item = Result<RawRecord>> + Send + 'a>;

/// The collaborator holding the posts.
///
/// Implementations hand out a fresh iterator on every call; nothing is shared
/// between two scans.
pub trait DocumentStore: Send + Sync {
    /// Records of one dataset in storage order, at most `limit` of them.
    fn scan(&self, dataset: DatasetKey, limit: Option<usize>) -> Result<RecordStream<'_>>;

    /// First record whose dataset id equals `id`.
    fn find_by_id(&self, dataset: DatasetKey, id: &str) -> Result<Option<RawRecord>> {
        let adapter = dataset.adapter();
        for record in self.scan(dataset, None)? {
            let record = record?;
            if adapter.id(&record).as_deref() == Some(id) {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }
}

impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    fn scan(&self, dataset: DatasetKey, limit: Option<usize>) -> Result<RecordStream<'_>> {
        (**self).scan(dataset, limit)
    }

    fn find_by_id(&self, dataset: DatasetKey, id: &str) -> Result<Option<RawRecord>> {
        (**self).find_by_id(dataset, id)
    }
}

/// Store backed by records held in memory, e.g. loaded from JSON-lines dumps.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    datasets: HashMap<DatasetKey, Vec<RawRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, dataset: DatasetKey, record: RawRecord) -> &mut Self {
        self.datasets.entry(dataset).or_default().push(record);
        self
    }

    /// Add JSON objects. Anything that is not an object is rejected.
    pub fn extend_values<I>(&mut self, dataset: DatasetKey, values: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = Value>,
    {
        for value in values {
            match value {
                Value::Object(record) => {
                    self.insert(dataset, record);
                }
                other => {
                    return Err(AnalyticsError::Store(format!(
                        "{dataset}: expected a JSON object, got {other}"
                    )))
                }
            }
        }
        Ok(self)
    }

    /// Read one JSON object per line, blank lines skipped.
    pub fn load_json_lines<R: BufRead>(&mut self, dataset: DatasetKey, reader: R) -> Result<usize> {
        let mut loaded = 0;
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let value: Value = serde_json::from_str(&line)?;
            self.extend_values(dataset, [value])?;
            loaded += 1;
        }
        tracing::debug!(%dataset, loaded, "loaded json lines");
        Ok(loaded)
    }

    /// Load `<dataset>.jsonl` files from a directory. Missing files are skipped.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let mut store = Self::new();
        for dataset in DatasetKey::ALL {
            let path = dir.as_ref().join(format!("{dataset}.jsonl"));
            if !path.exists() {
                tracing::debug!(path = %path.display(), "dataset file not present");
                continue;
            }
            let file = File::open(&path)?;
            store.load_json_lines(dataset, BufReader::new(file))?;
        }
        Ok(store)
    }

    pub fn len(&self, dataset: DatasetKey) -> usize {
        self.datasets.get(&dataset).map_or(0, Vec::len)
    }
}

impl DocumentStore for InMemoryStore {
    fn scan(&self, dataset: DatasetKey, limit: Option<usize>) -> Result<RecordStream<'_>> {
        let records = self.datasets.get(&dataset).map(Vec::as_slice).unwrap_or_default();
        let limit = limit.unwrap_or(usize::MAX);
        Ok(Box::new(records.iter().take(limit).cloned().map(Ok)))
    }
}
