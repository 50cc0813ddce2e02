use crate::{
    dataset::{store::{DocumentStore, RecordStream}, Corpus, DatasetSelector, Document},
    error::Result,
};

/// How many documents to load and which ones count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// total cap across every scanned dataset
    pub limit: Option<usize>,
    /// skip documents whose cleaned text is empty before they count
    pub require_text: bool,
}

impl LoadOptions {
    /// every document, text or not
    pub fn all() -> Self {
        Self::default()
    }

    /// up to `limit` documents with non-empty cleaned text
    pub fn texts(limit: Option<usize>) -> Self {
        Self { limit, require_text: true }
    }

    /// the first `limit` documents, text or not
    pub fn sample(limit: usize) -> Self {
        Self { limit: Some(limit), require_text: false }
    }
}

/// Lazily map store records of the selected datasets to documents.
///
/// Datasets are scanned one after the other in registry order. Records the
/// adapter cannot identify are skipped. Without a text filter the `limit` is
/// pushed down to each scan, so a store never reads past it.
pub fn stream_documents<'a, S>(
    store: &'a S,
    selector: DatasetSelector,
    options: LoadOptions,
) -> impl Iterator<Item = Result<Document>> + 'a
where
    S: DocumentStore + ?Sized,
{
    let require_text = options.require_text;
    let scan_limit = if require_text { None } else { options.limit };
    selector.keys().iter().flat_map(move |&key| {
        let adapter = key.adapter();
        let records: RecordStream<'a> = match store.scan(key, scan_limit) {
            Ok(stream) => stream,
            Err(err) => Box::new(std::iter::once(Err(err))),
        };
        records.filter_map(move |record| match record {
            Ok(record) => adapter
                .to_document(&record)
                .filter(|doc| !require_text || doc.has_text())
                .map(Ok),
            Err(err) => Some(Err(err)),
        })
    })
}

/// Materialize the corpus of one request.
pub fn fetch_corpus<S>(store: &S, selector: DatasetSelector, options: LoadOptions) -> Result<Corpus>
where
    S: DocumentStore + ?Sized,
{
    let limit = options.limit.unwrap_or(usize::MAX);
    let documents = stream_documents(store, selector, options)
        .take(limit)
        .collect::<Result<Vec<_>>>()?;
    tracing::debug!(dataset = %selector, documents = documents.len(), ?options, "corpus fetched");
    Ok(Corpus::new(documents))
}
