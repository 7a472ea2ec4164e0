use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, info, warn};
use thiserror::Error;

use crate::store::phrase_store::{PhraseStore, StoreError};

pub const PHRASE_COLUMN: &str = "phrase";
pub const LIST_COLUMN: &str = "list";

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("import file is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage error during import: {0}")]
    Store(#[from] StoreError),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    pub skipped: usize,
}

pub fn import_csv_file(store: &mut PhraseStore, path: &Path) -> Result<ImportSummary, ImportError> {
    info!("importing phrases from {}", path.display());
    let file = File::open(path)?;
    import_csv(store, file)
}

/// Add every row of a header-keyed CSV to the store.
///
/// The `phrase` and `list` columns must both be present or nothing is
/// imported. Rows may be ragged; a missing cell reads as empty. The whole file
/// is read before anything is written, and the rows go in as one transaction,
/// so a failed import leaves the store untouched. Duplicates and empty phrases
/// are skipped per row.
pub fn import_csv<R: Read>(store: &mut PhraseStore, input: R) -> Result<ImportSummary, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let phrase_col = headers
        .iter()
        .position(|h| h == PHRASE_COLUMN)
        .ok_or(ImportError::MissingColumn(PHRASE_COLUMN))?;
    let list_col = headers
        .iter()
        .position(|h| h == LIST_COLUMN)
        .ok_or(ImportError::MissingColumn(LIST_COLUMN))?;

    let records = reader
        .records()
        .collect::<Result<Vec<csv::StringRecord>, _>>()?;
    let rows: Vec<(&str, &str)> = records
        .iter()
        .map(|record| {
            (
                record.get(phrase_col).unwrap_or_default(),
                record.get(list_col).unwrap_or_default(),
            )
        })
        .collect();
    debug!("read {} rows, writing to store", rows.len());

    let outcomes = store.add_phrases(rows.iter().copied())?;

    let mut summary = ImportSummary::default();
    for ((text, _), outcome) in rows.iter().zip(outcomes) {
        match outcome {
            Ok(id) => {
                debug!("added '{text}' with id {id}");
                summary.added += 1;
            }
            Err(e) => {
                warn!("skipped adding '{text}': {e}");
                summary.skipped += 1;
            }
        }
    }

    info!(
        "import finished: {} added, {} skipped",
        summary.added, summary.skipped
    );
    Ok(summary)
}
