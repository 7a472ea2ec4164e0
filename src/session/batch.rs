use log::info;
use thiserror::Error;

use crate::store::phrase_store::{PhraseStore, StoreError};
use crate::store::schema::SampledBatch;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("the phrase bank has no enabled phrases; import some with --import-phrases")]
    EmptyBank,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Draw the phrases for one session. An empty bank is an operator problem,
/// so it is reported rather than retried.
pub fn select_batch(store: &mut PhraseStore, target_count: usize) -> Result<SampledBatch, BatchError> {
    let batch = store.sample_enabled_phrases(target_count)?;
    if batch.phrases.is_empty() {
        return Err(BatchError::EmptyBank);
    }
    info!(
        "batch {} ready with {} phrases",
        batch.batch_id,
        batch.phrases.len()
    );
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bank_is_an_error() {
        let mut store = PhraseStore::open_in_memory().unwrap();
        assert!(matches!(select_batch(&mut store, 30), Err(BatchError::EmptyBank)));
    }

    #[test]
    fn test_short_bank_returns_everything() {
        let mut store = PhraseStore::open_in_memory().unwrap();
        for word in ["cat", "dog", "sun"] {
            store.add_phrase(word, "animals").unwrap();
        }
        let batch = select_batch(&mut store, 30).unwrap();
        assert_eq!(batch.phrases.len(), 3);

        let next = select_batch(&mut store, 2).unwrap();
        assert_eq!(next.phrases.len(), 2);
        assert!(next.batch_id > batch.batch_id);
    }

    #[test]
    fn test_only_disabled_phrases_counts_as_empty() {
        let mut store = PhraseStore::open_in_memory().unwrap();
        let id = store.add_phrase("cat", "animals").unwrap();
        store.disable_phrase(id).unwrap();
        assert!(matches!(select_batch(&mut store, 5), Err(BatchError::EmptyBank)));
    }
}
