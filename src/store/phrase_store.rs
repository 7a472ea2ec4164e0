use std::fs;
use std::path::Path;

use chrono::Utc;
use log::{debug, error, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row, Transaction, params};
use thiserror::Error;

use crate::store::schema::{
    BatchId, CREATE_TABLES, Phrase, PhraseId, ResponseRecord, ResponseStatus, SampledBatch,
};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no phrase with id {0}")]
    NotFound(PhraseId),

    #[error("phrase '{0}' is already present")]
    AlreadyExists(String),

    #[error("phrase text must not be empty")]
    EmptyText,

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Destination for scored responses. The drill session only ever needs this
/// one write, so it depends on the trait rather than the whole store.
pub trait ResponseSink {
    fn record_response(
        &mut self,
        batch_id: BatchId,
        phrase_id: PhraseId,
        elapsed_ms: u64,
        status: ResponseStatus,
    ) -> Result<()>;
}

/// SQLite-backed phrase bank, batch ledger and response history.
///
/// Every statement binds its values as parameters; phrase text is never
/// spliced into SQL.
pub struct PhraseStore {
    conn: Connection,
}

const PHRASE_COLUMNS: &str = "rowid, phrase, list, enabled, difficulty";

// Older databases carry the text 'True' in the enabled column
const ENABLED_CLAUSE: &str = "enabled IN (1, 'True')";

fn enabled_flag(value: Value) -> bool {
    match value {
        Value::Integer(n) => n != 0,
        Value::Text(text) => text == "True" || text == "1",
        _ => false,
    }
}

fn phrase_from_row(row: &Row<'_>) -> rusqlite::Result<Phrase> {
    Ok(Phrase {
        id: PhraseId(row.get(0)?),
        text: row.get(1)?,
        list: row.get(2)?,
        enabled: enabled_flag(row.get(3)?),
        difficulty: row.get(4)?,
    })
}

/// Insert one phrase inside `tx`. Sees earlier uncommitted inserts of the
/// same transaction, so duplicates within one bulk load are caught too.
fn insert_phrase(tx: &Transaction<'_>, text: &str, list: &str) -> Result<PhraseId> {
    if text.is_empty() {
        return Err(StoreError::EmptyText);
    }

    let existing: Option<i64> = tx
        .query_row(
            "SELECT rowid FROM phrases WHERE phrase = ?1",
            params![text],
            |row| row.get(0),
        )
        .optional()?;
    if existing.is_some() {
        debug!("phrase '{text}' is already present");
        return Err(StoreError::AlreadyExists(text.to_string()));
    }

    tx.execute(
        "INSERT INTO phrases (phrase, list, enabled) VALUES (?1, ?2, 1)",
        params![text, list],
    )?;
    Ok(PhraseId(tx.last_insert_rowid()))
}

impl PhraseStore {
    /// Open (creating if needed) the database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let existed = path.exists();
        let conn = Connection::open(path)?;
        if !existed {
            debug!("creating phrase database at {}", path.display());
        }
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(CREATE_TABLES)?;
        Ok(Self { conn })
    }

    /// Allocate a new batch and draw up to `count` enabled phrases for it.
    pub fn sample_enabled_phrases(&mut self, count: usize) -> Result<SampledBatch> {
        let mut rng = SmallRng::from_entropy();
        self.sample_enabled_phrases_with(count, &mut rng)
    }

    /// Same as [`sample_enabled_phrases`](Self::sample_enabled_phrases) with a
    /// caller-supplied random source.
    ///
    /// The batch row is written before sampling, so a batch id is consumed even
    /// when no phrases are enabled. Running short of phrases is not an error:
    /// the result simply holds fewer than `count` entries.
    pub fn sample_enabled_phrases_with<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        rng: &mut R,
    ) -> Result<SampledBatch> {
        let tx = self.conn.transaction()?;

        let last: Option<i64> =
            tx.query_row("SELECT MAX(batch_id) FROM batches", [], |row| row.get(0))?;
        let batch_id = BatchId(last.map_or(1, |id| id + 1));
        tx.execute(
            "INSERT INTO batches (batch_id, start_time) VALUES (?1, ?2)",
            params![batch_id.0, Utc::now().to_rfc3339()],
        )?;

        let mut enabled = {
            let mut stmt = tx.prepare(&format!(
                "SELECT {PHRASE_COLUMNS} FROM phrases WHERE {ENABLED_CLAUSE} ORDER BY rowid"
            ))?;
            let rows = stmt.query_map([], phrase_from_row)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };
        tx.commit()?;

        let take = count.min(enabled.len());
        let (picked, _) = enabled.partial_shuffle(rng, take);
        let phrases = picked.to_vec();

        if phrases.is_empty() {
            warn!("batch {batch_id} allocated but no enabled phrases are available");
        } else {
            debug!("batch {batch_id}: sampled {} of {count} requested phrases", phrases.len());
        }

        Ok(SampledBatch { batch_id, phrases })
    }

    /// Insert `text` as a new enabled phrase unless identical text exists.
    pub fn add_phrase(&mut self, text: &str, list: &str) -> Result<PhraseId> {
        let tx = self.conn.transaction()?;
        let id = insert_phrase(&tx, text, list)?;
        tx.commit()?;
        debug!("added phrase '{text}' with id {id}");
        Ok(id)
    }

    /// Insert many `(text, list)` rows as one unit.
    ///
    /// Each row gets its own outcome: duplicates and empty text are reported
    /// per row and do not stop the load. Any other failure rolls back every
    /// row of the call and is returned as the outer error.
    pub fn add_phrases<'r, I>(&mut self, rows: I) -> Result<Vec<Result<PhraseId>>>
    where
        I: IntoIterator<Item = (&'r str, &'r str)>,
    {
        let tx = self.conn.transaction()?;
        let mut outcomes = Vec::new();
        for (text, list) in rows {
            match insert_phrase(&tx, text, list) {
                Err(e @ (StoreError::AlreadyExists(_) | StoreError::EmptyText)) => {
                    outcomes.push(Err(e))
                }
                Err(e) => return Err(e),
                Ok(id) => outcomes.push(Ok(id)),
            }
        }
        tx.commit()?;
        Ok(outcomes)
    }

    pub fn phrase(&self, id: PhraseId) -> Result<Option<Phrase>> {
        let phrase = self
            .conn
            .query_row(
                &format!("SELECT {PHRASE_COLUMNS} FROM phrases WHERE rowid = ?1"),
                params![id.0],
                phrase_from_row,
            )
            .optional()?;
        Ok(phrase)
    }

    /// Every phrase, enabled or not, sorted by text.
    pub fn list_all_phrases(&self) -> Result<Vec<Phrase>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PHRASE_COLUMNS} FROM phrases ORDER BY phrase, rowid"
        ))?;
        let rows = stmt.query_map([], phrase_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn enable_phrase(&mut self, id: PhraseId) -> Result<()> {
        self.set_enabled(id, true)
    }

    pub fn disable_phrase(&mut self, id: PhraseId) -> Result<()> {
        self.set_enabled(id, false)
    }

    fn set_enabled(&mut self, id: PhraseId, enabled: bool) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE phrases SET enabled = ?1 WHERE rowid = ?2",
            params![enabled, id.0],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        debug!("phrase {id} enabled = {enabled}");
        Ok(())
    }

    pub fn delete_phrase(&mut self, id: PhraseId) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM phrases WHERE rowid = ?1", params![id.0])?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        debug!("deleted phrase {id}");
        Ok(())
    }

    /// Response history for one batch, oldest first.
    pub fn responses_for_batch(&self, batch_id: BatchId) -> Result<Vec<ResponseRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT batch_id, phrase_id, response_time_ms, response_status
             FROM response_history WHERE batch_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![batch_id.0], |row| {
            let elapsed: Option<i64> = row.get(2)?;
            let status: Option<String> = row.get(3)?;
            Ok((
                BatchId(row.get(0)?),
                PhraseId(row.get(1)?),
                elapsed,
                status,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (batch_id, phrase_id, elapsed, status) = row?;
            let Some(status) = status.as_deref().and_then(ResponseStatus::parse) else {
                warn!("skipping response for phrase {phrase_id} with unknown status {status:?}");
                continue;
            };
            records.push(ResponseRecord {
                batch_id,
                phrase_id,
                response_time_ms: elapsed.unwrap_or(0).max(0) as u64,
                status,
            });
        }
        Ok(records)
    }
}

impl ResponseSink for PhraseStore {
    fn record_response(
        &mut self,
        batch_id: BatchId,
        phrase_id: PhraseId,
        elapsed_ms: u64,
        status: ResponseStatus,
    ) -> Result<()> {
        let elapsed = i64::try_from(elapsed_ms).unwrap_or(i64::MAX);
        self.conn
            .execute(
                "INSERT INTO response_history (batch_id, phrase_id, response_time_ms, response_status)
                 VALUES (?1, ?2, ?3, ?4)",
                params![batch_id.0, phrase_id.0, elapsed, status.as_str()],
            )
            .map_err(|e| {
                error!(
                    "could not record response ({batch_id}, {phrase_id}, {elapsed_ms}, {status}): {e}"
                );
                StoreError::from(e)
            })?;
        Ok(())
    }
}
