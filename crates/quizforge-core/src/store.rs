//! The quiz store: committed quizzes, in insertion order, persisted as one
//! JSON array.
//!
//! The whole collection is read when the store opens and rewritten on every
//! append. A missing blob, a blob that is not a JSON array, or individual
//! entries that fail validation never stop the store from opening; bad data
//! is logged and dropped.
//!
//! Appends are compare-and-swap against the blob: the store remembers the
//! exact contents it last read or wrote and asks the backend to replace the
//! blob only if it still holds exactly that. The backend performs the check
//! and the write as one step, so two processes sharing a file cannot
//! silently lose each other's quizzes.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::backend::{BlobBackend, FileBackend, MemoryBackend};
use crate::error::PersistenceError;
use crate::model::{Quiz, QuizId};

/// Durable collection of committed quizzes.
pub struct QuizStore {
    backend: Box<dyn BlobBackend>,
    quizzes: Vec<Arc<Quiz>>,
    /// Blob contents as last read or written by this store.
    snapshot: Option<String>,
    pretty: bool,
}

impl QuizStore {
    /// Open a store on `backend`, loading whatever it already holds.
    pub fn open(backend: impl BlobBackend + 'static) -> Self {
        let mut store = Self {
            backend: Box::new(backend),
            quizzes: Vec::new(),
            snapshot: None,
            pretty: false,
        };
        store.reload();
        store
    }

    /// Open a store backed by a JSON file.
    pub fn open_file(path: impl AsRef<Path>) -> Self {
        Self::open(FileBackend::new(path.as_ref()))
    }

    /// A fresh store that lives only in memory.
    pub fn in_memory() -> Self {
        Self::open(MemoryBackend::new())
    }

    /// Write indented JSON instead of a single line.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Discard the in-memory collection and read the blob again.
    ///
    /// Returns the number of quizzes loaded.
    pub fn reload(&mut self) -> usize {
        let location = self.backend.location();
        let contents = match self.backend.read() {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!("quiz store unreadable, starting empty: {e}");
                None
            }
        };

        self.quizzes = contents
            .as_deref()
            .map(parse_collection)
            .unwrap_or_default()
            .into_iter()
            .map(Arc::new)
            .collect();
        self.snapshot = contents;

        tracing::info!(
            "loaded {} quizzes from {}",
            self.quizzes.len(),
            location.display()
        );
        self.quizzes.len()
    }

    /// All quizzes, oldest first.
    pub fn list(&self) -> &[Arc<Quiz>] {
        &self.quizzes
    }

    pub fn len(&self) -> usize {
        self.quizzes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quizzes.is_empty()
    }

    pub fn find_by_id(&self, id: QuizId) -> Option<Arc<Quiz>> {
        self.quizzes.iter().find(|q| q.id() == id).cloned()
    }

    /// Id for a quiz committed at `now`.
    ///
    /// Millisecond timestamp, bumped past the largest stored id when the
    /// clock has not moved on. `None` once a stored id is `i64::MAX`.
    pub fn next_id(&self, now: DateTime<Utc>) -> Option<QuizId> {
        let candidate = now.timestamp_millis();
        match self.quizzes.iter().map(|q| q.id().0).max() {
            Some(max) if max >= candidate => max.checked_add(1).map(QuizId),
            _ => Some(QuizId(candidate)),
        }
    }

    /// Add `quiz` and persist the full collection.
    ///
    /// On failure nothing changes, in memory or on the medium.
    pub fn append(&mut self, quiz: Quiz) -> Result<Arc<Quiz>, PersistenceError> {
        let quiz = Arc::new(quiz);
        let collection: Vec<&Quiz> = self
            .quizzes
            .iter()
            .chain(std::iter::once(&quiz))
            .map(|q| q.as_ref())
            .collect();
        let json = if self.pretty {
            serde_json::to_string_pretty(&collection)?
        } else {
            serde_json::to_string(&collection)?
        };

        match self
            .backend
            .compare_and_write(self.snapshot.as_deref(), &json)
        {
            Ok(()) => {}
            Err(PersistenceError::Conflict) => {
                tracing::warn!(
                    "quiz store at {} changed underneath us, refusing to overwrite",
                    self.backend.location().display()
                );
                return Err(PersistenceError::Conflict);
            }
            Err(e) => {
                tracing::error!("failed to persist quiz {}: {e}", quiz.id());
                return Err(e);
            }
        }

        tracing::info!(
            "stored quiz {} '{}' ({} total)",
            quiz.id(),
            quiz.title(),
            self.quizzes.len() + 1
        );
        self.quizzes.push(Arc::clone(&quiz));
        self.snapshot = Some(json);
        Ok(quiz)
    }
}

impl std::fmt::Debug for QuizStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizStore")
            .field("location", &self.backend.location())
            .field("quizzes", &self.quizzes.len())
            .finish()
    }
}

/// Parse a stored blob, keeping only entries that are valid quizzes.
fn parse_collection(contents: &str) -> Vec<Quiz> {
    if contents.trim().is_empty() {
        return Vec::new();
    }
    let entries: Vec<serde_json::Value> = match serde_json::from_str(contents) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("quiz store is corrupt, starting empty: {e}");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let mut quizzes = Vec::with_capacity(entries.len());
    for (i, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<Quiz>(entry) {
            Ok(quiz) if seen.insert(quiz.id()) => quizzes.push(quiz),
            Ok(quiz) => tracing::warn!("discarding entry {i}: duplicate id {}", quiz.id()),
            Err(e) => tracing::warn!("discarding malformed entry {i}: {e}"),
        }
    }
    quizzes
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Mutex;

    use super::*;
    use crate::model::{Question, OPTION_COUNT};

    type Hook = Box<dyn FnOnce() + Send>;

    /// Runs `hook` once, right before the first write reaches `inner`.
    struct InterleavedBackend<B> {
        inner: B,
        hook: Mutex<Option<Hook>>,
    }

    impl<B: BlobBackend> InterleavedBackend<B> {
        fn new(inner: B, hook: impl FnOnce() + Send + 'static) -> Self {
            let hook: Hook = Box::new(hook);
            Self {
                inner,
                hook: Mutex::new(Some(hook)),
            }
        }
    }

    impl<B: BlobBackend> BlobBackend for InterleavedBackend<B> {
        fn location(&self) -> PathBuf {
            self.inner.location()
        }

        fn read(&self) -> Result<Option<String>, PersistenceError> {
            self.inner.read()
        }

        fn compare_and_write(
            &self,
            expected: Option<&str>,
            contents: &str,
        ) -> Result<(), PersistenceError> {
            if let Some(hook) = self.hook.lock().unwrap().take() {
                hook();
            }
            self.inner.compare_and_write(expected, contents)
        }
    }

    fn sample_quiz(id: i64, title: &str) -> Quiz {
        let options: [String; OPTION_COUNT] = ["a".into(), "b".into(), "c".into(), "d".into()];
        let question = Question::new(0, "Which?", options, 2).unwrap();
        Quiz::from_parts(
            QuizId(id),
            title.into(),
            "desc".into(),
            vec![question],
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn missing_blob_opens_empty() {
        let store = QuizStore::in_memory();
        assert!(store.is_empty());
        assert!(store.list().is_empty());
    }

    #[test]
    fn corrupt_blob_opens_empty() {
        let store = QuizStore::open(MemoryBackend::with_contents("{not json"));
        assert!(store.is_empty());

        let store = QuizStore::open(MemoryBackend::with_contents(r#"{"id": 1}"#));
        assert!(store.is_empty());
    }

    #[test]
    fn malformed_entries_are_discarded() {
        let good = serde_json::to_value(sample_quiz(7, "Good")).unwrap();
        let blob = serde_json::json!([
            good,
            {"id": 8, "title": "", "questions": [], "createdAt": "2024-01-01T00:00:00Z"},
            {"id": 9, "title": "Three options", "createdAt": "2024-01-01T00:00:00Z",
             "questions": [{"question": "q", "options": ["a", "b", "c"], "correctAnswer": 0}]},
            "garbage",
        ]);
        let store = QuizStore::open(MemoryBackend::with_contents(&blob.to_string()));
        assert_eq!(store.len(), 1);
        assert_eq!(store.list()[0].title(), "Good");
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let blob = serde_json::to_string(&vec![sample_quiz(5, "First"), sample_quiz(5, "Second")])
            .unwrap();
        let store = QuizStore::open(MemoryBackend::with_contents(&blob));
        assert_eq!(store.len(), 1);
        assert_eq!(store.find_by_id(QuizId(5)).unwrap().title(), "First");
    }

    #[test]
    fn append_persists_and_reloads_in_order() {
        let backend = MemoryBackend::new();
        let mut store = QuizStore::open(backend.clone());
        let a = store.append(sample_quiz(1, "A")).unwrap();
        let b = store.append(sample_quiz(2, "B")).unwrap();
        assert_eq!(backend.write_count(), 2);

        let reopened = QuizStore::open(backend);
        assert_eq!(reopened.list(), &[a, b][..]);
    }

    #[test]
    fn find_by_id_not_found_is_none() {
        let mut store = QuizStore::in_memory();
        store.append(sample_quiz(1, "A")).unwrap();
        assert!(store.find_by_id(QuizId(1)).is_some());
        assert!(store.find_by_id(QuizId(2)).is_none());
    }

    #[test]
    fn failed_write_leaves_collection_untouched() {
        let backend = MemoryBackend::new();
        let mut store = QuizStore::open(backend.clone());
        store.append(sample_quiz(1, "A")).unwrap();
        let before = backend.contents();

        backend.set_unavailable(true);
        let err = store.append(sample_quiz(2, "B")).unwrap_err();
        assert!(matches!(err, PersistenceError::Unavailable(_)));
        assert_eq!(store.len(), 1);
        assert_eq!(backend.contents(), before);

        backend.set_unavailable(false);
        store.append(sample_quiz(2, "B")).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn concurrent_writer_is_detected() {
        let backend = MemoryBackend::new();
        let mut first = QuizStore::open(backend.clone());
        let mut second = QuizStore::open(backend.clone());

        first.append(sample_quiz(1, "From first")).unwrap();
        let err = second.append(sample_quiz(2, "From second")).unwrap_err();
        assert!(matches!(err, PersistenceError::Conflict));
        assert!(second.is_empty());

        assert_eq!(second.reload(), 1);
        second.append(sample_quiz(2, "From second")).unwrap();

        let merged = QuizStore::open(backend);
        let titles: Vec<&str> = merged.list().iter().map(|q| q.title()).collect();
        assert_eq!(titles, vec!["From first", "From second"]);
    }

    #[test]
    fn next_id_is_monotonic() {
        let mut store = QuizStore::in_memory();
        let now = DateTime::<Utc>::from_timestamp_millis(1_000).unwrap();
        assert_eq!(store.next_id(now), Some(QuizId(1_000)));

        store.append(sample_quiz(5_000, "Future")).unwrap();
        assert_eq!(store.next_id(now), Some(QuizId(5_001)));

        let later = DateTime::<Utc>::from_timestamp_millis(9_000).unwrap();
        assert_eq!(store.next_id(later), Some(QuizId(9_000)));
    }

    #[test]
    fn next_id_runs_out_at_max() {
        let blob = serde_json::to_string(&vec![sample_quiz(i64::MAX, "Last")]).unwrap();
        let store = QuizStore::open(MemoryBackend::with_contents(&blob));
        assert_eq!(store.next_id(Utc::now()), None);
    }

    #[test]
    fn write_between_read_and_write_is_not_lost() {
        let shared = MemoryBackend::new();
        let other = shared.clone();
        let backend = InterleavedBackend::new(shared.clone(), move || {
            let mut rival = QuizStore::open(other);
            rival.append(sample_quiz(1, "Rival")).unwrap();
        });

        let mut store = QuizStore::open(backend);
        let err = store.append(sample_quiz(2, "Mine")).unwrap_err();
        assert!(matches!(err, PersistenceError::Conflict));
        assert!(store.is_empty());

        let on_medium = QuizStore::open(shared.clone());
        let titles: Vec<&str> = on_medium.list().iter().map(|q| q.title()).collect();
        assert_eq!(titles, vec!["Rival"]);
        assert_eq!(shared.write_count(), 1);

        assert_eq!(store.reload(), 1);
        store.append(sample_quiz(2, "Mine")).unwrap();
        assert_eq!(QuizStore::open(shared).len(), 2);
    }

    #[test]
    fn file_writers_interleaving_keep_both_quizzes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizzes.json");
        let rival_path = path.clone();
        let backend = InterleavedBackend::new(FileBackend::new(&path), move || {
            let mut rival = QuizStore::open_file(&rival_path);
            rival.append(sample_quiz(1, "Rival")).unwrap();
        });
        let mut store = QuizStore::open(backend);

        assert!(matches!(
            store.append(sample_quiz(2, "Mine")),
            Err(PersistenceError::Conflict)
        ));
        store.reload();
        store.append(sample_quiz(2, "Mine")).unwrap();

        let reopened = QuizStore::open_file(&path);
        let titles: Vec<&str> = reopened.list().iter().map(|q| q.title()).collect();
        assert_eq!(titles, vec!["Rival", "Mine"]);
    }

    #[test]
    fn file_write_error_surfaces_and_keeps_store_empty() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file.txt");
        std::fs::write(&blocker, "not a directory").unwrap();

        let mut store = QuizStore::open_file(blocker.join("quizzes.json"));
        let err = store.append(sample_quiz(1, "Nowhere")).unwrap_err();
        assert!(matches!(err, PersistenceError::Write { .. }));
        assert!(store.list().is_empty());
        assert!(!blocker.join("quizzes.json").exists());
    }

    #[test]
    fn file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizzes.json");

        let mut store = QuizStore::open_file(&path).with_pretty(true);
        let quiz = store.append(sample_quiz(1, "On disk")).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("\n"));

        let reopened = QuizStore::open_file(&path);
        assert_eq!(reopened.list(), &[quiz][..]);
    }
}
